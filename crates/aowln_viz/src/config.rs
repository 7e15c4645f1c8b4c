//! Tool configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Output format of the generated diagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz source text
    Dot,
    /// The exported node and edge lists
    Json,
    /// Scalable vector graphics, drawn by Graphviz
    #[default]
    Svg,
    /// Raster image, drawn by Graphviz
    Png,
}

impl OutputFormat {
    /// File extension used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the format needs the external Graphviz layout program.
    pub fn needs_graphviz(&self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Png)
    }
}

/// Configuration for diagram generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Output format
    pub format: OutputFormat,

    /// Worker threads for rendering; 0 lets the pool pick one per core
    pub jobs: usize,

    /// Graphviz layout program
    pub graphviz: PathBuf,

    /// Scale factor for raster output
    pub png_scale: f64,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Svg,
            jobs: 0,
            graphviz: PathBuf::from("dot"),
            png_scale: 7.0,
        }
    }
}

impl VizConfig {
    /// Create a configuration that writes Graphviz source and needs no
    /// external programs
    pub fn offline() -> Self {
        Self {
            format: OutputFormat::Dot,
            ..Default::default()
        }
    }

    /// Load configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.png_scale.is_finite() || self.png_scale <= 0.0 {
            return Err(Error::Config(format!(
                "png_scale must be positive, got {}",
                self.png_scale
            )));
        }
        if self.format.needs_graphviz() && self.graphviz.as_os_str().is_empty() {
            return Err(Error::Config(
                "graphviz program must be set for image output".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VizConfig::default();
        assert_eq!(config.format, OutputFormat::Svg);
        assert_eq!(config.jobs, 0);
        assert_eq!(config.png_scale, 7.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = VizConfig {
            format: OutputFormat::Png,
            jobs: 4,
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("format = \"png\""));

        let parsed = VizConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = VizConfig::from_toml("format = \"dot\"").unwrap();
        assert_eq!(config.format, OutputFormat::Dot);
        assert_eq!(config.graphviz, PathBuf::from("dot"));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let err = VizConfig::from_toml("png_scale = 0.0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(VizConfig::from_toml("format = \"gif\"").is_err());
    }

    #[test]
    fn test_offline_preset() {
        let config = VizConfig::offline();
        assert_eq!(config.format, OutputFormat::Dot);
        assert!(!config.format.needs_graphviz());
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert!(OutputFormat::Png.needs_graphviz());
        assert!(!OutputFormat::Json.needs_graphviz());
    }
}
