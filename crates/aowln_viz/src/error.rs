//! Error types for the AOWLN diagram tool.

use thiserror::Error;

/// A specialized `Result` type for diagram generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur within the `aowln_viz` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The rule document could not be understood.
    #[error("Rule source error: {0}")]
    Source(String),

    /// A diagram could not be drawn or written.
    #[error("Render error: {0}")]
    Render(String),

    /// An error related to the tool's configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error that occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An error from the underlying I/O system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error originating from graph construction.
    #[error("Graph error: {0}")]
    Graph(#[from] aowln_core::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::Config(format!("cannot start worker pool: {}", e))
    }
}
