//! Batch diagram generation
//!
//! Renders the body and head diagram of every rule into an output directory.
//! Rules are independent, so they are drawn in parallel on a bounded worker
//! pool; the reports come back in rule order.

use std::path::{Path, PathBuf};

use aowln_core::{render_fragment, DiagramGraph, FragmentKind, Rule, SequentialIds};
use log::{error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::VizConfig;
use crate::error::{Error, Result};
use crate::render::{renderer_for, DiagramRenderer};

/// Outcome of drawing one fragment of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub fragment: FragmentKind,
    pub path: PathBuf,
    /// Why the image could not be produced, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageReport {
    /// Whether the image was written.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of drawing one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    /// Position of the rule in its document.
    pub index: usize,
    pub name: String,
    /// The rule in SWRL notation.
    pub text: String,
    pub body: ImageReport,
    pub head: ImageReport,
}

impl RuleReport {
    /// Whether both images were written.
    pub fn is_ok(&self) -> bool {
        self.body.is_ok() && self.head.is_ok()
    }
}

/// Reports for a whole batch, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub reports: Vec<RuleReport>,
}

impl BatchSummary {
    /// Number of rules whose diagrams were all written.
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of rules with at least one failed diagram.
    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }
}

/// Draws the diagrams of a list of rules.
pub struct BatchRunner {
    config: VizConfig,
    renderer: Box<dyn DiagramRenderer>,
}

impl BatchRunner {
    /// Create a runner using the renderer for the configured format.
    pub fn new(config: VizConfig) -> Self {
        let renderer = renderer_for(&config);
        Self { config, renderer }
    }

    /// Create a runner with a custom renderer.
    pub fn with_renderer(config: VizConfig, renderer: Box<dyn DiagramRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Draw every rule into `out_dir`, creating the directory if needed.
    ///
    /// A rule whose diagram fails is reported and logged; the rest of the
    /// batch still runs. Only a failure to prepare the directory or the worker
    /// pool aborts the whole batch.
    pub fn run(&self, rules: &[Rule], out_dir: &Path) -> Result<BatchSummary> {
        std::fs::create_dir_all(out_dir)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()?;
        info!(
            "drawing {} rule(s) into {} with {} worker(s)",
            rules.len(),
            out_dir.display(),
            pool.current_num_threads()
        );

        let reports: Vec<RuleReport> = pool.install(|| {
            rules
                .par_iter()
                .enumerate()
                .map(|(index, rule)| self.run_rule(index, rule, out_dir))
                .collect()
        });

        let summary = BatchSummary { reports };
        info!(
            "{} rule(s) drawn, {} failed",
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }

    fn run_rule(&self, index: usize, rule: &Rule, out_dir: &Path) -> RuleReport {
        info!("rule {} '{}': {}", index, rule.name, rule);
        let base = base_name(index, &rule.name);
        let path = |kind: FragmentKind| {
            out_dir.join(format!(
                "{}-{}.{}",
                base,
                kind.suffix(),
                self.renderer.extension()
            ))
        };

        let mut body = ImageReport {
            fragment: FragmentKind::Body,
            path: path(FragmentKind::Body),
            error: None,
        };
        let mut head = ImageReport {
            fragment: FragmentKind::Head,
            path: path(FragmentKind::Head),
            error: None,
        };

        // Fresh ids per rule keep the output independent of scheduling.
        let mut ids = SequentialIds::new();
        let completed = aowln_core::complete_rule(rule, &mut ids);

        for (report, fragment) in [(&mut body, completed.body), (&mut head, completed.head)] {
            let result = render_fragment(fragment)
                .map_err(Error::from)
                .and_then(|diagram| self.draw(&diagram, &report.path));
            if let Err(e) = result {
                error!(
                    "rule {} '{}': cannot draw {}: {}",
                    index, rule.name, report.fragment, e
                );
                report.error = Some(e.to_string());
            }
        }

        RuleReport {
            index,
            name: rule.name.clone(),
            text: rule.to_string(),
            body,
            head,
        }
    }

    fn draw(&self, diagram: &DiagramGraph, out: &Path) -> Result<()> {
        if diagram.is_empty() {
            warn!("{} has no nodes", out.display());
        }
        self.renderer.render(diagram, out)
    }
}

/// File name stem for a rule: `rule_{index}_{name}` with the name reduced to
/// characters every filesystem accepts.
pub fn base_name(index: usize, name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("rule_{}_{}", index, safe)
}
