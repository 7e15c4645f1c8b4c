//! # AOWLN Viz - Rule Diagram Generator
//!
//! Batch tool that draws the AOWLN body and head diagrams of every SWRL rule in
//! a rule document.
//!
//! ## Overview
//!
//! Rules are read from a JSON rule document, their names are shortened with the
//! document's namespace prefixes, and each rule is run through the
//! [`aowln_core`] pipeline. The resulting diagrams are written as Graphviz DOT,
//! JSON, or images laid out by the Graphviz `dot` program.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  AOWLN Diagram Generator                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  rules.json ──► RuleDocument ──► PrefixMap ──► Vec<Rule>    │
//! │                                                   │          │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  BatchRunner (rayon pool, `jobs` workers)           │   │
//! │  │  ├── aowln_core: classify, complete, build, export  │   │
//! │  │  └── DiagramRenderer                                │   │
//! │  │      ├── DotRenderer       → rule_0_x-body.dot      │   │
//! │  │      ├── JsonRenderer      → rule_0_x-body.json     │   │
//! │  │      └── GraphvizRenderer  → rule_0_x-body.svg/.png │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aowln_viz::{BatchRunner, RuleDocument, VizConfig};
//! use std::path::Path;
//!
//! fn main() -> aowln_viz::Result<()> {
//!     let document = RuleDocument::load(Path::new("family-rules.json"))?;
//!     let runner = BatchRunner::new(VizConfig::offline());
//!     let summary = runner.run(&document.to_rules(), Path::new("diagrams"))?;
//!     println!("{} rules drawn", summary.succeeded());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod namespace;
pub mod render;
pub mod source;

pub use batch::{base_name, BatchRunner, BatchSummary, ImageReport, RuleReport};
pub use config::{OutputFormat, VizConfig};
pub use error::{Error, Result};
pub use namespace::{Argument, PrefixMap};
pub use render::{
    renderer_for, to_dot, DiagramRenderer, DotRenderer, GraphvizRenderer, JsonRenderer,
};
pub use source::{RawAtom, RawRule, RuleDocument};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
