//! AOWLN Core - Diagram graphs for SWRL rules
//!
//! This crate turns the atoms of a logical rule into the typed node/edge graph
//! drawn by the AOWLN notation. Every rule yields two graphs, one for its body
//! (antecedent) and one for its head (consequent).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      AOWLN Pipeline                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                  Atom Classifier                      │   │
//! │  │  Class │ Object Property │ Data Property │ Built-In  │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                 Concept Completer                     │   │
//! │  │  Placeholder "Thing" │ Body concept reuse in head    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Graph Builder                       │   │
//! │  │  Reified properties │ Built-in groups │ Label wrap   │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                   Graph Exporter                      │   │
//! │  │  Ordered node list │ Index-resolved edge list        │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use aowln_core::{render_rule, Rule, RuleAtom, SequentialIds};
//!
//! let rule = Rule::new("parent")
//!     .with_body(vec![
//!         RuleAtom::class("Person", "p1"),
//!         RuleAtom::object_property("hasChild", "p1", "c1"),
//!     ])
//!     .with_head(vec![RuleAtom::object_property("hasParent", "c1", "p1")]);
//!
//! let diagrams = render_rule(&rule, &mut SequentialIds::new()).unwrap();
//! assert_eq!(diagrams.body.nodes.len(), 3);
//! assert_eq!(diagrams.head.nodes.len(), 3);
//! ```

pub mod atom;
pub mod builder;
pub mod classify;
pub mod complete;
pub mod error;
pub mod export;
pub mod label;

// Re-exports
pub use atom::{BuiltInArgument, FragmentKind, Rule, RuleAtom};
pub use builder::{BuildStats, EdgeId, EdgeKind, Graph, GraphBuilder, GraphEdge, GraphNode, NodeKind};
pub use classify::{
    classify, BuiltInAtom, ClassAtom, ClassifiedAtom, IdGenerator, Partitions, PropertyAtom,
    SequentialIds, UuidIds,
};
pub use complete::{complete_body, complete_head, complete_rule, CompletedRule};
pub use error::{Error, Result};
pub use export::{export, render_fragment, render_rule, DiagramEdge, DiagramGraph, RuleDiagrams};
pub use label::{wrap_label, WRAP_THRESHOLD};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
