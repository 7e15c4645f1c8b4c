//! Export of built graphs into renderer-ready lists.
//!
//! A [`DiagramGraph`] holds the nodes in graph order and the edges with their
//! endpoints resolved to node positions, so a renderer never has to look ids up.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::atom::Rule;
use crate::builder::{EdgeKind, Graph, GraphBuilder, GraphNode};
use crate::classify::{IdGenerator, Partitions};
use crate::complete::complete_rule;
use crate::error::{Error, Result};

/// An edge whose endpoints are indexes into [`DiagramGraph::nodes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
}

/// The ordered node and edge lists of one fragment's diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<DiagramEdge>,
}

impl DiagramGraph {
    /// Returns the source and target nodes of `edge`.
    ///
    /// Returns `None` if `edge` does not belong to this graph.
    pub fn endpoints(&self, edge: &DiagramEdge) -> Option<(&GraphNode, &GraphNode)> {
        Some((self.nodes.get(edge.from)?, self.nodes.get(edge.to)?))
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns `true` if the diagram has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serializes the diagram as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The body and head diagrams of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDiagrams {
    pub body: DiagramGraph,
    pub head: DiagramGraph,
}

/// Flattens `graph` into ordered lists.
///
/// # Errors
///
/// Returns [`Error::DanglingEdge`] if an edge references a node id the graph
/// does not contain.
pub fn export(graph: &Graph) -> Result<DiagramGraph> {
    let nodes: Vec<GraphNode> = graph.nodes().cloned().collect();

    let resolve = |edge_id: u64, node_id: &str| {
        graph.node_index(node_id).ok_or_else(|| Error::DanglingEdge {
            edge: edge_id,
            node: node_id.to_string(),
        })
    };

    let edges = graph
        .edges()
        .map(|(id, edge)| {
            Ok(DiagramEdge {
                from: resolve(id, &edge.from)?,
                to: resolve(id, &edge.to)?,
                kind: edge.kind,
                label: edge.label.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DiagramGraph { nodes, edges })
}

/// Builds and exports the diagram of one completed fragment.
pub fn render_fragment(fragment: Partitions) -> Result<DiagramGraph> {
    let (graph, stats) = GraphBuilder::build_with_stats(fragment.into_atoms());
    if stats.unanchored_groups > 0 {
        debug!(
            "{} built-in group(s) were not drawn for lack of an anchor",
            stats.unanchored_groups
        );
    }
    export(&graph)
}

/// Runs the whole pipeline for `rule`: classification, completion (body
/// first), construction and export of both fragments.
pub fn render_rule<G>(rule: &Rule, ids: &mut G) -> Result<RuleDiagrams>
where
    G: IdGenerator + ?Sized,
{
    let completed = complete_rule(rule, ids);
    Ok(RuleDiagrams {
        body: render_fragment(completed.body)?,
        head: render_fragment(completed.head)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{GraphEdge, NodeKind};

    #[test]
    fn test_export_resolves_indexes() {
        let mut graph = Graph::new();
        graph.add_node(GraphNode::new("a", "A", NodeKind::Class));
        graph.add_node(GraphNode::variable("b"));
        graph.add_edge(GraphEdge::new("a", "b", EdgeKind::Normal).with_label("x"));

        let diagram = export(&graph).unwrap();
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(
            diagram.edges,
            vec![DiagramEdge {
                from: 0,
                to: 1,
                kind: EdgeKind::Normal,
                label: Some("x".into())
            }]
        );

        let (from, to) = diagram.endpoints(&diagram.edges[0]).unwrap();
        assert_eq!(from.id, "a");
        assert_eq!(to.id, "b");
    }

    #[test]
    fn test_export_dangling_edge() {
        let mut graph = Graph::new();
        graph.add_node(GraphNode::variable("a"));
        graph.add_edge(GraphEdge::new("a", "ghost", EdgeKind::Normal));

        let err = export(&graph).unwrap_err();
        assert_eq!(
            err,
            Error::DanglingEdge {
                edge: 0,
                node: "ghost".into()
            }
        );
    }

    #[test]
    fn test_empty_export() {
        let diagram = export(&Graph::new()).unwrap();
        assert!(diagram.is_empty());
        assert!(diagram.edges.is_empty());
    }

    #[test]
    fn test_json_omits_missing_label() {
        let mut graph = Graph::new();
        graph.add_node(GraphNode::variable("a"));
        graph.add_edge(GraphEdge::new("a", "a", EdgeKind::BuiltIn));

        let json = export(&graph).unwrap().to_json().unwrap();
        assert!(json.contains("\"BuiltIn\""));
        assert!(!json.contains("label\": null"));
    }
}
