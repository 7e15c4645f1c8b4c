//! Graph construction
//!
//! Turns a completed, classified fragment into the node and edge maps of an
//! AOWLN diagram. Properties are reified as nodes of their own so that later
//! steps (built-in attachment, redundant edge removal) can address them by id.
//!
//! Both maps are insertion ordered: the same atom list always produces the
//! same nodes and edges in the same order.

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::classify::{BuiltInAtom, ClassAtom, ClassifiedAtom, PropertyAtom};
use crate::label::wrap_label;

/// Prefix of the node id given to a data property's reified node.
const DATA_PROPERTY_PREFIX: &str = "EL";

/// Per-graph edge identifier.
pub type EdgeId = u64;

/// The kind of a diagram node, which decides its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A concept, drawn as a rectangle.
    Class,
    /// A reified object or data property, drawn as an ellipse.
    Property,
    /// A data value or built-in variable, drawn as a trapezoid.
    Variable,
    /// A function-style built-in, drawn as a diamond.
    BuiltInCollection,
}

impl NodeKind {
    /// Graphviz shape name for the node kind.
    ///
    /// ```
    /// use aowln_core::NodeKind;
    ///
    /// assert_eq!(NodeKind::Class.shape(), "box");
    /// assert_eq!(NodeKind::BuiltInCollection.shape(), "diamond");
    /// ```
    pub fn shape(&self) -> &'static str {
        match self {
            NodeKind::Class => "box",
            NodeKind::Property => "ellipse",
            NodeKind::Variable => "trapezium",
            NodeKind::BuiltInCollection => "diamond",
        }
    }

    fn wraps_label(&self) -> bool {
        matches!(self, NodeKind::Class | NodeKind::Property)
    }
}

/// The kind of a diagram edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Plain connection.
    Normal,
    /// Connection into or out of a reified object property.
    ObjectProperty,
    /// Connection carrying built-in semantics.
    BuiltIn,
}

/// A node of a fragment graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique within one graph.
    pub id: String,
    /// Display text. Several nodes may share a label.
    pub label: String,
    pub kind: NodeKind,
}

impl GraphNode {
    /// Creates a node.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    /// A variable node whose label is its id.
    pub fn variable(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind: NodeKind::Variable,
        }
    }
}

/// A directed edge between two node ids of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    /// Text drawn next to the edge, if any.
    pub label: Option<String>,
}

impl GraphEdge {
    /// Creates an unlabeled edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: None,
        }
    }

    /// Sets the edge label. Empty text means no label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
        self
    }
}

/// The node and edge maps of one fragment's diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<EdgeId, GraphEdge>,
    next_edge: EdgeId,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, replacing any node with the same id in place.
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Inserts a node unless one with the same id already exists.
    /// Returns `true` if the node was inserted.
    pub fn add_node_if_absent(&mut self, node: GraphNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.add_node(node);
        true
    }

    /// Appends an edge and returns its id.
    pub fn add_edge(&mut self, edge: GraphEdge) -> EdgeId {
        let id = self.next_edge;
        self.next_edge += 1;
        self.edges.insert(id, edge);
        id
    }

    /// Removes the first edge of `kind` from `from` to `to`, keeping the
    /// order of the remaining edges.
    pub fn remove_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> Option<GraphEdge> {
        let id = self
            .edges
            .iter()
            .find(|(_, e)| e.kind == kind && e.from == from && e.to == to)
            .map(|(id, _)| *id)?;
        self.edges.shift_remove(&id)
    }

    /// Gets a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Returns `true` if a node with `id` exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Edges with their ids in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &GraphEdge)> {
        self.edges.iter().map(|(id, e)| (*id, e))
    }

    /// Position of a node in insertion order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    fn wrap_labels(&mut self) {
        for node in self.nodes.values_mut() {
            if node.kind.wraps_label() {
                let wrapped = wrap_label(&node.label).into_owned();
                node.label = wrapped;
            }
        }
    }
}

/// Counters collected while building one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Nodes in the finished graph.
    pub nodes: usize,
    /// Edges in the finished graph.
    pub edges: usize,
    /// Built-in groups, one per anchor variable.
    pub built_in_groups: usize,
    /// Bound-only groups that had no data property to attach to.
    pub unanchored_groups: usize,
    /// Normal edges replaced by a built-in edge.
    pub removed_edges: usize,
}

/// Builds the diagram graph of one completed fragment.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    stats: BuildStats,
}

impl GraphBuilder {
    /// Creates a builder with an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph for `atoms`.
    pub fn build(atoms: impl IntoIterator<Item = ClassifiedAtom>) -> Graph {
        Self::build_with_stats(atoms).0
    }

    /// Builds the graph for `atoms` and reports what happened.
    pub fn build_with_stats(atoms: impl IntoIterator<Item = ClassifiedAtom>) -> (Graph, BuildStats) {
        let mut builder = Self::new();
        let mut groups: IndexMap<String, Vec<BuiltInAtom>> = IndexMap::new();

        for atom in atoms {
            match atom {
                ClassifiedAtom::Class(class) => builder.add_class(class),
                ClassifiedAtom::ObjectProperty(property) => builder.add_object_property(property),
                ClassifiedAtom::DataProperty(property) => builder.add_data_property(property),
                ClassifiedAtom::BuiltIn(built_in) => {
                    if let Some(anchor) = built_in.anchor() {
                        groups.entry(anchor.to_string()).or_default().push(built_in);
                    }
                }
            }
        }

        for (anchor, group) in &groups {
            builder.add_built_in_group(anchor, group);
        }

        builder.finish()
    }

    fn add_class(&mut self, class: ClassAtom) {
        trace!("Class node '{}'", class.key);
        self.graph
            .add_node(GraphNode::new(class.key, class.label, NodeKind::Class));
    }

    fn add_object_property(&mut self, property: PropertyAtom) {
        let id = format!("{}{}", property.label, property.key);
        trace!("Object property node '{}'", id);
        self.graph
            .add_node(GraphNode::new(&id, &property.label, NodeKind::Property));
        self.graph.add_edge(GraphEdge::new(
            &property.subject,
            &id,
            EdgeKind::ObjectProperty,
        ));
        self.graph
            .add_edge(GraphEdge::new(&id, &property.key, EdgeKind::ObjectProperty));
    }

    fn add_data_property(&mut self, property: PropertyAtom) {
        let id = format!("{}{}", DATA_PROPERTY_PREFIX, property.key);
        trace!("Data property node '{}'", id);
        self.graph
            .add_node(GraphNode::new(&id, &property.label, NodeKind::Property));
        self.graph
            .add_edge(GraphEdge::new(&property.subject, &id, EdgeKind::Normal));

        self.graph.add_node(GraphNode::variable(&property.key));
        self.graph
            .add_edge(GraphEdge::new(&id, &property.key, EdgeKind::Normal));
    }

    /// Lays out the built-ins sharing one anchor variable.
    ///
    /// At most one member is expected to be unbound; if several are, the last
    /// one becomes the diamond and the others are ignored.
    fn add_built_in_group(&mut self, anchor: &str, group: &[BuiltInAtom]) {
        self.stats.built_in_groups += 1;

        let unbound = group.iter().rev().find(|b| !b.is_bound);
        let bound: Vec<&BuiltInAtom> = group.iter().filter(|b| b.is_bound).collect();
        let bound_label = bound
            .iter()
            .map(|b| b.edge_label())
            .collect::<Vec<_>>()
            .join("\n");

        // A data property value is already the anchor; anything else under
        // the anchor id is redrawn as a variable.
        if self
            .graph
            .node(anchor)
            .map_or(true, |node| node.kind != NodeKind::Variable)
        {
            self.graph.add_node(GraphNode::variable(anchor));
        }

        if let Some(unbound) = unbound {
            let diamond = format!("{}{}", anchor, unbound.label);
            trace!("Built-in collection node '{}'", diamond);
            self.graph.add_node(GraphNode::new(
                &diamond,
                &unbound.label,
                NodeKind::BuiltInCollection,
            ));

            for input in unbound.arguments.iter().skip(1) {
                self.graph.add_node_if_absent(GraphNode::variable(input));
                self.graph
                    .add_edge(GraphEdge::new(input, &diamond, EdgeKind::BuiltIn));
            }

            if bound.is_empty() {
                self.graph
                    .add_edge(GraphEdge::new(&diamond, anchor, EdgeKind::Normal));
            } else {
                self.graph.add_edge(
                    GraphEdge::new(&diamond, anchor, EdgeKind::BuiltIn).with_label(bound_label),
                );
            }
        } else if !bound.is_empty() {
            let property = format!("{}{}", DATA_PROPERTY_PREFIX, anchor);
            if !self.graph.contains_node(&property) {
                debug!(
                    "Built-in group on '{}' has no function or data property to attach to",
                    anchor
                );
                self.stats.unanchored_groups += 1;
                return;
            }

            if self
                .graph
                .remove_edge(&property, anchor, EdgeKind::Normal)
                .is_some()
            {
                self.stats.removed_edges += 1;
            }
            self.graph.add_edge(
                GraphEdge::new(&property, anchor, EdgeKind::BuiltIn).with_label(bound_label),
            );
        }
    }

    fn finish(mut self) -> (Graph, BuildStats) {
        self.graph.wrap_labels();
        self.stats.nodes = self.graph.node_count();
        self.stats.edges = self.graph.edge_count();
        debug!(
            "Built graph with {} nodes and {} edges",
            self.stats.nodes, self.stats.edges
        );
        (self.graph, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{BuiltInArgument, RuleAtom};
    use crate::classify::{classify, SequentialIds};
    use crate::complete::complete_body;

    fn build(atoms: &[RuleAtom]) -> (Graph, BuildStats) {
        let mut parts = classify(atoms, &mut SequentialIds::new());
        complete_body(&mut parts);
        GraphBuilder::build_with_stats(parts.into_atoms())
    }

    fn edge_triples(graph: &Graph) -> Vec<(&str, &str, EdgeKind, Option<&str>)> {
        graph
            .edges()
            .map(|(_, e)| (e.from.as_str(), e.to.as_str(), e.kind, e.label.as_deref()))
            .collect()
    }

    #[test]
    fn test_empty_fragment() {
        let (graph, stats) = build(&[]);
        assert!(graph.is_empty());
        assert_eq!(stats, BuildStats::default());
    }

    #[test]
    fn test_object_property_reified() {
        let (graph, _) = build(&[
            RuleAtom::class("Person", "p1"),
            RuleAtom::class("Person", "c1"),
            RuleAtom::object_property("hasChild", "p1", "c1"),
        ]);

        assert_eq!(graph.node_count(), 3);
        let property = graph.node("hasChildc1").unwrap();
        assert_eq!(property.kind, NodeKind::Property);
        assert_eq!(property.label, "hasChild");
        assert_eq!(
            edge_triples(&graph),
            vec![
                ("p1", "hasChildc1", EdgeKind::ObjectProperty, None),
                ("hasChildc1", "c1", EdgeKind::ObjectProperty, None),
            ]
        );
    }

    #[test]
    fn test_repeated_predicate_stays_distinct() {
        let (graph, _) = build(&[
            RuleAtom::object_property("knows", "a", "b"),
            RuleAtom::object_property("knows", "a", "c"),
        ]);
        assert!(graph.contains_node("knowsb"));
        assert!(graph.contains_node("knowsc"));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_data_property_variable_leaf() {
        let (graph, _) = build(&[RuleAtom::data_property("hasAge", "p", "age")]);

        assert_eq!(graph.node("ELage").unwrap().kind, NodeKind::Property);
        assert_eq!(graph.node("age").unwrap().kind, NodeKind::Variable);
        assert_eq!(
            edge_triples(&graph),
            vec![
                ("p", "ELage", EdgeKind::Normal, None),
                ("ELage", "age", EdgeKind::Normal, None),
            ]
        );
    }

    #[test]
    fn test_built_in_grouping() {
        let (graph, stats) = build(&[
            RuleAtom::built_in(
                "add",
                vec![
                    BuiltInArgument::variable("v"),
                    BuiltInArgument::bound("a"),
                    BuiltInArgument::bound("b"),
                ],
            ),
            RuleAtom::built_in(
                "greaterThan",
                vec![BuiltInArgument::bound("v"), BuiltInArgument::literal("0")],
            ),
        ]);

        let diamonds: Vec<&GraphNode> = graph
            .nodes()
            .filter(|n| n.kind == NodeKind::BuiltInCollection)
            .collect();
        assert_eq!(diamonds.len(), 1);
        assert_eq!(diamonds[0].id, "vadd");
        assert_eq!(diamonds[0].label, "add");

        assert_eq!(
            edge_triples(&graph),
            vec![
                ("a", "vadd", EdgeKind::BuiltIn, None),
                ("b", "vadd", EdgeKind::BuiltIn, None),
                ("vadd", "v", EdgeKind::BuiltIn, Some("greaterThan(0)")),
            ]
        );
        assert_eq!(stats.built_in_groups, 1);
    }

    #[test]
    fn test_unbound_only_uses_normal_edge() {
        let (graph, _) = build(&[
            RuleAtom::data_property("hasPrice", "item", "price"),
            RuleAtom::built_in(
                "multiply",
                vec![
                    BuiltInArgument::variable("total"),
                    BuiltInArgument::bound("price"),
                    BuiltInArgument::literal("2"),
                ],
            ),
        ]);

        let triples = edge_triples(&graph);
        assert!(triples.contains(&("price", "totalmultiply", EdgeKind::BuiltIn, None)));
        assert!(triples.contains(&("totalmultiply", "total", EdgeKind::Normal, None)));
        assert_eq!(graph.node("total").unwrap().kind, NodeKind::Variable);
    }

    #[test]
    fn test_multiple_bound_labels_joined() {
        let (graph, _) = build(&[
            RuleAtom::built_in("subtract", vec![BuiltInArgument::variable("d")]),
            RuleAtom::built_in(
                "greaterThan",
                vec![BuiltInArgument::bound("d"), BuiltInArgument::literal("1")],
            ),
            RuleAtom::built_in(
                "lessThan",
                vec![BuiltInArgument::bound("d"), BuiltInArgument::literal("9")],
            ),
        ]);

        let (_, edge) = graph.edges().last().unwrap();
        assert_eq!(edge.label.as_deref(), Some("greaterThan(1)\nlessThan(9)"));
    }

    #[test]
    fn test_redundant_edge_replaced() {
        let (graph, stats) = build(&[
            RuleAtom::data_property("hasValue", "x", "v"),
            RuleAtom::built_in(
                "equal",
                vec![BuiltInArgument::bound("v"), BuiltInArgument::literal("5")],
            ),
        ]);

        let between: Vec<&GraphEdge> = graph
            .edges()
            .map(|(_, e)| e)
            .filter(|e| e.from == "ELv" && e.to == "v")
            .collect();
        assert_eq!(between.len(), 1);
        assert_eq!(between[0].kind, EdgeKind::BuiltIn);
        assert_eq!(between[0].label.as_deref(), Some("equal(5)"));
        assert_eq!(stats.removed_edges, 1);
        // the data property keeps its variable node rather than a duplicate
        assert_eq!(graph.node("v").unwrap().kind, NodeKind::Variable);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_bound_group_without_anchor_dropped() {
        let (graph, stats) = build(&[RuleAtom::built_in(
            "lessThan",
            vec![BuiltInArgument::bound("n"), BuiltInArgument::literal("3")],
        )]);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(stats.unanchored_groups, 1);
    }

    #[test]
    fn test_anchor_replaces_class_node() {
        let (graph, _) = build(&[
            RuleAtom::class("Person", "p"),
            RuleAtom::built_in("abs", vec![BuiltInArgument::variable("p")]),
        ]);
        assert_eq!(graph.node("p").unwrap().kind, NodeKind::Variable);
        assert_eq!(graph.node("p").unwrap().label, "p");
        assert_eq!(graph.node_index("p"), Some(0));
    }

    #[test]
    fn test_anchor_keeps_data_property_value() {
        let (graph, _) = build(&[
            RuleAtom::data_property("hasAge", "x", "age"),
            RuleAtom::built_in(
                "greaterThan",
                vec![BuiltInArgument::bound("age"), BuiltInArgument::literal("17")],
            ),
        ]);
        assert_eq!(graph.node("age").unwrap().kind, NodeKind::Variable);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_long_labels_wrapped() {
        let (graph, _) = build(&[
            RuleAtom::class("ResearchProject", "proj"),
            RuleAtom::object_property("isResponsibleFor", "proj", "thing"),
            RuleAtom::built_in(
                "stringConcat",
                vec![BuiltInArgument::variable("someLongVariable")],
            ),
        ]);

        assert_eq!(graph.node("proj").unwrap().label, "Research\nProject\n(proj)");
        assert_eq!(
            graph.node("isResponsibleForthing").unwrap().label,
            "isResponsible\nFor"
        );
        // variables and diamonds keep their text
        assert_eq!(
            graph.node("someLongVariable").unwrap().label,
            "someLongVariable"
        );
        assert_eq!(
            graph.node("someLongVariablestringConcat").unwrap().label,
            "stringConcat"
        );
    }

    #[test]
    fn test_remove_edge_preserves_order() {
        let mut graph = Graph::new();
        graph.add_edge(GraphEdge::new("a", "b", EdgeKind::Normal));
        graph.add_edge(GraphEdge::new("b", "c", EdgeKind::Normal));
        graph.add_edge(GraphEdge::new("c", "d", EdgeKind::Normal));

        assert!(graph.remove_edge("b", "c", EdgeKind::BuiltIn).is_none());
        assert!(graph.remove_edge("b", "c", EdgeKind::Normal).is_some());

        let ids: Vec<EdgeId> = graph.edges().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 2]);
    }
}
