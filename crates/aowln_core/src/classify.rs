//! Atom classification
//!
//! Partitions the raw atoms of one rule fragment into classes, object
//! properties, data properties and built-ins, and computes the key and label
//! each atom contributes to the diagram.

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::atom::{BuiltInArgument, RuleAtom};

/// A class membership ready for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAtom {
    /// The identifier the class is asserted on; doubles as node id.
    pub key: String,
    /// Display text: `Class\n(key)`.
    pub label: String,
}

impl ClassAtom {
    /// Creates a class atom from a class name and the identifier it types.
    pub fn new(predicate: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        let label = format!("{}\n({})", predicate, key);
        Self { key, label }
    }

    /// Creates the generic `Thing` placeholder concept for `key`.
    pub fn placeholder(key: impl Into<String>) -> Self {
        Self::new("Thing", key)
    }
}

/// An object or data property relation ready for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAtom {
    /// The first argument.
    pub subject: String,
    /// The second argument.
    pub key: String,
    /// The property name.
    pub label: String,
}

/// A built-in atom ready for graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltInAtom {
    /// Synthetic identifier, unique per generator.
    pub id: String,
    /// The built-in name.
    pub label: String,
    /// Whether the anchor is consumed (comparison) rather than produced (function).
    pub is_bound: bool,
    /// Variable arguments in call order. The first is the anchor.
    pub arguments: Vec<String>,
    /// Literal arguments in call order.
    pub literals: Vec<String>,
}

impl BuiltInAtom {
    /// The variable the built-in is grouped on.
    pub fn anchor(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Text shown on the edge a bound built-in contributes to.
    ///
    /// `name(lit1,lit2)` when literals exist, `name(arg)` for a single
    /// non-anchor variable, otherwise the bare name.
    pub fn edge_label(&self) -> String {
        if !self.literals.is_empty() {
            format!("{}({})", self.label, self.literals.join(","))
        } else if self.arguments.len() == 2 {
            format!("{}({})", self.label, self.arguments[1])
        } else {
            self.label.clone()
        }
    }
}

/// A classified atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifiedAtom {
    Class(ClassAtom),
    ObjectProperty(PropertyAtom),
    DataProperty(PropertyAtom),
    BuiltIn(BuiltInAtom),
}

/// The four partitions of a classified fragment, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitions {
    pub classes: Vec<ClassAtom>,
    pub object_properties: Vec<PropertyAtom>,
    pub data_properties: Vec<PropertyAtom>,
    pub built_ins: Vec<BuiltInAtom>,
}

impl Partitions {
    /// Looks up the class atom asserted on `key`. The last assertion wins.
    pub fn class(&self, key: &str) -> Option<&ClassAtom> {
        self.classes.iter().rev().find(|c| c.key == key)
    }

    /// Returns `true` if a class atom exists for `key`.
    pub fn has_class(&self, key: &str) -> bool {
        self.classes.iter().any(|c| c.key == key)
    }

    /// Total number of atoms across all partitions.
    pub fn len(&self) -> usize {
        self.classes.len()
            + self.object_properties.len()
            + self.data_properties.len()
            + self.built_ins.len()
    }

    /// Returns `true` if no atom survived classification.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the partitions into the order the graph builder consumes:
    /// classes, data properties, object properties, built-ins.
    pub fn into_atoms(self) -> Vec<ClassifiedAtom> {
        let mut atoms = Vec::with_capacity(self.len());
        atoms.extend(self.classes.into_iter().map(ClassifiedAtom::Class));
        atoms.extend(
            self.data_properties
                .into_iter()
                .map(ClassifiedAtom::DataProperty),
        );
        atoms.extend(
            self.object_properties
                .into_iter()
                .map(ClassifiedAtom::ObjectProperty),
        );
        atoms.extend(self.built_ins.into_iter().map(ClassifiedAtom::BuiltIn));
        atoms
    }
}

/// Source of synthetic built-in ids.
pub trait IdGenerator {
    /// Returns an id never handed out before by this generator.
    fn next_id(&mut self) -> String;
}

/// Monotonic counter ids. Reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

/// Random v4 UUID ids, unique across processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Classifies the atoms of one fragment.
///
/// Atoms with an unresolved (empty) identifier and built-ins without any
/// variable argument are dropped.
pub fn classify<G>(atoms: &[RuleAtom], ids: &mut G) -> Partitions
where
    G: IdGenerator + ?Sized,
{
    let mut partitions = Partitions::default();

    for atom in atoms {
        match atom {
            RuleAtom::Class {
                predicate,
                argument,
            } => {
                if predicate.is_empty() || argument.is_empty() {
                    debug!("Dropping unresolved class atom {}", atom);
                    continue;
                }
                partitions.classes.push(ClassAtom::new(predicate, argument));
            }
            RuleAtom::ObjectProperty {
                predicate,
                subject,
                object,
            } => {
                if predicate.is_empty() || subject.is_empty() || object.is_empty() {
                    debug!("Dropping unresolved object property atom {}", atom);
                    continue;
                }
                partitions.object_properties.push(PropertyAtom {
                    subject: subject.clone(),
                    key: object.clone(),
                    label: predicate.clone(),
                });
            }
            RuleAtom::DataProperty {
                predicate,
                subject,
                value,
            } => {
                if predicate.is_empty() || subject.is_empty() || value.is_empty() {
                    debug!("Dropping unresolved data property atom {}", atom);
                    continue;
                }
                partitions.data_properties.push(PropertyAtom {
                    subject: subject.clone(),
                    key: value.clone(),
                    label: predicate.clone(),
                });
            }
            RuleAtom::BuiltIn {
                predicate,
                arguments,
            } => match classify_built_in(predicate, arguments, ids) {
                Some(built_in) => partitions.built_ins.push(built_in),
                None => debug!("Dropping built-in atom without anchor {}", atom),
            },
        }
    }

    partitions
}

fn classify_built_in<G>(
    predicate: &str,
    arguments: &[BuiltInArgument],
    ids: &mut G,
) -> Option<BuiltInAtom>
where
    G: IdGenerator + ?Sized,
{
    if predicate.is_empty() {
        return None;
    }

    let mut is_bound = false;
    let mut variables = Vec::new();
    let mut literals = Vec::new();

    for (i, arg) in arguments.iter().enumerate() {
        match arg {
            BuiltInArgument::Variable { name, bound } => {
                if name.is_empty() {
                    return None;
                }
                // Only a variable in first position decides the binding style.
                if i == 0 && *bound {
                    is_bound = true;
                }
                variables.push(name.clone());
            }
            BuiltInArgument::Literal(value) => literals.push(value.clone()),
        }
    }

    if variables.is_empty() {
        return None;
    }

    Some(BuiltInAtom {
        id: format!("BI{}", ids.next_id()),
        label: predicate.to_string(),
        is_bound,
        arguments: variables,
        literals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label() {
        let parts = classify(&[RuleAtom::class("Person", "p1")], &mut SequentialIds::new());
        assert_eq!(parts.classes.len(), 1);
        assert_eq!(parts.classes[0].key, "p1");
        assert_eq!(parts.classes[0].label, "Person\n(p1)");
    }

    #[test]
    fn test_property_keys() {
        let parts = classify(
            &[
                RuleAtom::object_property("hasChild", "p1", "c1"),
                RuleAtom::data_property("hasAge", "p1", "age"),
            ],
            &mut SequentialIds::new(),
        );
        assert_eq!(
            parts.object_properties[0],
            PropertyAtom {
                subject: "p1".into(),
                key: "c1".into(),
                label: "hasChild".into()
            }
        );
        assert_eq!(parts.data_properties[0].key, "age");
        assert_eq!(parts.data_properties[0].label, "hasAge");
    }

    #[test]
    fn test_built_in_split() {
        let mut ids = SequentialIds::new();
        let parts = classify(
            &[
                RuleAtom::built_in(
                    "add",
                    vec![
                        BuiltInArgument::variable("v"),
                        BuiltInArgument::variable("a"),
                        BuiltInArgument::literal("2"),
                    ],
                ),
                RuleAtom::built_in(
                    "greaterThan",
                    vec![BuiltInArgument::bound("v"), BuiltInArgument::literal("0")],
                ),
            ],
            &mut ids,
        );

        let add = &parts.built_ins[0];
        assert_eq!(add.id, "BI0");
        assert!(!add.is_bound);
        assert_eq!(add.arguments, vec!["v", "a"]);
        assert_eq!(add.literals, vec!["2"]);
        assert_eq!(add.anchor(), Some("v"));

        let gt = &parts.built_ins[1];
        assert_eq!(gt.id, "BI1");
        assert!(gt.is_bound);
        assert_eq!(gt.edge_label(), "greaterThan(0)");
    }

    #[test]
    fn test_bound_flag_only_from_first_position() {
        let parts = classify(
            &[RuleAtom::built_in(
                "lessThan",
                vec![BuiltInArgument::literal("3"), BuiltInArgument::bound("x")],
            )],
            &mut SequentialIds::new(),
        );
        let atom = &parts.built_ins[0];
        assert!(!atom.is_bound);
        assert_eq!(atom.anchor(), Some("x"));
    }

    #[test]
    fn test_edge_label_variants() {
        let base = BuiltInAtom {
            id: "BI0".into(),
            label: "equal".into(),
            is_bound: true,
            arguments: vec!["v".into(), "w".into()],
            literals: vec![],
        };
        assert_eq!(base.edge_label(), "equal(w)");

        let bare = BuiltInAtom {
            arguments: vec!["v".into()],
            ..base.clone()
        };
        assert_eq!(bare.edge_label(), "equal");

        let literals = BuiltInAtom {
            literals: vec!["1".into(), "2".into()],
            ..base
        };
        assert_eq!(literals.edge_label(), "equal(1,2)");
    }

    #[test]
    fn test_unresolved_atoms_dropped() {
        let parts = classify(
            &[
                RuleAtom::class("Person", ""),
                RuleAtom::object_property("knows", "", "b"),
                RuleAtom::built_in("now", vec![BuiltInArgument::literal("x")]),
                RuleAtom::built_in("now", vec![]),
            ],
            &mut SequentialIds::new(),
        );
        assert!(parts.is_empty());
    }

    #[test]
    fn test_into_atoms_order() {
        let parts = classify(
            &[
                RuleAtom::built_in("abs", vec![BuiltInArgument::variable("v")]),
                RuleAtom::object_property("knows", "a", "b"),
                RuleAtom::data_property("hasAge", "a", "v"),
                RuleAtom::class("Person", "a"),
            ],
            &mut SequentialIds::new(),
        );
        let kinds: Vec<&str> = parts
            .into_atoms()
            .iter()
            .map(|a| match a {
                ClassifiedAtom::Class(_) => "class",
                ClassifiedAtom::DataProperty(_) => "data",
                ClassifiedAtom::ObjectProperty(_) => "object",
                ClassifiedAtom::BuiltIn(_) => "builtin",
            })
            .collect();
        assert_eq!(kinds, vec!["class", "data", "object", "builtin"]);
    }

    #[test]
    fn test_uuid_ids_unique() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
