//! Rule documents
//!
//! A rule document is the JSON form of the SWRL rules of one ontology:
//!
//! ```json
//! {
//!   "ontology": "family.owl",
//!   "default_namespace": "http://example.org/family#",
//!   "prefixes": { "foaf": "http://xmlns.com/foaf/0.1/" },
//!   "rules": [
//!     {
//!       "name": "parent",
//!       "body": [
//!         { "kind": "class", "predicate": ":Person", "argument": "?p1" },
//!         { "kind": "object_property", "predicate": ":hasChild", "subject": "?p1", "object": "?c1" }
//!       ],
//!       "head": [
//!         { "kind": "object_property", "predicate": ":hasParent", "subject": "?c1", "object": "?p1" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Names are resolved through a [`PrefixMap`] when the document is turned into
//! [`Rule`]s. Atoms of unknown kinds are skipped.

use std::collections::HashSet;
use std::path::Path;

use aowln_core::{BuiltInArgument, Rule, RuleAtom};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::namespace::{Argument, PrefixMap};

/// One atom as written in a rule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawAtom {
    Class {
        predicate: String,
        argument: String,
    },
    ObjectProperty {
        predicate: String,
        subject: String,
        object: String,
    },
    DataProperty {
        predicate: String,
        subject: String,
        value: String,
    },
    #[serde(rename = "builtin")]
    BuiltIn {
        predicate: String,
        arguments: Vec<String>,
        /// Overrides the inferred binding of the first argument.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bound: Option<bool>,
    },
    /// Any atom kind diagrams do not show (same-as, data ranges, ...).
    #[serde(other)]
    Unsupported,
}

/// One rule as written in a rule document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    pub name: String,
    #[serde(default)]
    pub body: Vec<RawAtom>,
    #[serde(default)]
    pub head: Vec<RawAtom>,
}

/// The rules of one ontology plus the namespaces needed to name them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Where the rules were taken from, for log lines.
    #[serde(default)]
    pub ontology: Option<String>,
    /// Namespace whose members are shown by local name only.
    #[serde(default)]
    pub default_namespace: Option<String>,
    #[serde(default)]
    pub prefixes: IndexMap<String, String>,
    pub rules: Vec<RawRule>,
}

impl RuleDocument {
    /// Parse a rule document from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a rule document file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Source(format!("cannot read {}: {}", path.display(), e))
        })?;
        let document = Self::from_json(&content)?;
        debug!(
            "loaded {} rule(s) from {}",
            document.rules.len(),
            document.ontology.as_deref().unwrap_or("<unnamed ontology>")
        );
        Ok(document)
    }

    /// The prefix map for this document: the built-in SWRL prefixes plus the
    /// document's own.
    pub fn prefix_map(&self) -> PrefixMap {
        let mut map = PrefixMap::with_defaults();
        for (prefix, iri) in &self.prefixes {
            map.add(prefix, iri);
        }
        if let Some(default) = &self.default_namespace {
            map.set_default_namespace(default);
        }
        map
    }

    /// Resolve every rule of the document.
    pub fn to_rules(&self) -> Vec<Rule> {
        let prefixes = self.prefix_map();
        self.rules
            .iter()
            .map(|raw| resolve_rule(raw, &prefixes))
            .collect()
    }
}

/// Resolve one raw rule. The head sees the variables bound by the body.
pub fn resolve_rule(raw: &RawRule, prefixes: &PrefixMap) -> Rule {
    let mut bound = HashSet::new();
    let body = resolve_fragment(&raw.name, &raw.body, prefixes, &mut bound);
    let head = resolve_fragment(&raw.name, &raw.head, prefixes, &mut bound);
    Rule::new(raw.name.clone()).with_body(body).with_head(head)
}

/// Resolve the atoms of one fragment, updating `bound` with every variable
/// the fragment binds.
fn resolve_fragment(
    rule: &str,
    atoms: &[RawAtom],
    prefixes: &PrefixMap,
    bound: &mut HashSet<String>,
) -> Vec<RuleAtom> {
    let mut resolved: Vec<Option<RuleAtom>> = atoms
        .iter()
        .map(|atom| resolve_plain(atom, prefixes))
        .collect();

    // Variables of plain atoms are bound wherever they occur in the fragment.
    for atom in resolved.iter().flatten() {
        bound.extend(plain_variables(atom).map(str::to_string));
    }

    for (slot, atom) in resolved.iter_mut().zip(atoms) {
        if let RawAtom::BuiltIn {
            predicate,
            arguments,
            bound: explicit,
        } = atom
        {
            *slot = resolve_built_in(predicate, arguments, *explicit, prefixes, bound);
        }
    }

    atoms
        .iter()
        .zip(resolved)
        .filter_map(|(raw, atom)| {
            if atom.is_none() && !matches!(raw, RawAtom::Unsupported) {
                warn!("rule '{}': dropping unresolvable atom {:?}", rule, raw);
            }
            atom
        })
        .collect()
}

fn resolve_plain(atom: &RawAtom, prefixes: &PrefixMap) -> Option<RuleAtom> {
    let name = |raw: &str| prefixes.resolve_name(raw);
    let arg = |raw: &str| prefixes.resolve_argument(raw).map(Argument::into_name);

    match atom {
        RawAtom::Class {
            predicate,
            argument,
        } => Some(RuleAtom::class(name(predicate)?, arg(argument)?)),
        RawAtom::ObjectProperty {
            predicate,
            subject,
            object,
        } => Some(RuleAtom::object_property(
            name(predicate)?,
            arg(subject)?,
            arg(object)?,
        )),
        RawAtom::DataProperty {
            predicate,
            subject,
            value,
        } => Some(RuleAtom::data_property(
            name(predicate)?,
            arg(subject)?,
            arg(value)?,
        )),
        RawAtom::BuiltIn { .. } | RawAtom::Unsupported => None,
    }
}

fn plain_variables(atom: &RuleAtom) -> impl Iterator<Item = &str> {
    let names: Vec<&str> = match atom {
        RuleAtom::Class { argument, .. } => vec![argument.as_str()],
        RuleAtom::ObjectProperty {
            subject, object, ..
        } => vec![subject.as_str(), object.as_str()],
        RuleAtom::DataProperty { subject, value, .. } => vec![subject.as_str(), value.as_str()],
        RuleAtom::BuiltIn { .. } => Vec::new(),
    };
    names.into_iter()
}

fn resolve_built_in(
    predicate: &str,
    arguments: &[String],
    explicit: Option<bool>,
    prefixes: &PrefixMap,
    bound: &mut HashSet<String>,
) -> Option<RuleAtom> {
    let predicate = prefixes.resolve_name(predicate)?;
    let resolved = arguments
        .iter()
        .map(|raw| prefixes.resolve_argument(raw))
        .collect::<Option<Vec<_>>>()?;

    let arguments: Vec<BuiltInArgument> = resolved
        .into_iter()
        .enumerate()
        .map(|(index, argument)| match argument {
            Argument::Variable(name) => {
                let is_bound = match explicit {
                    Some(flag) if index == 0 => flag,
                    _ => bound.contains(&name),
                };
                BuiltInArgument::Variable {
                    name,
                    bound: is_bound,
                }
            }
            // Individuals carry no diagram node of their own inside a built-in.
            Argument::Individual(value) | Argument::Literal(value) => {
                BuiltInArgument::Literal(value)
            }
        })
        .collect();

    for argument in &arguments {
        if let BuiltInArgument::Variable { name, .. } = argument {
            bound.insert(name.clone());
        }
    }

    Some(RuleAtom::built_in(predicate, arguments))
}
