//! Concept completion
//!
//! The notation draws every subject and object of a property as a class box.
//! Identifiers that are only used in relations get a concept synthesized for
//! them here: a generic `Thing` placeholder, or in the head the concept the
//! body already asserted for the same identifier.

use indexmap::IndexSet;
use log::trace;

use crate::atom::{FragmentKind, Rule};
use crate::classify::{classify, ClassAtom, IdGenerator, Partitions};

/// Both fragments of a rule, classified and completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRule {
    pub body: Partitions,
    pub head: Partitions,
}

impl CompletedRule {
    /// Returns the completed partitions of one fragment.
    pub fn fragment(&self, kind: FragmentKind) -> &Partitions {
        match kind {
            FragmentKind::Body => &self.body,
            FragmentKind::Head => &self.head,
        }
    }
}

/// Classifies and completes both fragments of `rule`, body first.
pub fn complete_rule<G>(rule: &Rule, ids: &mut G) -> CompletedRule
where
    G: IdGenerator + ?Sized,
{
    let mut body = classify(&rule.body, ids);
    let mut head = classify(&rule.head, ids);
    complete_body(&mut body);
    complete_head(&mut head, &body);
    CompletedRule { body, head }
}

/// Adds a `Thing` placeholder for every referenced identifier without a concept.
pub fn complete_body(body: &mut Partitions) {
    for key in referenced_keys(body) {
        if !body.has_class(&key) {
            trace!("Synthesizing placeholder concept for '{}'", key);
            body.classes.push(ClassAtom::placeholder(key));
        }
    }
}

/// Completes the head, reusing the body's concept for an identifier where one
/// exists and falling back to a `Thing` placeholder otherwise.
///
/// `body` must already be completed.
pub fn complete_head(head: &mut Partitions, body: &Partitions) {
    for key in referenced_keys(head) {
        if head.has_class(&key) {
            continue;
        }
        let concept = match body.class(&key) {
            Some(existing) => {
                trace!("Reusing body concept '{}' for '{}'", existing.label, key);
                existing.clone()
            }
            None => {
                trace!("Synthesizing placeholder concept for '{}'", key);
                ClassAtom::placeholder(key)
            }
        };
        head.classes.push(concept);
    }
}

/// Subjects and objects of object properties, then subjects of data
/// properties, in atom order without repeats.
fn referenced_keys(fragment: &Partitions) -> IndexSet<String> {
    let mut keys = IndexSet::new();
    for property in &fragment.object_properties {
        keys.insert(property.subject.clone());
        keys.insert(property.key.clone());
    }
    for property in &fragment.data_properties {
        keys.insert(property.subject.clone());
    }
    keys
}
