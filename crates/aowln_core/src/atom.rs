//! Rule atoms as delivered by a rule source.
//!
//! Every identifier in these types is already resolved to its short display
//! form (e.g. `ex:Person` or `p1`); resolving IRIs is the job of whoever builds
//! the atoms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One predicate application within a rule fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleAtom {
    /// Class membership, e.g. `Person(?p)`.
    Class {
        /// Resolved class name.
        predicate: String,
        /// The individual or variable asserted to be a member.
        argument: String,
    },
    /// A relation between two identifiers, e.g. `hasChild(?p, ?c)`.
    ObjectProperty {
        /// Resolved property name.
        predicate: String,
        /// First argument.
        subject: String,
        /// Second argument.
        object: String,
    },
    /// A relation from an identifier to a data value, e.g. `hasAge(?p, ?age)`.
    DataProperty {
        /// Resolved property name.
        predicate: String,
        /// First argument.
        subject: String,
        /// Second argument: a variable name or a literal's lexical value.
        value: String,
    },
    /// A built-in computation or comparison, e.g. `swrlb:greaterThan(?age, 18)`.
    BuiltIn {
        /// Resolved built-in name.
        predicate: String,
        /// Arguments in call order.
        arguments: Vec<BuiltInArgument>,
    },
}

impl RuleAtom {
    /// Creates a class atom.
    pub fn class(predicate: impl Into<String>, argument: impl Into<String>) -> Self {
        RuleAtom::Class {
            predicate: predicate.into(),
            argument: argument.into(),
        }
    }

    /// Creates an object property atom.
    pub fn object_property(
        predicate: impl Into<String>,
        subject: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        RuleAtom::ObjectProperty {
            predicate: predicate.into(),
            subject: subject.into(),
            object: object.into(),
        }
    }

    /// Creates a data property atom.
    pub fn data_property(
        predicate: impl Into<String>,
        subject: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        RuleAtom::DataProperty {
            predicate: predicate.into(),
            subject: subject.into(),
            value: value.into(),
        }
    }

    /// Creates a built-in atom.
    pub fn built_in(predicate: impl Into<String>, arguments: Vec<BuiltInArgument>) -> Self {
        RuleAtom::BuiltIn {
            predicate: predicate.into(),
            arguments,
        }
    }

    /// Returns the resolved predicate name of the atom.
    pub fn predicate(&self) -> &str {
        match self {
            RuleAtom::Class { predicate, .. }
            | RuleAtom::ObjectProperty { predicate, .. }
            | RuleAtom::DataProperty { predicate, .. }
            | RuleAtom::BuiltIn { predicate, .. } => predicate,
        }
    }
}

impl fmt::Display for RuleAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAtom::Class {
                predicate,
                argument,
            } => write!(f, "{}({})", predicate, argument),
            RuleAtom::ObjectProperty {
                predicate,
                subject,
                object,
            } => write!(f, "{}({}, {})", predicate, subject, object),
            RuleAtom::DataProperty {
                predicate,
                subject,
                value,
            } => write!(f, "{}({}, {})", predicate, subject, value),
            RuleAtom::BuiltIn {
                predicate,
                arguments,
            } => {
                write!(f, "{}(", predicate)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An argument of a built-in atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltInArgument {
    /// A variable reference. Resolved to a node of the graph later on.
    Variable {
        /// Variable name without the leading `?`.
        name: String,
        /// `true` when the variable already carries a value when the built-in
        /// is evaluated (comparison style), `false` when the built-in produces it.
        bound: bool,
    },
    /// A literal value, rendered verbatim.
    Literal(String),
}

impl BuiltInArgument {
    /// An unbound variable argument.
    pub fn variable(name: impl Into<String>) -> Self {
        BuiltInArgument::Variable {
            name: name.into(),
            bound: false,
        }
    }

    /// A bound variable argument.
    pub fn bound(name: impl Into<String>) -> Self {
        BuiltInArgument::Variable {
            name: name.into(),
            bound: true,
        }
    }

    /// A literal argument.
    pub fn literal(value: impl Into<String>) -> Self {
        BuiltInArgument::Literal(value.into())
    }
}

impl fmt::Display for BuiltInArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltInArgument::Variable { name, .. } => write!(f, "?{}", name),
            BuiltInArgument::Literal(value) => write!(f, "{:?}", value),
        }
    }
}

/// Which side of a rule a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// The antecedent.
    Body,
    /// The consequent.
    Head,
}

impl FragmentKind {
    /// Returns the suffix used when naming diagram files.
    pub fn suffix(&self) -> &'static str {
        match self {
            FragmentKind::Body => "body",
            FragmentKind::Head => "head",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A named rule with its body and head atoms, each in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule name.
    pub name: String,
    /// Antecedent atoms.
    pub body: Vec<RuleAtom>,
    /// Consequent atoms.
    pub head: Vec<RuleAtom>,
}

impl Rule {
    /// Creates a rule with empty fragments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Vec::new(),
            head: Vec::new(),
        }
    }

    /// Sets the body atoms.
    pub fn with_body(mut self, body: Vec<RuleAtom>) -> Self {
        self.body = body;
        self
    }

    /// Sets the head atoms.
    pub fn with_head(mut self, head: Vec<RuleAtom>) -> Self {
        self.head = head;
        self
    }

    /// Returns the atoms of one fragment.
    pub fn fragment(&self, kind: FragmentKind) -> &[RuleAtom] {
        match kind {
            FragmentKind::Body => &self.body,
            FragmentKind::Head => &self.head,
        }
    }
}

/// Renders the rule in SWRL human readable syntax, e.g.
/// `Person(p) ^ hasChild(p, c) -> hasParent(c, p)`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn conjunction(f: &mut fmt::Formatter<'_>, atoms: &[RuleAtom]) -> fmt::Result {
            for (i, atom) in atoms.iter().enumerate() {
                if i > 0 {
                    write!(f, " ^ ")?;
                }
                write!(f, "{}", atom)?;
            }
            Ok(())
        }

        conjunction(f, &self.body)?;
        write!(f, " -> ")?;
        conjunction(f, &self.head)
    }
}
