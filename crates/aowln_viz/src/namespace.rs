//! Namespace and prefix management
//!
//! Turns the IRIs and CURIEs of a rule document into the short names shown in
//! diagrams: `http://example.org/family#hasChild` becomes `fam:hasChild`, or
//! just `hasChild` when it lives in the ontology's default namespace.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// RDF namespace
pub const PREFIX_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema namespace
pub const PREFIX_RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatypes namespace
pub const PREFIX_XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// OWL namespace
pub const PREFIX_OWL: &str = "http://www.w3.org/2002/07/owl#";
/// SWRL namespace
pub const PREFIX_SWRL: &str = "http://www.w3.org/2003/11/swrl#";
/// SWRL core built-ins namespace
pub const PREFIX_SWRLB: &str = "http://www.w3.org/2003/11/swrlb#";
/// SWRLAPI extension built-ins namespace
pub const PREFIX_SWRLX: &str = "http://swrl.stanford.edu/ontologies/built-ins/3.3/swrlx.owl#";
/// SQWRL query built-ins namespace
pub const PREFIX_SQWRL: &str = "http://sqwrl.stanford.edu/ontologies/built-ins/3.4/sqwrl.owl#";

static TYPED_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"([^"]*)"(?:\^\^\S+|@[A-Za-z0-9-]+)?$"#).expect("literal pattern is valid")
});

static BARE_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[+-]?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|true|false)$")
        .expect("bare literal pattern is valid")
});

/// A resolved atom argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A rule variable, without its leading `?`.
    Variable(String),
    /// A named individual, in short form.
    Individual(String),
    /// The lexical value of a data literal.
    Literal(String),
}

impl Argument {
    /// Consumes the argument, returning its display text.
    pub fn into_name(self) -> String {
        match self {
            Argument::Variable(s) | Argument::Individual(s) | Argument::Literal(s) => s,
        }
    }
}

/// A map of namespace prefixes plus an optional default namespace.
#[derive(Debug, Clone, Default)]
pub struct PrefixMap {
    /// Prefix to namespace IRI, in registration order.
    prefixes: IndexMap<String, String>,
    /// Namespace whose members are shown without any prefix.
    default_namespace: Option<String>,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prefix map with the RDF, OWL and SWRL built-in prefixes
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        map.add("rdf", PREFIX_RDF);
        map.add("rdfs", PREFIX_RDFS);
        map.add("xsd", PREFIX_XSD);
        map.add("owl", PREFIX_OWL);
        map.add("swrl", PREFIX_SWRL);
        map.add("swrlb", PREFIX_SWRLB);
        map.add("swrlx", PREFIX_SWRLX);
        map.add("sqwrl", PREFIX_SQWRL);
        map
    }

    /// Add a namespace. A trailing `:` on the prefix is ignored, and the
    /// empty prefix sets the default namespace.
    pub fn add(&mut self, prefix: &str, iri: &str) {
        let prefix = prefix.strip_suffix(':').unwrap_or(prefix);
        if prefix.is_empty() {
            self.set_default_namespace(iri);
        } else {
            self.prefixes.insert(prefix.to_string(), iri.to_string());
        }
    }

    /// Set the namespace whose members are shown by local name only
    pub fn set_default_namespace(&mut self, iri: &str) {
        self.default_namespace = Some(iri.to_string());
    }

    /// Get the default namespace
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Get the IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Compact an IRI to its display form.
    ///
    /// The longest matching namespace wins. Members of the default namespace
    /// lose their prefix entirely; IRIs outside every known namespace fall back
    /// to the part after the last `#` or `/`. Returns `None` when nothing is
    /// left to show.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, Option<&str>)> = None;

        if let Some(base) = self.default_namespace.as_deref() {
            if iri.starts_with(base) {
                best = Some((base, None));
            }
        }
        for (prefix, base) in &self.prefixes {
            if iri.starts_with(base.as_str()) && best.map_or(true, |(b, _)| base.len() > b.len())
            {
                best = Some((base.as_str(), Some(prefix.as_str())));
            }
        }

        let compacted = match best {
            Some((base, Some(prefix))) => format!("{}:{}", prefix, &iri[base.len()..]),
            Some((base, None)) => iri[base.len()..].to_string(),
            None => remainder(iri).to_string(),
        };

        if compacted.is_empty() || compacted.ends_with(':') {
            None
        } else {
            Some(compacted)
        }
    }

    /// Resolve a predicate or individual reference to its display name.
    ///
    /// Accepts `<full-iri>`, bare absolute IRIs, `prefix:local` CURIEs,
    /// `:local` names in the default namespace and plain names.
    pub fn resolve_name(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(inner) = raw.strip_prefix('<') {
            let iri = inner.strip_suffix('>')?;
            return self.compact(iri);
        }
        if raw.contains("://") {
            return self.compact(raw);
        }
        if let Some(local) = raw.strip_prefix(':') {
            return (!local.is_empty()).then(|| local.to_string());
        }
        Some(raw.to_string())
    }

    /// Resolve one atom argument.
    ///
    /// `?name` is a variable, quoted text (optionally typed, `"5"^^xsd:int`)
    /// and bare numbers or booleans are literals, anything else names an
    /// individual. Returns `None` when the argument cannot be named.
    pub fn resolve_argument(&self, raw: &str) -> Option<Argument> {
        let raw = raw.trim();
        if let Some(name) = raw.strip_prefix('?') {
            return (!name.is_empty()).then(|| Argument::Variable(name.to_string()));
        }
        if raw.starts_with('"') {
            let captures = TYPED_LITERAL.captures(raw)?;
            return Some(Argument::Literal(captures[1].to_string()));
        }
        if BARE_LITERAL.is_match(raw) {
            return Some(Argument::Literal(raw.to_string()));
        }
        self.resolve_name(raw).map(Argument::Individual)
    }
}

/// The local part of an IRI after its last `#` or `/`.
fn remainder(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}
