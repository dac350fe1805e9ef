//! Looking up names in the ontology a pattern is merged into.

use std::collections::{BTreeMap, BTreeSet};

use odpkit_owl::{Entity, Ontology};

pub const DEFAULT_SEPARATOR: &str = "#";

/// What the instantiator needs to know about the target's names.
pub trait NamingContext {
    /// Entities already present in the target whose short form is `short_name`.
    fn find_entities_by_short_name(&self, short_name: &str) -> BTreeSet<Entity>;

    /// Inserted between the target IRI and a short name when minting IRIs.
    fn separator(&self) -> &str;
}

/// Short-form index over a snapshot of an ontology's signature.
#[derive(Debug, Clone)]
pub struct OntologyNamingContext {
    by_short_name: BTreeMap<String, BTreeSet<Entity>>,
    separator: String,
}

impl OntologyNamingContext {
    pub fn new(ontology: &Ontology, separator: impl Into<String>) -> Self {
        let mut by_short_name: BTreeMap<String, BTreeSet<Entity>> = BTreeMap::new();
        for entity in ontology.signature() {
            by_short_name
                .entry(entity.iri.short_form().to_string())
                .or_default()
                .insert(entity);
        }
        Self {
            by_short_name,
            separator: separator.into(),
        }
    }

    pub fn with_default_separator(ontology: &Ontology) -> Self {
        Self::new(ontology, DEFAULT_SEPARATOR)
    }
}

impl NamingContext for OntologyNamingContext {
    fn find_entities_by_short_name(&self, short_name: &str) -> BTreeSet<Entity> {
        self.by_short_name.get(short_name).cloned().unwrap_or_default()
    }

    fn separator(&self) -> &str {
        &self.separator
    }
}
