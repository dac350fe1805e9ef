use serde::{Deserialize, Serialize};

use crate::iri::Iri;
use crate::vocab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
    Datatype,
}

impl EntityKind {
    pub fn is_property(self) -> bool {
        matches!(self, Self::ObjectProperty | Self::DataProperty)
    }

    /// Functional-syntax keyword (`Class`, `ObjectProperty`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
            Self::AnnotationProperty => "AnnotationProperty",
            Self::NamedIndividual => "NamedIndividual",
            Self::Datatype => "Datatype",
        }
    }
}

/// A named ontology element.
///
/// Two entities are the same entity only if both kind and IRI match; an IRI
/// that is used as both a class and a property ("punning") yields two
/// entities in a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub iri: Iri,
}

impl Entity {
    pub fn new(kind: EntityKind, iri: impl Into<Iri>) -> Self {
        Self {
            kind,
            iri: iri.into(),
        }
    }

    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::Class, iri)
    }

    pub fn object_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::ObjectProperty, iri)
    }

    pub fn data_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::DataProperty, iri)
    }

    pub fn annotation_property(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::AnnotationProperty, iri)
    }

    pub fn named_individual(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::NamedIndividual, iri)
    }

    pub fn datatype(iri: impl Into<Iri>) -> Self {
        Self::new(EntityKind::Datatype, iri)
    }

    /// Is this entity part of the OWL 2 built-in vocabulary?
    ///
    /// Built-ins are never renamed and never get provenance annotations.
    pub fn is_built_in(&self) -> bool {
        let iri = self.iri.as_str();
        match self.kind {
            EntityKind::Class => iri == vocab::OWL_THING || iri == vocab::OWL_NOTHING,
            EntityKind::ObjectProperty => {
                iri == vocab::OWL_TOP_OBJECT_PROPERTY || iri == vocab::OWL_BOTTOM_OBJECT_PROPERTY
            }
            EntityKind::DataProperty => {
                iri == vocab::OWL_TOP_DATA_PROPERTY || iri == vocab::OWL_BOTTOM_DATA_PROPERTY
            }
            EntityKind::AnnotationProperty => vocab::BUILT_IN_ANNOTATION_PROPERTIES.contains(&iri),
            EntityKind::Datatype => vocab::is_built_in_datatype(iri),
            EntityKind::NamedIndividual => false,
        }
    }
}

/// An individual: named, or an anonymous node whose id is opaque.
///
/// Anonymous ids are carried verbatim through every transform in the
/// workspace; they are never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", content = "id", rename_all = "snake_case")]
pub enum Individual {
    Named(Iri),
    Anonymous(String),
}

impl Individual {
    pub fn named(iri: impl Into<Iri>) -> Self {
        Self::Named(iri.into())
    }

    pub fn anonymous(node_id: impl Into<String>) -> Self {
        Self::Anonymous(node_id.into())
    }

    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            Self::Named(iri) => Some(iri),
            Self::Anonymous(_) => None,
        }
    }

    pub fn entity(&self) -> Option<Entity> {
        self.as_named().map(|iri| Entity::named_individual(iri.clone()))
    }
}
