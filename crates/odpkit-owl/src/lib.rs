//! OWL ontology model for odpkit.
//!
//! This crate is the shared vocabulary of the workspace:
//!
//! - entities are identified by IRI only ([`Iri`], [`Entity`]),
//! - class expressions form a closed enum ([`ClassExpression`]) so consumers
//!   match shapes exhaustively instead of probing capabilities at runtime,
//! - axioms are plain values ([`Axiom`]) and an [`Ontology`] is an ordered,
//!   de-duplicated set of them plus a header (imports, version IRI and
//!   ontology annotations) that is not part of the axioms,
//! - identifier rewriting is a pure transform driven by a [`RenameMap`].
//!
//! Parsing/serialization lives in `odpkit-ingest-rdfowl`; this crate has no
//! I/O.

pub mod axiom;
pub mod digest;
pub mod display;
pub mod entity;
pub mod expression;
pub mod iri;
pub mod ontology;
pub mod rename;
pub mod vocab;

pub use axiom::{
    AnnotationSubject, AnnotationValue, Axiom, Literal, OntologyAnnotation, PropertyCharacteristic, SubClassOf,
};
pub use entity::{Entity, EntityKind, Individual};
pub use expression::{
    CardinalityKind, CardinalityRestriction, ClassExpression, Filler, OpaqueExpression, OpaqueTerm, OpaqueTriple,
    Restriction,
};
pub use iri::Iri;
pub use ontology::Ontology;
pub use rename::RenameMap;
