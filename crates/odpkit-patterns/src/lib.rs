//! Ontology design pattern catalog and instantiation.
//!
//! - [`PatternLibrary`] indexes a MODL-style catalog by category and keeps an
//!   immutable snapshot that can be rebuilt while readers are active.
//! - [`PatternDocumentMapper`] resolves a catalogued pattern IRI to the
//!   fragment ontology that defines it.
//! - [`PatternInstantiator`] turns a fragment into axioms for a target
//!   ontology: renamed fragment axioms plus OPLA module provenance.
//! - [`OdpkitConfig`] carries the settings the CLI and services share.

pub mod config;
pub mod documents;
pub mod entities;
pub mod instantiator;
pub mod library;
pub mod naming;

pub use config::{ConfigError, InstantiationConfig, OdpkitConfig};
pub use documents::{PatternDocument, PatternDocumentMapper};
pub use entities::{Category, Pattern, ANY_CATEGORY_IRI, ANY_CATEGORY_LABEL};
pub use instantiator::{
    module_iri_for, Instantiation, InstantiationError, PatternInstantiator, TargetContext,
};
pub use library::{CatalogError, CatalogSource, PatternIndex, PatternLibrary};
pub use naming::{NamingContext, OntologyNamingContext, DEFAULT_SEPARATOR};
