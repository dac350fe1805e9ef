//! Schema-diagram ("SD") graphs for odpkit.
//!
//! An ontology becomes a graph in two steps:
//!
//! - a [`ConceptExtractor`] picks the nodes (named classes by default),
//! - the [`classifier`] turns each supported `SubClassOf` shape into an
//!   [`SdEdge`]; everything else is reported as an [`UnsupportedAxiom`].
//!
//! [`OntologyParser`] runs both and assembles an [`SdGraph`]; [`render_dot`]
//! dumps one for Graphviz. Layout is somebody else's job: nodes only carry
//! mutable coordinates for it.

pub mod classifier;
pub mod dot;
pub mod extract;
pub mod graph;
pub mod parser;

pub use classifier::{classify_subclass_axiom, Side, UnsupportedAxiom, UnsupportedShape};
pub use dot::render_dot;
pub use extract::{ConceptExtractor, DeclaredClassExtractor};
pub use graph::{GraphError, SdEdge, SdGraph, SdNode};
pub use parser::{provide_edges, ClassificationReport, GraphBuild, OntologyParser};
