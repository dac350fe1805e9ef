//! Ontology → graph assembly.

use std::collections::{BTreeMap, BTreeSet};

use odpkit_owl::{Iri, Ontology};
use tracing::debug;

use crate::classifier::{classify_subclass_axiom, UnsupportedAxiom};
use crate::extract::{ConceptExtractor, DeclaredClassExtractor};
use crate::graph::{GraphError, SdEdge, SdGraph, SdNode};

/// Edges for every supported `SubClassOf` axiom, plus one report per
/// unsupported one.
#[derive(Debug, Clone, Default)]
pub struct ClassificationReport {
    pub edges: Vec<SdEdge>,
    pub unsupported: Vec<UnsupportedAxiom>,
}

/// Classify every subclass axiom of `onto`.
///
/// Edge endpoints that match a node in `nodes` are replaced by that node, so
/// edges carry the extractor's flags rather than fresh defaults.
pub fn provide_edges(onto: &Ontology, nodes: &[SdNode]) -> ClassificationReport {
    let by_iri: BTreeMap<&Iri, &SdNode> = nodes.iter().map(|n| (n.iri(), n)).collect();
    let resolve = |node: &SdNode| by_iri.get(node.iri()).map_or_else(|| node.clone(), |n| (*n).clone());

    let mut report = ClassificationReport::default();
    for axiom in onto.subclass_axioms() {
        match classify_subclass_axiom(axiom) {
            Ok(edge) => {
                let edge = edge.with_endpoints(resolve(edge.source()), resolve(edge.target()));
                report.edges.push(edge);
            }
            Err(unsupported) => report.unsupported.push(unsupported),
        }
    }
    report
}

#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub graph: SdGraph,
    pub report: ClassificationReport,
}

/// Builds an [`SdGraph`] from an ontology using a node extractor and the
/// subclass classifier.
#[derive(Debug, Clone, Default)]
pub struct OntologyParser<E = DeclaredClassExtractor> {
    extractor: E,
}

impl<E: ConceptExtractor> OntologyParser<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn parse_ontology(&self, onto: &Ontology) -> Result<GraphBuild, GraphError> {
        let mut nodes = self.extractor.provide_nodes(onto);
        let report = provide_edges(onto, &nodes);

        // Endpoints the extractor did not produce (datatype fillers,
        // built-ins) still need a node.
        let mut known: BTreeSet<Iri> = nodes.iter().map(|n| n.iri().clone()).collect();
        for edge in &report.edges {
            for endpoint in [edge.source(), edge.target()] {
                if known.insert(endpoint.iri().clone()) {
                    debug!(iri = %endpoint.iri(), "adding edge endpoint missing from node set");
                    nodes.push(endpoint.clone());
                }
            }
        }

        let graph = SdGraph::new(nodes, report.edges.iter().cloned())?;
        Ok(GraphBuild { graph, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odpkit_owl::{vocab, Axiom, ClassExpression, Entity, Filler};

    fn sample() -> Ontology {
        let has_part = Entity::object_property("http://ex.org/hasPart");
        Ontology::from_axioms(
            None,
            [
                Axiom::declaration(Entity::class("http://ex.org/Whole")),
                Axiom::declaration(Entity::class("http://ex.org/Part")),
                Axiom::declaration(Entity::class("http://ex.org/Lonely")),
                Axiom::subclass_of(
                    ClassExpression::class("http://ex.org/Whole"),
                    ClassExpression::some(has_part.clone(), Filler::class("http://ex.org/Part")),
                ),
                Axiom::subclass_of(
                    ClassExpression::class("http://ex.org/Part"),
                    ClassExpression::some(
                        Entity::data_property("http://ex.org/name"),
                        Filler::datatype(vocab::XSD_STRING),
                    ),
                ),
                Axiom::subclass_of(
                    ClassExpression::some(has_part.clone(), Filler::class("http://ex.org/Part")),
                    ClassExpression::some(has_part, Filler::class("http://ex.org/Whole")),
                ),
            ],
        )
    }

    #[test]
    fn builds_graph_with_isolated_and_literal_nodes() {
        let build = OntologyParser::<DeclaredClassExtractor>::default()
            .parse_ontology(&sample())
            .expect("graph");
        let g = &build.graph;

        assert_eq!(g.edge_count(), 2);
        assert_eq!(build.report.unsupported.len(), 1);
        assert!(g.contains_node(&Iri::from("http://ex.org/Lonely")));

        let string = g.node(&Iri::from(vocab::XSD_STRING)).expect("datatype node");
        assert!(string.is_literal());
        for edge in g.edges() {
            assert!(g.contains_node(edge.source().iri()));
            assert!(g.contains_node(edge.target().iri()));
        }
    }

    #[test]
    fn provide_edges_reuses_given_nodes() {
        let mut whole = SdNode::class("http://ex.org/Whole");
        whole.set_position(3.0, 7.0);
        let report = provide_edges(&sample(), &[whole]);
        let edge = report
            .edges
            .iter()
            .find(|e| e.source().iri().as_str() == "http://ex.org/Whole")
            .expect("whole edge");
        assert_eq!(edge.source().position(), (3.0, 7.0));
    }
}
