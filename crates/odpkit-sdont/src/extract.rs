//! Node extraction.

use odpkit_owl::{EntityKind, Ontology};

use crate::graph::SdNode;

/// Picks the nodes of a schema diagram.
pub trait ConceptExtractor {
    fn provide_nodes(&self, onto: &Ontology) -> Vec<SdNode>;
}

/// One node per non-built-in named class in the ontology signature,
/// whether declared or only mentioned.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredClassExtractor;

impl ConceptExtractor for DeclaredClassExtractor {
    fn provide_nodes(&self, onto: &Ontology) -> Vec<SdNode> {
        onto.signature()
            .into_iter()
            .filter(|e| e.kind == EntityKind::Class && !e.is_built_in())
            .map(SdNode::for_entity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odpkit_owl::{vocab, Axiom, ClassExpression, Entity, Filler};

    #[test]
    fn extracts_declared_and_mentioned_classes_only() {
        let onto = Ontology::from_axioms(
            None,
            [
                Axiom::declaration(Entity::class("http://ex.org/A")),
                Axiom::subclass_of(
                    ClassExpression::class("http://ex.org/B"),
                    ClassExpression::class(vocab::OWL_THING),
                ),
                Axiom::subclass_of(
                    ClassExpression::class("http://ex.org/A"),
                    ClassExpression::some(
                        Entity::data_property("http://ex.org/name"),
                        Filler::datatype(vocab::XSD_STRING),
                    ),
                ),
            ],
        );
        let nodes = DeclaredClassExtractor.provide_nodes(&onto);
        let iris: Vec<&str> = nodes.iter().map(|n| n.iri().as_str()).collect();
        assert_eq!(iris, vec!["http://ex.org/A", "http://ex.org/B"]);
        assert!(nodes.iter().all(|n| !n.is_literal()));
    }
}
