//! Subclass-axiom classification.
//!
//! Supported shapes, tried in order:
//!
//! | axiom            | edge                         |
//! |------------------|------------------------------|
//! | `A ⊑ B`          | `A → B`, `rdfs:subClassOf`   |
//! | `A ⊑ ∃R.F` / `∀` | `A - F`, labeled `R`         |
//! | `∃R.F ⊑ B` / `∀` | `B - F`, labeled `R`         |
//!
//! `A`, `B` and `F` must be atomic (`F` may be a datatype). Anything else is
//! unsupported: it is logged and returned as an error, never approximated.

use std::fmt;

use odpkit_owl::{ClassExpression, Entity, SubClassOf};
use tracing::warn;

use crate::graph::{SdEdge, SdNode};

/// Which side of `sub ⊑ sup` a problem was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sub,
    Sup,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Sub => "left",
            Side::Sup => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedShape {
    #[error("both sides are complex class expressions")]
    BothComplex,
    #[error("{side}-hand side is {kind}, expected a quantified restriction")]
    UnsupportedExpression { side: Side, kind: &'static str },
    #[error("{side}-hand side restriction has a complex filler")]
    ComplexFiller { side: Side },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported subclass axiom {axiom}: {shape}")]
pub struct UnsupportedAxiom {
    /// Functional-syntax rendering of the rejected axiom.
    pub axiom: String,
    pub shape: UnsupportedShape,
}

/// Property and filler node of `∃R.F` / `∀R.F` with an atomic filler.
fn restriction_parts(expr: &ClassExpression, side: Side) -> Result<(Entity, SdNode), UnsupportedShape> {
    match expr {
        ClassExpression::Existential(r) | ClassExpression::Universal(r) => {
            let filler = r
                .filler
                .as_entity()
                .ok_or(UnsupportedShape::ComplexFiller { side })?;
            Ok((r.property.clone(), SdNode::for_entity(filler)))
        }
        other => Err(UnsupportedShape::UnsupportedExpression {
            side,
            kind: other.kind_name(),
        }),
    }
}

fn classify(axiom: &SubClassOf) -> Result<SdEdge, UnsupportedShape> {
    match (axiom.sub.as_class(), axiom.sup.as_class()) {
        (Some(a), Some(b)) => Ok(SdEdge::subclass(SdNode::class(a.clone()), SdNode::class(b.clone()))),
        (Some(a), None) => {
            let (property, filler) = restriction_parts(&axiom.sup, Side::Sup)?;
            Ok(SdEdge::new(SdNode::class(a.clone()), property, filler))
        }
        (None, Some(b)) => {
            // Mirror image of the case above: the named class is the source.
            let (property, filler) = restriction_parts(&axiom.sub, Side::Sub)?;
            Ok(SdEdge::new(SdNode::class(b.clone()), property, filler))
        }
        (None, None) => Err(UnsupportedShape::BothComplex),
    }
}

/// Turn one subclass axiom into a graph edge.
///
/// Unsupported shapes are logged at `warn` and returned as `Err`; they are
/// never fatal to the caller.
pub fn classify_subclass_axiom(axiom: &SubClassOf) -> Result<SdEdge, UnsupportedAxiom> {
    classify(axiom).map_err(|shape| {
        let rendered = axiom.to_string();
        warn!(axiom = %rendered, reason = %shape, "unsupported subclass axiom shape");
        UnsupportedAxiom {
            axiom: rendered,
            shape,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use odpkit_owl::{vocab, Filler, Iri};

    fn class(local: &str) -> ClassExpression {
        ClassExpression::class(format!("http://ex.org/{local}"))
    }

    fn iri(local: &str) -> Iri {
        Iri::from(format!("http://ex.org/{local}"))
    }

    fn has_part() -> Entity {
        Entity::object_property("http://ex.org/hasPart")
    }

    #[test]
    fn atomic_subclass_is_directed() {
        let edge = classify_subclass_axiom(&SubClassOf::new(class("A"), class("B"))).expect("edge");
        assert!(edge.is_directed());
        assert_eq!(edge.source().iri(), &iri("A"));
        assert_eq!(edge.target().iri(), &iri("B"));
        assert_eq!(edge.label().iri.as_str(), vocab::RDFS_SUBCLASS_OF);
    }

    #[test]
    fn restriction_on_the_right() {
        for sup in [
            ClassExpression::some(has_part(), Filler::class("http://ex.org/B")),
            ClassExpression::only(has_part(), Filler::class("http://ex.org/B")),
        ] {
            let edge = classify_subclass_axiom(&SubClassOf::new(class("A"), sup)).expect("edge");
            assert!(!edge.is_directed());
            assert_eq!(edge.source().iri(), &iri("A"));
            assert_eq!(edge.target().iri(), &iri("B"));
            assert_eq!(edge.label(), &has_part());
        }
    }

    #[test]
    fn restriction_on_the_left_is_mirrored() {
        for sub in [
            ClassExpression::some(has_part(), Filler::class("http://ex.org/A")),
            ClassExpression::only(has_part(), Filler::class("http://ex.org/A")),
        ] {
            let edge = classify_subclass_axiom(&SubClassOf::new(sub, class("B"))).expect("edge");
            assert!(!edge.is_directed());
            assert_eq!(edge.source().iri(), &iri("B"));
            assert_eq!(edge.target().iri(), &iri("A"));
            assert_eq!(edge.label(), &has_part());
        }
    }

    #[test]
    fn datatype_filler_yields_literal_node() {
        let sup = ClassExpression::some(
            Entity::data_property("http://ex.org/name"),
            Filler::datatype(vocab::XSD_STRING),
        );
        let edge = classify_subclass_axiom(&SubClassOf::new(class("A"), sup)).expect("edge");
        assert!(edge.target().is_literal());
        assert!(!edge.source().is_literal());
        assert_eq!(edge.label(), &Entity::data_property("http://ex.org/name"));
    }

    #[test]
    fn both_complex_is_unsupported() {
        let r = ClassExpression::some(has_part(), Filler::class("http://ex.org/B"));
        let err = classify_subclass_axiom(&SubClassOf::new(r.clone(), r)).expect_err("unsupported");
        assert_eq!(err.shape, UnsupportedShape::BothComplex);
        assert!(err.axiom.starts_with("SubClassOf(ObjectSomeValuesFrom("));
    }

    #[test]
    fn non_restriction_and_complex_filler_are_unsupported() {
        let union = ClassExpression::UnionOf {
            operands: vec![class("B"), class("C")],
        };
        let err = classify_subclass_axiom(&SubClassOf::new(class("A"), union.clone())).expect_err("union");
        assert_eq!(
            err.shape,
            UnsupportedShape::UnsupportedExpression {
                side: Side::Sup,
                kind: "ObjectUnionOf",
            }
        );

        let nested = ClassExpression::some(has_part(), Filler::expression(union));
        let err = classify_subclass_axiom(&SubClassOf::new(nested, class("A"))).expect_err("nested");
        assert_eq!(err.shape, UnsupportedShape::ComplexFiller { side: Side::Sub });
        assert_eq!(
            err.to_string(),
            format!("unsupported subclass axiom {}: left-hand side restriction has a complex filler", err.axiom)
        );
    }

    #[test]
    fn cardinality_and_opaque_expressions_are_unsupported() {
        let min = ClassExpression::Cardinality(odpkit_owl::CardinalityRestriction {
            kind: odpkit_owl::CardinalityKind::Min,
            cardinality: 1,
            property: has_part(),
            filler: Some(Filler::class("http://ex.org/B")),
        });
        let err = classify_subclass_axiom(&SubClassOf::new(class("A"), min)).expect_err("cardinality");
        assert_eq!(
            err.shape,
            UnsupportedShape::UnsupportedExpression {
                side: Side::Sup,
                kind: "ObjectMinCardinality",
            }
        );

        let opaque = ClassExpression::Other(odpkit_owl::OpaqueExpression {
            construct: "hasSelf".to_string(),
            root: "b0".to_string(),
            triples: Vec::new(),
        });
        let err = classify_subclass_axiom(&SubClassOf::new(opaque, class("A"))).expect_err("opaque");
        assert_eq!(
            err.shape,
            UnsupportedShape::UnsupportedExpression {
                side: Side::Sub,
                kind: "UnknownClassExpression",
            }
        );
    }
}
