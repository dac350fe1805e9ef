//! OWL functional-syntax-style rendering (for logs and CLI output).
//!
//! Well-known namespaces are abbreviated (`rdfs:label`, `owl:Thing`,
//! `xsd:string`); everything else is printed as `<iri>`.

use std::fmt;

use crate::axiom::{AnnotationSubject, AnnotationValue, Axiom, Literal, SubClassOf};
use crate::entity::{Entity, Individual};
use crate::expression::{ClassExpression, Filler, Restriction};
use crate::iri::Iri;
use crate::vocab;

const PREFIXES: &[(&str, &str)] = &[
    ("rdf:", vocab::RDF_NS),
    ("rdfs:", vocab::RDFS_NS),
    ("owl:", vocab::OWL_NS),
    ("xsd:", vocab::XSD_NS),
    ("opla:", vocab::OPLA_CORE),
    ("opla-sd:", vocab::OPLA_SD),
];

/// Wrapper that renders an IRI in abbreviated form.
pub struct Abbrev<'a>(pub &'a Iri);

impl fmt::Display for Abbrev<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iri = self.0.as_str();
        for (prefix, ns) in PREFIXES {
            if let Some(local) = iri.strip_prefix(ns) {
                if !local.is_empty() && !local.contains(['#', '/']) {
                    return write!(f, "{prefix}{local}");
                }
            }
        }
        write!(f, "<{iri}>")
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.keyword(), Abbrev(&self.iri))
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Individual::Named(iri) => write!(f, "{}", Abbrev(iri)),
            Individual::Anonymous(id) => write!(f, "_:{id}"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.replace('\\', "\\\\").replace('"', "\\\""))?;
        if let Some(lang) = &self.language {
            write!(f, "@{lang}")
        } else if let Some(dt) = &self.datatype {
            write!(f, "^^{}", Abbrev(dt))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Filler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filler::Expression { expression } => write!(f, "{expression}"),
            Filler::Datatype { iri } => write!(f, "{}", Abbrev(iri)),
        }
    }
}

fn restriction(f: &mut fmt::Formatter<'_>, name: &str, r: &Restriction) -> fmt::Result {
    write!(f, "{name}({} {})", Abbrev(&r.property.iri), r.filler)
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassExpression::Class { iri } => write!(f, "{}", Abbrev(iri)),
            ClassExpression::Existential(r) | ClassExpression::Universal(r) => {
                restriction(f, self.kind_name(), r)
            }
            ClassExpression::HasValue { property, value } => {
                write!(f, "ObjectHasValue({} {value})", Abbrev(property))
            }
            ClassExpression::IntersectionOf { operands } => {
                f.write_str("ObjectIntersectionOf(")?;
                join(f, operands)?;
                f.write_str(")")
            }
            ClassExpression::UnionOf { operands } => {
                f.write_str("ObjectUnionOf(")?;
                join(f, operands)?;
                f.write_str(")")
            }
            ClassExpression::ComplementOf { operand } => write!(f, "ObjectComplementOf({operand})"),
            ClassExpression::OneOf { individuals } => {
                f.write_str("ObjectOneOf(")?;
                join(f, individuals)?;
                f.write_str(")")
            }
            ClassExpression::Cardinality(c) => {
                write!(f, "{}({} {}", self.kind_name(), c.cardinality, Abbrev(&c.property.iri))?;
                if let Some(filler) = &c.filler {
                    write!(f, " {filler}")?;
                }
                f.write_str(")")
            }
            ClassExpression::Other(opaque) => write!(f, "{}({} _:{})", self.kind_name(), opaque.construct, opaque.root),
        }
    }
}

impl fmt::Display for SubClassOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubClassOf({} {})", self.sub, self.sup)
    }
}

impl fmt::Display for AnnotationSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationSubject::Iri(iri) => write!(f, "{}", Abbrev(iri)),
            AnnotationSubject::Anonymous(id) => write!(f, "_:{id}"),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Iri(iri) => write!(f, "{}", Abbrev(iri)),
            AnnotationValue::Literal(lit) => write!(f, "{lit}"),
            AnnotationValue::Anonymous(id) => write!(f, "_:{id}"),
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind_name();
        match self {
            Axiom::Declaration { entity } => write!(f, "{name}({entity})"),
            Axiom::SubClassOf(ax) => write!(f, "{ax}"),
            Axiom::EquivalentClasses { expressions } | Axiom::DisjointClasses { expressions } => {
                write!(f, "{name}(")?;
                join(f, expressions)?;
                f.write_str(")")
            }
            Axiom::SubObjectPropertyOf { sub: a, sup: b }
            | Axiom::InverseObjectProperties { first: a, second: b } => {
                write!(f, "{name}({} {})", Abbrev(a), Abbrev(b))
            }
            Axiom::ObjectPropertyCharacteristic { property, .. } | Axiom::FunctionalDataProperty { property } => {
                write!(f, "{name}({})", Abbrev(property))
            }
            Axiom::ObjectPropertyDomain { property, domain: ce }
            | Axiom::ObjectPropertyRange { property, range: ce }
            | Axiom::DataPropertyDomain { property, domain: ce } => {
                write!(f, "{name}({} {ce})", Abbrev(property))
            }
            Axiom::DataPropertyRange { property, range } => {
                write!(f, "{name}({} {})", Abbrev(property), Abbrev(range))
            }
            Axiom::ClassAssertion { class, individual } => write!(f, "{name}({class} {individual})"),
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => write!(f, "{name}({} {subject} {object})", Abbrev(property)),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => write!(f, "{name}({} {subject} {value})", Abbrev(property)),
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => write!(f, "{name}({} {subject} {value})", Abbrev(property)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_functional_syntax() {
        let ax = Axiom::subclass_of(
            ClassExpression::class("http://ex.org/A"),
            ClassExpression::only(
                Entity::data_property("http://ex.org/name"),
                Filler::datatype(vocab::XSD_STRING),
            ),
        );
        assert_eq!(
            ax.to_string(),
            "SubClassOf(<http://ex.org/A> DataAllValuesFrom(<http://ex.org/name> xsd:string))"
        );
    }

    #[test]
    fn renders_qualified_cardinality() {
        let ce = ClassExpression::Cardinality(crate::CardinalityRestriction {
            kind: crate::CardinalityKind::Min,
            cardinality: 1,
            property: Entity::object_property("http://ex.org/hasPart"),
            filler: Some(Filler::class("http://ex.org/Part")),
        });
        assert_eq!(
            ce.to_string(),
            "ObjectMinCardinality(1 <http://ex.org/hasPart> <http://ex.org/Part>)"
        );
    }

    #[test]
    fn abbreviates_opla_and_rdfs() {
        let ax = Axiom::annotation(
            vocab::RDFS_LABEL,
            vocab::OPLA_PATTERN,
            AnnotationValue::Literal(Literal::lang("Pattern", "en")),
        );
        assert_eq!(
            ax.to_string(),
            "AnnotationAssertion(rdfs:label opla:Pattern \"Pattern\"@en)"
        );
    }
}
