//! IRI rewriting as a pure transform.
//!
//! A [`RenameMap`] maps old IRIs to new IRIs. Applying it rebuilds an axiom
//! with every IRI occurrence substituted: entity references, annotation
//! subjects and IRI-valued annotations alike. Anonymous individuals and
//! literals are left exactly as they are.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::axiom::{AnnotationSubject, AnnotationValue, Axiom, SubClassOf};
use crate::entity::{Entity, Individual};
use crate::expression::{
    CardinalityRestriction, ClassExpression, Filler, OpaqueExpression, OpaqueTerm, OpaqueTriple, Restriction,
};
use crate::iri::Iri;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMap {
    map: BTreeMap<Iri, Iri>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `from → to`. An existing mapping for `from` is kept and
    /// `false` is returned.
    pub fn insert(&mut self, from: Iri, to: Iri) -> bool {
        if self.map.contains_key(&from) {
            return false;
        }
        self.map.insert(from, to);
        true
    }

    pub fn get(&self, iri: &Iri) -> Option<&Iri> {
        self.map.get(iri)
    }

    pub fn contains(&self, iri: &Iri) -> bool {
        self.map.contains_key(iri)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &Iri)> {
        self.map.iter()
    }

    /// The new IRI for `iri`, or `iri` itself when it is not mapped.
    pub fn apply(&self, iri: &Iri) -> Iri {
        self.map.get(iri).cloned().unwrap_or_else(|| iri.clone())
    }
}

impl FromIterator<(Iri, Iri)> for RenameMap {
    fn from_iter<T: IntoIterator<Item = (Iri, Iri)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (from, to) in iter {
            out.insert(from, to);
        }
        out
    }
}

impl Entity {
    pub fn renamed(&self, map: &RenameMap) -> Entity {
        Entity {
            kind: self.kind,
            iri: map.apply(&self.iri),
        }
    }
}

impl Individual {
    pub fn renamed(&self, map: &RenameMap) -> Individual {
        match self {
            Individual::Named(iri) => Individual::Named(map.apply(iri)),
            Individual::Anonymous(id) => Individual::Anonymous(id.clone()),
        }
    }
}

impl ClassExpression {
    pub fn renamed(&self, map: &RenameMap) -> ClassExpression {
        match self {
            Self::Class { iri } => Self::Class {
                iri: map.apply(iri),
            },
            Self::Existential(r) => Self::Existential(r.renamed(map)),
            Self::Universal(r) => Self::Universal(r.renamed(map)),
            Self::HasValue { property, value } => Self::HasValue {
                property: map.apply(property),
                value: value.renamed(map),
            },
            Self::IntersectionOf { operands } => Self::IntersectionOf {
                operands: operands.iter().map(|op| op.renamed(map)).collect(),
            },
            Self::UnionOf { operands } => Self::UnionOf {
                operands: operands.iter().map(|op| op.renamed(map)).collect(),
            },
            Self::ComplementOf { operand } => Self::ComplementOf {
                operand: Box::new(operand.renamed(map)),
            },
            Self::OneOf { individuals } => Self::OneOf {
                individuals: individuals.iter().map(|i| i.renamed(map)).collect(),
            },
            Self::Cardinality(c) => Self::Cardinality(CardinalityRestriction {
                kind: c.kind,
                cardinality: c.cardinality,
                property: c.property.renamed(map),
                filler: c.filler.as_ref().map(|f| f.renamed(map)),
            }),
            Self::Other(opaque) => Self::Other(opaque.renamed(map)),
        }
    }
}

impl Restriction {
    pub fn renamed(&self, map: &RenameMap) -> Restriction {
        Restriction {
            property: self.property.renamed(map),
            filler: self.filler.renamed(map),
        }
    }
}

impl Filler {
    pub fn renamed(&self, map: &RenameMap) -> Filler {
        match self {
            Filler::Expression { expression } => Filler::Expression {
                expression: Box::new(expression.renamed(map)),
            },
            Filler::Datatype { iri } => Filler::Datatype {
                iri: map.apply(iri),
            },
        }
    }
}

impl OpaqueExpression {
    /// Blank node ids stay as they are; predicates and IRI objects are mapped.
    pub fn renamed(&self, map: &RenameMap) -> OpaqueExpression {
        OpaqueExpression {
            construct: self.construct.clone(),
            root: self.root.clone(),
            triples: self
                .triples
                .iter()
                .map(|t| OpaqueTriple {
                    subject: t.subject.clone(),
                    predicate: map.apply(&t.predicate),
                    object: match &t.object {
                        OpaqueTerm::Iri(iri) => OpaqueTerm::Iri(map.apply(iri)),
                        other => other.clone(),
                    },
                })
                .collect(),
        }
    }
}

impl AnnotationSubject {
    pub fn renamed(&self, map: &RenameMap) -> AnnotationSubject {
        match self {
            Self::Iri(iri) => Self::Iri(map.apply(iri)),
            Self::Anonymous(id) => Self::Anonymous(id.clone()),
        }
    }
}

impl AnnotationValue {
    pub fn renamed(&self, map: &RenameMap) -> AnnotationValue {
        match self {
            Self::Iri(iri) => Self::Iri(map.apply(iri)),
            Self::Literal(lit) => Self::Literal(lit.clone()),
            Self::Anonymous(id) => Self::Anonymous(id.clone()),
        }
    }
}

impl Axiom {
    pub fn renamed(&self, map: &RenameMap) -> Axiom {
        match self {
            Self::Declaration { entity } => Self::Declaration {
                entity: entity.renamed(map),
            },
            Self::SubClassOf(ax) => Self::SubClassOf(SubClassOf {
                sub: ax.sub.renamed(map),
                sup: ax.sup.renamed(map),
            }),
            Self::EquivalentClasses { expressions } => Self::EquivalentClasses {
                expressions: expressions.iter().map(|e| e.renamed(map)).collect(),
            },
            Self::DisjointClasses { expressions } => Self::DisjointClasses {
                expressions: expressions.iter().map(|e| e.renamed(map)).collect(),
            },
            Self::SubObjectPropertyOf { sub, sup } => Self::SubObjectPropertyOf {
                sub: map.apply(sub),
                sup: map.apply(sup),
            },
            Self::InverseObjectProperties { first, second } => Self::InverseObjectProperties {
                first: map.apply(first),
                second: map.apply(second),
            },
            Self::ObjectPropertyCharacteristic {
                characteristic,
                property,
            } => Self::ObjectPropertyCharacteristic {
                characteristic: *characteristic,
                property: map.apply(property),
            },
            Self::FunctionalDataProperty { property } => Self::FunctionalDataProperty {
                property: map.apply(property),
            },
            Self::ObjectPropertyDomain { property, domain } => Self::ObjectPropertyDomain {
                property: map.apply(property),
                domain: domain.renamed(map),
            },
            Self::ObjectPropertyRange { property, range } => Self::ObjectPropertyRange {
                property: map.apply(property),
                range: range.renamed(map),
            },
            Self::DataPropertyDomain { property, domain } => Self::DataPropertyDomain {
                property: map.apply(property),
                domain: domain.renamed(map),
            },
            Self::DataPropertyRange { property, range } => Self::DataPropertyRange {
                property: map.apply(property),
                range: map.apply(range),
            },
            Self::ClassAssertion { class, individual } => Self::ClassAssertion {
                class: class.renamed(map),
                individual: individual.renamed(map),
            },
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => Self::ObjectPropertyAssertion {
                property: map.apply(property),
                subject: subject.renamed(map),
                object: object.renamed(map),
            },
            Self::DataPropertyAssertion {
                property,
                subject,
                value,
            } => Self::DataPropertyAssertion {
                property: map.apply(property),
                subject: subject.renamed(map),
                value: value.clone(),
            },
            Self::AnnotationAssertion {
                property,
                subject,
                value,
            } => Self::AnnotationAssertion {
                property: map.apply(property),
                subject: subject.renamed(map),
                value: value.renamed(map),
            },
        }
    }
}
