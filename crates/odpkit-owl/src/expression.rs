//! Class expressions.
//!
//! The grammar is closed: every consumer (classifier, renamer, writer)
//! matches it exhaustively. Constructs outside it are carried as
//! [`ClassExpression::Other`] so the axioms using them are never dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::axiom::Literal;
use crate::entity::{Entity, EntityKind, Individual};
use crate::iri::Iri;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ClassExpression {
    /// A named class.
    Class { iri: Iri },
    /// `∃R.F`
    Existential(Restriction),
    /// `∀R.F`
    Universal(Restriction),
    /// `∃R.{a}`
    HasValue { property: Iri, value: Individual },
    IntersectionOf { operands: Vec<ClassExpression> },
    UnionOf { operands: Vec<ClassExpression> },
    ComplementOf { operand: Box<ClassExpression> },
    OneOf { individuals: Vec<Individual> },
    /// `≥n R.F`, `≤n R.F`, `=n R.F`
    Cardinality(CardinalityRestriction),
    /// Anything else, kept as the RDF it was read from.
    Other(OpaqueExpression),
}

/// A quantified property restriction. The property is an object or a data
/// property; data restrictions carry a [`Filler::Datatype`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Restriction {
    pub property: Entity,
    pub filler: Filler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityKind {
    Min,
    Max,
    Exact,
}

/// A number restriction. Unqualified when `filler` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardinalityRestriction {
    pub kind: CardinalityKind,
    pub cardinality: u32,
    pub property: Entity,
    pub filler: Option<Filler>,
}

/// Triples of an anonymous class expression the model has no variant for.
///
/// Blank node ids are local to the expression; `root` is the node the
/// expression denotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpaqueExpression {
    /// Short name of the construct, e.g. `onProperties` or `hasSelf`.
    pub construct: String,
    pub root: String,
    pub triples: Vec<OpaqueTriple>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpaqueTriple {
    pub subject: String,
    pub predicate: Iri,
    pub object: OpaqueTerm,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum OpaqueTerm {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Filler {
    Expression { expression: Box<ClassExpression> },
    Datatype { iri: Iri },
}

impl ClassExpression {
    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::Class { iri: iri.into() }
    }

    pub fn some(property: Entity, filler: Filler) -> Self {
        Self::Existential(Restriction { property, filler })
    }

    pub fn only(property: Entity, filler: Filler) -> Self {
        Self::Universal(Restriction { property, filler })
    }

    pub fn as_class(&self) -> Option<&Iri> {
        match self {
            Self::Class { iri } => Some(iri),
            _ => None,
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Class { .. })
    }

    /// Functional-syntax constructor name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Class { .. } => "Class",
            Self::Existential(r) if r.is_data() => "DataSomeValuesFrom",
            Self::Existential(_) => "ObjectSomeValuesFrom",
            Self::Universal(r) if r.is_data() => "DataAllValuesFrom",
            Self::Universal(_) => "ObjectAllValuesFrom",
            Self::HasValue { .. } => "ObjectHasValue",
            Self::IntersectionOf { .. } => "ObjectIntersectionOf",
            Self::UnionOf { .. } => "ObjectUnionOf",
            Self::ComplementOf { .. } => "ObjectComplementOf",
            Self::OneOf { .. } => "ObjectOneOf",
            Self::Cardinality(c) => match (c.is_data(), c.kind) {
                (false, CardinalityKind::Min) => "ObjectMinCardinality",
                (false, CardinalityKind::Max) => "ObjectMaxCardinality",
                (false, CardinalityKind::Exact) => "ObjectExactCardinality",
                (true, CardinalityKind::Min) => "DataMinCardinality",
                (true, CardinalityKind::Max) => "DataMaxCardinality",
                (true, CardinalityKind::Exact) => "DataExactCardinality",
            },
            Self::Other(_) => "UnknownClassExpression",
        }
    }

    pub fn collect_signature(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Class { iri } => {
                out.insert(Entity::class(iri.clone()));
            }
            Self::Existential(r) | Self::Universal(r) => r.collect_signature(out),
            Self::HasValue { property, value } => {
                out.insert(Entity::object_property(property.clone()));
                if let Some(e) = value.entity() {
                    out.insert(e);
                }
            }
            Self::IntersectionOf { operands } | Self::UnionOf { operands } => {
                for op in operands {
                    op.collect_signature(out);
                }
            }
            Self::ComplementOf { operand } => operand.collect_signature(out),
            Self::OneOf { individuals } => {
                out.extend(individuals.iter().filter_map(Individual::entity));
            }
            Self::Cardinality(c) => {
                out.insert(c.property.clone());
                if let Some(filler) = &c.filler {
                    filler.collect_signature(out);
                }
            }
            // Opaque triples carry no entity kinds.
            Self::Other(_) => {}
        }
    }
}

impl CardinalityRestriction {
    pub fn is_data(&self) -> bool {
        self.property.kind == EntityKind::DataProperty || matches!(self.filler, Some(Filler::Datatype { .. }))
    }
}

impl Restriction {
    pub fn is_data(&self) -> bool {
        matches!(self.filler, Filler::Datatype { .. })
    }

    pub fn collect_signature(&self, out: &mut BTreeSet<Entity>) {
        out.insert(self.property.clone());
        self.filler.collect_signature(out);
    }
}

impl Filler {
    pub fn class(iri: impl Into<Iri>) -> Self {
        Self::Expression {
            expression: Box::new(ClassExpression::class(iri)),
        }
    }

    pub fn expression(expression: ClassExpression) -> Self {
        Self::Expression {
            expression: Box::new(expression),
        }
    }

    pub fn datatype(iri: impl Into<Iri>) -> Self {
        Self::Datatype { iri: iri.into() }
    }

    pub fn collect_signature(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Expression { expression } => expression.collect_signature(out),
            Self::Datatype { iri } => {
                out.insert(Entity::datatype(iri.clone()));
            }
        }
    }

    /// The filler as a plain entity reference, when it is atomic.
    ///
    /// A named class filler yields a class entity, a datatype filler yields a
    /// datatype entity; compound fillers yield `None`.
    pub fn as_entity(&self) -> Option<Entity> {
        match self {
            Self::Expression { expression } => expression.as_class().map(|iri| Entity::class(iri.clone())),
            Self::Datatype { iri } => Some(Entity::datatype(iri.clone())),
        }
    }
}
