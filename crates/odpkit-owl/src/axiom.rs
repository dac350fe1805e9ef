use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entity::{Entity, Individual};
use crate::expression::ClassExpression;
use crate::iri::Iri;
use crate::vocab;

/// `sub ⊑ sup`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubClassOf {
    pub sub: ClassExpression,
    pub sup: ClassExpression,
}

impl SubClassOf {
    pub fn new(sub: ClassExpression, sup: ClassExpression) -> Self {
        Self { sub, sup }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<Iri>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum AnnotationSubject {
    Iri(Iri),
    Anonymous(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    Iri(Iri),
    Literal(Literal),
    Anonymous(String),
}

impl AnnotationValue {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

/// An annotation on the ontology itself. Part of the header, not an axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OntologyAnnotation {
    pub property: Iri,
    pub value: AnnotationValue,
}

/// Object property characteristics expressed as `rdf:type` in RDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCharacteristic {
    Functional,
    InverseFunctional,
    Transitive,
    Symmetric,
    Asymmetric,
    Reflexive,
    Irreflexive,
}

impl PropertyCharacteristic {
    pub const ALL: [PropertyCharacteristic; 7] = [
        Self::Functional,
        Self::InverseFunctional,
        Self::Transitive,
        Self::Symmetric,
        Self::Asymmetric,
        Self::Reflexive,
        Self::Irreflexive,
    ];

    pub fn type_iri(self) -> &'static str {
        match self {
            Self::Functional => vocab::OWL_FUNCTIONAL_PROPERTY,
            Self::InverseFunctional => vocab::OWL_INVERSE_FUNCTIONAL_PROPERTY,
            Self::Transitive => vocab::OWL_TRANSITIVE_PROPERTY,
            Self::Symmetric => vocab::OWL_SYMMETRIC_PROPERTY,
            Self::Asymmetric => vocab::OWL_ASYMMETRIC_PROPERTY,
            Self::Reflexive => vocab::OWL_REFLEXIVE_PROPERTY,
            Self::Irreflexive => vocab::OWL_IRREFLEXIVE_PROPERTY,
        }
    }

    pub fn from_type_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.type_iri() == iri)
    }

    /// Functional-syntax axiom name.
    pub fn axiom_name(self) -> &'static str {
        match self {
            Self::Functional => "FunctionalObjectProperty",
            Self::InverseFunctional => "InverseFunctionalObjectProperty",
            Self::Transitive => "TransitiveObjectProperty",
            Self::Symmetric => "SymmetricObjectProperty",
            Self::Asymmetric => "AsymmetricObjectProperty",
            Self::Reflexive => "ReflexiveObjectProperty",
            Self::Irreflexive => "IrreflexiveObjectProperty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Axiom {
    Declaration {
        entity: Entity,
    },
    SubClassOf(SubClassOf),
    EquivalentClasses {
        expressions: Vec<ClassExpression>,
    },
    DisjointClasses {
        expressions: Vec<ClassExpression>,
    },
    SubObjectPropertyOf {
        sub: Iri,
        sup: Iri,
    },
    InverseObjectProperties {
        first: Iri,
        second: Iri,
    },
    ObjectPropertyCharacteristic {
        characteristic: PropertyCharacteristic,
        property: Iri,
    },
    FunctionalDataProperty {
        property: Iri,
    },
    ObjectPropertyDomain {
        property: Iri,
        domain: ClassExpression,
    },
    ObjectPropertyRange {
        property: Iri,
        range: ClassExpression,
    },
    DataPropertyDomain {
        property: Iri,
        domain: ClassExpression,
    },
    DataPropertyRange {
        property: Iri,
        range: Iri,
    },
    ClassAssertion {
        class: ClassExpression,
        individual: Individual,
    },
    ObjectPropertyAssertion {
        property: Iri,
        subject: Individual,
        object: Individual,
    },
    DataPropertyAssertion {
        property: Iri,
        subject: Individual,
        value: Literal,
    },
    AnnotationAssertion {
        property: Iri,
        subject: AnnotationSubject,
        value: AnnotationValue,
    },
}

impl Axiom {
    pub fn subclass_of(sub: ClassExpression, sup: ClassExpression) -> Self {
        Self::SubClassOf(SubClassOf::new(sub, sup))
    }

    pub fn declaration(entity: Entity) -> Self {
        Self::Declaration { entity }
    }

    pub fn class_assertion(class: impl Into<Iri>, individual: Individual) -> Self {
        Self::ClassAssertion {
            class: ClassExpression::class(class),
            individual,
        }
    }

    pub fn annotation(
        property: impl Into<Iri>,
        subject: impl Into<Iri>,
        value: AnnotationValue,
    ) -> Self {
        Self::AnnotationAssertion {
            property: property.into(),
            subject: AnnotationSubject::Iri(subject.into()),
            value,
        }
    }

    pub fn as_subclass_of(&self) -> Option<&SubClassOf> {
        match self {
            Self::SubClassOf(ax) => Some(ax),
            _ => None,
        }
    }

    /// Functional-syntax axiom type name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Declaration { .. } => "Declaration",
            Self::SubClassOf(_) => "SubClassOf",
            Self::EquivalentClasses { .. } => "EquivalentClasses",
            Self::DisjointClasses { .. } => "DisjointClasses",
            Self::SubObjectPropertyOf { .. } => "SubObjectPropertyOf",
            Self::InverseObjectProperties { .. } => "InverseObjectProperties",
            Self::ObjectPropertyCharacteristic { characteristic, .. } => characteristic.axiom_name(),
            Self::FunctionalDataProperty { .. } => "FunctionalDataProperty",
            Self::ObjectPropertyDomain { .. } => "ObjectPropertyDomain",
            Self::ObjectPropertyRange { .. } => "ObjectPropertyRange",
            Self::DataPropertyDomain { .. } => "DataPropertyDomain",
            Self::DataPropertyRange { .. } => "DataPropertyRange",
            Self::ClassAssertion { .. } => "ClassAssertion",
            Self::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            Self::DataPropertyAssertion { .. } => "DataPropertyAssertion",
            Self::AnnotationAssertion { .. } => "AnnotationAssertion",
        }
    }

    /// Entities mentioned by this axiom.
    ///
    /// Annotation subjects and IRI-valued annotation values are plain IRIs,
    /// not entities, and are therefore not part of the signature.
    pub fn signature(&self) -> BTreeSet<Entity> {
        let mut out = BTreeSet::new();
        self.collect_signature(&mut out);
        out
    }

    pub fn collect_signature(&self, out: &mut BTreeSet<Entity>) {
        match self {
            Self::Declaration { entity } => {
                out.insert(entity.clone());
            }
            Self::SubClassOf(ax) => {
                ax.sub.collect_signature(out);
                ax.sup.collect_signature(out);
            }
            Self::EquivalentClasses { expressions } | Self::DisjointClasses { expressions } => {
                for e in expressions {
                    e.collect_signature(out);
                }
            }
            Self::SubObjectPropertyOf { sub: a, sup: b }
            | Self::InverseObjectProperties { first: a, second: b } => {
                out.insert(Entity::object_property(a.clone()));
                out.insert(Entity::object_property(b.clone()));
            }
            Self::ObjectPropertyCharacteristic { property, .. } => {
                out.insert(Entity::object_property(property.clone()));
            }
            Self::FunctionalDataProperty { property } => {
                out.insert(Entity::data_property(property.clone()));
            }
            Self::ObjectPropertyDomain { property, domain: ce }
            | Self::ObjectPropertyRange { property, range: ce } => {
                out.insert(Entity::object_property(property.clone()));
                ce.collect_signature(out);
            }
            Self::DataPropertyDomain { property, domain } => {
                out.insert(Entity::data_property(property.clone()));
                domain.collect_signature(out);
            }
            Self::DataPropertyRange { property, range } => {
                out.insert(Entity::data_property(property.clone()));
                out.insert(Entity::datatype(range.clone()));
            }
            Self::ClassAssertion { class, individual } => {
                class.collect_signature(out);
                if let Some(e) = individual.entity() {
                    out.insert(e);
                }
            }
            Self::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                out.insert(Entity::object_property(property.clone()));
                out.extend(subject.entity());
                out.extend(object.entity());
            }
            Self::DataPropertyAssertion {
                property,
                subject,
                value,
            } => {
                out.insert(Entity::data_property(property.clone()));
                out.extend(subject.entity());
                if let Some(dt) = &value.datatype {
                    out.insert(Entity::datatype(dt.clone()));
                }
            }
            Self::AnnotationAssertion {
                property, value, ..
            } => {
                out.insert(Entity::annotation_property(property.clone()));
                if let AnnotationValue::Literal(Literal {
                    datatype: Some(dt), ..
                }) = value
                {
                    out.insert(Entity::datatype(dt.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_signature_excludes_subject_and_iri_value() {
        let ax = Axiom::annotation(
            vocab::OPLA_IS_NATIVE_TO,
            "http://ex.org/onto#Part",
            AnnotationValue::Iri(Iri::from("http://ex.org/onto#M")),
        );
        let sig = ax.signature();
        assert_eq!(sig.len(), 1);
        assert!(sig.contains(&Entity::annotation_property(vocab::OPLA_IS_NATIVE_TO)));
    }

    #[test]
    fn anonymous_individuals_are_not_entities() {
        let ax = Axiom::ObjectPropertyAssertion {
            property: Iri::from("http://ex.org/knows"),
            subject: Individual::anonymous("b0"),
            object: Individual::named("http://ex.org/bob"),
        };
        let sig = ax.signature();
        assert!(sig.contains(&Entity::named_individual("http://ex.org/bob")));
        assert!(sig.contains(&Entity::object_property("http://ex.org/knows")));
        assert_eq!(sig.len(), 2);
    }

    #[test]
    fn characteristics_map_to_their_rdf_types() {
        for c in PropertyCharacteristic::ALL {
            assert_eq!(PropertyCharacteristic::from_type_iri(c.type_iri()), Some(c));
        }
        assert_eq!(PropertyCharacteristic::from_type_iri(vocab::OWL_CLASS), None);

        let ax = Axiom::ObjectPropertyCharacteristic {
            characteristic: PropertyCharacteristic::Transitive,
            property: Iri::from("http://ex.org/hasPart"),
        };
        assert_eq!(ax.kind_name(), "TransitiveObjectProperty");
        assert_eq!(
            ax.signature().into_iter().collect::<Vec<_>>(),
            vec![Entity::object_property("http://ex.org/hasPart")]
        );
    }

    #[test]
    fn axioms_roundtrip_through_json() {
        let ax = Axiom::subclass_of(
            ClassExpression::class("http://ex.org/A"),
            ClassExpression::some(
                Entity::object_property("http://ex.org/R"),
                crate::Filler::class("http://ex.org/B"),
            ),
        );
        let json = serde_json::to_string(&ax).expect("serialize");
        let back: Axiom = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ax);
    }
}
