use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::axiom::{AnnotationSubject, AnnotationValue, Axiom, OntologyAnnotation, SubClassOf};
use crate::entity::{Entity, Individual};
use crate::expression::ClassExpression;
use crate::iri::Iri;
use crate::rename::RenameMap;
use crate::vocab;

/// An ontology: an optional ontology IRI, a header and a de-duplicated list
/// of axioms.
///
/// Axioms keep insertion (document) order, so "the first label" of an entity
/// is the first one the source document stated. The header (version IRI,
/// imports, ontology annotations) describes the document and contributes
/// nothing to [`Ontology::axioms`] or [`Ontology::signature`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "OntologyDoc", into = "OntologyDoc")]
pub struct Ontology {
    iri: Option<Iri>,
    version_iri: Option<Iri>,
    imports: Vec<Iri>,
    annotations: Vec<OntologyAnnotation>,
    axioms: Vec<Axiom>,
    seen: HashSet<Axiom>,
}

/// Serialized form; the dedup index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct OntologyDoc {
    iri: Option<Iri>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_iri: Option<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    imports: Vec<Iri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<OntologyAnnotation>,
    axioms: Vec<Axiom>,
}

impl From<OntologyDoc> for Ontology {
    fn from(doc: OntologyDoc) -> Self {
        let mut onto = Ontology::from_axioms(doc.iri, doc.axioms);
        onto.version_iri = doc.version_iri;
        for import in doc.imports {
            onto.add_import(import);
        }
        for annotation in doc.annotations {
            onto.add_annotation(annotation);
        }
        onto
    }
}

impl From<Ontology> for OntologyDoc {
    fn from(onto: Ontology) -> Self {
        OntologyDoc {
            iri: onto.iri,
            version_iri: onto.version_iri,
            imports: onto.imports,
            annotations: onto.annotations,
            axioms: onto.axioms,
        }
    }
}

impl PartialEq for Ontology {
    fn eq(&self, other: &Self) -> bool {
        self.iri == other.iri
            && self.version_iri == other.version_iri
            && self.imports == other.imports
            && self.annotations == other.annotations
            && self.axioms == other.axioms
    }
}

impl Eq for Ontology {}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: impl Into<Iri>) -> Self {
        Self {
            iri: Some(iri.into()),
            ..Self::default()
        }
    }

    pub fn from_axioms(iri: Option<Iri>, axioms: impl IntoIterator<Item = Axiom>) -> Self {
        let mut out = Self {
            iri,
            ..Self::default()
        };
        out.extend(axioms);
        out
    }

    pub fn iri(&self) -> Option<&Iri> {
        self.iri.as_ref()
    }

    pub fn set_iri(&mut self, iri: Option<Iri>) {
        self.iri = iri;
    }

    pub fn version_iri(&self) -> Option<&Iri> {
        self.version_iri.as_ref()
    }

    pub fn set_version_iri(&mut self, iri: Option<Iri>) {
        self.version_iri = iri;
    }

    pub fn imports(&self) -> &[Iri] {
        &self.imports
    }

    /// Returns `false` if `iri` was already imported.
    pub fn add_import(&mut self, iri: Iri) -> bool {
        if self.imports.contains(&iri) {
            return false;
        }
        self.imports.push(iri);
        true
    }

    pub fn annotations(&self) -> &[OntologyAnnotation] {
        &self.annotations
    }

    /// Returns `false` if the same annotation is already present.
    pub fn add_annotation(&mut self, annotation: OntologyAnnotation) -> bool {
        if self.annotations.contains(&annotation) {
            return false;
        }
        self.annotations.push(annotation);
        true
    }

    /// First `rdfs:label` literal among the ontology annotations.
    pub fn label(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match &a.value {
            AnnotationValue::Literal(lit) if a.property.as_str() == vocab::RDFS_LABEL => Some(lit.lexical.as_str()),
            _ => None,
        })
    }

    /// Add an axiom; returns `false` if it was already present.
    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        if self.seen.contains(&axiom) {
            return false;
        }
        self.seen.insert(axiom.clone());
        self.axioms.push(axiom);
        true
    }

    pub fn extend(&mut self, axioms: impl IntoIterator<Item = Axiom>) {
        for ax in axioms {
            self.add_axiom(ax);
        }
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.seen.contains(axiom)
    }

    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn subclass_axioms(&self) -> impl Iterator<Item = &SubClassOf> {
        self.axioms.iter().filter_map(Axiom::as_subclass_of)
    }

    /// All entities mentioned by any axiom, in sorted order.
    pub fn signature(&self) -> BTreeSet<Entity> {
        let mut out = BTreeSet::new();
        for ax in &self.axioms {
            ax.collect_signature(&mut out);
        }
        out
    }

    /// Entities whose IRI short form equals `short_name` exactly.
    pub fn entities_with_short_name(&self, short_name: &str) -> BTreeSet<Entity> {
        self.signature()
            .into_iter()
            .filter(|e| e.iri.short_form() == short_name)
            .collect()
    }

    /// `rdfs:label` literal values on `subject`, in document order.
    pub fn labels_for(&self, subject: &Iri) -> Vec<&str> {
        self.axioms
            .iter()
            .filter_map(|ax| match ax {
                Axiom::AnnotationAssertion {
                    property,
                    subject: AnnotationSubject::Iri(s),
                    value: AnnotationValue::Literal(lit),
                } if property.as_str() == vocab::RDFS_LABEL && s == subject => {
                    Some(lit.lexical.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Individuals asserted to be instances of the named class, in document
    /// order and without duplicates.
    pub fn individuals_of(&self, class: &Iri) -> Vec<&Individual> {
        let mut seen = HashSet::new();
        self.axioms
            .iter()
            .filter_map(|ax| match ax {
                Axiom::ClassAssertion {
                    class: ClassExpression::Class { iri },
                    individual,
                } if iri == class => Some(individual),
                _ => None,
            })
            .filter(|ind| seen.insert(*ind))
            .collect()
    }

    /// Objects of `subject property ?o` object-property assertions, in
    /// document order and without duplicates.
    pub fn object_property_values(&self, subject: &Individual, property: &Iri) -> Vec<&Individual> {
        let mut seen = HashSet::new();
        self.axioms
            .iter()
            .filter_map(|ax| match ax {
                Axiom::ObjectPropertyAssertion {
                    property: p,
                    subject: s,
                    object,
                } if p == property && s == subject => Some(object),
                _ => None,
            })
            .filter(|ind| seen.insert(*ind))
            .collect()
    }

    /// A copy of this ontology with every axiom IRI rewritten through `map`.
    ///
    /// The ontology IRI and the header are kept: renaming moves entities, not
    /// the document.
    pub fn renamed(&self, map: &RenameMap) -> Ontology {
        let mut out = Ontology::from_axioms(
            self.iri.clone(),
            self.axioms.iter().map(|ax| ax.renamed(map)),
        );
        out.version_iri = self.version_iri.clone();
        out.imports = self.imports.clone();
        out.annotations = self.annotations.clone();
        out
    }
}
