//! N-Triples serialization of an ontology.
//!
//! Complex class expressions are written as fresh blank nodes
//! (`_:odpkitN`), opaque ones included; anonymous individuals keep their
//! node ids.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use odpkit_owl::{
    vocab, AnnotationSubject, AnnotationValue, Axiom, CardinalityKind, ClassExpression, Entity, EntityKind,
    Filler, Individual, Literal, OpaqueTerm, Ontology, PropertyCharacteristic,
};

struct Writer {
    out: String,
    next_blank: usize,
}

fn iri_term(iri: &str) -> String {
    format!("<{iri}>")
}

fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn literal_term(lit: &Literal) -> String {
    let mut out = format!("\"{}\"", escape_literal(&lit.lexical));
    if let Some(lang) = &lit.language {
        out.push('@');
        out.push_str(lang);
    } else if let Some(dt) = &lit.datatype {
        out.push_str("^^");
        out.push_str(&iri_term(dt.as_str()));
    }
    out
}

fn annotation_value_term(value: &AnnotationValue) -> String {
    match value {
        AnnotationValue::Iri(iri) => iri_term(iri.as_str()),
        AnnotationValue::Literal(lit) => literal_term(lit),
        AnnotationValue::Anonymous(id) => format!("_:{id}"),
    }
}

fn cardinality_predicate(kind: CardinalityKind, qualified: bool) -> &'static str {
    match (kind, qualified) {
        (CardinalityKind::Min, false) => vocab::OWL_MIN_CARDINALITY,
        (CardinalityKind::Max, false) => vocab::OWL_MAX_CARDINALITY,
        (CardinalityKind::Exact, false) => vocab::OWL_CARDINALITY,
        (CardinalityKind::Min, true) => vocab::OWL_MIN_QUALIFIED_CARDINALITY,
        (CardinalityKind::Max, true) => vocab::OWL_MAX_QUALIFIED_CARDINALITY,
        (CardinalityKind::Exact, true) => vocab::OWL_QUALIFIED_CARDINALITY,
    }
}

fn individual_term(ind: &Individual) -> String {
    match ind {
        Individual::Named(iri) => iri_term(iri.as_str()),
        Individual::Anonymous(id) => format!("_:{id}"),
    }
}

fn declaration_type(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Class => vocab::OWL_CLASS,
        EntityKind::ObjectProperty => vocab::OWL_OBJECT_PROPERTY,
        EntityKind::DataProperty => vocab::OWL_DATATYPE_PROPERTY,
        EntityKind::AnnotationProperty => vocab::OWL_ANNOTATION_PROPERTY,
        EntityKind::NamedIndividual => vocab::OWL_NAMED_INDIVIDUAL,
        EntityKind::Datatype => vocab::RDFS_DATATYPE,
    }
}

impl Writer {
    fn triple(&mut self, s: &str, p: &str, o: &str) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{s} {} {o} .", iri_term(p));
    }

    fn blank(&mut self) -> String {
        let id = format!("_:odpkit{}", self.next_blank);
        self.next_blank += 1;
        id
    }

    /// A fresh blank node per distinct source id.
    fn mapped_blank<'e>(&mut self, ids: &mut HashMap<&'e str, String>, id: &'e str) -> String {
        if let Some(node) = ids.get(id) {
            return node.clone();
        }
        let node = self.blank();
        ids.insert(id, node.clone());
        node
    }

    fn filler(&mut self, filler: &Filler) -> String {
        match filler {
            Filler::Expression { expression } => self.expression(expression),
            Filler::Datatype { iri } => iri_term(iri.as_str()),
        }
    }

    fn list(&mut self, items: Vec<String>) -> String {
        let mut head = iri_term(vocab::RDF_NIL);
        for item in items.into_iter().rev() {
            let cell = self.blank();
            self.triple(&cell, vocab::RDF_FIRST, &item);
            self.triple(&cell, vocab::RDF_REST, &head);
            head = cell;
        }
        head
    }

    fn expression(&mut self, ce: &ClassExpression) -> String {
        match ce {
            ClassExpression::Class { iri } => iri_term(iri.as_str()),
            ClassExpression::Existential(r) | ClassExpression::Universal(r) => {
                let node = self.blank();
                let quantifier = if matches!(ce, ClassExpression::Existential(_)) {
                    vocab::OWL_SOME_VALUES_FROM
                } else {
                    vocab::OWL_ALL_VALUES_FROM
                };
                let filler = self.filler(&r.filler);
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_RESTRICTION));
                self.triple(&node, vocab::OWL_ON_PROPERTY, &iri_term(r.property.iri.as_str()));
                self.triple(&node, quantifier, &filler);
                node
            }
            ClassExpression::HasValue { property, value } => {
                let node = self.blank();
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_RESTRICTION));
                self.triple(&node, vocab::OWL_ON_PROPERTY, &iri_term(property.as_str()));
                self.triple(&node, vocab::OWL_HAS_VALUE, &individual_term(value));
                node
            }
            ClassExpression::IntersectionOf { operands } | ClassExpression::UnionOf { operands } => {
                let predicate = if matches!(ce, ClassExpression::IntersectionOf { .. }) {
                    vocab::OWL_INTERSECTION_OF
                } else {
                    vocab::OWL_UNION_OF
                };
                let items = operands.iter().map(|op| self.expression(op)).collect();
                let head = self.list(items);
                let node = self.blank();
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_CLASS));
                self.triple(&node, predicate, &head);
                node
            }
            ClassExpression::ComplementOf { operand } => {
                let inner = self.expression(operand);
                let node = self.blank();
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_CLASS));
                self.triple(&node, vocab::OWL_COMPLEMENT_OF, &inner);
                node
            }
            ClassExpression::OneOf { individuals } => {
                let items = individuals.iter().map(individual_term).collect();
                let head = self.list(items);
                let node = self.blank();
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_CLASS));
                self.triple(&node, vocab::OWL_ONE_OF, &head);
                node
            }
            ClassExpression::Cardinality(c) => {
                let filler = c.filler.as_ref().map(|f| self.filler(f));
                let node = self.blank();
                self.triple(&node, vocab::RDF_TYPE, &iri_term(vocab::OWL_RESTRICTION));
                self.triple(&node, vocab::OWL_ON_PROPERTY, &iri_term(c.property.iri.as_str()));
                let count = format!("\"{}\"^^{}", c.cardinality, iri_term(vocab::XSD_NON_NEGATIVE_INTEGER));
                self.triple(&node, cardinality_predicate(c.kind, filler.is_some()), &count);
                if let Some(filler) = filler {
                    let on = if matches!(c.filler, Some(Filler::Datatype { .. })) {
                        vocab::OWL_ON_DATA_RANGE
                    } else {
                        vocab::OWL_ON_CLASS
                    };
                    self.triple(&node, on, &filler);
                }
                node
            }
            ClassExpression::Other(opaque) => {
                let mut ids = HashMap::new();
                let root = self.mapped_blank(&mut ids, &opaque.root);
                for t in &opaque.triples {
                    let subject = self.mapped_blank(&mut ids, &t.subject);
                    let object = match &t.object {
                        OpaqueTerm::Iri(iri) => iri_term(iri.as_str()),
                        OpaqueTerm::Blank(id) => self.mapped_blank(&mut ids, id),
                        OpaqueTerm::Literal(lit) => literal_term(lit),
                    };
                    self.triple(&subject, t.predicate.as_str(), &object);
                }
                root
            }
        }
    }

    /// N-ary class axioms are written pairwise against the first operand.
    fn pairwise(&mut self, predicate: &str, expressions: &[ClassExpression]) {
        let Some((first, rest)) = expressions.split_first() else {
            return;
        };
        let head = self.expression(first);
        for other in rest {
            let term = self.expression(other);
            self.triple(&head, predicate, &term);
        }
    }

    fn axiom(&mut self, ax: &Axiom) {
        match ax {
            Axiom::Declaration { entity } => self.triple(
                &iri_term(entity.iri.as_str()),
                vocab::RDF_TYPE,
                &iri_term(declaration_type(entity.kind)),
            ),
            Axiom::SubClassOf(sc) => {
                let sub = self.expression(&sc.sub);
                let sup = self.expression(&sc.sup);
                self.triple(&sub, vocab::RDFS_SUBCLASS_OF, &sup);
            }
            Axiom::EquivalentClasses { expressions } => {
                self.pairwise(vocab::OWL_EQUIVALENT_CLASS, expressions)
            }
            Axiom::DisjointClasses { expressions } => {
                self.pairwise(vocab::OWL_DISJOINT_WITH, expressions)
            }
            Axiom::SubObjectPropertyOf { sub, sup } => self.triple(
                &iri_term(sub.as_str()),
                vocab::RDFS_SUBPROPERTY_OF,
                &iri_term(sup.as_str()),
            ),
            Axiom::InverseObjectProperties { first, second } => self.triple(
                &iri_term(first.as_str()),
                vocab::OWL_INVERSE_OF,
                &iri_term(second.as_str()),
            ),
            Axiom::ObjectPropertyCharacteristic {
                characteristic,
                property,
            } => self.triple(
                &iri_term(property.as_str()),
                vocab::RDF_TYPE,
                &iri_term(characteristic.type_iri()),
            ),
            Axiom::FunctionalDataProperty { property } => self.triple(
                &iri_term(property.as_str()),
                vocab::RDF_TYPE,
                &iri_term(PropertyCharacteristic::Functional.type_iri()),
            ),
            Axiom::ObjectPropertyDomain { property, domain: ce }
            | Axiom::DataPropertyDomain { property, domain: ce } => {
                let term = self.expression(ce);
                self.triple(&iri_term(property.as_str()), vocab::RDFS_DOMAIN, &term);
            }
            Axiom::ObjectPropertyRange { property, range } => {
                let term = self.expression(range);
                self.triple(&iri_term(property.as_str()), vocab::RDFS_RANGE, &term);
            }
            Axiom::DataPropertyRange { property, range } => self.triple(
                &iri_term(property.as_str()),
                vocab::RDFS_RANGE,
                &iri_term(range.as_str()),
            ),
            Axiom::ClassAssertion { class, individual } => {
                let term = self.expression(class);
                self.triple(&individual_term(individual), vocab::RDF_TYPE, &term);
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => self.triple(
                &individual_term(subject),
                property.as_str(),
                &individual_term(object),
            ),
            Axiom::DataPropertyAssertion {
                property,
                subject,
                value,
            } => self.triple(&individual_term(subject), property.as_str(), &literal_term(value)),
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => {
                let subject = match subject {
                    AnnotationSubject::Iri(iri) => iri_term(iri.as_str()),
                    AnnotationSubject::Anonymous(id) => format!("_:{id}"),
                };
                self.triple(&subject, property.as_str(), &annotation_value_term(value));
            }
        }
    }
}

/// Properties whose kind a reader could not recover from their usage alone.
///
/// Without a declaration, an IRI-valued annotation reads back as an object
/// property assertion and a data property assertion reads back as an
/// annotation.
fn implicit_declarations(onto: &Ontology) -> BTreeSet<Entity> {
    let mut out = BTreeSet::new();
    for ax in onto.axioms() {
        match ax {
            Axiom::AnnotationAssertion { property, .. } => {
                out.insert(Entity::annotation_property(property.clone()));
            }
            Axiom::DataPropertyAssertion { property, .. }
            | Axiom::DataPropertyDomain { property, .. }
            | Axiom::DataPropertyRange { property, .. }
            | Axiom::FunctionalDataProperty { property } => {
                out.insert(Entity::data_property(property.clone()));
            }
            _ => {}
        }
    }
    out.retain(|e| !e.is_built_in() && !onto.contains(&Axiom::declaration(e.clone())));
    out
}

/// Serialize `onto` as N-Triples: header, implied property declarations,
/// then axioms in document order.
///
/// Without an ontology IRI there is no subject for the header, so version
/// IRI, imports and ontology annotations are not written.
pub fn write_ntriples(onto: &Ontology) -> String {
    let mut w = Writer {
        out: String::new(),
        next_blank: 0,
    };
    if let Some(iri) = onto.iri() {
        let subject = iri_term(iri.as_str());
        w.triple(&subject, vocab::RDF_TYPE, &iri_term(vocab::OWL_ONTOLOGY));
        if let Some(version) = onto.version_iri() {
            w.triple(&subject, vocab::OWL_VERSION_IRI, &iri_term(version.as_str()));
        }
        for import in onto.imports() {
            w.triple(&subject, vocab::OWL_IMPORTS, &iri_term(import.as_str()));
        }
        for annotation in onto.annotations() {
            w.triple(&subject, annotation.property.as_str(), &annotation_value_term(&annotation.value));
        }
    }
    for entity in implicit_declarations(onto) {
        w.axiom(&Axiom::declaration(entity));
    }
    for ax in onto.axioms() {
        w.axiom(ax);
    }
    w.out
}
