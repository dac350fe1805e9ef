//! RDF → OWL axiom mapping.
//!
//! Follows the OWL 2 "mapping to RDF graphs" in reverse for the subset the
//! model covers. Blank nodes that encode class expressions (restrictions,
//! boolean combinations, enumerations) and the RDF lists they use are
//! consumed while building expressions and never show up as individuals.
//! Anonymous class expressions outside the model are kept as
//! [`ClassExpression::Other`] so the axioms mentioning them survive.
//!
//! Triples about the ontology IRI form the header (imports, version IRI,
//! ontology annotations); they never become axioms.

use std::collections::{BTreeSet, HashMap, HashSet};

use odpkit_owl::{
    vocab, AnnotationSubject, AnnotationValue, Axiom, CardinalityKind, CardinalityRestriction, ClassExpression,
    Entity, EntityKind, Filler, Individual, Iri, Literal, OntologyAnnotation, OpaqueExpression, OpaqueTerm,
    OpaqueTriple, Ontology, PropertyCharacteristic,
};
use tracing::{debug, warn};

use crate::{RdfLiteral, RdfNode, RdfObject, RdfStatement};

/// Nesting limit for class expressions and lists; deeper (or cyclic)
/// structures are skipped.
const MAX_DEPTH: usize = 64;

/// Predicates whose presence marks a blank node as part of a class
/// expression or an RDF list.
const STRUCTURAL_PREDICATES: &[&str] = &[
    vocab::OWL_ON_PROPERTY,
    vocab::OWL_ON_PROPERTIES,
    vocab::OWL_SOME_VALUES_FROM,
    vocab::OWL_ALL_VALUES_FROM,
    vocab::OWL_HAS_VALUE,
    vocab::OWL_HAS_SELF,
    vocab::OWL_MIN_CARDINALITY,
    vocab::OWL_MAX_CARDINALITY,
    vocab::OWL_CARDINALITY,
    vocab::OWL_MIN_QUALIFIED_CARDINALITY,
    vocab::OWL_MAX_QUALIFIED_CARDINALITY,
    vocab::OWL_QUALIFIED_CARDINALITY,
    vocab::OWL_ON_CLASS,
    vocab::OWL_ON_DATA_RANGE,
    vocab::OWL_INTERSECTION_OF,
    vocab::OWL_UNION_OF,
    vocab::OWL_COMPLEMENT_OF,
    vocab::OWL_ONE_OF,
    vocab::RDF_FIRST,
    vocab::RDF_REST,
];

/// Cardinality predicates, and whether they take an `onClass`/`onDataRange`.
const CARDINALITY_PREDICATES: &[(&str, CardinalityKind, bool)] = &[
    (vocab::OWL_MIN_CARDINALITY, CardinalityKind::Min, false),
    (vocab::OWL_MAX_CARDINALITY, CardinalityKind::Max, false),
    (vocab::OWL_CARDINALITY, CardinalityKind::Exact, false),
    (vocab::OWL_MIN_QUALIFIED_CARDINALITY, CardinalityKind::Min, true),
    (vocab::OWL_MAX_QUALIFIED_CARDINALITY, CardinalityKind::Max, true),
    (vocab::OWL_QUALIFIED_CARDINALITY, CardinalityKind::Exact, true),
];

fn declaration_kind(type_iri: &str) -> Option<EntityKind> {
    match type_iri {
        vocab::OWL_CLASS => Some(EntityKind::Class),
        vocab::OWL_OBJECT_PROPERTY => Some(EntityKind::ObjectProperty),
        vocab::OWL_DATATYPE_PROPERTY => Some(EntityKind::DataProperty),
        vocab::OWL_ANNOTATION_PROPERTY => Some(EntityKind::AnnotationProperty),
        vocab::OWL_NAMED_INDIVIDUAL => Some(EntityKind::NamedIndividual),
        vocab::RDFS_DATATYPE => Some(EntityKind::Datatype),
        _ => None,
    }
}

/// RDF/OWL predicates that can appear on an expression node without being an
/// axiom about it.
fn is_expression_predicate(predicate: &str) -> bool {
    (predicate.starts_with(vocab::RDF_NS) || predicate.starts_with(vocab::OWL_NS))
        && predicate != vocab::OWL_EQUIVALENT_CLASS
        && predicate != vocab::OWL_DISJOINT_WITH
}

/// Reserved predicates that are not built-in annotation properties.
fn is_reserved_non_annotation(predicate: &str) -> bool {
    vocab::is_reserved(predicate) && !vocab::BUILT_IN_ANNOTATION_PROPERTIES.contains(&predicate)
}

fn individual(node: &RdfNode) -> Individual {
    match node {
        RdfNode::Iri(iri) => Individual::named(iri.as_str()),
        RdfNode::BlankNode(id) => Individual::anonymous(id.as_str()),
    }
}

fn literal(lit: &RdfLiteral) -> Literal {
    Literal {
        lexical: lit.lexical.clone(),
        datatype: lit.datatype.as_deref().map(Iri::from),
        language: lit.language.clone(),
    }
}

struct Graph<'a> {
    by_subject: HashMap<&'a RdfNode, Vec<(&'a str, &'a RdfObject)>>,
    declared: HashMap<&'a str, BTreeSet<EntityKind>>,
    structural: HashSet<&'a RdfNode>,
}

impl<'a> Graph<'a> {
    fn new(statements: &'a [RdfStatement]) -> Self {
        let mut by_subject: HashMap<&RdfNode, Vec<(&str, &RdfObject)>> = HashMap::new();
        let mut declared: HashMap<&str, BTreeSet<EntityKind>> = HashMap::new();
        let mut structural = HashSet::new();

        for stmt in statements {
            by_subject
                .entry(&stmt.subject)
                .or_default()
                .push((stmt.predicate_iri.as_str(), &stmt.object));

            let is_blank = matches!(stmt.subject, RdfNode::BlankNode(_));
            if stmt.predicate_iri == vocab::RDF_TYPE {
                match (&stmt.subject, stmt.object.as_iri()) {
                    (RdfNode::Iri(subject), Some(ty)) => {
                        if let Some(kind) = declaration_kind(ty) {
                            declared.entry(subject.as_str()).or_default().insert(kind);
                        }
                    }
                    (RdfNode::BlankNode(_), Some(vocab::OWL_RESTRICTION | vocab::OWL_CLASS)) => {
                        structural.insert(&stmt.subject);
                    }
                    _ => {}
                }
            } else if is_blank && STRUCTURAL_PREDICATES.contains(&stmt.predicate_iri.as_str()) {
                structural.insert(&stmt.subject);
            }
        }

        Self {
            by_subject,
            declared,
            structural,
        }
    }

    /// Triples that only encode a class expression or list cell.
    fn is_structural_triple(&self, stmt: &RdfStatement) -> bool {
        self.structural.contains(&stmt.subject) && is_expression_predicate(&stmt.predicate_iri)
    }

    fn has_kind(&self, iri: &str, kind: EntityKind) -> bool {
        self.declared.get(iri).is_some_and(|kinds| kinds.contains(&kind))
    }

    fn is_data_property(&self, iri: &str) -> bool {
        self.has_kind(iri, EntityKind::DataProperty)
    }

    fn is_annotation_property(&self, iri: &str) -> bool {
        self.has_kind(iri, EntityKind::AnnotationProperty)
            || vocab::BUILT_IN_ANNOTATION_PROPERTIES.contains(&iri)
    }

    fn is_datatype(&self, iri: &str) -> bool {
        vocab::is_built_in_datatype(iri) || self.has_kind(iri, EntityKind::Datatype)
    }

    fn object(&self, node: &RdfNode, predicate: &str) -> Option<&'a RdfObject> {
        self.by_subject
            .get(node)?
            .iter()
            .find(|(p, _)| *p == predicate)
            .map(|(_, o)| *o)
    }

    /// Items of an RDF list, or `None` if the list is malformed.
    fn list(&self, head: &RdfObject, depth: usize) -> Option<Vec<&'a RdfObject>> {
        let mut out = Vec::new();
        let mut cursor = head.as_node()?.clone();
        loop {
            if out.len() > MAX_DEPTH * 16 || depth > MAX_DEPTH {
                return None;
            }
            match &cursor {
                RdfNode::Iri(iri) if iri == vocab::RDF_NIL => return Some(out),
                RdfNode::Iri(_) => return None,
                RdfNode::BlankNode(_) => {}
            }
            out.push(self.object(&cursor, vocab::RDF_FIRST)?);
            cursor = self.object(&cursor, vocab::RDF_REST)?.as_node()?.clone();
        }
    }

    /// A named class, a modelled anonymous expression, or an opaque one.
    ///
    /// `None` only for literals and for nesting past [`MAX_DEPTH`].
    fn class_expression(&self, obj: &RdfObject, depth: usize) -> Option<ClassExpression> {
        if depth > MAX_DEPTH {
            return None;
        }
        let node = obj.as_node()?;
        let RdfNode::BlankNode(_) = node else {
            return obj.as_iri().map(ClassExpression::class);
        };
        self.modelled_expression(node, depth)
            .or_else(|| self.opaque_expression(node))
    }

    fn modelled_expression(&self, node: &RdfNode, depth: usize) -> Option<ClassExpression> {
        if let Some(prop) = self.object(node, vocab::OWL_ON_PROPERTY) {
            let property = prop.as_iri()?;
            if let Some(filler) = self.object(node, vocab::OWL_SOME_VALUES_FROM) {
                let (property, filler) = self.restriction(property, filler, depth)?;
                return Some(ClassExpression::some(property, filler));
            }
            if let Some(filler) = self.object(node, vocab::OWL_ALL_VALUES_FROM) {
                let (property, filler) = self.restriction(property, filler, depth)?;
                return Some(ClassExpression::only(property, filler));
            }
            if let Some(value) = self.object(node, vocab::OWL_HAS_VALUE) {
                return Some(ClassExpression::HasValue {
                    property: Iri::from(property),
                    value: individual(value.as_node()?),
                });
            }
            return self.cardinality(node, property, depth);
        }

        if let Some(head) = self.object(node, vocab::OWL_INTERSECTION_OF) {
            return Some(ClassExpression::IntersectionOf {
                operands: self.operands(head, depth)?,
            });
        }
        if let Some(head) = self.object(node, vocab::OWL_UNION_OF) {
            return Some(ClassExpression::UnionOf {
                operands: self.operands(head, depth)?,
            });
        }
        if let Some(operand) = self.object(node, vocab::OWL_COMPLEMENT_OF) {
            return Some(ClassExpression::ComplementOf {
                operand: Box::new(self.class_expression(operand, depth + 1)?),
            });
        }
        if let Some(head) = self.object(node, vocab::OWL_ONE_OF) {
            let individuals = self
                .list(head, depth)?
                .into_iter()
                .map(|item| item.as_node().map(individual))
                .collect::<Option<Vec<_>>>()?;
            return Some(ClassExpression::OneOf { individuals });
        }
        None
    }

    fn cardinality(&self, node: &RdfNode, property: &str, depth: usize) -> Option<ClassExpression> {
        let (kind, value, qualified) = CARDINALITY_PREDICATES
            .iter()
            .find_map(|(p, kind, qualified)| self.object(node, p).map(|v| (*kind, v, *qualified)))?;
        let cardinality = value.as_literal()?.lexical.trim().parse::<u32>().ok()?;

        let filler = if !qualified {
            None
        } else if let Some(range) = self.object(node, vocab::OWL_ON_DATA_RANGE) {
            Some(Filler::datatype(range.as_iri()?))
        } else {
            let class = self.object(node, vocab::OWL_ON_CLASS)?;
            Some(Filler::expression(self.class_expression(class, depth + 1)?))
        };

        let is_data = self.is_data_property(property) || matches!(filler, Some(Filler::Datatype { .. }));
        let property = if is_data {
            Entity::data_property(property)
        } else {
            Entity::object_property(property)
        };
        Some(ClassExpression::Cardinality(CardinalityRestriction {
            kind,
            cardinality,
            property,
            filler,
        }))
    }

    /// Every triple reachable from `root` through blank nodes.
    fn opaque_expression(&self, root: &RdfNode) -> Option<ClassExpression> {
        let RdfNode::BlankNode(root_id) = root else {
            return None;
        };
        let mut triples = Vec::new();
        let mut visited: HashSet<&RdfNode> = HashSet::new();
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if visited.len() > MAX_DEPTH * 16 || !visited.insert(node) {
                continue;
            }
            let RdfNode::BlankNode(subject) = node else {
                continue;
            };
            for &(predicate, object) in self.by_subject.get(node).into_iter().flatten() {
                let object = match object {
                    RdfObject::Node(RdfNode::Iri(iri)) => OpaqueTerm::Iri(Iri::from(iri.as_str())),
                    RdfObject::Node(blank @ RdfNode::BlankNode(id)) => {
                        pending.push(blank);
                        OpaqueTerm::Blank(id.clone())
                    }
                    RdfObject::Literal(lit) => OpaqueTerm::Literal(literal(lit)),
                };
                triples.push(OpaqueTriple {
                    subject: subject.clone(),
                    predicate: Iri::from(predicate),
                    object,
                });
            }
        }

        let construct = triples
            .iter()
            .filter(|t| &t.subject == root_id)
            .filter_map(|t| t.predicate.as_str().strip_prefix(vocab::OWL_NS))
            .find(|local| *local != "onProperty")
            .unwrap_or("anonymousClass")
            .to_string();
        debug!(node = %root_id, construct = %construct, triples = triples.len(), "keeping opaque class expression");
        Some(ClassExpression::Other(OpaqueExpression {
            construct,
            root: root_id.clone(),
            triples,
        }))
    }

    fn operands(&self, head: &RdfObject, depth: usize) -> Option<Vec<ClassExpression>> {
        self.list(head, depth)?
            .into_iter()
            .map(|item| self.class_expression(item, depth + 1))
            .collect()
    }

    fn restriction(&self, property: &str, filler: &RdfObject, depth: usize) -> Option<(Entity, Filler)> {
        match filler.as_iri() {
            Some(dt) if self.is_data_property(property) || self.is_datatype(dt) => {
                Some((Entity::data_property(property), Filler::datatype(dt)))
            }
            _ => {
                let expression = self.class_expression(filler, depth + 1)?;
                Some((Entity::object_property(property), Filler::expression(expression)))
            }
        }
    }
}

/// Map parsed statements onto an ontology, in document order.
pub(crate) fn ontology_from_statements(statements: &[RdfStatement]) -> Ontology {
    let graph = Graph::new(statements);
    let mut onto = Ontology::new();

    let ontology_iri = statements.iter().find_map(|stmt| match (&stmt.subject, stmt.object.as_iri()) {
        (RdfNode::Iri(subject), Some(vocab::OWL_ONTOLOGY)) if stmt.predicate_iri == vocab::RDF_TYPE => {
            Some(subject.as_str())
        }
        _ => None,
    });
    onto.set_iri(ontology_iri.map(Iri::from));

    let mut skipped = 0usize;
    for stmt in statements {
        if graph.is_structural_triple(stmt) {
            continue;
        }
        let on_header = matches!(&stmt.subject, RdfNode::Iri(s) if Some(s.as_str()) == ontology_iri);
        if on_header && stmt.predicate_iri != vocab::RDF_TYPE {
            if map_header(&mut onto, stmt).is_none() {
                skipped += 1;
            }
            continue;
        }
        match map_statement(&graph, stmt) {
            Some(axiom) => {
                onto.add_axiom(axiom);
            }
            None => {
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, axioms = onto.len(), "rdf mapping finished with skipped triples");
    }
    onto
}

fn skip<T>(stmt: &RdfStatement, reason: &str) -> Option<T> {
    warn!(
        subject = ?stmt.subject,
        predicate = %stmt.predicate_iri,
        reason,
        "skipping triple"
    );
    None
}

/// Record one header triple; `None` when it was skipped.
fn map_header(onto: &mut Ontology, stmt: &RdfStatement) -> Option<()> {
    let predicate = stmt.predicate_iri.as_str();
    match predicate {
        vocab::OWL_IMPORTS => {
            let Some(iri) = stmt.object.as_iri() else {
                return skip(stmt, "import of a non-IRI");
            };
            onto.add_import(Iri::from(iri));
        }
        vocab::OWL_VERSION_IRI => {
            let Some(iri) = stmt.object.as_iri() else {
                return skip(stmt, "version IRI is not an IRI");
            };
            onto.set_version_iri(Some(Iri::from(iri)));
        }
        p if is_reserved_non_annotation(p) => return skip(stmt, "unsupported header predicate"),
        _ => {
            onto.add_annotation(OntologyAnnotation {
                property: Iri::from(predicate),
                value: annotation_value(&stmt.object),
            });
        }
    }
    Some(())
}

fn map_statement(graph: &Graph<'_>, stmt: &RdfStatement) -> Option<Axiom> {
    let predicate = stmt.predicate_iri.as_str();
    let subject_iri = match &stmt.subject {
        RdfNode::Iri(iri) => Some(iri.as_str()),
        RdfNode::BlankNode(_) => None,
    };

    match predicate {
        vocab::RDF_TYPE => {
            let Some(ty) = stmt.object.as_iri() else {
                let class = graph.class_expression(&stmt.object, 0)?;
                return Some(Axiom::ClassAssertion {
                    class,
                    individual: individual(&stmt.subject),
                });
            };
            if ty == vocab::OWL_ONTOLOGY {
                return None;
            }
            if let Some(kind) = declaration_kind(ty) {
                let Some(iri) = subject_iri else {
                    return skip(stmt, "declaration of a blank node");
                };
                return Some(Axiom::declaration(Entity::new(kind, iri)));
            }
            if let Some(characteristic) = PropertyCharacteristic::from_type_iri(ty) {
                let Some(iri) = subject_iri else {
                    return skip(stmt, "characteristic of an anonymous property");
                };
                let property = Iri::from(iri);
                if characteristic == PropertyCharacteristic::Functional && graph.is_data_property(iri) {
                    return Some(Axiom::FunctionalDataProperty { property });
                }
                return Some(Axiom::ObjectPropertyCharacteristic {
                    characteristic,
                    property,
                });
            }
            if vocab::is_reserved(ty) && ty != vocab::OWL_THING {
                return skip(stmt, "unsupported vocabulary type");
            }
            Some(Axiom::class_assertion(ty, individual(&stmt.subject)))
        }
        vocab::RDFS_SUBCLASS_OF => {
            let sub = graph.class_expression(&RdfObject::Node(stmt.subject.clone()), 0);
            let sup = graph.class_expression(&stmt.object, 0);
            match (sub, sup) {
                (Some(sub), Some(sup)) => Some(Axiom::subclass_of(sub, sup)),
                _ => skip(stmt, "unparseable class expression"),
            }
        }
        vocab::OWL_EQUIVALENT_CLASS | vocab::OWL_DISJOINT_WITH => {
            let a = graph.class_expression(&RdfObject::Node(stmt.subject.clone()), 0);
            let b = graph.class_expression(&stmt.object, 0);
            let (Some(a), Some(b)) = (a, b) else {
                return skip(stmt, "unparseable class expression");
            };
            let expressions = vec![a, b];
            Some(if predicate == vocab::OWL_EQUIVALENT_CLASS {
                Axiom::EquivalentClasses { expressions }
            } else {
                Axiom::DisjointClasses { expressions }
            })
        }
        vocab::RDFS_SUBPROPERTY_OF => {
            let (Some(sub), Some(sup)) = (subject_iri, stmt.object.as_iri()) else {
                return skip(stmt, "anonymous property");
            };
            if graph.is_data_property(sub) || graph.is_annotation_property(sub) {
                return skip(stmt, "only object sub-properties are modelled");
            }
            Some(Axiom::SubObjectPropertyOf {
                sub: Iri::from(sub),
                sup: Iri::from(sup),
            })
        }
        vocab::OWL_INVERSE_OF => {
            let (Some(first), Some(second)) = (subject_iri, stmt.object.as_iri()) else {
                return skip(stmt, "anonymous property");
            };
            Some(Axiom::InverseObjectProperties {
                first: Iri::from(first),
                second: Iri::from(second),
            })
        }
        vocab::RDFS_DOMAIN => {
            let Some(property) = subject_iri else {
                return skip(stmt, "anonymous property");
            };
            if graph.is_annotation_property(property) {
                return skip(stmt, "annotation property domain");
            }
            let Some(domain) = graph.class_expression(&stmt.object, 0) else {
                return skip(stmt, "unparseable class expression");
            };
            let property = Iri::from(property);
            Some(if graph.is_data_property(property.as_str()) {
                Axiom::DataPropertyDomain { property, domain }
            } else {
                Axiom::ObjectPropertyDomain { property, domain }
            })
        }
        vocab::RDFS_RANGE => {
            let Some(property) = subject_iri else {
                return skip(stmt, "anonymous property");
            };
            if graph.is_annotation_property(property) {
                return skip(stmt, "annotation property range");
            }
            match stmt.object.as_iri() {
                Some(range) if graph.is_data_property(property) || graph.is_datatype(range) => {
                    Some(Axiom::DataPropertyRange {
                        property: Iri::from(property),
                        range: Iri::from(range),
                    })
                }
                _ => match graph.class_expression(&stmt.object, 0) {
                    Some(range) => Some(Axiom::ObjectPropertyRange {
                        property: Iri::from(property),
                        range,
                    }),
                    None => skip(stmt, "unparseable class expression"),
                },
            }
        }
        _ => map_assertion(graph, stmt),
    }
}

fn map_assertion(graph: &Graph<'_>, stmt: &RdfStatement) -> Option<Axiom> {
    let predicate = stmt.predicate_iri.as_str();

    if is_reserved_non_annotation(predicate) {
        return skip(stmt, "unsupported vocabulary predicate");
    }
    if graph.is_annotation_property(predicate) {
        return Some(annotation(stmt));
    }

    match &stmt.object {
        RdfObject::Literal(lit) => {
            if graph.is_data_property(predicate) {
                Some(Axiom::DataPropertyAssertion {
                    property: Iri::from(predicate),
                    subject: individual(&stmt.subject),
                    value: literal(lit),
                })
            } else {
                Some(annotation(stmt))
            }
        }
        RdfObject::Node(object) => {
            if graph.is_data_property(predicate) {
                return skip(stmt, "data property with a non-literal value");
            }
            Some(Axiom::ObjectPropertyAssertion {
                property: Iri::from(predicate),
                subject: individual(&stmt.subject),
                object: individual(object),
            })
        }
    }
}

fn annotation_value(object: &RdfObject) -> AnnotationValue {
    match object {
        RdfObject::Node(RdfNode::Iri(iri)) => AnnotationValue::Iri(Iri::from(iri.as_str())),
        RdfObject::Node(RdfNode::BlankNode(id)) => AnnotationValue::Anonymous(id.clone()),
        RdfObject::Literal(lit) => AnnotationValue::Literal(literal(lit)),
    }
}

fn annotation(stmt: &RdfStatement) -> Axiom {
    let subject = match &stmt.subject {
        RdfNode::Iri(iri) => AnnotationSubject::Iri(Iri::from(iri.as_str())),
        RdfNode::BlankNode(id) => AnnotationSubject::Anonymous(id.clone()),
    };
    Axiom::AnnotationAssertion {
        property: Iri::from(stmt.predicate_iri.as_str()),
        subject,
        value: annotation_value(&stmt.object),
    }
}
