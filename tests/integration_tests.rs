//! Integration tests for the complete odpkit pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Catalog → pattern document → fragment ontology
//! - Fragment + target → instantiation → merged target → N-Triples → reload
//! - Merged target → subclass classification → schema diagram graph
//!
//! Run with: cargo test --test integration_tests

use std::collections::BTreeSet;
use tempfile::tempdir;

use odpkit_ingest_rdfowl::{load_ontology_file, ontology_from_turtle, write_ntriples};
use odpkit_owl::{vocab, AnnotationSubject, AnnotationValue, Axiom, Iri, PropertyCharacteristic};
use odpkit_patterns::{
    CatalogSource, Category, InstantiationConfig, OntologyNamingContext, PatternDocumentMapper,
    PatternInstantiator, PatternLibrary, TargetContext,
};
use odpkit_sdont::{render_dot, DeclaredClassExtractor, OntologyParser, Side, UnsupportedShape};

const TARGET: &str = r#"
@prefix : <http://ex.org/onto#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

<http://ex.org/onto> a owl:Ontology .
:Building a owl:Class .
:Room a owl:Class .
:hasPart a owl:ObjectProperty .
:Room rdfs:subClassOf :Building .
"#;

const PARTHOOD: &str = "http://ontologydesignpatterns.org/modl/parthood";

// ============================================================================
// Catalog → fragment
// ============================================================================

#[test]
fn test_bundled_catalog_resolves_to_bundled_fragments() {
    let lib = PatternLibrary::new(CatalogSource::Bundled);
    let docs = PatternDocumentMapper::bundled().expect("bundled documents");

    let categories = lib.list_categories();
    assert_eq!(categories[0], Category::any());

    // Every bundled document is catalogued.
    for iri in docs.iris() {
        let pattern = lib.find_pattern(iri).expect("catalogued pattern");
        let fragment = lib.load_fragment(&pattern, &docs).expect("fragment");
        assert_eq!(fragment.iri(), Some(iri));
        assert!(!fragment.is_empty());
    }
}

// ============================================================================
// Instantiation → merged target → round trip
// ============================================================================

#[test]
fn test_instantiate_merge_and_reload() {
    let lib = PatternLibrary::bundled();
    let docs = PatternDocumentMapper::bundled().expect("bundled documents");
    let pattern = lib.find_pattern(&Iri::from(PARTHOOD)).expect("parthood");
    let fragment = lib.load_fragment(&pattern, &docs).expect("fragment");

    let mut target = ontology_from_turtle(TARGET).expect("target");
    let before = target.len();
    let naming = OntologyNamingContext::with_default_separator(&target);
    let ctx = TargetContext::for_ontology(&target, &naming);
    let inst = PatternInstantiator::new(&fragment, "Parthood Pattern", &ctx, &InstantiationConfig::default())
        .instantiate()
        .expect("instantiate");

    assert_eq!(inst.module_iri.as_str(), "http://ex.org/onto#Parthood_Pattern_Module");
    assert_eq!(inst.pattern_iri.as_str(), PARTHOOD);
    assert_eq!(
        inst.rename_map
            .apply(&Iri::from(format!("{PARTHOOD}#hasPart")))
            .as_str(),
        "http://ex.org/onto#hasPart-1"
    );
    assert_eq!(
        inst.rename_map
            .apply(&Iri::from(format!("{PARTHOOD}#isPartOf")))
            .as_str(),
        "http://ex.org/onto#isPartOf"
    );

    // Property axioms follow the renamed property.
    assert!(inst.instantiation_axioms.contains(&Axiom::ObjectPropertyCharacteristic {
        characteristic: PropertyCharacteristic::Transitive,
        property: Iri::from("http://ex.org/onto#hasPart-1"),
    }));
    assert!(inst.instantiation_axioms.contains(&Axiom::InverseObjectProperties {
        first: Iri::from("http://ex.org/onto#hasPart-1"),
        second: Iri::from("http://ex.org/onto#isPartOf"),
    }));
    // The fragment's own label stays with the fragment.
    assert_eq!(fragment.label(), Some("Parthood"));
    assert!(!inst.instantiation_axioms.iter().any(|ax| matches!(
        ax,
        Axiom::AnnotationAssertion { subject: AnnotationSubject::Iri(s), .. } if s.as_str() == PARTHOOD
    )));

    let added = inst.apply_to(&mut target);
    assert_eq!(target.len(), before + added);
    assert!(target.contains(&Axiom::annotation(
        vocab::OPLA_IS_NATIVE_TO,
        "http://ex.org/onto#Whole",
        AnnotationValue::Iri(inst.module_iri.clone()),
    )));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("merged.nt");
    std::fs::write(&path, write_ntriples(&target)).expect("write merged");
    let reloaded = load_ontology_file(&path).expect("reload merged");

    let original: BTreeSet<&Axiom> = target.axioms().iter().collect();
    let again: BTreeSet<&Axiom> = reloaded.axioms().iter().collect();
    for ax in &original {
        assert!(again.contains(ax), "lost after round trip: {ax}");
    }
}

// ============================================================================
// Merged target → schema diagram
// ============================================================================

#[test]
fn test_merged_target_classifies_into_graph() {
    let lib = PatternLibrary::bundled();
    let docs = PatternDocumentMapper::bundled().expect("bundled documents");
    let pattern = lib.find_pattern(&Iri::from(PARTHOOD)).expect("parthood");
    let fragment = lib.load_fragment(&pattern, &docs).expect("fragment");

    let mut target = ontology_from_turtle(TARGET).expect("target");
    let naming = OntologyNamingContext::with_default_separator(&target);
    let ctx = TargetContext::for_ontology(&target, &naming);
    let inst = PatternInstantiator::new(&fragment, pattern.label(), &ctx, &InstantiationConfig::default())
        .instantiate()
        .expect("instantiate");
    inst.apply_to(&mut target);

    let build = OntologyParser::new(DeclaredClassExtractor)
        .parse_ontology(&target)
        .expect("graph");
    assert!(build.report.unsupported.is_empty());

    let graph = &build.graph;
    let whole = Iri::from("http://ex.org/onto#Whole");
    let part = Iri::from("http://ex.org/onto#Part");
    assert!(graph.contains_node(&whole));
    assert!(graph.contains_node(&part));

    let edge = graph
        .edges()
        .iter()
        .find(|e| e.source().iri() == &whole && e.target().iri() == &part)
        .expect("Whole to Part edge");
    assert!(!edge.is_directed());
    assert_eq!(edge.label().iri.as_str(), "http://ex.org/onto#hasPart-1");

    assert!(graph
        .edges()
        .iter()
        .any(|e| e.is_directed() && e.source().iri().as_str() == "http://ex.org/onto#Room"));

    let dot = render_dot(graph);
    assert!(dot.contains("label=\"hasPart-1\", dir=none"));
}

#[test]
fn test_unsupported_axioms_are_reported_not_fatal() {
    let onto = ontology_from_turtle(
        r#"
@prefix : <http://ex.org/onto#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
:A a owl:Class . :B a owl:Class . :r a owl:ObjectProperty .
[ a owl:Restriction ; owl:onProperty :r ; owl:someValuesFrom :A ]
    rdfs:subClassOf [ a owl:Restriction ; owl:onProperty :r ; owl:allValuesFrom :B ] .
:A rdfs:subClassOf :B .
"#,
    )
    .expect("ontology");

    let build = OntologyParser::new(DeclaredClassExtractor)
        .parse_ontology(&onto)
        .expect("graph");
    assert_eq!(build.report.unsupported.len(), 1);
    assert_eq!(build.report.unsupported[0].shape, UnsupportedShape::BothComplex);
    assert_eq!(build.graph.edge_count(), 1);
    assert_eq!(build.graph.node_count(), 2);
}

#[test]
fn test_cardinality_restriction_is_reported_once() {
    let onto = ontology_from_turtle(
        r#"
@prefix : <http://ex.org/onto#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
:Whole a owl:Class . :Part a owl:Class . :hasPart a owl:ObjectProperty .
:Whole rdfs:subClassOf [ a owl:Restriction ; owl:onProperty :hasPart ;
    owl:minQualifiedCardinality "1"^^xsd:nonNegativeInteger ; owl:onClass :Part ] .
"#,
    )
    .expect("ontology");
    assert_eq!(onto.subclass_axioms().count(), 1);

    let build = OntologyParser::new(DeclaredClassExtractor)
        .parse_ontology(&onto)
        .expect("graph");
    assert_eq!(build.report.unsupported.len(), 1);
    assert_eq!(
        build.report.unsupported[0].shape,
        UnsupportedShape::UnsupportedExpression {
            side: Side::Sup,
            kind: "ObjectMinCardinality",
        }
    );
    assert_eq!(build.graph.edge_count(), 0);
}
