//! Copying a pattern fragment into a target ontology.
//!
//! Instantiation produces two axiom sets:
//!
//! - the fragment's own axioms, optionally moved into the target namespace
//!   through a [`RenameMap`],
//! - module annotations that record which pattern the new module was built
//!   from and which entities are native to it (the OPLA provenance trail).
//!
//! The fragment's header (imports, version IRI, ontology annotations) is not
//! copied. Nothing is written to the target until [`Instantiation::apply_to`]
//! is called with both sets computed.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use odpkit_owl::digest::generate_document_iri;
use odpkit_owl::{vocab, AnnotationValue, Axiom, Entity, Individual, Iri, Literal, Ontology, RenameMap};

use crate::config::InstantiationConfig;
use crate::naming::NamingContext;

/// Appended to a property short name that is already taken in the target.
pub const COLLISION_SUFFIX: &str = "-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationError {
    #[error("no free name for property {short_name} after {attempts} attempts")]
    CollisionLimitExceeded { short_name: String, attempts: usize },
}

/// The ontology a pattern is merged into.
pub struct TargetContext<'a> {
    iri: Iri,
    naming: &'a dyn NamingContext,
}

impl<'a> TargetContext<'a> {
    pub fn new(iri: Iri, naming: &'a dyn NamingContext) -> Self {
        Self { iri, naming }
    }

    /// Use the target's ontology IRI, or a generated document IRI when it has
    /// none.
    pub fn for_ontology(target: &Ontology, naming: &'a dyn NamingContext) -> Self {
        Self::new(document_iri(target, None), naming)
    }

    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    pub fn naming(&self) -> &dyn NamingContext {
        self.naming
    }
}

/// `target#<label>_Module`, with spaces in the label replaced by `_`.
pub fn module_iri_for(target: &Iri, pattern_label: &str) -> Iri {
    let local = format!("{pattern_label} Module").replace(' ', "_");
    target.child("#", &local)
}

/// The ontology IRI, or a deterministic stand-in derived from `seed` (or from
/// the axioms when there is no seed).
fn document_iri(onto: &Ontology, seed: Option<&str>) -> Iri {
    if let Some(iri) = onto.iri() {
        return iri.clone();
    }
    match seed {
        Some(seed) => generate_document_iri(seed),
        None => {
            let rendered: Vec<String> = onto.axioms().iter().map(ToString::to_string).collect();
            generate_document_iri(&rendered.join("\n"))
        }
    }
}

/// Entities that move into the target namespace.
fn is_renamable(entity: &Entity) -> bool {
    !entity.is_built_in()
        && !vocab::is_reserved(entity.iri.as_str())
        && !entity.iri.contains(vocab::OPLA_CORE)
        && !entity.iri.contains(vocab::OPLA_SD)
}

/// Entities that get an `opla:isNativeTo` annotation.
fn is_native(entity: &Entity) -> bool {
    !entity.is_built_in() && !vocab::is_reserved(entity.iri.as_str()) && !entity.iri.contains(vocab::OPLA_CORE)
}

/// Both axiom sets of one instantiation.
#[derive(Debug, Clone, Serialize)]
pub struct Instantiation {
    pub module_iri: Iri,
    pub pattern_iri: Iri,
    pub rename_map: RenameMap,
    pub instantiation_axioms: BTreeSet<Axiom>,
    pub module_annotation_axioms: BTreeSet<Axiom>,
}

impl Instantiation {
    /// Add both axiom sets to `target`; returns how many axioms were new.
    pub fn apply_to(&self, target: &mut Ontology) -> usize {
        let mut added = 0;
        for ax in self
            .instantiation_axioms
            .iter()
            .chain(self.module_annotation_axioms.iter())
        {
            if target.add_axiom(ax.clone()) {
                added += 1;
            }
        }
        added
    }

    pub fn axiom_count(&self) -> usize {
        self.instantiation_axioms.len() + self.module_annotation_axioms.len()
    }
}

pub struct PatternInstantiator<'a> {
    fragment: &'a Ontology,
    pattern_label: String,
    pattern_iri: Iri,
    module_iri: Iri,
    target: &'a TargetContext<'a>,
    config: InstantiationConfig,
}

impl<'a> PatternInstantiator<'a> {
    pub fn new(
        fragment: &'a Ontology,
        pattern_label: impl Into<String>,
        target: &'a TargetContext<'a>,
        config: &InstantiationConfig,
    ) -> Self {
        let pattern_label = pattern_label.into();
        let pattern_iri = document_iri(fragment, Some(&pattern_label));
        let module_iri = module_iri_for(target.iri(), &pattern_label);
        Self {
            fragment,
            pattern_label,
            pattern_iri,
            module_iri,
            target,
            config: *config,
        }
    }

    pub fn module_iri(&self) -> &Iri {
        &self.module_iri
    }

    pub fn pattern_iri(&self) -> &Iri {
        &self.pattern_iri
    }

    /// Where each fragment entity lands in the target.
    ///
    /// Empty when namespace merging is off.
    pub fn rename_map(&self) -> Result<RenameMap, InstantiationError> {
        let mut map = RenameMap::new();
        if !self.config.use_target_namespace {
            return Ok(map);
        }

        let signature = self.fragment.signature();
        let (properties, others): (Vec<&Entity>, Vec<&Entity>) = signature
            .iter()
            .filter(|e| is_renamable(e))
            .partition(|e| e.kind.is_property());

        let separator = self.target.naming().separator();
        for entity in properties.into_iter().chain(others) {
            if map.contains(&entity.iri) {
                continue;
            }
            let short_name = entity.iri.short_form();
            let local = if entity.kind.is_property() {
                self.free_property_name(short_name)?
            } else {
                short_name.to_string()
            };
            let renamed = self.target.iri().child(separator, &local);
            debug!(from = %entity.iri, to = %renamed, kind = entity.kind.keyword(), "renaming pattern entity");
            map.insert(entity.iri.clone(), renamed);
        }
        Ok(map)
    }

    /// `short_name`, with `-1` appended until the target has no entity by
    /// that name.
    fn free_property_name(&self, short_name: &str) -> Result<String, InstantiationError> {
        let naming = self.target.naming();
        let mut candidate = short_name.to_string();
        let mut attempts = 0usize;
        while !naming.find_entities_by_short_name(&candidate).is_empty() {
            if attempts >= self.config.max_collision_attempts {
                return Err(InstantiationError::CollisionLimitExceeded {
                    short_name: short_name.to_string(),
                    attempts,
                });
            }
            candidate.push_str(COLLISION_SUFFIX);
            attempts += 1;
            debug!(property = short_name, candidate = %candidate, attempts, "property name taken");
        }
        Ok(candidate)
    }

    fn rename_axioms(&self, map: &RenameMap) -> BTreeSet<Axiom> {
        self.fragment.axioms().iter().map(|ax| ax.renamed(map)).collect()
    }

    fn module_annotations(&self, axioms: &BTreeSet<Axiom>) -> BTreeSet<Axiom> {
        let mut out = BTreeSet::new();
        out.insert(Axiom::class_assertion(
            vocab::OPLA_PATTERN,
            Individual::Named(self.pattern_iri.clone()),
        ));
        out.insert(Axiom::annotation(
            vocab::RDFS_LABEL,
            self.pattern_iri.clone(),
            AnnotationValue::Literal(Literal::plain(self.pattern_label.clone())),
        ));
        out.insert(Axiom::class_assertion(
            vocab::OPLA_MODULE,
            Individual::Named(self.module_iri.clone()),
        ));
        out.insert(Axiom::annotation(
            vocab::OPLA_REUSES_PATTERN_AS_TEMPLATE,
            self.module_iri.clone(),
            AnnotationValue::Iri(self.pattern_iri.clone()),
        ));

        let mut signature = BTreeSet::new();
        for ax in axioms {
            ax.collect_signature(&mut signature);
        }
        let native: BTreeSet<&Iri> = signature.iter().filter(|e| is_native(e)).map(|e| &e.iri).collect();
        for iri in native {
            out.insert(Axiom::annotation(
                vocab::OPLA_IS_NATIVE_TO,
                iri.clone(),
                AnnotationValue::Iri(self.module_iri.clone()),
            ));
        }
        out
    }

    /// The fragment's axioms as they will appear in the target.
    pub fn compute_instantiation_axioms(&self) -> Result<BTreeSet<Axiom>, InstantiationError> {
        let map = self.rename_map()?;
        Ok(self.rename_axioms(&map))
    }

    /// Provenance axioms for the new module. Always a fresh set.
    pub fn compute_module_annotation_axioms(&self) -> Result<BTreeSet<Axiom>, InstantiationError> {
        let axioms = self.compute_instantiation_axioms()?;
        Ok(self.module_annotations(&axioms))
    }

    /// Both sets from a single rename plan.
    pub fn instantiate(&self) -> Result<Instantiation, InstantiationError> {
        let rename_map = self.rename_map()?;
        let instantiation_axioms = self.rename_axioms(&rename_map);
        let module_annotation_axioms = self.module_annotations(&instantiation_axioms);
        Ok(Instantiation {
            module_iri: self.module_iri.clone(),
            pattern_iri: self.pattern_iri.clone(),
            rename_map,
            instantiation_axioms,
            module_annotation_axioms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::OntologyNamingContext;
    use odpkit_owl::{AnnotationSubject, ClassExpression, Filler};

    const P: &str = "http://ontologydesignpatterns.org/modl/parthood#";

    fn parthood() -> Ontology {
        let has_part = Entity::object_property(format!("{P}hasPart"));
        let mut onto = Ontology::with_iri("http://ontologydesignpatterns.org/modl/parthood");
        onto.extend([
            Axiom::declaration(Entity::class(format!("{P}Whole"))),
            Axiom::declaration(Entity::class(format!("{P}Part"))),
            Axiom::declaration(has_part.clone()),
            Axiom::declaration(Entity::annotation_property(vocab::OPLA_IS_NATIVE_TO)),
            Axiom::subclass_of(
                ClassExpression::class(format!("{P}Whole")),
                ClassExpression::some(has_part, Filler::class(format!("{P}Part"))),
            ),
            Axiom::annotation(
                vocab::RDFS_LABEL,
                format!("{P}Part"),
                AnnotationValue::Literal(Literal::plain("Part")),
            ),
        ]);
        onto
    }

    fn target_with(names: &[&str]) -> Ontology {
        let mut onto = Ontology::with_iri("http://ex.org/onto");
        for n in names {
            onto.add_axiom(Axiom::declaration(Entity::object_property(format!("http://ex.org/onto#{n}"))));
        }
        onto
    }

    fn instantiate(target: &Ontology, config: InstantiationConfig) -> Result<Instantiation, InstantiationError> {
        let fragment = parthood();
        let naming = OntologyNamingContext::with_default_separator(target);
        let ctx = TargetContext::for_ontology(target, &naming);
        PatternInstantiator::new(&fragment, "Parthood Pattern", &ctx, &config).instantiate()
    }

    fn renamed(inst: &Instantiation, local: &str) -> String {
        inst.rename_map
            .apply(&Iri::from(format!("{P}{local}")))
            .into_string()
    }

    #[test]
    fn module_iri_replaces_spaces() {
        assert_eq!(
            module_iri_for(&Iri::from("http://ex.org/onto"), "Parthood Pattern").as_str(),
            "http://ex.org/onto#Parthood_Pattern_Module"
        );
    }

    #[test]
    fn renames_into_target_without_suffix_when_free() {
        let inst = instantiate(&target_with(&[]), InstantiationConfig::default()).expect("instantiate");
        assert_eq!(inst.module_iri.as_str(), "http://ex.org/onto#Parthood_Pattern_Module");
        assert_eq!(inst.pattern_iri.as_str(), "http://ontologydesignpatterns.org/modl/parthood");
        assert_eq!(renamed(&inst, "hasPart"), "http://ex.org/onto#hasPart");
        assert_eq!(renamed(&inst, "Whole"), "http://ex.org/onto#Whole");
        // OPLA vocabulary stays where it is.
        assert!(!inst.rename_map.contains(&Iri::from(vocab::OPLA_IS_NATIVE_TO)));
        assert_eq!(inst.instantiation_axioms.len(), parthood().len());
    }

    #[test]
    fn colliding_properties_get_suffixes() {
        let inst = instantiate(&target_with(&["hasPart"]), InstantiationConfig::default()).expect("one");
        assert_eq!(renamed(&inst, "hasPart"), "http://ex.org/onto#hasPart-1");

        let inst = instantiate(&target_with(&["hasPart", "hasPart-1"]), InstantiationConfig::default())
            .expect("two");
        assert_eq!(renamed(&inst, "hasPart"), "http://ex.org/onto#hasPart-1-1");

        // Classes are merged, not suffixed.
        let mut target = target_with(&[]);
        target.add_axiom(Axiom::declaration(Entity::class("http://ex.org/onto#Whole")));
        let inst = instantiate(&target, InstantiationConfig::default()).expect("class");
        assert_eq!(renamed(&inst, "Whole"), "http://ex.org/onto#Whole");
    }

    #[test]
    fn collision_cap_is_an_error() {
        let config = InstantiationConfig {
            max_collision_attempts: 2,
            ..InstantiationConfig::default()
        };
        let err = instantiate(&target_with(&["hasPart", "hasPart-1", "hasPart-1-1"]), config)
            .expect_err("cap");
        assert_eq!(
            err,
            InstantiationError::CollisionLimitExceeded {
                short_name: "hasPart".to_string(),
                attempts: 2,
            }
        );
    }

    #[test]
    fn one_is_native_to_per_entity() {
        let inst = instantiate(&target_with(&[]), InstantiationConfig::default()).expect("instantiate");
        let native: Vec<&AnnotationSubject> = inst
            .module_annotation_axioms
            .iter()
            .filter_map(|ax| match ax {
                Axiom::AnnotationAssertion { property, subject, .. }
                    if property.as_str() == vocab::OPLA_IS_NATIVE_TO =>
                {
                    Some(subject)
                }
                _ => None,
            })
            .collect();
        let expected: Vec<AnnotationSubject> = ["Part", "Whole", "hasPart"]
            .iter()
            .map(|n| AnnotationSubject::Iri(Iri::from(format!("http://ex.org/onto#{n}"))))
            .collect();
        assert_eq!(native, expected.iter().collect::<Vec<_>>());

        let module = Individual::Named(inst.module_iri.clone());
        assert!(inst
            .module_annotation_axioms
            .contains(&Axiom::class_assertion(vocab::OPLA_MODULE, module)));
        assert!(inst.module_annotation_axioms.contains(&Axiom::annotation(
            vocab::OPLA_REUSES_PATTERN_AS_TEMPLATE,
            inst.module_iri.clone(),
            AnnotationValue::Iri(inst.pattern_iri.clone()),
        )));
    }

    #[test]
    fn disabled_namespace_keeps_fragment_iris() {
        let config = InstantiationConfig {
            use_target_namespace: false,
            ..InstantiationConfig::default()
        };
        let inst = instantiate(&target_with(&["hasPart"]), config).expect("instantiate");
        assert!(inst.rename_map.is_empty());
        let fragment: BTreeSet<Axiom> = parthood().axioms().iter().cloned().collect();
        assert_eq!(inst.instantiation_axioms, fragment);
        assert!(inst.module_annotation_axioms.contains(&Axiom::annotation(
            vocab::OPLA_IS_NATIVE_TO,
            format!("{P}hasPart"),
            AnnotationValue::Iri(inst.module_iri.clone()),
        )));
    }

    #[test]
    fn punned_iri_takes_the_property_name() {
        let mut fragment = parthood();
        fragment.add_axiom(Axiom::declaration(Entity::class(format!("{P}hasPart"))));
        let target = target_with(&["hasPart"]);
        let naming = OntologyNamingContext::with_default_separator(&target);
        let ctx = TargetContext::for_ontology(&target, &naming);
        let inst = PatternInstantiator::new(&fragment, "Parthood", &ctx, &InstantiationConfig::default())
            .instantiate()
            .expect("instantiate");
        assert_eq!(renamed(&inst, "hasPart"), "http://ex.org/onto#hasPart-1");
        assert!(inst
            .instantiation_axioms
            .contains(&Axiom::declaration(Entity::class("http://ex.org/onto#hasPart-1"))));
    }

    #[test]
    fn fragment_header_is_neither_renamed_nor_copied() {
        let fragment = odpkit_ingest_rdfowl::ontology_from_turtle(
            r#"
@prefix : <http://ontologydesignpatterns.org/modl/parthood#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
<http://ontologydesignpatterns.org/modl/parthood> a owl:Ontology ;
    owl:imports <http://ontologydesignpatterns.org/opla> ;
    owl:versionIRI <http://ontologydesignpatterns.org/modl/parthood/1.0> ;
    rdfs:label "Parthood" .
owl:versionIRI a owl:AnnotationProperty .
:Whole a owl:Class .
:hasPart a owl:ObjectProperty .
"#,
        )
        .expect("fragment");
        assert_eq!(fragment.imports().len(), 1);

        let target = target_with(&[]);
        let naming = OntologyNamingContext::with_default_separator(&target);
        let ctx = TargetContext::for_ontology(&target, &naming);
        let inst = PatternInstantiator::new(&fragment, "Parthood Pattern", &ctx, &InstantiationConfig::default())
            .instantiate()
            .expect("instantiate");

        for reserved in [vocab::OWL_IMPORTS, vocab::OWL_VERSION_IRI] {
            assert!(!inst.rename_map.contains(&Iri::from(reserved)), "{reserved} renamed");
        }
        assert!(inst
            .rename_map
            .iter()
            .all(|(_, to)| !to.as_str().ends_with("#imports") && !to.as_str().ends_with("#versionIRI")));
        assert_eq!(renamed(&inst, "hasPart"), "http://ex.org/onto#hasPart");

        let fragment_iri = AnnotationSubject::Iri(Iri::from("http://ontologydesignpatterns.org/modl/parthood"));
        assert!(!inst.instantiation_axioms.iter().any(|ax| matches!(
            ax,
            Axiom::AnnotationAssertion { subject, .. } if subject == &fragment_iri
        )));
        assert_eq!(
            inst.module_annotation_axioms
                .iter()
                .filter(|ax| matches!(
                    ax,
                    Axiom::AnnotationAssertion { property, .. } if property.as_str() == vocab::OPLA_IS_NATIVE_TO
                ))
                .count(),
            2
        );
    }

    #[test]
    fn apply_merges_both_sets() {
        let mut target = target_with(&[]);
        let before = target.len();
        let inst = instantiate(&target, InstantiationConfig::default()).expect("instantiate");
        let added = inst.apply_to(&mut target);
        assert_eq!(added, inst.axiom_count());
        assert_eq!(target.len(), before + added);
        assert_eq!(inst.apply_to(&mut target), 0);
    }

    #[test]
    fn fragment_without_iri_gets_a_generated_pattern_iri() {
        let fragment = Ontology::from_axioms(None, parthood().axioms().to_vec());
        let target = target_with(&[]);
        let naming = OntologyNamingContext::with_default_separator(&target);
        let ctx = TargetContext::for_ontology(&target, &naming);
        let a = PatternInstantiator::new(&fragment, "Parthood", &ctx, &InstantiationConfig::default());
        let b = PatternInstantiator::new(&fragment, "Parthood", &ctx, &InstantiationConfig::default());
        assert!(a.pattern_iri().as_str().starts_with("urn:odpkit:document:"));
        assert_eq!(a.pattern_iri(), b.pattern_iri());
    }

    #[test]
    fn split_computations_agree_with_instantiate() {
        let target = target_with(&["hasPart"]);
        let fragment = parthood();
        let naming = OntologyNamingContext::with_default_separator(&target);
        let ctx = TargetContext::for_ontology(&target, &naming);
        let inst = PatternInstantiator::new(&fragment, "Parthood Pattern", &ctx, &InstantiationConfig::default());
        let whole = inst.instantiate().expect("instantiate");
        assert_eq!(inst.compute_instantiation_axioms().expect("axioms"), whole.instantiation_axioms);
        assert_eq!(
            inst.compute_module_annotation_axioms().expect("annotations"),
            whole.module_annotation_axioms
        );
    }
}
