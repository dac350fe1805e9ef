//! The pattern catalog: which patterns exist, and how they are grouped.
//!
//! [`PatternLibrary`] owns an immutable [`PatternIndex`] snapshot behind an
//! `Arc`. The first read builds it; [`PatternLibrary::rebuild`] replaces it
//! wholesale. Readers never observe a partially built index, and a catalog
//! that fails to load degrades to an index holding only [`Category::any`].

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use odpkit_ingest_rdfowl::{ontology_from_rdf, RdfFormat};
use odpkit_owl::{vocab, Individual, Iri, Ontology};

use crate::documents::PatternDocumentMapper;
use crate::entities::{Category, Pattern};

const BUNDLED_CATALOG: &str = include_str!("../resources/modl/modl_index.ttl");

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The MODL index shipped with this crate.
    Bundled,
    File(PathBuf),
    Inline { text: String, format: RdfFormat },
    /// No catalog at all; the index will hold only the `Any` category.
    Missing,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("no pattern catalog is available")]
    Missing,
}

// ============================================================================
// Index
// ============================================================================

/// One immutable view of the catalog.
#[derive(Debug)]
pub struct PatternIndex {
    /// `Any` first, then first-discovery order.
    categories: Vec<Category>,
    patterns: HashMap<Category, Vec<Pattern>>,
    load_error: Option<CatalogError>,
}

impl PatternIndex {
    fn empty() -> Self {
        let any = Category::any();
        let mut patterns = HashMap::new();
        patterns.insert(any.clone(), Vec::new());
        Self {
            categories: vec![any],
            patterns,
            load_error: None,
        }
    }

    fn failed(err: CatalogError) -> Self {
        Self {
            load_error: Some(err),
            ..Self::empty()
        }
    }

    /// Index every named `opla:Pattern` individual of `catalog`.
    pub fn from_catalog(catalog: &Ontology) -> Self {
        let mut index = Self::empty();
        let pattern_class = Iri::from(vocab::OPLA_PATTERN);
        let categorization = Iri::from(vocab::OPLA_CATEGORIZATION);

        for individual in catalog.individuals_of(&pattern_class) {
            let Individual::Named(iri) = individual else {
                continue;
            };
            let pattern = Pattern::new(display_label(catalog, iri), iri.clone());

            index.insert(Category::any(), pattern.clone());
            for value in catalog.object_property_values(individual, &categorization) {
                if let Individual::Named(category_iri) = value {
                    let category = Category::new(display_label(catalog, category_iri), category_iri.clone());
                    index.insert(category, pattern.clone());
                }
            }
        }
        index
    }

    fn insert(&mut self, category: Category, pattern: Pattern) {
        if !self.patterns.contains_key(&category) {
            self.categories.push(category.clone());
        }
        let list = self.patterns.entry(category).or_default();
        if !list.contains(&pattern) {
            list.push(pattern);
        }
    }

    /// Categories in display order, starting with `Any`.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn patterns_for(&self, category: &Category) -> &[Pattern] {
        self.patterns.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns_for(&Category::any()).len()
    }

    /// The error that left this index empty, if any.
    pub fn load_error(&self) -> Option<&CatalogError> {
        self.load_error.as_ref()
    }

    pub fn find_pattern(&self, iri: &Iri) -> Option<&Pattern> {
        self.patterns_for(&Category::any())
            .iter()
            .find(|p| p.iri() == iri)
    }

    /// Match a category by label (case-insensitive) or by IRI.
    pub fn find_category(&self, needle: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.label() == needle || c.iri().as_str() == needle)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.label().eq_ignore_ascii_case(needle))
            })
    }
}

/// First `rdfs:label` literal, else the IRI itself.
fn display_label(catalog: &Ontology, iri: &Iri) -> String {
    catalog
        .labels_for(iri)
        .first()
        .map(|s| s.to_string())
        .unwrap_or_else(|| iri.to_string())
}

// ============================================================================
// Library service
// ============================================================================

/// Lazily built, atomically rebuilt catalog index.
pub struct PatternLibrary {
    source: CatalogSource,
    snapshot: RwLock<Option<Arc<PatternIndex>>>,
    rebuild_lock: Mutex<()>,
}

impl PatternLibrary {
    /// Creates the service; nothing is loaded until first use.
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn bundled() -> Self {
        Self::new(CatalogSource::Bundled)
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// The current index, built on first call.
    pub fn snapshot(&self) -> Arc<PatternIndex> {
        if let Some(index) = self.snapshot.read().as_ref() {
            return Arc::clone(index);
        }

        let _guard = self.rebuild_lock.lock();
        // Another caller may have finished the first build while we waited.
        if let Some(index) = self.snapshot.read().as_ref() {
            return Arc::clone(index);
        }
        self.build_and_publish()
    }

    /// Reload the catalog and publish a fresh index.
    ///
    /// Readers keep seeing the previous snapshot until the new one is
    /// swapped in. Concurrent rebuilds are serialized.
    pub fn rebuild(&self) -> Arc<PatternIndex> {
        let _guard = self.rebuild_lock.lock();
        self.build_and_publish()
    }

    /// Caller must hold `rebuild_lock`.
    fn build_and_publish(&self) -> Arc<PatternIndex> {
        let index = match self.load_catalog() {
            Ok(catalog) => PatternIndex::from_catalog(&catalog),
            Err(err) => {
                error!(source = ?self.source, error = %err, "failed to load pattern catalog");
                PatternIndex::failed(err)
            }
        };
        info!(
            categories = index.categories().len(),
            patterns = index.pattern_count(),
            failed = index.load_error().is_some(),
            "pattern catalog indexed"
        );

        let index = Arc::new(index);
        *self.snapshot.write() = Some(Arc::clone(&index));
        index
    }

    fn load_catalog(&self) -> Result<Ontology, CatalogError> {
        match &self.source {
            CatalogSource::Bundled => parse_catalog(BUNDLED_CATALOG.as_bytes(), RdfFormat::Turtle),
            CatalogSource::File(path) => {
                let format = RdfFormat::from_path(path).map_err(|e| CatalogError::Parse(format!("{e:#}")))?;
                let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?;
                parse_catalog(&bytes, format)
            }
            CatalogSource::Inline { text, format } => parse_catalog(text.as_bytes(), *format),
            CatalogSource::Missing => Err(CatalogError::Missing),
        }
    }

    /// Every non-empty category, `Any` first.
    pub fn list_categories(&self) -> Vec<Category> {
        self.snapshot().categories().to_vec()
    }

    /// Patterns in `category`, or nothing for an unknown category.
    pub fn patterns_for(&self, category: &Category) -> Vec<Pattern> {
        self.snapshot().patterns_for(category).to_vec()
    }

    pub fn find_pattern(&self, iri: &Iri) -> Option<Pattern> {
        self.snapshot().find_pattern(iri).cloned()
    }

    pub fn find_category_by_label(&self, label: &str) -> Option<Category> {
        self.snapshot().find_category(label).cloned()
    }

    /// Load the ontology fragment behind `pattern`.
    pub fn load_fragment(&self, pattern: &Pattern, documents: &PatternDocumentMapper) -> anyhow::Result<Ontology> {
        documents.load(pattern.iri())
    }
}

impl std::fmt::Debug for PatternLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternLibrary")
            .field("source", &self.source)
            .field("loaded", &self.snapshot.read().is_some())
            .finish()
    }
}

fn parse_catalog(bytes: &[u8], format: RdfFormat) -> Result<Ontology, CatalogError> {
    ontology_from_rdf(bytes, format).map_err(|e| CatalogError::Parse(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
@prefix : <http://ex.org/catalog#> .
@prefix opla: <http://ontologydesignpatterns.org/opla#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

:parthood a opla:Pattern ; rdfs:label "Parthood" , "Part-Whole" ;
    opla:categorization :Mereology .
:agentrole a opla:Pattern ;
    opla:categorization :Agency , :Mereology .
:Mereology rdfs:label "Mereology" .
:notapattern rdfs:label "Not a pattern" ; opla:categorization :Agency .
"#;

    fn inline(text: &str) -> PatternLibrary {
        PatternLibrary::new(CatalogSource::Inline {
            text: text.to_string(),
            format: RdfFormat::Turtle,
        })
    }

    #[test]
    fn missing_catalog_degrades_to_any() {
        let lib = PatternLibrary::new(CatalogSource::Missing);
        assert_eq!(lib.list_categories(), vec![Category::any()]);
        assert!(lib.patterns_for(&Category::any()).is_empty());
        assert!(matches!(lib.snapshot().load_error(), Some(CatalogError::Missing)));
    }

    #[test]
    fn empty_and_malformed_catalogs_degrade_to_any() {
        let empty = inline("");
        assert_eq!(empty.list_categories(), vec![Category::any()]);
        assert!(empty.snapshot().load_error().is_none());

        let broken = inline("@prefix : <http://ex.org/> . :a :b");
        assert_eq!(broken.list_categories(), vec![Category::any()]);
        assert!(matches!(broken.snapshot().load_error(), Some(CatalogError::Parse(_))));

        let dir = tempfile::tempdir().expect("tempdir");
        let unreadable = PatternLibrary::new(CatalogSource::File(dir.path().join("gone.ttl")));
        assert!(matches!(unreadable.snapshot().load_error(), Some(CatalogError::Io { .. })));
    }

    #[test]
    fn indexes_patterns_by_category() {
        let lib = inline(CATALOG);
        let categories = lib.list_categories();
        let labels: Vec<&str> = categories.iter().map(Category::label).collect();
        assert_eq!(labels, vec!["Any", "Mereology", "http://ex.org/catalog#Agency"]);

        let all = lib.patterns_for(&Category::any());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].label(), "Parthood");
        assert_eq!(all[1].label(), "http://ex.org/catalog#agentrole");

        let mereology = lib.find_category_by_label("mereology").expect("category");
        assert_eq!(lib.patterns_for(&mereology).len(), 2);
        let agency = lib
            .find_category_by_label("http://ex.org/catalog#Agency")
            .expect("by iri");
        assert_eq!(lib.patterns_for(&agency).len(), 1);

        assert!(lib.patterns_for(&Category::new("?", "http://ex.org/unknown")).is_empty());
        assert!(lib
            .find_pattern(&Iri::from("http://ex.org/catalog#notapattern"))
            .is_none());
    }

    #[test]
    fn bundled_catalog_loads() {
        let lib = PatternLibrary::bundled();
        let index = lib.snapshot();
        assert!(index.load_error().is_none());
        assert!(index.pattern_count() >= 2);
        assert!(index
            .find_pattern(&Iri::from("http://ontologydesignpatterns.org/modl/parthood"))
            .is_some());
    }

    #[test]
    fn rebuild_replaces_the_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.ttl");
        std::fs::write(&path, CATALOG).expect("write");

        let lib = PatternLibrary::new(CatalogSource::File(path.clone()));
        let before = lib.snapshot();
        assert_eq!(before.pattern_count(), 2);
        assert!(Arc::ptr_eq(&before, &lib.snapshot()));

        std::fs::remove_file(&path).expect("remove");
        let after = lib.rebuild();
        assert_eq!(after.pattern_count(), 0);
        assert!(after.load_error().is_some());
        // The old snapshot is untouched.
        assert_eq!(before.pattern_count(), 2);
    }
}
