//! Pattern documents: resolving a pattern IRI to the ontology that defines it.
//!
//! A document is addressed by its ontology IRI, so a directory of pattern
//! files can be scanned once and then queried by the IRIs the catalog hands
//! out.

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use odpkit_ingest_rdfowl::{load_ontology_file, ontology_from_rdf, RdfFormat};
use odpkit_owl::{Iri, Ontology};

/// Pattern fragments shipped with the crate, keyed by file name.
const BUNDLED_DOCUMENTS: &[(&str, &str)] = &[
    ("parthood.ttl", include_str!("../resources/modl/parthood.ttl")),
    ("agent_role.ttl", include_str!("../resources/modl/agent_role.ttl")),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternDocument {
    File(PathBuf),
    Bundled { name: &'static str, text: &'static str },
}

impl PatternDocument {
    pub fn load(&self) -> Result<Ontology> {
        match self {
            PatternDocument::File(path) => load_ontology_file(path),
            PatternDocument::Bundled { name, text } => ontology_from_rdf(text.as_bytes(), RdfFormat::Turtle)
                .with_context(|| format!("failed to parse bundled pattern {name}")),
        }
    }
}

/// Ontology IRI → document, first registration wins.
#[derive(Debug, Clone, Default)]
pub struct PatternDocumentMapper {
    documents: BTreeMap<Iri, PatternDocument>,
}

impl PatternDocumentMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapper over the fragments bundled with the crate.
    pub fn bundled() -> Result<Self> {
        let mut mapper = Self::new();
        for &(name, text) in BUNDLED_DOCUMENTS {
            let doc = PatternDocument::Bundled { name, text };
            let onto = doc.load()?;
            let iri = onto
                .iri()
                .cloned()
                .ok_or_else(|| anyhow!("bundled pattern {name} has no ontology IRI"))?;
            mapper.insert(iri, doc);
        }
        Ok(mapper)
    }

    /// Walk `dir` and register every RDF document that declares an ontology
    /// IRI. Unreadable or unparseable files are skipped.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut mapper = Self::new();
        mapper.scan_into(dir)?;
        Ok(mapper)
    }

    pub fn scan_into(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(anyhow!("pattern directory {} does not exist", dir.display()));
        }

        let mut added = 0usize;
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || RdfFormat::from_path(entry.path()).is_err() {
                continue;
            }

            let path = entry.path();
            let onto = match load_ontology_file(path) {
                Ok(onto) => onto,
                Err(err) => {
                    warn!(path = %path.display(), error = %format!("{err:#}"), "skipping unparseable pattern document");
                    continue;
                }
            };
            let Some(iri) = onto.iri().cloned() else {
                debug!(path = %path.display(), "document has no ontology IRI");
                continue;
            };
            if self.insert(iri, PatternDocument::File(path.to_path_buf())) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Register `doc` under `iri`; returns `false` if the IRI was taken.
    pub fn insert(&mut self, iri: Iri, doc: PatternDocument) -> bool {
        if let Some(existing) = self.documents.get(&iri) {
            warn!(iri = %iri, kept = ?existing, ignored = ?doc, "duplicate pattern document");
            return false;
        }
        self.documents.insert(iri, doc);
        true
    }

    pub fn get(&self, iri: &Iri) -> Option<&PatternDocument> {
        self.documents.get(iri)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iris(&self) -> impl Iterator<Item = &Iri> {
        self.documents.keys()
    }

    pub fn load(&self, iri: &Iri) -> Result<Ontology> {
        let doc = self
            .get(iri)
            .ok_or_else(|| anyhow!("no document found for pattern {iri}"))?;
        doc.load()
            .with_context(|| format!("failed to load pattern {iri}"))
    }
}
