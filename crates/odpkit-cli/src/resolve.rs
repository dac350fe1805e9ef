//! Turning the `--pattern` argument into a fragment ontology and a label.

use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::info;

use odpkit_ingest_rdfowl::load_ontology_file;
use odpkit_owl::{Iri, Ontology};
use odpkit_patterns::{OdpkitConfig, PatternDocumentMapper, PatternLibrary};

pub struct ResolvedPattern {
    pub ontology: Ontology,
    pub label: String,
}

/// `pattern` is a file path when such a file exists, otherwise the IRI of a
/// catalogued pattern.
pub fn pattern_fragment(
    config: &OdpkitConfig,
    lib: &PatternLibrary,
    pattern: &str,
    label: Option<&str>,
) -> Result<ResolvedPattern> {
    let path = Path::new(pattern);
    if path.is_file() {
        let ontology = load_ontology_file(path)?;
        let label = match label {
            Some(l) => l.to_string(),
            None => default_label(lib, &ontology, path),
        };
        return Ok(ResolvedPattern { ontology, label });
    }

    let iri = Iri::from(pattern);
    let entry = lib
        .find_pattern(&iri)
        .ok_or_else(|| anyhow!("{pattern} is neither a file nor a catalogued pattern"))?;

    let mut documents = PatternDocumentMapper::bundled()?;
    if let Some(dir) = &config.pattern_dir {
        let added = documents.scan_into(dir)?;
        info!(dir = %dir.display(), added, "scanned pattern directory");
    }
    let ontology = lib.load_fragment(&entry, &documents)?;
    Ok(ResolvedPattern {
        ontology,
        label: label.map(str::to_string).unwrap_or_else(|| entry.label().to_string()),
    })
}

/// Catalog label, then the document's own `rdfs:label`, then the file stem.
fn default_label(lib: &PatternLibrary, ontology: &Ontology, path: &Path) -> String {
    if let Some(iri) = ontology.iri() {
        if let Some(entry) = lib.find_pattern(iri) {
            return entry.label().to_string();
        }
        if let Some(label) = ontology.label() {
            return label.to_string();
        }
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Pattern".to_string())
}
