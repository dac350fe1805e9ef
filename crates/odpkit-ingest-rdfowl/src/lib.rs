//! RDF/OWL loading for odpkit (boundary adapter).
//!
//! This crate sits between serialized ontologies and the `odpkit-owl` model:
//!
//! - It parses RDF inputs with **Sophia**:
//!   - N-Triples (`.nt`)
//!   - Turtle (`.ttl`)
//!   - N-Quads (`.nq`, graph names are ignored)
//!   - TriG (`.trig`, graph names are ignored)
//!   - RDF/XML (`.rdf`, `.owl`, `.xml`)
//! - It maps triples onto OWL axioms ([`owl`]), following the OWL 2 RDF
//!   mapping for the subset the model supports.
//! - It writes ontologies back out as N-Triples ([`ntriples`]).
//!
//! Triples that do not map onto the supported subset are skipped (and logged
//! at debug level); loading never fails because of them.

pub mod ntriples;
pub mod owl;

use anyhow::{anyhow, Context, Result};
use odpkit_owl::{vocab, Ontology};
use sophia::api::prelude::*;
use std::path::Path;

pub use ntriples::write_ntriples;

// ============================================================================
// RDF term model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum RdfNode {
    Iri(String),
    BlankNode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct RdfLiteral {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

impl RdfObject {
    pub(crate) fn as_node(&self) -> Option<&RdfNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Literal(_) => None,
        }
    }

    pub(crate) fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Node(RdfNode::Iri(iri)) => Some(iri),
            _ => None,
        }
    }

    pub(crate) fn as_literal(&self) -> Option<&RdfLiteral> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Node(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RdfStatement {
    pub subject: RdfNode,
    pub predicate_iri: String,
    pub object: RdfObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    /// Guess a format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" => Some(Self::NTriples),
            "ttl" | "turtle" => Some(Self::Turtle),
            "nq" | "nquads" => Some(Self::NQuads),
            "trig" => Some(Self::TriG),
            "rdf" | "owl" | "xml" => Some(Self::RdfXml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| anyhow!("unsupported RDF format: .{ext}"))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NTriples => "ntriples",
            Self::Turtle => "turtle",
            Self::NQuads => "nquads",
            Self::TriG => "trig",
            Self::RdfXml => "rdfxml",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct RdfSinkError {
    message: String,
}

impl From<anyhow::Error> for RdfSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

// ============================================================================
// Term parsing (Sophia display form)
// ============================================================================

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_term_display(term: &str) -> Result<RdfObject> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfObject::Node(RdfNode::Iri(rest.to_string())));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(RdfObject::Node(RdfNode::BlankNode(rest.to_string())));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut escaped = false;
        for (i, ch) in s.char_indices().skip(1) {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '"' => {
                    end_quote = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(end) = end_quote else {
            return Err(anyhow!("invalid literal term (missing closing quote): {s}"));
        };

        let lexical = unescape_rdf_string(&s[1..end]);
        let rest = s[end + 1..].trim();

        let mut language = None;
        let mut datatype = None;
        if let Some(lang) = rest.strip_prefix('@') {
            language = Some(lang.to_string());
        } else if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            let dt = dt
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .unwrap_or(dt);
            // Simple literals are xsd:string in RDF 1.1; keep them plain.
            if !dt.is_empty() && dt != vocab::XSD_STRING {
                datatype = Some(dt.to_string());
            }
        }

        return Ok(RdfObject::Literal(RdfLiteral {
            lexical,
            datatype,
            language,
        }));
    }

    Err(anyhow!("unsupported RDF term form: {s}"))
}

fn parse_node_term_display(term: &str) -> Result<RdfNode> {
    match parse_term_display(term)? {
        RdfObject::Node(node) => Ok(node),
        RdfObject::Literal(_) => Err(anyhow!("expected IRI/blank node, got literal: {term}")),
    }
}

/// Build one statement from the display forms of its terms.
///
/// Statements with a non-IRI predicate (generalized RDF) are dropped.
fn statement_from_display(s: &str, p: &str, o: &str) -> Result<Option<RdfStatement>> {
    let subject = parse_node_term_display(s)?;
    let RdfNode::Iri(predicate_iri) = parse_node_term_display(p)? else {
        return Ok(None);
    };
    let object = parse_term_display(o)?;
    Ok(Some(RdfStatement {
        subject,
        predicate_iri,
        object,
    }))
}

pub(crate) fn parse_rdf_statements(bytes: &[u8], format: RdfFormat) -> Result<Vec<RdfStatement>> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
    let mut out: Vec<RdfStatement> = Vec::new();

    let mut on_triple = |s: String, p: String, o: String| -> std::result::Result<(), RdfSinkError> {
        if let Some(stmt) = statement_from_display(&s, &p, &o)? {
            out.push(stmt);
        }
        Ok(())
    };

    match format {
        RdfFormat::NTriples => sophia::turtle::parser::nt::parse_bufread(reader)
            .try_for_each_triple(|t| {
                on_triple(t.s().to_string(), t.p().to_string(), t.o().to_string())
            })
            .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?,
        RdfFormat::Turtle => sophia::turtle::parser::turtle::parse_bufread(reader)
            .try_for_each_triple(|t| {
                on_triple(t.s().to_string(), t.p().to_string(), t.o().to_string())
            })
            .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?,
        RdfFormat::NQuads => sophia::turtle::parser::nq::parse_bufread(reader)
            .try_for_each_quad(|q| {
                on_triple(q.s().to_string(), q.p().to_string(), q.o().to_string())
            })
            .map_err(|e| anyhow!("failed to parse N-Quads: {e}"))?,
        RdfFormat::TriG => sophia::turtle::parser::trig::parse_bufread(reader)
            .try_for_each_quad(|q| {
                on_triple(q.s().to_string(), q.p().to_string(), q.o().to_string())
            })
            .map_err(|e| anyhow!("failed to parse TriG: {e}"))?,
        RdfFormat::RdfXml => sophia::xml::parser::parse_bufread(reader)
            .try_for_each_triple(|t| {
                on_triple(t.s().to_string(), t.p().to_string(), t.o().to_string())
            })
            .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?,
    }

    Ok(out)
}

// ============================================================================
// Public entry points
// ============================================================================

/// Parse an RDF document and map it onto the ontology model.
pub fn ontology_from_rdf(bytes: &[u8], format: RdfFormat) -> Result<Ontology> {
    let statements = parse_rdf_statements(bytes, format)?;
    Ok(owl::ontology_from_statements(&statements))
}

pub fn ontology_from_turtle(text: &str) -> Result<Ontology> {
    ontology_from_rdf(text.as_bytes(), RdfFormat::Turtle)
}

/// Load an ontology file, picking the parser from its extension.
pub fn load_ontology_file(path: &Path) -> Result<Ontology> {
    let format = RdfFormat::from_path(path)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    ontology_from_rdf(&bytes, format).with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(RdfFormat::from_extension("TTL"), Some(RdfFormat::Turtle));
        assert_eq!(RdfFormat::from_extension("owl"), Some(RdfFormat::RdfXml));
        assert_eq!(RdfFormat::from_extension("nq"), Some(RdfFormat::NQuads));
        assert_eq!(RdfFormat::from_extension("json"), None);
        assert!(RdfFormat::from_path(Path::new("pattern.docx")).is_err());
    }

    #[test]
    fn parses_literal_display_forms() {
        let lit = parse_term_display(r#""Part \"of\" whole"@en"#).expect("literal");
        assert_eq!(
            lit,
            RdfObject::Literal(RdfLiteral {
                lexical: "Part \"of\" whole".to_string(),
                datatype: None,
                language: Some("en".to_string()),
            })
        );

        let plain = parse_term_display(
            "\"x\"^^<http://www.w3.org/2001/XMLSchema#string>",
        )
        .expect("typed literal");
        assert_eq!(
            plain,
            RdfObject::Literal(RdfLiteral {
                lexical: "x".to_string(),
                datatype: None,
                language: None,
            })
        );

        assert!(parse_term_display("\"unterminated").is_err());
        assert!(parse_node_term_display("\"lit\"").is_err());
    }

    #[test]
    fn parses_turtle_statements() {
        let turtle = r#"
@prefix ex: <http://example.org/> .
ex:a ex:knows ex:b .
ex:a ex:label "Alice"@en .
"#;
        let stmts = parse_rdf_statements(turtle.as_bytes(), RdfFormat::Turtle).expect("turtle");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].predicate_iri, "http://example.org/knows");
        assert_eq!(
            stmts[0].object.as_iri(),
            Some("http://example.org/b")
        );
    }
}
