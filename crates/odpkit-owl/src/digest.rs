//! Stable, non-cryptographic identifiers.
//!
//! Used wherever the model needs a deterministic fallback identifier (an
//! ontology without an ontology IRI still has to be addressable when it is
//! referenced from provenance axioms).
//!
//! - algorithm: **FNV-1a 64-bit**
//! - output: `urn:odpkit:document:<16 lowercase hex digits>`
//!
//! This digest is **not** a security primitive.

use crate::iri::Iri;

/// Prefix for generated document IRIs (see [`generate_document_iri`]).
pub const DOCUMENT_IRI_PREFIX: &str = "urn:odpkit:document:";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// A deterministic document IRI for an ontology that has no ontology IRI.
///
/// `seed` should be something that identifies the document to the caller
/// (a path, a pattern label); equal seeds give equal IRIs.
pub fn generate_document_iri(seed: &str) -> Iri {
    Iri::new(format!("{DOCUMENT_IRI_PREFIX}{:016x}", fnv1a64(seed.as_bytes())))
}
