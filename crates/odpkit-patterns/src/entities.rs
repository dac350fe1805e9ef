//! Catalog entries.
//!
//! Both [`Category`] and [`Pattern`] are `(label, iri)` pairs whose identity is
//! the IRI alone: two entries with the same IRI and different labels are the
//! same entry.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use odpkit_owl::Iri;

pub const ANY_CATEGORY_LABEL: &str = "Any";
pub const ANY_CATEGORY_IRI: &str = "https://w3id.org/comodide/ModlIndex#AnyCategory";

macro_rules! labeled_by_iri {
    ($ty:ident) => {
        impl $ty {
            pub fn new(label: impl Into<String>, iri: impl Into<Iri>) -> Self {
                Self {
                    label: label.into(),
                    iri: iri.into(),
                }
            }

            pub fn label(&self) -> &str {
                &self.label
            }

            pub fn iri(&self) -> &Iri {
                &self.iri
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.iri == other.iri
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.iri.hash(state);
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                self.iri.cmp(&other.iri)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.label)
            }
        }
    };
}

/// A grouping of patterns in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    label: String,
    iri: Iri,
}

labeled_by_iri!(Category);

impl Category {
    /// The sentinel every pattern belongs to. Present in every index.
    pub fn any() -> Self {
        Self::new(ANY_CATEGORY_LABEL, ANY_CATEGORY_IRI)
    }

    pub fn is_any(&self) -> bool {
        self.iri.as_str() == ANY_CATEGORY_IRI
    }
}

/// A catalogued ontology design pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    label: String,
    iri: Iri,
}

labeled_by_iri!(Pattern);
