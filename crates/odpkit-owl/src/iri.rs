use serde::{Deserialize, Serialize};
use std::fmt;

/// An IRI, compared and hashed by its exact string form.
///
/// No normalization or validation is performed: ontologies in the wild carry
/// all sorts of "IRIs", and the engine only ever needs identity and the
/// short-form split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The local part after the last `#` or `/`.
    ///
    /// Falls back to the whole IRI when there is no such part (e.g. an IRI
    /// ending in `#`, or a URN without separators).
    pub fn short_form(&self) -> &str {
        match self.0.rfind(['#', '/']) {
            Some(pos) if pos + 1 < self.0.len() => &self.0[pos + 1..],
            _ => &self.0,
        }
    }

    /// Everything up to and including the last `#` or `/`.
    pub fn namespace(&self) -> &str {
        match self.0.rfind(['#', '/']) {
            Some(pos) => &self.0[..=pos],
            None => "",
        }
    }

    /// `self + separator + local`, the way new entities are minted in a
    /// target namespace.
    pub fn child(&self, separator: &str, local: &str) -> Iri {
        let mut out = String::with_capacity(self.0.len() + separator.len() + local.len());
        out.push_str(&self.0);
        out.push_str(separator);
        out.push_str(local);
        Iri(out)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Iri {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
