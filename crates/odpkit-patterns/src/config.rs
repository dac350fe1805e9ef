//! Configuration for odpkit.
//!
//! Configuration is loaded from the following sources, highest priority
//! first:
//! 1. Environment variables (`ODPKIT_*`)
//! 2. An explicit JSON file (`--config`)
//! 3. Project-local `odpkit.json`
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::library::CatalogSource;
use crate::naming::DEFAULT_SEPARATOR;

pub const LOCAL_CONFIG_FILE: &str = "odpkit.json";

pub const DEFAULT_MAX_COLLISION_ATTEMPTS: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How a pattern fragment is merged into a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantiationConfig {
    /// Move pattern entities into the target namespace.
    pub use_target_namespace: bool,

    /// How many times `-1` may be appended to a colliding property name.
    pub max_collision_attempts: usize,
}

impl Default for InstantiationConfig {
    fn default() -> Self {
        Self {
            use_target_namespace: true,
            max_collision_attempts: DEFAULT_MAX_COLLISION_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdpkitConfig {
    /// Pattern catalog; `None` means the bundled one.
    pub catalog: Option<PathBuf>,

    /// Directory scanned for pattern documents, on top of the bundled ones.
    pub pattern_dir: Option<PathBuf>,

    pub instantiation: InstantiationConfig,

    pub entity_separator: String,
}

impl Default for OdpkitConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            pattern_dir: None,
            instantiation: InstantiationConfig::default(),
            entity_separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl OdpkitConfig {
    /// Load configuration, then apply environment overrides and validate.
    ///
    /// An explicit path must exist. Without one, `./odpkit.json` is used when
    /// present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(LOCAL_CONFIG_FILE).exists() => Self::from_file(LOCAL_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply `ODPKIT_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("ODPKIT_CATALOG") {
            self.catalog = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("ODPKIT_PATTERN_DIR") {
            self.pattern_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = lookup("ODPKIT_USE_TARGET_NAMESPACE") {
            match parse_bool(&flag) {
                Some(b) => self.instantiation.use_target_namespace = b,
                None => warn!(value = %flag, "ignoring ODPKIT_USE_TARGET_NAMESPACE"),
            }
        }
        if let Some(sep) = lookup("ODPKIT_SEPARATOR") {
            self.entity_separator = sep;
        }
        if let Some(n) = lookup("ODPKIT_MAX_COLLISION_ATTEMPTS") {
            match n.parse() {
                Ok(n) => self.instantiation.max_collision_attempts = n,
                Err(_) => warn!(value = %n, "ignoring ODPKIT_MAX_COLLISION_ATTEMPTS"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity_separator.is_empty() {
            return Err(ConfigError::Invalid("entity_separator must not be empty".to_string()));
        }
        if self.instantiation.max_collision_attempts == 0 {
            return Err(ConfigError::Invalid(
                "instantiation.max_collision_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Bundled,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = OdpkitConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.instantiation.use_target_namespace);
        assert_eq!(config.instantiation.max_collision_attempts, 64);
        assert_eq!(config.entity_separator, "#");
        assert_eq!(config.catalog_source(), CatalogSource::Bundled);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("odpkit.json");
        std::fs::write(&path, r#"{ "instantiation": { "use_target_namespace": false } }"#)
            .expect("write config");

        let config = OdpkitConfig::from_file(&path).expect("load");
        assert!(!config.instantiation.use_target_namespace);
        assert_eq!(config.instantiation.max_collision_attempts, 64);
        assert_eq!(config.entity_separator, "#");
    }

    #[test]
    fn explicit_file_errors_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(OdpkitConfig::load(Some(missing.as_path())), Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").expect("write");
        assert!(matches!(OdpkitConfig::from_file(&bad), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = OdpkitConfig::default();
        config.apply_overrides_from(env(&[
            ("ODPKIT_CATALOG", "/srv/modl/index.ttl"),
            ("ODPKIT_PATTERN_DIR", "/srv/modl"),
            ("ODPKIT_USE_TARGET_NAMESPACE", "off"),
            ("ODPKIT_SEPARATOR", "/"),
            ("ODPKIT_MAX_COLLISION_ATTEMPTS", "8"),
        ]));

        assert_eq!(config.catalog, Some(PathBuf::from("/srv/modl/index.ttl")));
        assert_eq!(config.pattern_dir, Some(PathBuf::from("/srv/modl")));
        assert!(!config.instantiation.use_target_namespace);
        assert_eq!(config.entity_separator, "/");
        assert_eq!(config.instantiation.max_collision_attempts, 8);
        assert_eq!(
            config.catalog_source(),
            CatalogSource::File(PathBuf::from("/srv/modl/index.ttl"))
        );
    }

    #[test]
    fn unparseable_overrides_are_ignored() {
        let mut config = OdpkitConfig::default();
        config.apply_overrides_from(env(&[
            ("ODPKIT_USE_TARGET_NAMESPACE", "maybe"),
            ("ODPKIT_MAX_COLLISION_ATTEMPTS", "lots"),
        ]));
        assert_eq!(config, OdpkitConfig::default());
    }

    #[test]
    fn validation_rejects_empty_separator_and_zero_cap() {
        let mut config = OdpkitConfig::default();
        config.apply_overrides_from(env(&[("ODPKIT_SEPARATOR", "")]));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = OdpkitConfig::default();
        config.apply_overrides_from(env(&[("ODPKIT_MAX_COLLISION_ATTEMPTS", "0")]));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
