//! # Storage Configuration
//!
//! Capacity bounds for a [`World`](crate::World), fixed at construction.
//!
//! ```toml
//! max_entities = 50000
//! sparse_key_limit = 65536
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::{Entity, MAX_ENTITIES};
use crate::storage::SparseKey;

/// Errors raised while loading a [`StorageConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but violate a bound.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Capacity configuration for the storage engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum number of simultaneously active entities.
    ///
    /// Entity ids are drawn from `[0, max_entities)`.
    pub max_entities: usize,
    /// Bound on sparse-set keys in the component registry.
    ///
    /// `None` means the sets are bounded by `max_entities`. A bound below
    /// `max_entities` is rejected, since every issuable id must be able to
    /// hold components.
    pub sparse_key_limit: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_entities: MAX_ENTITIES,
            sparse_key_limit: None,
        }
    }
}

impl StorageConfig {
    /// Creates a configuration with the given entity capacity.
    #[must_use]
    pub const fn with_max_entities(max_entities: usize) -> Self {
        Self {
            max_entities,
            sparse_key_limit: None,
        }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input and
    /// [`ConfigError::Invalid`] if a bound is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`StorageConfig::from_toml_str`].
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks that every bound is representable by the entity type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let representable = Entity::ABSENT.to_index();
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.max_entities > representable {
            return Err(ConfigError::Invalid(format!(
                "max_entities {} exceeds the entity type limit {representable}",
                self.max_entities
            )));
        }
        if let Some(limit) = self.sparse_key_limit {
            if limit == 0 || limit > representable {
                return Err(ConfigError::Invalid(format!(
                    "sparse_key_limit {limit} must be in 1..={representable}"
                )));
            }
            if limit < self.max_entities {
                return Err(ConfigError::Invalid(format!(
                    "sparse_key_limit {limit} is below max_entities {}",
                    self.max_entities
                )));
            }
        }
        Ok(())
    }

    /// The key bound the registry's sparse sets are created with.
    ///
    /// Never below `max_entities`, even for an unvalidated configuration.
    #[inline]
    #[must_use]
    pub fn key_limit(&self) -> usize {
        self.sparse_key_limit
            .map_or(self.max_entities, |limit| limit.max(self.max_entities))
    }
}
