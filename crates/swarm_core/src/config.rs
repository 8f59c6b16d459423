//! # Configuration
//!
//! Tunables for storage and system execution. Loaded once at startup, from
//! TOML or built in code. Every field has a default, so an empty document is
//! a valid configuration.
//!
//! ```toml
//! [storage]
//! chunk_capacity = 2048
//! initial_chunk_slots = 16
//!
//! [executor]
//! vector_width = 8
//! allow_intrinsics = true
//! worker_count = 8        # omit for hardware concurrency
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;

use crate::ecs::{Archetype, Chunk};
use crate::error::{SwarmError, SwarmResult};
use crate::systems::SUPPORTED_VECTOR_WIDTHS;

/// Storage layout tunables.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Rows per chunk. Affects cache behavior, not results.
    pub chunk_capacity: usize,
    /// Chunk slots reserved up front (0 selects the default).
    pub initial_chunk_slots: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: Chunk::DEFAULT_CAPACITY,
            initial_chunk_slots: Archetype::DEFAULT_CHUNK_SLOTS,
        }
    }
}

impl StorageConfig {
    /// Checks that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] if `chunk_capacity` is zero.
    pub fn validate(&self) -> SwarmResult<()> {
        if self.chunk_capacity == 0 {
            return Err(SwarmError::InvalidConfig(
                "storage.chunk_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// System execution tunables.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Lanes per vector group: 1 (scalar), 4, 8 or 16.
    pub vector_width: usize,
    /// Allow CPU-specific intrinsics when the CPU supports them.
    pub allow_intrinsics: bool,
    /// Worker threads for the chunk-level parallel-for. `None` uses the
    /// available hardware concurrency.
    pub worker_count: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            vector_width: 8,
            allow_intrinsics: true,
            worker_count: None,
        }
    }
}

impl ExecutorConfig {
    /// Checks that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] for an unsupported vector width
    /// or a zero worker count.
    pub fn validate(&self) -> SwarmResult<()> {
        if !SUPPORTED_VECTOR_WIDTHS.contains(&self.vector_width) {
            return Err(SwarmError::InvalidConfig(format!(
                "executor.vector_width must be one of {SUPPORTED_VECTOR_WIDTHS:?}, got {}",
                self.vector_width
            )));
        }
        if self.worker_count == Some(0) {
            return Err(SwarmError::InvalidConfig(
                "executor.worker_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the configured worker count, or the hardware concurrency.
    #[must_use]
    pub fn resolved_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        })
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwarmConfig {
    /// Storage layout tunables.
    pub storage: StorageConfig,
    /// System execution tunables.
    pub executor: ExecutorConfig,
}

impl SwarmConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::ConfigParse`] for malformed TOML or unknown keys,
    /// and [`SwarmError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> SwarmResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> SwarmResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`SwarmError::InvalidConfig`] found.
    pub fn validate(&self) -> SwarmResult<()> {
        self.storage.validate()?;
        self.executor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SwarmConfig::from_toml_str("").unwrap();
        assert_eq!(config, SwarmConfig::default());
        assert_eq!(config.storage.chunk_capacity, 2048);
        assert_eq!(config.storage.initial_chunk_slots, 16);
        assert_eq!(config.executor.vector_width, 8);
        assert!(config.executor.worker_count.is_none());
    }

    #[test]
    fn test_parse_full_document() {
        let config = SwarmConfig::from_toml_str(
            r#"
            [storage]
            chunk_capacity = 512
            initial_chunk_slots = 4

            [executor]
            vector_width = 4
            allow_intrinsics = false
            worker_count = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.chunk_capacity, 512);
        assert_eq!(config.storage.initial_chunk_slots, 4);
        assert_eq!(config.executor.vector_width, 4);
        assert!(!config.executor.allow_intrinsics);
        assert_eq!(config.executor.resolved_worker_count(), 3);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = SwarmConfig::from_toml_str("[executor]\nworker_count = 2\n").unwrap();
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.executor.vector_width, 8);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for doc in [
            "[storage]\nchunk_capacity = 0\n",
            "[executor]\nvector_width = 3\n",
            "[executor]\nworker_count = 0\n",
        ] {
            assert!(
                matches!(SwarmConfig::from_toml_str(doc), Err(SwarmError::InvalidConfig(_))),
                "{doc}"
            );
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = SwarmConfig::from_toml_str("[storage]\nchunk_cap = 4\n");
        assert!(matches!(result, Err(SwarmError::ConfigParse(_))));
    }

    #[test]
    fn test_resolved_worker_count_defaults_to_hardware() {
        assert!(ExecutorConfig::default().resolved_worker_count() >= 1);
    }
}
