//! Configuration management for transformbox
//!
//! Settings are layered:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use transformbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Transformer: {}", config.transform.transformer);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `TRANSFORMBOX__<section>__<key>`:
//! - `TRANSFORMBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `TRANSFORMBOX__FETCH__REQUEST_TIMEOUT_MS=5000`
//! - `TRANSFORMBOX__TRANSFORM__PART_SIZE=8MB`
//!
//! # Configuration File
//!
//! Loaded from `config/transformbox.toml` unless `TRANSFORMBOX_CONFIG` points
//! elsewhere.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, FetchConfig, ServerConfig, TelemetryConfig, TransformConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

use crate::transform::TransformerRegistry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Unknown transformer '{name}', available: {available}")]
    UnknownTransformer { name: String, available: String },
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path plus environment overrides
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Registry of built-in transformers sized by this configuration
    pub fn transformer_registry(&self) -> TransformerRegistry {
        TransformerRegistry::with_defaults(self.transform.part_size.as_u64())
    }

    /// Check the configured transformer against a registry
    pub fn ensure_transformer(&self, registry: &TransformerRegistry) -> Result<(), ConfigError> {
        if registry.contains(&self.transform.transformer) {
            return Ok(());
        }

        Err(ConfigError::UnknownTransformer {
            name: self.transform.transformer.clone(),
            available: registry.names().collect::<Vec<_>>().join(", "),
        })
    }
}
