use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::default::{IdentityTransformer, UppercaseTransformer};
use super::traits::Transformer;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("transformer not found: {0}")]
    NotFound(String),
}

/// Named transformer instances, selected by configuration
#[derive(Clone)]
pub struct TransformerRegistry {
    transformers: BTreeMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self {
            transformers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, transformer: Arc<dyn Transformer>) {
        self.transformers.insert(name.into(), transformer);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Transformer>, RegistryError> {
        self.transformers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transformers.keys().map(String::as_str)
    }

    /// Registry with the built-in transformers
    pub fn with_defaults(part_size: u64) -> Self {
        let mut registry = Self::new();
        registry.register("identity", Arc::new(IdentityTransformer::new(part_size)));
        registry.register("uppercase", Arc::new(UppercaseTransformer::new(part_size)));
        registry
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_defaults(super::range::DEFAULT_PART_SIZE)
    }
}
