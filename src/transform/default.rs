use async_trait::async_trait;
use bytes::Bytes;

use super::range;
use super::traits::{PostProcessError, TransformError, Transformer};
use crate::error::ErrorKind;
use crate::event::UserRequest;

/// Returns the original object unchanged.
///
/// Used when the proxy only needs range and part-number handling.
#[derive(Debug, Clone)]
pub struct IdentityTransformer {
    part_size: u64,
}

impl IdentityTransformer {
    pub fn new(part_size: u64) -> Self {
        Self { part_size }
    }
}

impl Default for IdentityTransformer {
    fn default() -> Self {
        Self::new(range::DEFAULT_PART_SIZE)
    }
}

#[async_trait]
impl Transformer for IdentityTransformer {
    async fn transform(&self, object: Bytes) -> Result<Bytes, TransformError> {
        Ok(object)
    }

    async fn apply_range_or_part_number(
        &self,
        object: Bytes,
        request: &UserRequest,
    ) -> Result<Bytes, PostProcessError> {
        range::apply_range_or_part_number(object, request, self.part_size)
    }
}

/// Upper-cases UTF-8 text objects; binary objects are rejected
#[derive(Debug, Clone)]
pub struct UppercaseTransformer {
    part_size: u64,
}

impl UppercaseTransformer {
    pub fn new(part_size: u64) -> Self {
        Self { part_size }
    }
}

impl Default for UppercaseTransformer {
    fn default() -> Self {
        Self::new(range::DEFAULT_PART_SIZE)
    }
}

#[async_trait]
impl Transformer for UppercaseTransformer {
    async fn transform(&self, object: Bytes) -> Result<Bytes, TransformError> {
        let text = std::str::from_utf8(&object).map_err(|e| {
            TransformError::new(
                ErrorKind::TransformError,
                format!("object is not valid UTF-8 text: {e}"),
            )
        })?;

        Ok(Bytes::from(text.to_uppercase()))
    }

    async fn apply_range_or_part_number(
        &self,
        object: Bytes,
        request: &UserRequest,
    ) -> Result<Bytes, PostProcessError> {
        range::apply_range_or_part_number(object, request, self.part_size)
    }
}
