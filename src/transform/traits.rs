use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::event::UserRequest;

/// Transformation failure carrying the kind the caller should see
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransformError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TransformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failures while applying range or part number to the transformed object
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostProcessError {
    /// The caller's request URL could not be read; internal, never shown to the caller
    #[error("invalid request target: {0}")]
    InvalidTarget(String),
    #[error("{0}")]
    InvalidRange(String),
    #[error("{0}")]
    InvalidPartNumber(String),
}

/// Pluggable object transformation.
///
/// Implementations are injected into the pipeline at construction time.
/// `apply_range_or_part_number` always receives the output of `transform`.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Transform the complete original object
    async fn transform(&self, object: Bytes) -> Result<Bytes, TransformError>;

    /// Select the caller's range or part from the transformed object
    async fn apply_range_or_part_number(
        &self,
        object: Bytes,
        request: &UserRequest,
    ) -> Result<Bytes, PostProcessError>;
}
