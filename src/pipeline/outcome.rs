use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::error::ErrorKind;

/// Origin status and headers kept for the response
#[derive(Debug, Clone, PartialEq)]
pub struct OriginMetadata {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

/// Origin failure forwarded to the caller as-is
#[derive(Debug, Clone, PartialEq)]
pub struct OriginErrorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Terminal result of one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success {
        body: Bytes,
        metadata: OriginMetadata,
    },
    Failure {
        kind: ErrorKind,
        message: String,
    },
    OriginError(OriginErrorResponse),
    /// Origin answered a conditional request with 304
    NotModified {
        metadata: OriginMetadata,
    },
}

impl Outcome {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Error kind of a failed outcome
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Failure { kind, .. } => Some(*kind),
            Outcome::OriginError(_) => Some(ErrorKind::OriginError),
            Outcome::Success { .. } | Outcome::NotModified { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}
