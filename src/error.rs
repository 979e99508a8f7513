//! Error kinds that terminate a GetObject invocation
//!
//! Every failing pipeline stage resolves to exactly one [`ErrorKind`]. The kind
//! decides the HTTP status and the S3-style error code the proxy receives.

use axum::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Validator rejected the caller's request
    InvalidRequest,
    /// Requested byte range cannot be satisfied by the transformed object
    InvalidRange,
    /// Requested part number is outside the transformed object's parts
    InvalidPartNumber,
    /// Internal failure; the caller only sees a generic message
    ServerError,
    /// Origin answered with status >= 400
    OriginError,
    /// Transformation of the object body failed
    TransformError,
    /// Available to transformers that resolve keys themselves
    NoSuchKey,
    AccessDenied,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidRange | ErrorKind::InvalidPartNumber => {
                StatusCode::RANGE_NOT_SATISFIABLE
            }
            ErrorKind::ServerError | ErrorKind::TransformError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ErrorKind::OriginError => StatusCode::BAD_GATEWAY,
            ErrorKind::NoSuchKey => StatusCode::NOT_FOUND,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::InvalidRange => "InvalidRange",
            ErrorKind::InvalidPartNumber => "InvalidPartNumber",
            ErrorKind::ServerError => "InternalError",
            ErrorKind::OriginError => "OriginError",
            ErrorKind::TransformError => "TransformError",
            ErrorKind::NoSuchKey => "NoSuchKey",
            ErrorKind::AccessDenied => "AccessDenied",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
