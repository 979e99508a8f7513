use thiserror::Error;

use super::params;
use crate::event::UserRequest;
use crate::transform::range::{ByteRange, parse_part_number};

/// Decides whether a caller request may enter the pipeline.
///
/// `None` means the request is valid; otherwise the message is returned to
/// the caller verbatim.
pub trait RequestValidator: Send + Sync {
    fn validate(&self, request: &UserRequest) -> Option<String>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("Cannot specify both Range header and partNumber query parameter.")]
    RangeAndPartNumber,
    #[error("Cannot process specified range: {0}")]
    InvalidRange(String),
    #[error("Cannot specify part number: {0}. Part number must be a positive integer.")]
    InvalidPartNumber(String),
    #[error("Cannot parse request url: {0}")]
    MalformedUrl(String),
}

/// Checks range and part-number syntax
pub fn validate_user_request(request: &UserRequest) -> Result<(), RequestValidationError> {
    let malformed = |e: params::MalformedUrl| RequestValidationError::MalformedUrl(e.0);

    let range = params::range(request).map_err(malformed)?;
    let part_number = params::part_number(request).map_err(malformed)?;

    match (range, part_number) {
        (Some(_), Some(_)) => Err(RequestValidationError::RangeAndPartNumber),
        (Some(range), None) => range
            .parse::<ByteRange>()
            .map(|_| ())
            .map_err(|_| RequestValidationError::InvalidRange(range)),
        (None, Some(part)) => parse_part_number(&part)
            .map(|_| ())
            .ok_or(RequestValidationError::InvalidPartNumber(part)),
        (None, None) => Ok(()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultRequestValidator;

impl RequestValidator for DefaultRequestValidator {
    fn validate(&self, request: &UserRequest) -> Option<String> {
        validate_user_request(request).err().map(|e| e.to_string())
    }
}
