//! Caller request handling: validation, parameter lookup and outbound header
//! reconciliation.

pub mod headers;
pub mod params;
mod validator;

pub use headers::{HeaderError, ReconciledHeaders, reconcile, signed_headers};
pub use validator::{
    DefaultRequestValidator, RequestValidationError, RequestValidator, validate_user_request,
};
