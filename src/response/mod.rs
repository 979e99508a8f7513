//! Outcome rendering
//!
//! A [`ResponseHandler`] turns the pipeline's terminal [`Outcome`] into
//! whatever the calling proxy understands. [`HttpResponseHandler`] renders it
//! as an HTTP response in the object-lambda forwarding convention.

pub mod checksum;
mod http;

pub use http::HttpResponseHandler;

use bytes::Bytes;

use crate::error::ErrorKind;
use crate::pipeline::{OriginErrorResponse, OriginMetadata, Outcome};

pub trait ResponseHandler {
    type Output;

    fn emit_error(&self, message: &str, kind: ErrorKind) -> Self::Output;

    /// Forward an origin failure largely unmodified
    fn emit_origin_error(&self, origin: OriginErrorResponse) -> Self::Output;

    fn emit_not_modified(&self, metadata: OriginMetadata) -> Self::Output;

    fn emit_success(&self, metadata: OriginMetadata, body: Bytes) -> Self::Output;

    fn dispatch(&self, outcome: Outcome) -> Self::Output {
        match outcome {
            Outcome::Success { body, metadata } => self.emit_success(metadata, body),
            Outcome::Failure { kind, message } => self.emit_error(&message, kind),
            Outcome::OriginError(origin) => self.emit_origin_error(origin),
            Outcome::NotModified { metadata } => self.emit_not_modified(metadata),
        }
    }
}
