use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use super::ResponseHandler;
use super::checksum::checksum;
use crate::error::ErrorKind;
use crate::event::GetObjectContext;
use crate::pipeline::{OriginErrorResponse, OriginMetadata};

pub const FWD_ERROR_CODE: HeaderName = HeaderName::from_static("x-amz-fwd-error-code");
pub const FWD_ERROR_MESSAGE: HeaderName = HeaderName::from_static("x-amz-fwd-error-message");
pub const REQUEST_ROUTE: HeaderName = HeaderName::from_static("x-amz-request-route");
pub const REQUEST_TOKEN: HeaderName = HeaderName::from_static("x-amz-request-token");
pub const CHECKSUM_ALGORITHM: HeaderName =
    HeaderName::from_static("x-amz-meta-body-checksum-algorithm");
pub const CHECKSUM_DIGEST: HeaderName = HeaderName::from_static("x-amz-meta-body-checksum-digest");

const USER_METADATA_PREFIX: &str = "x-amz-meta-";

/// Object headers carried over from the origin on success
const FORWARDED_HEADERS: [HeaderName; 8] = [
    header::CONTENT_TYPE,
    header::ETAG,
    header::LAST_MODIFIED,
    header::CACHE_CONTROL,
    header::CONTENT_LANGUAGE,
    header::CONTENT_DISPOSITION,
    header::CONTENT_ENCODING,
    header::EXPIRES,
];

/// Headers describing the origin body framing, recomputed by axum
const FRAMING_HEADERS: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONNECTION,
];

/// Renders outcomes as HTTP responses for the proxy
#[derive(Debug, Clone)]
pub struct HttpResponseHandler {
    route: String,
    token: String,
}

impl HttpResponseHandler {
    pub fn new(route: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            token: token.into(),
        }
    }

    pub fn from_context(context: &GetObjectContext) -> Self {
        Self::new(&context.output_route, &context.output_token)
    }

    fn insert_route(&self, headers: &mut HeaderMap) {
        insert_text(headers, REQUEST_ROUTE, &self.route);
        insert_text(headers, REQUEST_TOKEN, &self.token);
    }
}

impl ResponseHandler for HttpResponseHandler {
    type Output = Response;

    fn emit_error(&self, message: &str, kind: ErrorKind) -> Response {
        let document = error_document(kind.code(), message, &self.token);
        let mut response = (
            kind.status_code(),
            [(header::CONTENT_TYPE, "application/xml")],
            document,
        )
            .into_response();

        let headers = response.headers_mut();
        insert_text(headers, FWD_ERROR_CODE, kind.code());
        insert_text(headers, FWD_ERROR_MESSAGE, message);
        self.insert_route(headers);
        response
    }

    fn emit_origin_error(&self, origin: OriginErrorResponse) -> Response {
        let mut response = Response::new(Body::from(origin.body));
        *response.status_mut() = origin.status;

        let headers = response.headers_mut();
        for (name, value) in &origin.headers {
            if !FRAMING_HEADERS.contains(name) {
                headers.append(name.clone(), value.clone());
            }
        }
        self.insert_route(headers);
        response
    }

    fn emit_not_modified(&self, metadata: OriginMetadata) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NOT_MODIFIED;

        let headers = response.headers_mut();
        copy_object_headers(&metadata.headers, headers);
        self.insert_route(headers);
        response
    }

    fn emit_success(&self, metadata: OriginMetadata, body: Bytes) -> Response {
        let sum = checksum(&body);
        let mut response = Response::new(Body::from(body));

        let headers = response.headers_mut();
        copy_object_headers(&metadata.headers, headers);
        insert_text(headers, CHECKSUM_ALGORITHM, sum.algorithm);
        insert_text(headers, CHECKSUM_DIGEST, &sum.digest);
        self.insert_route(headers);
        response
    }
}

fn copy_object_headers(origin: &HeaderMap, target: &mut HeaderMap) {
    for (name, value) in origin {
        if FORWARDED_HEADERS.contains(name) || name.as_str().starts_with(USER_METADATA_PREFIX) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Insert free text as a header value; characters outside visible ASCII become spaces
fn insert_text(headers: &mut HeaderMap, name: HeaderName, text: &str) {
    let sanitized: String = text
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { ' ' })
        .collect();

    if let Ok(value) = HeaderValue::from_str(&sanitized) {
        headers.insert(name, value);
    }
}

fn error_document(code: &str, message: &str, token: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{}</Code><Message>{}</Message><RequestToken>{}</RequestToken></Error>",
        xml_escape(code),
        xml_escape(message),
        xml_escape(token)
    )
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
