//! Outbound header reconciliation for presigned fetches
//!
//! A presigned URL lists the headers that were part of its signature in the
//! `X-Amz-SignedHeaders` query parameter. Those headers must be replayed
//! exactly as the caller sent them, otherwise the origin rejects the signature.
//! Conditional headers are never signed but are still forwarded so the origin
//! can honour them.

use reqwest::Url;
use std::collections::HashSet;
use thiserror::Error;

use crate::event::CallerHeaders;

pub const SIGNED_HEADERS_PARAM: &str = "X-Amz-SignedHeaders";

/// Unsigned headers forwarded to the origin when the caller supplies them
pub const OPTIONAL_HEADERS: [&str; 4] = [
    "if-match",
    "if-modified-since",
    "if-none-match",
    "if-unmodified-since",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("presigned url is malformed: {0}")]
    InvalidUrl(String),
    #[error("presigned url carries no X-Amz-SignedHeaders parameter")]
    MissingSignedHeaders,
}

/// Header set attached to the outbound fetch.
///
/// Keeps insertion order, compares names case-insensitively and never holds
/// a `Host` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciledHeaders {
    entries: Vec<(String, String)>,
}

impl ReconciledHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the name is already present or is `Host`
    pub fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        if name.eq_ignore_ascii_case("host") || self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), value.to_string()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-cased header names listed in the URL's `X-Amz-SignedHeaders`.
///
/// Entries may be separated by `;` or `,`. The parameter name is matched
/// case-insensitively.
pub fn signed_headers(presigned_url: &str) -> Result<HashSet<String>, HeaderError> {
    let url = Url::parse(presigned_url).map_err(|e| HeaderError::InvalidUrl(e.to_string()))?;

    let raw = url
        .query_pairs()
        .find(|(name, _)| name.eq_ignore_ascii_case(SIGNED_HEADERS_PARAM))
        .map(|(_, value)| value.into_owned())
        .ok_or(HeaderError::MissingSignedHeaders)?;

    let names: HashSet<String> = raw
        .split([';', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    if names.is_empty() {
        return Err(HeaderError::MissingSignedHeaders);
    }

    Ok(names)
}

/// Build the outbound header set for a presigned fetch.
///
/// Signed headers are copied first, then the optional conditional headers.
/// Within and across both passes the first occurrence of a name wins.
pub fn reconcile(
    presigned_url: &str,
    caller_headers: &CallerHeaders,
) -> Result<ReconciledHeaders, HeaderError> {
    let signed = signed_headers(presigned_url)?;
    let mut headers = ReconciledHeaders::new();

    for (name, value) in caller_headers.iter() {
        if signed.contains(&name.to_ascii_lowercase()) {
            headers.insert_if_absent(name, value);
        }
    }

    for (name, value) in caller_headers.iter() {
        let lowered = name.to_ascii_lowercase();
        if OPTIONAL_HEADERS.contains(&lowered.as_str()) {
            headers.insert_if_absent(name, value);
        }
    }

    Ok(headers)
}
