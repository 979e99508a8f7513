//! Range and part-number lookup on the caller's request

use reqwest::Url;
use thiserror::Error;

use crate::event::UserRequest;

pub const RANGE: &str = "Range";
pub const PART_NUMBER: &str = "partNumber";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("user request url is malformed: {0}")]
pub struct MalformedUrl(pub String);

/// Case-insensitive query parameter lookup; the first match wins
pub fn query_param(url: &str, name: &str) -> Result<Option<String>, MalformedUrl> {
    let url = Url::parse(url).map_err(|e| MalformedUrl(e.to_string()))?;

    Ok(url
        .query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.into_owned()))
}

/// The `Range` header, falling back to a `Range` query parameter
pub fn range(request: &UserRequest) -> Result<Option<String>, MalformedUrl> {
    if let Some(value) = request.headers.get(RANGE) {
        return Ok(Some(value.to_string()));
    }
    query_param(&request.url, RANGE)
}

pub fn part_number(request: &UserRequest) -> Result<Option<String>, MalformedUrl> {
    query_param(&request.url, PART_NUMBER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CallerHeaders;

    #[test]
    fn test_range_prefers_header() {
        let headers: CallerHeaders = [("range", "bytes=0-4")].into_iter().collect();
        let request = UserRequest::new("https://example.com/key?Range=bytes=9-10", headers);
        assert_eq!(range(&request).unwrap().as_deref(), Some("bytes=0-4"));
    }

    #[test]
    fn test_range_falls_back_to_query() {
        let request = UserRequest::new("https://example.com/key?range=bytes%3D2-3", CallerHeaders::new());
        assert_eq!(range(&request).unwrap().as_deref(), Some("bytes=2-3"));
    }

    #[test]
    fn test_part_number_from_query() {
        let request = UserRequest::new("https://example.com/key?partNumber=2", CallerHeaders::new());
        assert_eq!(part_number(&request).unwrap().as_deref(), Some("2"));

        let request = UserRequest::new("https://example.com/key", CallerHeaders::new());
        assert_eq!(part_number(&request).unwrap(), None);
    }

    #[test]
    fn test_malformed_url() {
        let request = UserRequest::new("::not-a-url", CallerHeaders::new());
        assert!(part_number(&request).is_err());
    }
}
