//! Invocation event delivered by the object-lambda proxy.
//!
//! The proxy forwards the caller's original GetObject request together with a
//! presigned URL for the untransformed object:
//!
//! ```json
//! {
//!   "getObjectContext": {
//!     "inputS3Url": "https://bucket.s3.amazonaws.com/key?X-Amz-SignedHeaders=host&...",
//!     "outputRoute": "io-use1-001",
//!     "outputToken": "OutputToken"
//!   },
//!   "userRequest": {
//!     "url": "https://ap.s3-object-lambda.amazonaws.com/key?partNumber=1",
//!     "headers": { "Host": "ap.s3-object-lambda.amazonaws.com", "If-Match": "\"abc\"" }
//!   },
//!   "configuration": { "payload": "" },
//!   "protocolVersion": "1.00"
//! }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLambdaEvent {
    pub get_object_context: GetObjectContext,
    pub user_request: UserRequest,
    #[serde(default)]
    pub configuration: Option<LambdaConfiguration>,
    #[serde(default)]
    pub protocol_version: Option<String>,
}

/// Where to fetch the original object and where the answer is routed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectContext {
    /// Presigned URL of the untransformed object
    pub input_s3_url: String,
    pub output_route: String,
    pub output_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaConfiguration {
    #[serde(default)]
    pub access_point_arn: Option<String>,
    #[serde(default)]
    pub supporting_access_point_arn: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

/// The caller's original request as seen by the proxy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRequest {
    pub url: String,
    #[serde(default)]
    pub headers: CallerHeaders,
}

impl UserRequest {
    pub fn new(url: impl Into<String>, headers: CallerHeaders) -> Self {
        Self {
            url: url.into(),
            headers,
        }
    }
}

/// Caller headers in the order the caller sent them.
///
/// Names are compared case-insensitively and the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerHeaders(Vec<(String, String)>);

impl CallerHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CallerHeaders
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for CallerHeaders {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = CallerHeaders;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of header names to string values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut headers = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, String>()? {
                    headers.push((name, value));
                }
                Ok(CallerHeaders(headers))
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}
