//! reqwest-backed origin fetcher

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::debug;

use super::{FetchError, ObjectFetcher, OriginBody, OriginResponse, Result};
use crate::config::FetchConfig;
use crate::request::ReconciledHeaders;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_redirects: 10,
            user_agent: "transformbox/0.1.0".to_string(),
        }
    }
}

impl From<&FetchConfig> for HttpConfig {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            max_redirects: config.max_redirects,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Presigned URL fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }
}

struct ResponseBody(Response);

#[async_trait]
impl OriginBody for ResponseBody {
    async fn read_all(self: Box<Self>) -> Result<Bytes> {
        self.0
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[async_trait]
impl ObjectFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &ReconciledHeaders) -> Result<OriginResponse> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        debug!(host = url.host_str().unwrap_or_default(), headers = headers.len(), "Fetching original object");

        let mut request = self.client.get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else if e.is_redirect() {
                FetchError::TooManyRedirects
            } else {
                FetchError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = status.as_u16(), "Origin responded");

        Ok(OriginResponse {
            status,
            headers,
            body: Box::new(ResponseBody(response)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.user_agent, "transformbox/0.1.0");
    }

    #[test]
    fn test_http_config_from_fetch_config() {
        let fetch = FetchConfig {
            connect_timeout_ms: 250,
            request_timeout_ms: 1500,
            max_redirects: 2,
            user_agent: "test/1.0".to_string(),
        };
        let config = HttpConfig::from(&fetch);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.max_redirects, 2);
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let fetcher = HttpFetcher::new(HttpConfig::default()).unwrap();
        let result = fetcher.fetch("not a url", &ReconciledHeaders::new()).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
