use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Host server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest invocation event accepted on `/invoke`
    #[serde(default = "default_max_event_bytes")]
    pub max_event_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_event_bytes: default_max_event_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_event_bytes() -> ByteSize {
    ByteSize(1024 * 1024) // 1 MB
}

/// Outbound fetch against the presigned URL
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("transformbox/{}", env!("CARGO_PKG_VERSION"))
}

/// Transformer selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Registered transformer name (e.g. "identity", "uppercase")
    #[serde(default = "default_transformer")]
    pub transformer: String,
    /// Part size used for partNumber requests
    #[serde(default = "default_part_size")]
    pub part_size: ByteSize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            transformer: default_transformer(),
            part_size: default_part_size(),
        }
    }
}

fn default_transformer() -> String {
    "identity".to_string()
}

fn default_part_size() -> ByteSize {
    ByteSize(crate::transform::range::DEFAULT_PART_SIZE)
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
