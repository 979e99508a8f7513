//! Logging setup and invocation counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::error::ErrorKind;
use crate::pipeline::Outcome;

/// Install the fmt subscriber; `RUST_LOG` wins over the configured filter
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Process-wide invocation counters
#[derive(Debug, Default)]
pub struct Metrics {
    invocations: AtomicU64,
    successes: AtomicU64,
    not_modified: AtomicU64,
    origin_errors: AtomicU64,
    invalid_requests: AtomicU64,
    server_errors: AtomicU64,
    client_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocation_started(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: &Outcome) {
        let (counter, name) = match outcome {
            Outcome::Success { .. } => (&self.successes, "successes"),
            Outcome::NotModified { .. } => (&self.not_modified, "not_modified"),
            Outcome::OriginError(_) => (&self.origin_errors, "origin_errors"),
            Outcome::Failure { kind, .. } => match kind {
                ErrorKind::InvalidRequest => (&self.invalid_requests, "invalid_requests"),
                ErrorKind::ServerError | ErrorKind::TransformError => {
                    (&self.server_errors, "server_errors")
                }
                _ => (&self.client_errors, "client_errors"),
            },
        };

        counter.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = name, "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            not_modified: self.not_modified.load(Ordering::Relaxed),
            origin_errors: self.origin_errors.load(Ordering::Relaxed),
            invalid_requests: self.invalid_requests.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub successes: u64,
    pub not_modified: u64,
    pub origin_errors: u64,
    pub invalid_requests: u64,
    pub server_errors: u64,
    pub client_errors: u64,
}
