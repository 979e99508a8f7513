use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::outcome::{OriginErrorResponse, OriginMetadata, Outcome};
use crate::error::ErrorKind;
use crate::event::ObjectLambdaEvent;
use crate::fetch::{FetchError, ObjectFetcher, OriginResponse};
use crate::request::{RequestValidator, reconcile};
use crate::transform::{PostProcessError, Transformer};

const FETCH_FAILED: &str = "Error occurred while getting the object.";
const BODY_READ_FAILED: &str = "Error occurred while getting the data.";
const POST_PROCESS_FAILED: &str = "Unexpected error while transforming the object.";

/// GetObject orchestrator.
///
/// Runs validate, fetch, transform and range/part selection in order and
/// stops at the first failing stage. Holds no per-request state, so one
/// instance serves any number of concurrent invocations.
#[derive(Clone)]
pub struct GetObjectHandler {
    validator: Arc<dyn RequestValidator>,
    fetcher: Arc<dyn ObjectFetcher>,
    transformer: Arc<dyn Transformer>,
}

impl GetObjectHandler {
    pub fn new(
        validator: Arc<dyn RequestValidator>,
        fetcher: Arc<dyn ObjectFetcher>,
        transformer: Arc<dyn Transformer>,
    ) -> Self {
        Self {
            validator,
            fetcher,
            transformer,
        }
    }

    pub async fn handle(&self, event: &ObjectLambdaEvent) -> Outcome {
        let user_request = &event.user_request;

        if let Some(message) = self.validator.validate(user_request) {
            warn!(%message, "Rejected invalid request");
            return Outcome::failure(ErrorKind::InvalidRequest, message);
        }

        let origin = match self.fetch_original(event).await {
            Ok(origin) => origin,
            Err(e) => {
                error!(error = %e, "Error while getting the original object");
                return Outcome::failure(ErrorKind::ServerError, FETCH_FAILED);
            }
        };

        let OriginResponse {
            status,
            headers,
            body,
        } = origin;

        // Origin errors go back untouched, the transformer never sees them
        if status.as_u16() >= 400 {
            let body = body.read_all().await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read origin error body");
                Default::default()
            });
            warn!(status = status.as_u16(), "Forwarding origin error");
            return Outcome::OriginError(OriginErrorResponse {
                status,
                headers,
                body,
            });
        }

        let metadata = OriginMetadata { status, headers };

        if status == StatusCode::NOT_MODIFIED {
            debug!("Origin reported not modified");
            return Outcome::NotModified { metadata };
        }

        let original = match body.read_all().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "Error while reading the origin body");
                return Outcome::failure(ErrorKind::ServerError, BODY_READ_FAILED);
            }
        };
        debug!(size = original.len(), "Original object read");

        let transformed = match self.transformer.transform(original).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(kind = %e.kind, message = %e.message, "Transformation failed");
                return Outcome::failure(e.kind, e.message);
            }
        };
        debug!(size = transformed.len(), "Object transformed");

        match self
            .transformer
            .apply_range_or_part_number(transformed, user_request)
            .await
        {
            Ok(body) => {
                debug!(size = body.len(), "Transformed object ready");
                Outcome::Success { body, metadata }
            }
            Err(PostProcessError::InvalidTarget(e)) => {
                error!(error = %e, "Error while applying range or part number");
                Outcome::failure(ErrorKind::ServerError, POST_PROCESS_FAILED)
            }
            Err(PostProcessError::InvalidRange(message)) => {
                warn!(%message, "Invalid range");
                Outcome::failure(ErrorKind::InvalidRange, message)
            }
            Err(PostProcessError::InvalidPartNumber(message)) => {
                warn!(%message, "Invalid part number");
                Outcome::failure(ErrorKind::InvalidPartNumber, message)
            }
        }
    }

    async fn fetch_original(
        &self,
        event: &ObjectLambdaEvent,
    ) -> Result<OriginResponse, FetchError> {
        let url = &event.get_object_context.input_s3_url;
        let headers = reconcile(url, &event.user_request.headers)?;

        self.fetcher.fetch(url, &headers).await
    }
}
