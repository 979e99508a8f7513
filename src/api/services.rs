use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::state::AppState;
use super::utils::require_json;
use crate::api::error::ApiError;
use crate::event::ObjectLambdaEvent;
use crate::response::{HttpResponseHandler, ResponseHandler};

/// Invocation endpoint (POST /invoke)
///
/// ## Flow:
/// 1. Require a JSON body of at most `server.max_event_bytes` after gzip
///    decompression by middleware
/// 2. Deserialize the [`ObjectLambdaEvent`]
/// 3. Run the GetObject pipeline under a per-invocation span
/// 4. Render the outcome with [`HttpResponseHandler`]
///
/// Errors here concern the envelope only; every pipeline failure is rendered
/// as a forwarded error response, never as an [`ApiError`].
pub async fn invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<Response, ApiError> {
    require_json(&headers)?;

    // Counts decompressed bytes and stops reading once the limit is passed
    let limit = usize::try_from(state.config.server.max_event_bytes.as_u64()).unwrap_or(usize::MAX);
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| {
            if e.is::<LengthLimitError>() {
                ApiError::PayloadTooLarge(limit)
            } else {
                ApiError::InvalidPayload(format!("failed to read body: {e}"))
            }
        })?
        .to_bytes();

    let event: ObjectLambdaEvent = serde_json::from_slice(&bytes)?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "invoke",
        %request_id,
        route = %event.get_object_context.output_route
    );

    state.metrics.invocation_started();
    let outcome = state.handler.handle(&event).instrument(span.clone()).await;
    state.metrics.record(&outcome);

    span.in_scope(|| {
        info!(
            success = outcome.is_success(),
            kind = ?outcome.kind(),
            "Invocation complete"
        )
    });

    let responder = HttpResponseHandler::from_context(&event.get_object_context);
    Ok(responder.dispatch(outcome))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
