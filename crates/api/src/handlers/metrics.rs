use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::state::AppState;

/// Prometheus text exposition content type
const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// GET /metrics - Prometheus scrape endpoint.
///
/// Serves whatever the last completed cycle published; it never waits for
/// an in-flight cycle.
pub async fn metrics(State(state): State<AppState>) -> Response {
	match state.metrics.encode() {
		Ok(body) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
		Err(err) => {
			error!(error = %err, "failed to encode metrics");
			StatusCode::INTERNAL_SERVER_ERROR.into_response()
		},
	}
}
