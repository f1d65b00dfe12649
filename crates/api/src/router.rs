use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::handlers::{health, metrics, targets};
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
	let trace = TraceLayer::new_for_http()
		.make_span_with(|req: &axum::http::Request<_>| {
			tracing::info_span!(
				"http_request",
				method = %req.method(),
				uri = %req.uri(),
			)
		})
		.on_response(
			tower_http::trace::DefaultOnResponse::new()
				.level(Level::DEBUG)
				.latency_unit(tower_http::LatencyUnit::Millis),
		);

	Router::new()
		.route("/health", get(health))
		.route("/metrics", get(metrics))
		.route("/targets", get(targets))
		.layer(trace)
}
