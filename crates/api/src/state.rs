use std::sync::Arc;

use dnsexp_service::Aggregator;

use crate::publisher::PrometheusPublisher;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub aggregator: Arc<Aggregator>,
	pub metrics: Arc<PrometheusPublisher>,
}
