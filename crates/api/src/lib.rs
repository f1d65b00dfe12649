//! HTTP exposition surface for the DNS exporter

pub mod handlers;
pub mod publisher;
pub mod router;
pub mod state;

pub use publisher::{PrometheusPublisher, PublishError};
pub use router::create_router;
pub use state::AppState;
