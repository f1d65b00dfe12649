//! HTTP handlers

mod health;
mod metrics;
mod targets;

pub use health::health;
pub use metrics::metrics;
pub use targets::{targets, TargetReport};
