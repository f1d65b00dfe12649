//! Probe scheduling and sliding-window aggregation
//!
//! This crate is the exporter's core: the per-target sample store, the
//! probe dispatcher, the cycle scheduler, and the aggregator that turns a
//! trimmed window plus lifetime counters into publishable statistics.

pub mod aggregator;
pub mod dispatcher;
pub mod registry;
pub mod scheduler;

pub use aggregator::{Aggregator, StatisticsPublisher};
pub use dispatcher::{ProbeDispatcher, PROBE_DEADLINE};
pub use registry::{ProbeRegistry, RegistryError};
pub use scheduler::ProbeScheduler;
