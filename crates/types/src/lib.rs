//! Core domain types for the DNS exporter
//!
//! Everything here is plain data: probe targets, probe outcomes, the
//! sliding sample window and the statistics derived from it. No I/O and
//! no async machinery beyond the `ResolveCapability` trait definition.

pub mod outcome;
pub mod resolve;
pub mod stats;
pub mod target;
pub mod window;

pub use outcome::{Outcome, OutcomeKind, ResolveFailure, HIGH_LATENCY_THRESHOLD};
pub use resolve::{AddressAnswer, ResolveCapability};
pub use stats::{LatencySummary, OutcomeCounters, TargetStatistics};
pub use target::{probe_targets, ProbeTarget};
pub use window::{Sample, SampleWindow};

// Re-export for downstream convenience
pub use chrono;
