//! Derived per-target statistics
//!
//! Latency statistics and the sample count are windowed; the outcome
//! counters are lifetime-cumulative since process start and are never
//! reset by trimming.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::outcome::OutcomeKind;
use crate::window::SampleWindow;

/// Lifetime-cumulative outcome counters for one target.
///
/// Monotonically non-decreasing for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounters {
	pub no_answer: u64,
	pub timeout: u64,
	pub lifetime_timeout: u64,
	pub protocol_error: u64,
	pub other_failure: u64,
	pub high_latency: u64,
}

impl OutcomeCounters {
	/// Bump the counter matching a failure kind. Success is not a failure
	/// and is ignored here; high latency has its own method because it
	/// applies to successes.
	pub fn record_failure(&mut self, kind: OutcomeKind) {
		match kind {
			OutcomeKind::NoAnswer => self.no_answer += 1,
			OutcomeKind::Timeout => self.timeout += 1,
			OutcomeKind::LifetimeTimeout => self.lifetime_timeout += 1,
			OutcomeKind::ProtocolError => self.protocol_error += 1,
			OutcomeKind::OtherFailure => self.other_failure += 1,
			OutcomeKind::Success => {},
		}
	}

	pub fn record_high_latency(&mut self) {
		self.high_latency += 1;
	}

	pub fn total_failures(&self) -> u64 {
		self.no_answer + self.timeout + self.lifetime_timeout + self.protocol_error + self.other_failure
	}
}

/// Latency summary over the successful samples of a trimmed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySummary {
	pub avg: Duration,
	pub min: Duration,
	pub max: Duration,
}

/// Snapshot of one target's published statistics.
///
/// `sample_count` always equals the length of the window the latency
/// summary was computed from. `latency` is absent when the window holds no
/// successful sample; a zero or stale value is never published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStatistics {
	pub sample_count: usize,
	pub latency: Option<LatencySummary>,
	pub counters: OutcomeCounters,
}

impl TargetStatistics {
	/// Compute statistics from an already-trimmed window plus the lifetime
	/// counters. Pure: no side effects on either input.
	pub fn from_window(window: &SampleWindow, counters: OutcomeCounters) -> Self {
		let latencies: Vec<Duration> = window
			.iter()
			.filter_map(|sample| sample.outcome.latency())
			.collect();

		let latency = latencies.split_first().map(|(first, rest)| {
			let mut sum = *first;
			let mut min = *first;
			let mut max = *first;
			for value in rest {
				sum += *value;
				min = min.min(*value);
				max = max.max(*value);
			}
			LatencySummary {
				avg: sum / latencies.len() as u32,
				min,
				max,
			}
		});

		Self {
			sample_count: window.len(),
			latency,
			counters,
		}
	}
}
