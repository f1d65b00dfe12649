//! Per-target sample store and lifetime counters
//!
//! The registry is the only mutable shared state in the exporter. It owns
//! one window plus one counter set per probe target, keyed by a map that is
//! frozen at construction: targets are never added or removed at runtime,
//! and an unknown target is an error, not a fresh entry.
//!
//! Each target's state sits behind its own mutex, so probes on different
//! targets never contend and there is no global lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use dnsexp_types::{
	Outcome, OutcomeCounters, ProbeTarget, Sample, SampleWindow, TargetStatistics,
	HIGH_LATENCY_THRESHOLD,
};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
	#[error("unknown probe target: {0}")]
	UnknownTarget(ProbeTarget),
}

#[derive(Debug, Default)]
struct TargetState {
	window: SampleWindow,
	counters: OutcomeCounters,
}

/// Registry of per-target windows and counters.
pub struct ProbeRegistry {
	targets: HashMap<ProbeTarget, Mutex<TargetState>>,
}

impl ProbeRegistry {
	/// Pre-allocate state for the given target set. Duplicates collapse.
	pub fn new(targets: impl IntoIterator<Item = ProbeTarget>) -> Self {
		Self {
			targets: targets
				.into_iter()
				.map(|target| (target, Mutex::new(TargetState::default())))
				.collect(),
		}
	}

	/// All registered targets, in a stable order.
	pub fn targets(&self) -> Vec<ProbeTarget> {
		let mut targets: Vec<_> = self.targets.keys().cloned().collect();
		targets.sort();
		targets
	}

	pub fn len(&self) -> usize {
		self.targets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	fn state(&self, target: &ProbeTarget) -> Result<MutexGuard<'_, TargetState>, RegistryError> {
		let state = self
			.targets
			.get(target)
			.ok_or_else(|| RegistryError::UnknownTarget(target.clone()))?;
		// A panicked probe task must not wedge the target forever; the
		// state itself stays consistent because all updates are single
		// operations behind the lock.
		Ok(state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
	}

	/// Record one probe result. Successes enter the window (and bump the
	/// high-latency counter at >= 1s); failures bump their lifetime counter
	/// and never occupy a window slot.
	pub fn record(&self, target: &ProbeTarget, sample: Sample) -> Result<(), RegistryError> {
		let mut state = self.state(target)?;
		match &sample.outcome {
			Outcome::Success(latency) => {
				if *latency >= HIGH_LATENCY_THRESHOLD {
					state.counters.record_high_latency();
				}
				state.window.push(sample);
			},
			failure => state.counters.record_failure(failure.kind()),
		}
		Ok(())
	}

	/// Front-evict samples older than `now - window`. Idempotent.
	pub fn trim(
		&self,
		target: &ProbeTarget,
		now: DateTime<Utc>,
		window: Duration,
	) -> Result<usize, RegistryError> {
		Ok(self.state(target)?.window.trim(now, window))
	}

	/// Copy-on-read view of the target's current samples.
	pub fn snapshot(&self, target: &ProbeTarget) -> Result<Vec<Sample>, RegistryError> {
		Ok(self.state(target)?.window.snapshot())
	}

	/// Current lifetime counters for the target.
	pub fn counters(&self, target: &ProbeTarget) -> Result<OutcomeCounters, RegistryError> {
		Ok(self.state(target)?.counters)
	}

	/// Trim, then compute statistics, under a single lock acquisition so the
	/// reported count always matches the window the latency summary was
	/// computed from.
	pub fn aggregate(
		&self,
		target: &ProbeTarget,
		now: DateTime<Utc>,
		window: Duration,
	) -> Result<TargetStatistics, RegistryError> {
		let mut state = self.state(target)?;
		state.window.trim(now, window);
		Ok(TargetStatistics::from_window(&state.window, state.counters))
	}
}
