//! Sliding sample window
//!
//! The window is a time-ordered sequence of probe samples. Probes append in
//! real time, so insertion order equals timestamp order; eviction only ever
//! removes from the front. Samples are immutable once pushed.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// One timestamped probe result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
	pub timestamp: DateTime<Utc>,
	pub outcome: Outcome,
}

impl Sample {
	pub fn new(timestamp: DateTime<Utc>, outcome: Outcome) -> Self {
		Self { timestamp, outcome }
	}
}

/// Time-ordered window of samples with front-only eviction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleWindow {
	samples: VecDeque<Sample>,
}

impl SampleWindow {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a sample. O(1) amortized.
	pub fn push(&mut self, sample: Sample) {
		self.samples.push_back(sample);
	}

	/// Evict every sample older than `now - window`, returning how many were
	/// removed. A sample exactly `window` old is retained. Idempotent: a
	/// second trim with the same `now` removes nothing.
	pub fn trim(&mut self, now: DateTime<Utc>, window: Duration) -> usize {
		let mut evicted = 0;
		while let Some(oldest) = self.samples.front() {
			if now.signed_duration_since(oldest.timestamp) > window {
				self.samples.pop_front();
				evicted += 1;
			} else {
				break;
			}
		}
		evicted
	}

	pub fn len(&self) -> usize {
		self.samples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Sample> {
		self.samples.iter()
	}

	/// Clone out the current contents for read-only consumption.
	pub fn snapshot(&self) -> Vec<Sample> {
		self.samples.iter().cloned().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use std::time::Duration as StdDuration;

	fn at(secs: i64) -> DateTime<Utc> {
		Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
	}

	fn success_at(secs: i64, latency_ms: u64) -> Sample {
		Sample::new(
			at(secs),
			Outcome::Success(StdDuration::from_millis(latency_ms)),
		)
	}

	#[test]
	fn trim_evicts_only_samples_older_than_the_window() {
		let mut window = SampleWindow::new();
		window.push(success_at(0, 20));
		window.push(success_at(30, 40));
		window.push(success_at(65, 30));

		// 65 - 0 = 65 > 60 evicts the first sample only
		let evicted = window.trim(at(65), Duration::seconds(60));

		assert_eq!(evicted, 1);
		assert_eq!(window.len(), 2);
		for sample in window.iter() {
			assert!(at(65).signed_duration_since(sample.timestamp) <= Duration::seconds(60));
		}
	}

	#[test]
	fn sample_exactly_window_old_is_retained() {
		let mut window = SampleWindow::new();
		window.push(success_at(5, 10));

		let evicted = window.trim(at(65), Duration::seconds(60));

		assert_eq!(evicted, 0);
		assert_eq!(window.len(), 1);
	}

	#[test]
	fn trim_is_idempotent() {
		let mut window = SampleWindow::new();
		for secs in [0, 10, 30, 50, 70] {
			window.push(success_at(secs, 25));
		}

		window.trim(at(75), Duration::seconds(60));
		let after_first: Vec<_> = window.snapshot();
		let evicted_again = window.trim(at(75), Duration::seconds(60));

		assert_eq!(evicted_again, 0);
		assert_eq!(window.snapshot(), after_first);
	}

	#[test]
	fn insertion_order_is_preserved() {
		let mut window = SampleWindow::new();
		window.push(success_at(1, 11));
		window.push(success_at(2, 22));
		window.push(success_at(3, 33));

		let timestamps: Vec<_> = window.iter().map(|s| s.timestamp).collect();
		assert_eq!(timestamps, vec![at(1), at(2), at(3)]);
	}

	#[test]
	fn trim_on_empty_window_is_a_noop() {
		let mut window = SampleWindow::new();
		assert_eq!(window.trim(at(100), Duration::seconds(60)), 0);
		assert!(window.is_empty());
	}
}
