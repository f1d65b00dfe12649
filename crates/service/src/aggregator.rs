//! Window aggregation and publication

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use dnsexp_types::{ProbeTarget, TargetStatistics};

use crate::registry::{ProbeRegistry, RegistryError};

/// Seam between aggregation and the exposition backend. Implemented by the
/// Prometheus publisher; mocked in tests.
#[cfg_attr(test, mockall::automock)]
pub trait StatisticsPublisher: Send + Sync {
	fn publish(&self, target: &ProbeTarget, stats: &TargetStatistics);
}

/// Recomputes per-target statistics from the sample store.
///
/// Owns no state of its own: each recompute trims the target's window to
/// the configured size relative to `now` and derives statistics from
/// whatever remains, plus the lifetime counters.
pub struct Aggregator {
	registry: Arc<ProbeRegistry>,
	window: Duration,
	publisher: Arc<dyn StatisticsPublisher>,
}

impl Aggregator {
	pub fn new(
		registry: Arc<ProbeRegistry>,
		window: Duration,
		publisher: Arc<dyn StatisticsPublisher>,
	) -> Self {
		Self {
			registry,
			window,
			publisher,
		}
	}

	/// Trim the target's window and compute fresh statistics.
	pub fn recompute(
		&self,
		target: &ProbeTarget,
		now: DateTime<Utc>,
	) -> Result<TargetStatistics, RegistryError> {
		self.registry.aggregate(target, now, self.window)
	}

	/// Recompute and push the result to the publisher. An unknown target is
	/// logged and skipped; it cannot fail the cycle.
	pub fn recompute_and_publish(&self, target: &ProbeTarget, now: DateTime<Utc>) {
		match self.recompute(target, now) {
			Ok(stats) => self.publisher.publish(target, &stats),
			Err(err) => warn!(target = %target, error = %err, "skipping publication"),
		}
	}

	/// Fresh statistics for every registered target, for on-demand readers.
	pub fn recompute_all(&self, now: DateTime<Utc>) -> Vec<(ProbeTarget, TargetStatistics)> {
		self.registry
			.targets()
			.into_iter()
			.filter_map(|target| {
				self.recompute(&target, now)
					.ok()
					.map(|stats| (target, stats))
			})
			.collect()
	}
}
