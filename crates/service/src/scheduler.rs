//! Fixed-cadence probe cycles
//!
//! One cycle probes every target concurrently, waits for all of them, then
//! recomputes and publishes every target's statistics. The cadence comes
//! from `tokio::time::interval`, whose tick schedule is anchored to the
//! previous scheduled tick rather than to "now", so cycle overruns do not
//! accumulate drift; an overrunning cycle starts the next one immediately.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::aggregator::Aggregator;
use crate::dispatcher::ProbeDispatcher;
use crate::registry::ProbeRegistry;

pub struct ProbeScheduler {
	dispatcher: Arc<ProbeDispatcher>,
	aggregator: Arc<Aggregator>,
	registry: Arc<ProbeRegistry>,
	interval: Duration,
}

impl ProbeScheduler {
	pub fn new(
		dispatcher: Arc<ProbeDispatcher>,
		aggregator: Arc<Aggregator>,
		registry: Arc<ProbeRegistry>,
		interval: Duration,
	) -> Self {
		Self {
			dispatcher,
			aggregator,
			registry,
			interval,
		}
	}

	/// Drive cycles until the process terminates.
	pub async fn run(self) {
		let mut ticker = tokio::time::interval(self.interval);
		loop {
			ticker.tick().await;
			self.run_cycle().await;
		}
	}

	/// One full cycle: probe all targets concurrently, barrier, aggregate.
	pub async fn run_cycle(&self) {
		let targets = self.registry.targets();
		debug!(targets = targets.len(), "starting probe cycle");

		stream::iter(targets.iter())
			.for_each_concurrent(None, |target| {
				let dispatcher = Arc::clone(&self.dispatcher);
				async move {
					dispatcher.probe(target).await;
				}
			})
			.await;

		let now = Utc::now();
		for target in &targets {
			self.aggregator.recompute_and_publish(target, now);
		}
		debug!("probe cycle complete");
	}
}
