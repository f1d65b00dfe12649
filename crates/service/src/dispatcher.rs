//! Probe dispatch and outcome classification
//!
//! One probe = one resolution attempt against one (server, domain) pair,
//! wall-clock timed and classified into an [`Outcome`]. Every branch ends
//! in a recorded sample plus a logged diagnostic; nothing escapes the
//! dispatcher, so one failing target can never abort a cycle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, warn};

use dnsexp_types::{Outcome, ProbeTarget, ResolveCapability, Sample};

use crate::registry::ProbeRegistry;

/// Hard deadline around a single probe. The resolution capability bounds
/// its own lifetime well below this; the deadline only guards against a
/// capability that fails to honour that contract.
pub const PROBE_DEADLINE: Duration = Duration::from_secs(10);

pub struct ProbeDispatcher {
	resolver: Arc<dyn ResolveCapability>,
	registry: Arc<ProbeRegistry>,
}

impl ProbeDispatcher {
	pub fn new(resolver: Arc<dyn ResolveCapability>, registry: Arc<ProbeRegistry>) -> Self {
		Self { resolver, registry }
	}

	/// Probe one target and record the classified sample.
	pub async fn probe(&self, target: &ProbeTarget) -> Sample {
		let timestamp = Utc::now();
		let started = Instant::now();

		let outcome = match timeout(PROBE_DEADLINE, self.resolver.resolve(target)).await {
			Ok(Ok(answer)) => {
				let elapsed = started.elapsed();
				debug!(
					target = %target,
					records = answer.addresses.len(),
					elapsed_ms = elapsed.as_millis() as u64,
					"probe succeeded"
				);
				Outcome::Success(elapsed)
			},
			Ok(Err(failure)) => {
				warn!(
					target = %target,
					kind = failure.kind().as_str(),
					error = %failure,
					"probe failed"
				);
				failure.into_outcome()
			},
			Err(_) => {
				warn!(
					target = %target,
					deadline_s = PROBE_DEADLINE.as_secs(),
					"probe exceeded dispatcher deadline"
				);
				Outcome::Timeout
			},
		};

		let sample = Sample::new(timestamp, outcome);
		if let Err(err) = self.registry.record(target, sample.clone()) {
			warn!(target = %target, error = %err, "dropping sample for unregistered target");
		}
		sample
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use dnsexp_types::{AddressAnswer, ResolveFailure};
	use std::collections::HashMap;
	use std::net::Ipv4Addr;

	/// Capability stub returning a scripted result per server.
	struct ScriptedResolver {
		script: HashMap<String, Result<AddressAnswer, ResolveFailure>>,
	}

	impl ScriptedResolver {
		fn new(
			script: impl IntoIterator<Item = (&'static str, Result<AddressAnswer, ResolveFailure>)>,
		) -> Self {
			Self {
				script: script
					.into_iter()
					.map(|(server, result)| (server.to_string(), result))
					.collect(),
			}
		}
	}

	#[async_trait]
	impl ResolveCapability for ScriptedResolver {
		async fn resolve(&self, target: &ProbeTarget) -> Result<AddressAnswer, ResolveFailure> {
			self.script
				.get(&target.server)
				.cloned()
				.unwrap_or_else(|| Err(ResolveFailure::Other("unscripted server".into())))
		}
	}

	/// Capability stub that never completes a resolution.
	struct StalledResolver;

	#[async_trait]
	impl ResolveCapability for StalledResolver {
		async fn resolve(&self, _target: &ProbeTarget) -> Result<AddressAnswer, ResolveFailure> {
			std::future::pending().await
		}
	}

	fn answer() -> AddressAnswer {
		AddressAnswer {
			addresses: vec![Ipv4Addr::new(93, 184, 216, 34)],
		}
	}

	#[tokio::test]
	async fn success_is_timed_and_recorded() {
		let target = ProbeTarget::new("8.8.8.8", "example.com");
		let registry = Arc::new(ProbeRegistry::new([target.clone()]));
		let resolver = Arc::new(ScriptedResolver::new([("8.8.8.8", Ok(answer()))]));
		let dispatcher = ProbeDispatcher::new(resolver, Arc::clone(&registry));

		let sample = dispatcher.probe(&target).await;

		assert!(sample.outcome.is_success());
		assert_eq!(registry.snapshot(&target).unwrap().len(), 1);
	}

	#[tokio::test]
	async fn failure_bumps_counter_and_returns_a_sample() {
		let target = ProbeTarget::new("8.8.8.8", "example.com");
		let registry = Arc::new(ProbeRegistry::new([target.clone()]));
		let resolver = Arc::new(ScriptedResolver::new([(
			"8.8.8.8",
			Err(ResolveFailure::LifetimeTimeout),
		)]));
		let dispatcher = ProbeDispatcher::new(resolver, Arc::clone(&registry));

		let sample = dispatcher.probe(&target).await;

		assert_eq!(sample.outcome, Outcome::LifetimeTimeout);
		assert!(registry.snapshot(&target).unwrap().is_empty());
		assert_eq!(registry.counters(&target).unwrap().lifetime_timeout, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn wedged_capability_hits_the_dispatcher_deadline() {
		let target = ProbeTarget::new("8.8.8.8", "example.com");
		let registry = Arc::new(ProbeRegistry::new([target.clone()]));
		let dispatcher = ProbeDispatcher::new(Arc::new(StalledResolver), Arc::clone(&registry));

		// Paused time auto-advances past PROBE_DEADLINE
		let sample = dispatcher.probe(&target).await;

		assert_eq!(sample.outcome, Outcome::Timeout);
		assert!(registry.snapshot(&target).unwrap().is_empty());
		assert_eq!(registry.counters(&target).unwrap().timeout, 1);
	}

	#[tokio::test]
	async fn unregistered_target_is_logged_not_fatal() {
		let registry = Arc::new(ProbeRegistry::new([]));
		let resolver = Arc::new(ScriptedResolver::new([("8.8.8.8", Ok(answer()))]));
		let dispatcher = ProbeDispatcher::new(resolver, registry);

		// Must not panic even though the registry has no such target
		let sample = dispatcher
			.probe(&ProbeTarget::new("8.8.8.8", "example.com"))
			.await;
		assert!(sample.outcome.is_success());
	}
}
