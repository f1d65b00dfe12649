//! Prometheus gauge families for per-target statistics
//!
//! Metric names carry the window size suffix (e.g.
//! `dns_response_avg_seconds_60s`) so a scrape always says what span the
//! latency figures cover. Latency gauges for a target are removed, not
//! zeroed, when its window holds no successful sample: a scrape must never
//! show a stale or fabricated latency.

use prometheus::{Encoder, GaugeVec, IntGaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

use dnsexp_service::StatisticsPublisher;
use dnsexp_types::{ProbeTarget, TargetStatistics};

const LABELS: &[&str] = &["server", "domain"];

#[derive(Debug, Error)]
pub enum PublishError {
	#[error("metric registration failed: {0}")]
	Registration(#[from] prometheus::Error),
}

pub struct PrometheusPublisher {
	registry: Registry,
	response_avg: GaugeVec,
	response_min: GaugeVec,
	response_max: GaugeVec,
	queue_length: IntGaugeVec,
	no_answer: IntGaugeVec,
	timeouts: IntGaugeVec,
	lifetime_timeout: IntGaugeVec,
	protocol_errors: IntGaugeVec,
	other_failures: IntGaugeVec,
	high_latency: IntGaugeVec,
}

fn gauge(registry: &Registry, name: String, help: String) -> Result<GaugeVec, PublishError> {
	let gauge = GaugeVec::new(Opts::new(name, help), LABELS)?;
	registry.register(Box::new(gauge.clone()))?;
	Ok(gauge)
}

fn int_gauge(registry: &Registry, name: String, help: String) -> Result<IntGaugeVec, PublishError> {
	let gauge = IntGaugeVec::new(Opts::new(name, help), LABELS)?;
	registry.register(Box::new(gauge.clone()))?;
	Ok(gauge)
}

impl PrometheusPublisher {
	pub fn new(window_secs: i64) -> Result<Self, PublishError> {
		let registry = Registry::new();
		let w = window_secs;

		Ok(Self {
			response_avg: gauge(
				&registry,
				format!("dns_response_avg_seconds_{w}s"),
				format!("Average DNS response time over {w}s"),
			)?,
			response_min: gauge(
				&registry,
				format!("dns_response_min_seconds_{w}s"),
				format!("Minimum DNS response time over {w}s"),
			)?,
			response_max: gauge(
				&registry,
				format!("dns_response_max_seconds_{w}s"),
				format!("Maximum DNS response time over {w}s"),
			)?,
			queue_length: int_gauge(
				&registry,
				format!("dns_response_queue_length_{w}s"),
				format!("Number of response samples currently in the {w}s window"),
			)?,
			no_answer: int_gauge(
				&registry,
				format!("dns_no_answer_total_{w}s"),
				"Cumulative DNS responses with no answer".to_string(),
			)?,
			timeouts: int_gauge(
				&registry,
				format!("dns_timeouts_total_{w}s"),
				"Cumulative DNS probe timeouts".to_string(),
			)?,
			lifetime_timeout: int_gauge(
				&registry,
				format!("dns_lifetime_timeout_total_{w}s"),
				"Cumulative DNS queries that exhausted their retry budget".to_string(),
			)?,
			protocol_errors: int_gauge(
				&registry,
				format!("dns_protocol_errors_total_{w}s"),
				"Cumulative protocol-level DNS failures".to_string(),
			)?,
			other_failures: int_gauge(
				&registry,
				format!("dns_other_failures_total_{w}s"),
				"Cumulative unclassified DNS failures".to_string(),
			)?,
			high_latency: int_gauge(
				&registry,
				format!("dns_high_latency_total_{w}s"),
				"Cumulative DNS queries at or above the 1s latency threshold".to_string(),
			)?,
			registry,
		})
	}

	/// Render the current metric values in the Prometheus text format.
	pub fn encode(&self) -> Result<String, prometheus::Error> {
		let mut buffer = Vec::new();
		TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
		Ok(String::from_utf8_lossy(&buffer).into_owned())
	}
}

impl StatisticsPublisher for PrometheusPublisher {
	fn publish(&self, target: &ProbeTarget, stats: &TargetStatistics) {
		let labels = [target.server.as_str(), target.domain.as_str()];

		self.queue_length
			.with_label_values(&labels)
			.set(stats.sample_count as i64);

		match &stats.latency {
			Some(summary) => {
				self.response_avg
					.with_label_values(&labels)
					.set(summary.avg.as_secs_f64());
				self.response_min
					.with_label_values(&labels)
					.set(summary.min.as_secs_f64());
				self.response_max
					.with_label_values(&labels)
					.set(summary.max.as_secs_f64());
			},
			None => {
				// remove_label_values errs when the series was never set;
				// that is the desired end state either way
				let _ = self.response_avg.remove_label_values(&labels);
				let _ = self.response_min.remove_label_values(&labels);
				let _ = self.response_max.remove_label_values(&labels);
			},
		}

		let counters = &stats.counters;
		self.no_answer
			.with_label_values(&labels)
			.set(counters.no_answer as i64);
		self.timeouts
			.with_label_values(&labels)
			.set(counters.timeout as i64);
		self.lifetime_timeout
			.with_label_values(&labels)
			.set(counters.lifetime_timeout as i64);
		self.protocol_errors
			.with_label_values(&labels)
			.set(counters.protocol_error as i64);
		self.other_failures
			.with_label_values(&labels)
			.set(counters.other_failure as i64);
		self.high_latency
			.with_label_values(&labels)
			.set(counters.high_latency as i64);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dnsexp_types::{LatencySummary, OutcomeCounters};
	use std::time::Duration;

	fn target() -> ProbeTarget {
		ProbeTarget::new("8.8.8.8", "example.com")
	}

	fn stats_with_latency() -> TargetStatistics {
		TargetStatistics {
			sample_count: 2,
			latency: Some(LatencySummary {
				avg: Duration::from_millis(35),
				min: Duration::from_millis(30),
				max: Duration::from_millis(40),
			}),
			counters: OutcomeCounters {
				timeout: 3,
				..OutcomeCounters::default()
			},
		}
	}

	#[test]
	fn publish_exposes_latency_and_counters() {
		let publisher = PrometheusPublisher::new(60).unwrap();
		publisher.publish(&target(), &stats_with_latency());

		let text = publisher.encode().unwrap();
		assert!(text.contains("dns_response_avg_seconds_60s"));
		assert!(text.contains("0.035"));
		assert!(text.contains("dns_timeouts_total_60s"));
		assert!(text.contains("dns_response_queue_length_60s"));
	}

	#[test]
	fn empty_window_removes_latency_series_instead_of_zeroing() {
		let publisher = PrometheusPublisher::new(60).unwrap();
		publisher.publish(&target(), &stats_with_latency());

		let empty = TargetStatistics {
			sample_count: 0,
			latency: None,
			counters: OutcomeCounters {
				timeout: 4,
				..OutcomeCounters::default()
			},
		};
		publisher.publish(&target(), &empty);

		let text = publisher.encode().unwrap();
		// No latency sample line remains for this target
		assert!(!text.contains("dns_response_avg_seconds_60s{"));
		// The counter and queue length survive
		assert!(text.contains("dns_timeouts_total_60s"));
		assert!(text.contains("dns_response_queue_length_60s"));
	}

	#[test]
	fn labels_carry_server_and_domain() {
		let publisher = PrometheusPublisher::new(60).unwrap();
		publisher.publish(&target(), &stats_with_latency());

		let text = publisher.encode().unwrap();
		assert!(text.contains(r#"server="8.8.8.8""#));
		assert!(text.contains(r#"domain="example.com""#));
	}
}
