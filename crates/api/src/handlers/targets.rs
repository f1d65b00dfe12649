use axum::extract::State;
use axum::response::Json;
use chrono::Utc;
use serde::Serialize;

use dnsexp_types::{OutcomeCounters, ProbeTarget, TargetStatistics};

use crate::state::AppState;

/// One target's statistics as served by `GET /targets`.
#[derive(Debug, Serialize)]
pub struct TargetReport {
	pub server: String,
	pub domain: String,
	pub sample_count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avg_seconds: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_seconds: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_seconds: Option<f64>,
	pub counters: OutcomeCounters,
}

impl TargetReport {
	fn from_stats(target: ProbeTarget, stats: TargetStatistics) -> Self {
		Self {
			server: target.server,
			domain: target.domain,
			sample_count: stats.sample_count,
			avg_seconds: stats.latency.map(|l| l.avg.as_secs_f64()),
			min_seconds: stats.latency.map(|l| l.min.as_secs_f64()),
			max_seconds: stats.latency.map(|l| l.max.as_secs_f64()),
			counters: stats.counters,
		}
	}
}

/// GET /targets - current statistics for every probe target, recomputed on
/// demand against "now". A read overlapping a probe cycle may mix targets
/// from two cycles; each individual target is internally consistent.
pub async fn targets(State(state): State<AppState>) -> Json<Vec<TargetReport>> {
	let now = Utc::now();
	let reports = state
		.aggregator
		.recompute_all(now)
		.into_iter()
		.map(|(target, stats)| TargetReport::from_stats(target, stats))
		.collect();
	Json(reports)
}
