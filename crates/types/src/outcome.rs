//! Probe outcome classification

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A successful probe at or above this latency bumps the high-latency counter.
pub const HIGH_LATENCY_THRESHOLD: Duration = Duration::from_secs(1);

/// The classified result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
	/// The server returned a positive answer; payload is the measured latency.
	Success(Duration),
	/// The server responded but carried no records for the queried name.
	NoAnswer,
	/// A single attempt timed out, or the probe exceeded the dispatcher's
	/// own deadline.
	Timeout,
	/// The resolver exhausted its overall retry budget.
	LifetimeTimeout,
	/// A protocol-level failure reported by the resolver.
	ProtocolError,
	/// Transport failures and anything else unclassifiable.
	OtherFailure,
}

impl Outcome {
	pub fn kind(&self) -> OutcomeKind {
		match self {
			Outcome::Success(_) => OutcomeKind::Success,
			Outcome::NoAnswer => OutcomeKind::NoAnswer,
			Outcome::Timeout => OutcomeKind::Timeout,
			Outcome::LifetimeTimeout => OutcomeKind::LifetimeTimeout,
			Outcome::ProtocolError => OutcomeKind::ProtocolError,
			Outcome::OtherFailure => OutcomeKind::OtherFailure,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Outcome::Success(_))
	}

	/// Measured latency, present for successes only.
	pub fn latency(&self) -> Option<Duration> {
		match self {
			Outcome::Success(latency) => Some(*latency),
			_ => None,
		}
	}

	pub fn is_high_latency(&self) -> bool {
		self.latency()
			.is_some_and(|latency| latency >= HIGH_LATENCY_THRESHOLD)
	}
}

/// Payload-free discriminant of [`Outcome`], used for logging and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
	Success,
	NoAnswer,
	Timeout,
	LifetimeTimeout,
	ProtocolError,
	OtherFailure,
}

impl OutcomeKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			OutcomeKind::Success => "success",
			OutcomeKind::NoAnswer => "no_answer",
			OutcomeKind::Timeout => "timeout",
			OutcomeKind::LifetimeTimeout => "lifetime_timeout",
			OutcomeKind::ProtocolError => "protocol_error",
			OutcomeKind::OtherFailure => "other_failure",
		}
	}
}

impl std::fmt::Display for OutcomeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Tagged failure returned by the resolution capability.
///
/// Consumed via exhaustive matching; failure detail stays in the error for
/// logging and never becomes a metric label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveFailure {
	#[error("no answer for the queried name")]
	NoAnswer,
	#[error("single probe attempt timed out")]
	Timeout,
	#[error("overall query lifetime exceeded")]
	LifetimeTimeout,
	#[error("protocol error: {0}")]
	Protocol(String),
	#[error("resolution failed: {0}")]
	Other(String),
}

impl ResolveFailure {
	pub fn into_outcome(self) -> Outcome {
		match self {
			ResolveFailure::NoAnswer => Outcome::NoAnswer,
			ResolveFailure::Timeout => Outcome::Timeout,
			ResolveFailure::LifetimeTimeout => Outcome::LifetimeTimeout,
			ResolveFailure::Protocol(_) => Outcome::ProtocolError,
			ResolveFailure::Other(_) => Outcome::OtherFailure,
		}
	}

	pub fn kind(&self) -> OutcomeKind {
		match self {
			ResolveFailure::NoAnswer => OutcomeKind::NoAnswer,
			ResolveFailure::Timeout => OutcomeKind::Timeout,
			ResolveFailure::LifetimeTimeout => OutcomeKind::LifetimeTimeout,
			ResolveFailure::Protocol(_) => OutcomeKind::ProtocolError,
			ResolveFailure::Other(_) => OutcomeKind::OtherFailure,
		}
	}
}
