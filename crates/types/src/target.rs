//! Probe target identity

use serde::{Deserialize, Serialize};

/// One (server, domain) pair probed on every cycle.
///
/// Targets are created once at startup from the cross product of the
/// configured servers and domains and never added or removed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProbeTarget {
	/// Nameserver address, e.g. `8.8.8.8` or `127.0.0.1:5353`
	pub server: String,
	/// Domain queried against the server, e.g. `example.com`
	pub domain: String,
}

impl ProbeTarget {
	pub fn new(server: impl Into<String>, domain: impl Into<String>) -> Self {
		Self {
			server: server.into(),
			domain: domain.into(),
		}
	}
}

impl std::fmt::Display for ProbeTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} @ {}", self.domain, self.server)
	}
}

/// Build the full target set as the cross product of servers and domains.
pub fn probe_targets(servers: &[String], domains: &[String]) -> Vec<ProbeTarget> {
	servers
		.iter()
		.flat_map(|server| {
			domains
				.iter()
				.map(move |domain| ProbeTarget::new(server.clone(), domain.clone()))
		})
		.collect()
}
