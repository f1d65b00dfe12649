//! Per-server hickory resolvers and error classification

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;
use thiserror::Error;
use tracing::debug;

use dnsexp_types::{AddressAnswer, ProbeTarget, ResolveCapability, ResolveFailure};

/// Timeout for a single query attempt.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);
/// Attempts per query; the overall lifetime is bounded by
/// `ATTEMPT_TIMEOUT * ATTEMPTS`.
const ATTEMPTS: usize = 2;

#[derive(Debug, Error)]
pub enum ResolverBuildError {
	#[error("invalid DNS server address '{server}': {reason}")]
	InvalidServer { server: String, reason: String },
}

/// A-record prober holding one pre-built resolver per configured server.
pub struct HickoryResolver {
	resolvers: HashMap<String, TokioAsyncResolver>,
}

impl HickoryResolver {
	/// Build a resolver for every configured server. Servers are given as
	/// `ip` (port 53 assumed) or `ip:port`.
	pub fn from_servers(servers: &[String]) -> Result<Self, ResolverBuildError> {
		let mut resolvers = HashMap::with_capacity(servers.len());
		for server in servers {
			let addr = parse_server(server)?;
			resolvers.insert(server.clone(), build_resolver(addr));
			debug!(server = %server, "built resolver");
		}
		Ok(Self { resolvers })
	}
}

fn parse_server(server: &str) -> Result<SocketAddr, ResolverBuildError> {
	if let Ok(addr) = server.parse::<SocketAddr>() {
		return Ok(addr);
	}
	server
		.parse::<IpAddr>()
		.map(|ip| SocketAddr::new(ip, 53))
		.map_err(|e| ResolverBuildError::InvalidServer {
			server: server.to_string(),
			reason: e.to_string(),
		})
}

fn build_resolver(addr: SocketAddr) -> TokioAsyncResolver {
	let mut config = ResolverConfig::new();
	config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));

	let mut opts = ResolverOpts::default();
	opts.timeout = ATTEMPT_TIMEOUT;
	opts.attempts = ATTEMPTS;
	// Probe exactly what was asked for; no search-list expansion
	opts.ndots = 0;
	opts.use_hosts_file = false;
	// Every cycle must measure a real round trip
	opts.cache_size = 0;

	TokioAsyncResolver::tokio(config, opts)
}

/// Map a hickory error onto the probe failure taxonomy.
///
/// Hickory reports `Timeout` only after its retry budget is spent, which is
/// the "overall query lifetime exceeded" case; per-attempt timeouts are not
/// surfaced individually.
fn classify(err: ResolveError) -> ResolveFailure {
	match err.kind() {
		ResolveErrorKind::NoRecordsFound { .. } => ResolveFailure::NoAnswer,
		ResolveErrorKind::Timeout => ResolveFailure::LifetimeTimeout,
		ResolveErrorKind::Proto(proto) => ResolveFailure::Protocol(proto.to_string()),
		ResolveErrorKind::Message(message) => ResolveFailure::Protocol((*message).to_string()),
		ResolveErrorKind::Msg(message) => ResolveFailure::Protocol(message.clone()),
		ResolveErrorKind::Io(io) => ResolveFailure::Other(io.to_string()),
		other => ResolveFailure::Other(other.to_string()),
	}
}

#[async_trait]
impl ResolveCapability for HickoryResolver {
	async fn resolve(&self, target: &ProbeTarget) -> Result<AddressAnswer, ResolveFailure> {
		let resolver = self.resolvers.get(&target.server).ok_or_else(|| {
			ResolveFailure::Other(format!("no resolver built for server {}", target.server))
		})?;

		match resolver.ipv4_lookup(target.domain.as_str()).await {
			Ok(lookup) => {
				let addresses: Vec<_> = lookup.iter().map(|a| a.0).collect();
				if addresses.is_empty() {
					Err(ResolveFailure::NoAnswer)
				} else {
					Ok(AddressAnswer { addresses })
				}
			},
			Err(err) => Err(classify(err)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lifetime_timeout_is_distinguished() {
		let err = ResolveError::from(ResolveErrorKind::Timeout);
		assert_eq!(classify(err), ResolveFailure::LifetimeTimeout);
	}

	#[test]
	fn message_errors_classify_as_protocol() {
		let err = ResolveError::from(ResolveErrorKind::Msg("refused".to_string()));
		assert_eq!(
			classify(err),
			ResolveFailure::Protocol("refused".to_string())
		);
	}

	#[test]
	fn io_errors_classify_as_other() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "port unreachable");
		let failure = classify(ResolveError::from(ResolveErrorKind::Io(io)));
		assert!(matches!(failure, ResolveFailure::Other(_)));
	}

	#[test]
	fn bare_ip_defaults_to_port_53() {
		let addr = parse_server("8.8.8.8").unwrap();
		assert_eq!(addr.port(), 53);
	}

	#[test]
	fn explicit_port_is_honoured() {
		let addr = parse_server("127.0.0.1:5353").unwrap();
		assert_eq!(addr.port(), 5353);
	}

	#[test]
	fn hostname_servers_are_rejected() {
		assert!(parse_server("dns.example.net").is_err());
	}

	#[tokio::test]
	async fn unknown_server_resolves_to_other_failure() {
		let prober = HickoryResolver::from_servers(&["127.0.0.1".to_string()]).unwrap();
		let target = ProbeTarget::new("192.0.2.1", "example.com");
		let failure = prober.resolve(&target).await.unwrap_err();
		assert!(matches!(failure, ResolveFailure::Other(_)));
	}
}
