//! Configuration settings structures

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dnsexp_types::{probe_targets, ProbeTarget};

/// Main application settings.
///
/// Every key is optional in the environment; the defaults mirror the
/// exporter's historical behaviour. List-valued keys are comma-separated.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	/// `DNS_SERVERS` — nameservers to probe
	#[serde(default = "default_dns_servers")]
	pub dns_servers: String,
	/// `TEST_DOMAINS` — domains queried against every server
	#[serde(default = "default_test_domains")]
	pub test_domains: String,
	/// `PORT` — metrics listening port
	#[serde(default = "default_port")]
	pub port: u16,
	/// `WINDOW_SIZE` — sliding window size in seconds
	#[serde(default = "default_window_size")]
	pub window_size: i64,
	/// `SLEEP_INTERVAL` — probe cycle interval in seconds, fractional allowed
	#[serde(default = "default_sleep_interval")]
	pub sleep_interval: f64,
}

fn default_dns_servers() -> String {
	"8.8.8.8,1.1.1.1".to_string()
}

fn default_test_domains() -> String {
	"example.com,google.com".to_string()
}

fn default_port() -> u16 {
	8000
}

fn default_window_size() -> i64 {
	60
}

fn default_sleep_interval() -> f64 {
	1.0
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			dns_servers: default_dns_servers(),
			test_domains: default_test_domains(),
			port: default_port(),
			window_size: default_window_size(),
			sleep_interval: default_sleep_interval(),
		}
	}
}

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
	#[error("DNS_SERVERS must name at least one server")]
	NoServers,
	#[error("TEST_DOMAINS must name at least one domain")]
	NoDomains,
	#[error("WINDOW_SIZE must be positive, got {0}")]
	NonPositiveWindow(i64),
	#[error("SLEEP_INTERVAL must be positive, got {0}")]
	NonPositiveInterval(f64),
}

impl Settings {
	/// Configured server list, trimmed, empty entries dropped.
	pub fn servers(&self) -> Vec<String> {
		split_list(&self.dns_servers)
	}

	/// Configured domain list, trimmed, empty entries dropped.
	pub fn domains(&self) -> Vec<String> {
		split_list(&self.test_domains)
	}

	/// The full probe target set: servers × domains.
	pub fn targets(&self) -> Vec<ProbeTarget> {
		probe_targets(&self.servers(), &self.domains())
	}

	pub fn window(&self) -> chrono::Duration {
		chrono::Duration::seconds(self.window_size)
	}

	pub fn interval(&self) -> std::time::Duration {
		std::time::Duration::from_secs_f64(self.sleep_interval)
	}

	pub fn bind_address(&self) -> String {
		format!("0.0.0.0:{}", self.port)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.servers().is_empty() {
			return Err(SettingsError::NoServers);
		}
		if self.domains().is_empty() {
			return Err(SettingsError::NoDomains);
		}
		if self.window_size <= 0 {
			return Err(SettingsError::NonPositiveWindow(self.window_size));
		}
		if self.sleep_interval <= 0.0 || !self.sleep_interval.is_finite() {
			return Err(SettingsError::NonPositiveInterval(self.sleep_interval));
		}
		Ok(())
	}
}

fn split_list(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(str::trim)
		.filter(|entry| !entry.is_empty())
		.map(str::to_string)
		.collect()
}
