//! Configuration loading utilities

use crate::Settings;
use config::{Config, ConfigError, Environment, File};

/// Load configuration from the optional config file, then let environment
/// variables (`DNS_SERVERS`, `TEST_DOMAINS`, `PORT`, `WINDOW_SIZE`,
/// `SLEEP_INTERVAL`) override it. Missing keys fall back to serde defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
	let s = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.add_source(Environment::default().try_parsing(true))
		.build()?;

	s.try_deserialize()
}
