//! Configuration for the DNS exporter

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::load_config;
pub use settings::{Settings, SettingsError};
pub use startup_logger::{log_probe_plan, log_service_info, log_startup_complete};
