//! Service startup logging for the DNS exporter

use tracing::info;

use crate::Settings;

/// Logs service information at startup.
pub fn log_service_info() {
	let service_name = "dns-exporter";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== DNS Exporter Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {}", std::env::consts::OS);

	if let Ok(rust_log) = std::env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the effective probe plan derived from the settings.
pub fn log_probe_plan(settings: &Settings) {
	info!("Probing {} target(s):", settings.targets().len());
	for target in settings.targets() {
		info!("  - {}", target);
	}
	info!(
		"Window: {}s, cycle interval: {}s",
		settings.window_size, settings.sleep_interval
	);
}

/// Logs startup completion.
pub fn log_startup_complete(bind_address: &str) {
	info!("✅ DNS Exporter Started Successfully");
	info!("🌐 Metrics listening on: {}", bind_address);
}
