//! DNS Exporter
//!
//! Probes configured DNS servers with configured domains on a fixed
//! cadence and publishes sliding-window latency statistics plus lifetime
//! failure counters for Prometheus scraping.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

// Core domain types
pub use dnsexp_types::{
	chrono, AddressAnswer, LatencySummary, Outcome, OutcomeCounters, OutcomeKind, ProbeTarget,
	ResolveCapability, ResolveFailure, Sample, SampleWindow, TargetStatistics,
	HIGH_LATENCY_THRESHOLD,
};

// Service layer
pub use dnsexp_service::{
	Aggregator, ProbeDispatcher, ProbeRegistry, ProbeScheduler, RegistryError,
	StatisticsPublisher, PROBE_DEADLINE,
};

// Resolution capability
pub use dnsexp_resolver::{HickoryResolver, ResolverBuildError};

// API layer
pub use dnsexp_api::{create_router, AppState, PrometheusPublisher};

// Config
pub use dnsexp_config::{
	load_config, log_probe_plan, log_service_info, log_startup_complete, Settings, SettingsError,
};

// Module aliases for advanced usage
pub mod types {
	pub use dnsexp_types::*;
}

pub mod service {
	pub use dnsexp_service::*;
}

pub mod config {
	pub use dnsexp_config::*;
}

pub mod api {
	pub use dnsexp_api::*;
}

/// A fully wired exporter, ready to serve and probe.
pub struct Exporter {
	pub settings: Settings,
	pub router: axum::Router,
	pub state: AppState,
	pub scheduler: ProbeScheduler,
}

/// Builder for configuring the exporter.
///
/// Settings default to the environment-derived configuration; the resolver
/// defaults to the hickory-backed capability. Both can be injected, which
/// is how the integration tests run without touching the network.
#[derive(Default)]
pub struct ExporterBuilder {
	settings: Option<Settings>,
	resolver: Option<Arc<dyn ResolveCapability>>,
}

impl ExporterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Use the provided settings instead of loading from the environment.
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Swap the resolution capability (e.g. for tests).
	pub fn with_resolver(mut self, resolver: Arc<dyn ResolveCapability>) -> Self {
		self.resolver = Some(resolver);
		self
	}

	/// Wire everything up: registry from the configured cross product,
	/// dispatcher, aggregator, scheduler, and the HTTP router.
	///
	/// Invalid configuration is fatal here.
	pub fn build(self) -> Result<Exporter, Box<dyn std::error::Error>> {
		let settings = match self.settings {
			Some(settings) => settings,
			None => load_config()?,
		};
		settings.validate()?;

		let resolver: Arc<dyn ResolveCapability> = match self.resolver {
			Some(resolver) => resolver,
			None => Arc::new(HickoryResolver::from_servers(&settings.servers())?),
		};

		let registry = Arc::new(ProbeRegistry::new(settings.targets()));
		let publisher = Arc::new(PrometheusPublisher::new(settings.window_size)?);
		let dispatcher = Arc::new(ProbeDispatcher::new(resolver, Arc::clone(&registry)));
		let aggregator = Arc::new(Aggregator::new(
			Arc::clone(&registry),
			settings.window(),
			Arc::clone(&publisher) as Arc<dyn StatisticsPublisher>,
		));
		let scheduler = ProbeScheduler::new(
			dispatcher,
			Arc::clone(&aggregator),
			registry,
			settings.interval(),
		);

		let state = AppState {
			aggregator,
			metrics: publisher,
		};
		let router = create_router().with_state(state.clone());

		Ok(Exporter {
			settings,
			router,
			state,
			scheduler,
		})
	}

	/// Start the complete exporter: load `.env`, initialise tracing, wire
	/// the components, bind the metrics port (fatal on failure), spawn the
	/// probe loop, and serve until process termination.
	pub async fn start_server(self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();
		init_tracing();

		let exporter = self.build()?;

		log_service_info();
		log_probe_plan(&exporter.settings);

		let bind_address = exporter.settings.bind_address();
		let addr: SocketAddr = bind_address
			.parse()
			.map_err(|e| format!("invalid bind address '{}': {}", bind_address, e))?;
		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_address);
		info!("Endpoints available:");
		info!("  GET  /metrics");
		info!("  GET  /targets");
		info!("  GET  /health");

		let Exporter {
			router, scheduler, ..
		} = exporter;
		tokio::spawn(scheduler.run());

		axum::serve(listener, router).await?;
		Ok(())
	}
}

/// Tracing from `RUST_LOG`, defaulting to `info`. Safe to call twice (the
/// second init is a no-op), which keeps tests simple.
fn init_tracing() {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
	let _ = tracing_subscriber::fmt()
		.compact()
		.with_env_filter(env_filter)
		.try_init();
}
