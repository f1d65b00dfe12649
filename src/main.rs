//! DNS exporter binary entry point

use dns_exporter::ExporterBuilder;

#[tokio::main]
async fn main() {
	if let Err(e) = ExporterBuilder::new().start_server().await {
		eprintln!("Failed to start dns-exporter: {}", e);
		std::process::exit(1);
	}
}
