//! Shared test doubles for the end-to-end tests

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use dns_exporter::{AddressAnswer, ProbeTarget, ResolveCapability, ResolveFailure};

/// Resolver answering from a fixed per-server script instead of the network.
pub struct ScriptedResolver {
	script: HashMap<String, Result<AddressAnswer, ResolveFailure>>,
	/// Added to every successful resolution so latency figures are non-zero.
	delay: Duration,
}

impl ScriptedResolver {
	pub fn new(script: HashMap<String, Result<AddressAnswer, ResolveFailure>>) -> Arc<Self> {
		Arc::new(Self {
			script,
			delay: Duration::from_millis(5),
		})
	}

	pub fn answer(addresses: Vec<std::net::Ipv4Addr>) -> Result<AddressAnswer, ResolveFailure> {
		Ok(AddressAnswer { addresses })
	}
}

#[async_trait]
impl ResolveCapability for ScriptedResolver {
	async fn resolve(&self, target: &ProbeTarget) -> Result<AddressAnswer, ResolveFailure> {
		let scripted = self
			.script
			.get(&target.server)
			.cloned()
			.unwrap_or_else(|| Err(ResolveFailure::Other("unscripted server".into())));
		if scripted.is_ok() {
			tokio::time::sleep(self.delay).await;
		}
		scripted
	}
}

/// An exporter's router served on an ephemeral local port.
pub struct TestServer {
	base_url: String,
	handle: JoinHandle<()>,
}

impl TestServer {
	pub async fn spawn(router: axum::Router) -> Self {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind ephemeral port");
		let addr: SocketAddr = listener.local_addr().expect("local addr");

		let handle = tokio::spawn(async move {
			axum::serve(listener, router).await.expect("serve");
		});

		Self {
			base_url: format!("http://{}", addr),
			handle,
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
