//! Resolution capability boundary

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::outcome::ResolveFailure;
use crate::target::ProbeTarget;

/// A positive answer to an address query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAnswer {
	pub addresses: Vec<Ipv4Addr>,
}

/// The external resolution capability the dispatcher probes through.
///
/// Implementations must bound their own overall query lifetime; the
/// dispatcher additionally enforces a hard deadline so a misbehaving
/// implementation can never stall a probe cycle.
#[async_trait]
pub trait ResolveCapability: Send + Sync {
	/// Query an address record for `target.domain` against `target.server`.
	async fn resolve(&self, target: &ProbeTarget) -> Result<AddressAnswer, ResolveFailure>;
}
