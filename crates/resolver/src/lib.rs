//! Resolution capability backed by hickory-resolver
//!
//! One UDP resolver per configured server, built once at startup. Hickory
//! bounds the overall query lifetime itself (per-attempt timeout times the
//! attempt budget), so a probe can never hang indefinitely inside the
//! capability.

mod hickory;

pub use hickory::{HickoryResolver, ResolverBuildError};
