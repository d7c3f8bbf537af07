//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **directory**: in-memory group directory seeded from JSON, also serving
//!   user details and credential checks
//! - **metrics**: Prometheus registry helpers (feature-gated)
//!
//! Adapters are thin translators between domain types and their backing
//! representation. Authorization decisions stay in the domain.

pub mod directory;
#[cfg(feature = "metrics")]
pub mod metrics;
