//! Driving port guarding admin-only operations.

use async_trait::async_trait;

use crate::domain::{ActingIdentity, Error};

/// Scope check for operations reserved to global administrators.
#[async_trait]
pub trait AdminGate: Send + Sync {
    /// Succeed when `identity` is a global administrator, otherwise fail with
    /// `Forbidden`.
    async fn require_admin(&self, identity: &ActingIdentity) -> Result<(), Error>;
}
