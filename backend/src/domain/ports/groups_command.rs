//! Driving port for group lifecycle use-cases.

use async_trait::async_trait;

use crate::domain::{ActingIdentity, Error, GroupId};

/// Domain use-case port for creating and deleting groups.
///
/// Callers are expected to have passed the [`super::AdminGate`] first.
#[async_trait]
pub trait GroupsCommand: Send + Sync {
    /// Create a group from a raw, caller-supplied identifier.
    async fn create_group(&self, identity: &ActingIdentity, group_id: &str) -> Result<(), Error>;

    /// Delete an existing group other than the protected admin group.
    async fn delete_group(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<(), Error>;
}
