//! Driving port for group read use-cases.
//!
//! Inbound adapters call these operations with the acting identity resolved
//! from the session. Visibility rules live behind the port.

use async_trait::async_trait;

use crate::domain::{ActingIdentity, Error, Group, GroupId, PageWindow, UserDetail, UserId};

/// Domain use-case port for listing groups and their members.
#[async_trait]
pub trait GroupsQuery: Send + Sync {
    /// Group ids matching `search`. Open to every authenticated caller.
    async fn list_groups(
        &self,
        identity: &ActingIdentity,
        search: &str,
        window: PageWindow,
    ) -> Result<Vec<GroupId>, Error>;

    /// Groups matching `search` with display names attached.
    async fn list_groups_detailed(
        &self,
        identity: &ActingIdentity,
        search: &str,
        window: PageWindow,
    ) -> Result<Vec<Group>, Error>;

    /// Deduplicated member ids of a group the caller may administer.
    async fn list_group_members(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, Error>;

    /// Detailed member records for the `window` slice of the member list.
    async fn list_group_members_detailed(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
        window: PageWindow,
    ) -> Result<Vec<UserDetail>, Error>;

    /// Sub-admins assigned to a group.
    async fn list_sub_admins(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, Error>;

    /// Deprecated alias kept for older clients; identical to
    /// [`GroupsQuery::list_group_members`].
    async fn get_group(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, Error> {
        self.list_group_members(identity, group_id).await
    }
}
