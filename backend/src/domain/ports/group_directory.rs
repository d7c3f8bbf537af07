//! Driven port for the authoritative group directory.
//!
//! The directory owns groups, membership and sub-admin assignments. The
//! gateway only reads these relations, apart from creating and deleting
//! groups. Implementations must serialise concurrent create/delete calls for
//! the same identifier.

use async_trait::async_trait;

use crate::domain::{Group, GroupId, PageWindow, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by group directory adapters.
    pub enum GroupDirectoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "group directory connection failed: {message}",
        /// A lookup or mutation failed while executing.
        Query { message: String } =>
            "group directory query failed: {message}",
    }
}

/// Port for reading and mutating the group directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Groups whose id or display name matches `term`, in directory order,
    /// bounded by `window`. An empty term matches every group.
    async fn search(
        &self,
        term: &str,
        window: PageWindow,
    ) -> Result<Vec<Group>, GroupDirectoryError>;

    /// Whether a group with this id exists.
    async fn group_exists(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError>;

    /// Fetch a single group, or `None` when it does not exist.
    async fn get(&self, group_id: &GroupId) -> Result<Option<Group>, GroupDirectoryError>;

    /// Create an empty group. Returns `false` when the id was already taken.
    async fn create_group(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError>;

    /// Delete a group with its memberships and sub-admin assignments.
    ///
    /// Returns `false` when the directory refused or could not complete the
    /// deletion.
    async fn delete_group(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError>;

    /// Whether the user holds system-wide administrative rights.
    async fn is_global_admin(&self, user_id: &UserId) -> Result<bool, GroupDirectoryError>;

    /// Whether the user is a sub-admin of the group.
    async fn is_sub_admin_of_group(
        &self,
        user_id: &UserId,
        group_id: &GroupId,
    ) -> Result<bool, GroupDirectoryError>;

    /// Sub-admins assigned to the group, in directory order.
    async fn group_sub_admins(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, GroupDirectoryError>;

    /// Members of the group, in directory order.
    async fn group_members(&self, group_id: &GroupId) -> Result<Vec<UserId>, GroupDirectoryError>;
}
