//! Group access gateway.
//!
//! Implements the group driving ports on top of the [`GroupDirectory`] and
//! [`UserDetailsQuery`] driven ports. The gateway holds no mutable state:
//! every decision is taken against the live directory on each call.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    AccessOutcome, AdminGate, GroupAccessMetrics, GroupDirectory, GroupDirectoryError,
    GroupOperation, GroupsCommand, GroupsQuery, NoOpGroupAccessMetrics, UserDetailsQuery,
};
use crate::domain::{
    ActingIdentity, Error, Group, GroupId, GroupValidationError, PageWindow, UserDetail, UserId,
};

/// Gateway service implementing the group driving ports.
///
/// The `M` type parameter records access decisions; use
/// [`GroupAccessService::new`] for the no-op recorder.
pub struct GroupAccessService<D, U, M = NoOpGroupAccessMetrics> {
    directory: Arc<D>,
    users: Arc<U>,
    metrics: Arc<M>,
}

impl<D, U, M> Clone for GroupAccessService<D, U, M> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            users: Arc::clone(&self.users),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<D, U> GroupAccessService<D, U, NoOpGroupAccessMetrics> {
    /// Create a gateway over the given collaborators without metrics.
    pub fn new(directory: Arc<D>, users: Arc<U>) -> Self {
        Self::with_metrics(directory, users, Arc::new(NoOpGroupAccessMetrics))
    }
}

impl<D, U, M> GroupAccessService<D, U, M> {
    /// Create a gateway that reports access decisions to `metrics`.
    pub fn with_metrics(directory: Arc<D>, users: Arc<U>, metrics: Arc<M>) -> Self {
        Self {
            directory,
            users,
            metrics,
        }
    }
}

impl<D, U, M> GroupAccessService<D, U, M>
where
    D: GroupDirectory,
    U: UserDetailsQuery,
    M: GroupAccessMetrics,
{
    async fn record(&self, operation: GroupOperation, outcome: AccessOutcome) {
        if let Err(err) = self.metrics.record_decision(operation, outcome).await {
            debug!(error = %err, operation = operation.as_str(), "access metric dropped");
        }
    }

    fn map_directory_error(error: GroupDirectoryError) -> Error {
        match error {
            GroupDirectoryError::Connection { message } => {
                error!(%message, "group directory unreachable");
                Error::service_unavailable(format!("group directory unavailable: {message}"))
            }
            GroupDirectoryError::Query { message } => {
                Error::internal(format!("group directory error: {message}"))
            }
        }
    }

    fn group_not_found(group_id: &GroupId) -> Error {
        Error::not_found("The requested group could not be found")
            .with_details(json!({ "groupId": group_id.as_ref() }))
    }

    async fn ensure_group_exists(&self, group_id: &GroupId) -> Result<(), Error> {
        let exists = self
            .directory
            .group_exists(group_id)
            .await
            .map_err(Self::map_directory_error)?;
        if exists {
            Ok(())
        } else {
            Err(Self::group_not_found(group_id))
        }
    }

    /// Whether `identity` may read the membership of `group_id`.
    ///
    /// True for global administrators and for sub-admins of that group.
    pub async fn is_authorized_for_group(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<bool, Error> {
        let user_id = identity.user_id();
        let is_admin = self
            .directory
            .is_global_admin(user_id)
            .await
            .map_err(Self::map_directory_error)?;
        if is_admin {
            return Ok(true);
        }
        self.directory
            .is_sub_admin_of_group(user_id, group_id)
            .await
            .map_err(Self::map_directory_error)
    }

    /// Existence first, then visibility: a missing group is `NotFound` for
    /// every caller.
    async fn require_group_access(
        &self,
        operation: GroupOperation,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<(), Error> {
        self.ensure_group_exists(group_id).await?;
        if self.is_authorized_for_group(identity, group_id).await? {
            self.record(operation, AccessOutcome::Allowed).await;
            return Ok(());
        }
        self.record(operation, AccessOutcome::Denied).await;
        warn!(actor = %identity, %group_id, "group membership read denied");
        Err(Error::unauthorized("User does not have access to specified group")
            .with_details(json!({ "groupId": group_id.as_ref() })))
    }

    async fn distinct_members(&self, group_id: &GroupId) -> Result<Vec<UserId>, Error> {
        let members = self
            .directory
            .group_members(group_id)
            .await
            .map_err(Self::map_directory_error)?;
        let mut seen = HashSet::with_capacity(members.len());
        Ok(members
            .into_iter()
            .filter(|member| seen.insert(member.clone()))
            .collect())
    }

    async fn search(&self, search: &str, window: PageWindow) -> Result<Vec<Group>, Error> {
        self.directory
            .search(search, window)
            .await
            .map_err(Self::map_directory_error)
    }

    fn parse_new_group_id(raw: &str) -> Result<GroupId, Error> {
        GroupId::new(raw).map_err(|err| match err {
            GroupValidationError::EmptyId => {
                error!("group name not supplied");
                Error::invalid_request("Invalid group name")
                    .with_details(json!({ "field": "groupid", "code": "empty_group_id" }))
            }
            other => Error::invalid_request(other.to_string()),
        })
    }
}

#[async_trait]
impl<D, U, M> GroupsQuery for GroupAccessService<D, U, M>
where
    D: GroupDirectory,
    U: UserDetailsQuery,
    M: GroupAccessMetrics,
{
    async fn list_groups(
        &self,
        identity: &ActingIdentity,
        search: &str,
        window: PageWindow,
    ) -> Result<Vec<GroupId>, Error> {
        debug!(actor = %identity, search, "listing groups");
        let groups = self.search(search, window).await?;
        Ok(groups.into_iter().map(|group| group.id().clone()).collect())
    }

    async fn list_groups_detailed(
        &self,
        identity: &ActingIdentity,
        search: &str,
        window: PageWindow,
    ) -> Result<Vec<Group>, Error> {
        debug!(actor = %identity, search, "listing groups with details");
        self.search(search, window).await
    }

    async fn list_group_members(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, Error> {
        self.require_group_access(GroupOperation::ListMembers, identity, group_id)
            .await?;
        self.distinct_members(group_id).await
    }

    async fn list_group_members_detailed(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
        window: PageWindow,
    ) -> Result<Vec<UserDetail>, Error> {
        self.require_group_access(GroupOperation::ListMembersDetailed, identity, group_id)
            .await?;
        let members = window.apply(self.distinct_members(group_id).await?);
        let mut details = Vec::with_capacity(members.len());
        for member in &members {
            details.push(self.users.user_detail(member).await?);
        }
        Ok(details)
    }

    async fn list_sub_admins(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, Error> {
        debug!(actor = %identity, %group_id, "listing sub-admins");
        let group = self
            .directory
            .get(group_id)
            .await
            .map_err(Self::map_directory_error)?
            .ok_or_else(|| {
                Error::not_found("Group does not exist")
                    .with_details(json!({ "groupId": group_id.as_ref() }))
            })?;
        self.directory
            .group_sub_admins(group.id())
            .await
            .map_err(Self::map_directory_error)
    }
}

#[async_trait]
impl<D, U, M> GroupsCommand for GroupAccessService<D, U, M>
where
    D: GroupDirectory,
    U: UserDetailsQuery,
    M: GroupAccessMetrics,
{
    async fn create_group(&self, identity: &ActingIdentity, group_id: &str) -> Result<(), Error> {
        let group_id = Self::parse_new_group_id(group_id)?;
        let conflict = || {
            Error::conflict("group already exists")
                .with_details(json!({ "groupId": group_id.as_ref() }))
        };

        let exists = self
            .directory
            .group_exists(&group_id)
            .await
            .map_err(Self::map_directory_error)?;
        if exists {
            return Err(conflict());
        }

        let created = self
            .directory
            .create_group(&group_id)
            .await
            .map_err(Self::map_directory_error)?;
        if !created {
            // Lost a race with a concurrent create of the same id.
            return Err(conflict());
        }
        self.record(GroupOperation::CreateGroup, AccessOutcome::Allowed)
            .await;
        info!(actor = %identity, %group_id, "group created");
        Ok(())
    }

    async fn delete_group(
        &self,
        identity: &ActingIdentity,
        group_id: &GroupId,
    ) -> Result<(), Error> {
        self.ensure_group_exists(group_id).await?;
        if group_id.is_admin() {
            self.record(GroupOperation::DeleteGroup, AccessOutcome::Denied)
                .await;
            warn!(actor = %identity, "refused to delete the admin group");
            return Err(Error::forbidden("Cannot delete the admin group")
                .with_details(json!({ "groupId": group_id.as_ref() })));
        }

        let deleted = self
            .directory
            .delete_group(group_id)
            .await
            .map_err(Self::map_directory_error)?;
        if !deleted {
            return Err(Error::conflict("group could not be deleted")
                .with_details(json!({ "groupId": group_id.as_ref() })));
        }
        self.record(GroupOperation::DeleteGroup, AccessOutcome::Allowed)
            .await;
        info!(actor = %identity, %group_id, "group deleted");
        Ok(())
    }
}

#[async_trait]
impl<D, U, M> AdminGate for GroupAccessService<D, U, M>
where
    D: GroupDirectory,
    U: UserDetailsQuery,
    M: GroupAccessMetrics,
{
    async fn require_admin(&self, identity: &ActingIdentity) -> Result<(), Error> {
        let is_admin = self
            .directory
            .is_global_admin(identity.user_id())
            .await
            .map_err(Self::map_directory_error)?;
        if is_admin {
            self.record(GroupOperation::AdminGate, AccessOutcome::Allowed)
                .await;
            Ok(())
        } else {
            self.record(GroupOperation::AdminGate, AccessOutcome::Denied)
                .await;
            Err(Error::forbidden("administrator privileges required"))
        }
    }
}

#[cfg(test)]
#[path = "group_access_tests.rs"]
mod tests;
