//! In-memory group directory.
//!
//! Holds users, groups, memberships and sub-admin assignments behind a single
//! lock so create and delete are atomic with respect to each other. Global
//! administrators are the members of the `admin` group. Groups are kept in
//! identifier order, which is the directory order reported to callers.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{GroupDirectory, GroupDirectoryError, LoginService, UserDetailsQuery};
use crate::domain::{
    ADMIN_GROUP_ID, DisplayName, Error, Group, GroupDisplayName, GroupId, LoginCredentials,
    PageWindow, UserDetail, UserId,
};

use super::seed::DirectorySeed;

#[derive(Debug, Clone)]
struct GroupRecord {
    display_name: GroupDisplayName,
    members: Vec<UserId>,
}

#[derive(Debug, Clone)]
struct UserRecord {
    display_name: DisplayName,
    email: Option<String>,
    enabled: bool,
    password: Option<Zeroizing<String>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: BTreeMap<UserId, UserRecord>,
    groups: BTreeMap<GroupId, GroupRecord>,
    sub_admins: Vec<(UserId, GroupId)>,
}

impl DirectoryState {
    fn group(&self, id: &GroupId) -> Option<Group> {
        self.groups
            .get(id)
            .map(|record| Group::new(id.clone(), record.display_name.clone()))
    }

    fn is_member(&self, user_id: &UserId, group_id: &GroupId) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(|record| record.members.contains(user_id))
    }

    fn is_sub_admin(&self, user_id: &UserId, group_id: &GroupId) -> bool {
        self.sub_admins
            .iter()
            .any(|(user, group)| user == user_id && group == group_id)
    }
}

fn matches_term(id: &GroupId, record: &GroupRecord, needle: &str) -> bool {
    needle.is_empty()
        || id.as_ref().to_lowercase().contains(needle)
        || record.display_name.as_ref().to_lowercase().contains(needle)
}

fn poisoned<T>(_: PoisonError<T>) -> GroupDirectoryError {
    GroupDirectoryError::query("directory state lock poisoned")
}

/// Directory adapter backed by process memory.
///
/// # Examples
/// ```
/// use provisioning::outbound::directory::{DirectorySeed, InMemoryDirectory};
///
/// let seed = DirectorySeed::development().expect("valid seed");
/// let directory = InMemoryDirectory::from_seed(seed);
/// assert_eq!(directory.group_count().expect("readable"), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    /// Empty directory with no users or groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory populated from a validated seed.
    pub fn from_seed(seed: DirectorySeed) -> Self {
        let (users, groups, sub_admins) = seed.into_parts();
        let mut state = DirectoryState::default();
        for user in users {
            state.users.insert(
                user.id,
                UserRecord {
                    display_name: user.display_name,
                    email: user.email,
                    enabled: user.enabled,
                    password: user.password,
                },
            );
        }
        for group in groups {
            state.groups.insert(
                group.id,
                GroupRecord {
                    display_name: group.display_name,
                    members: group.members,
                },
            );
        }
        state.sub_admins = sub_admins
            .into_iter()
            .map(|entry| (entry.user_id, entry.group_id))
            .collect();
        Self {
            state: RwLock::new(state),
        }
    }

    /// Number of groups currently held.
    pub fn group_count(&self) -> Result<usize, GroupDirectoryError> {
        Ok(self.read()?.groups.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, DirectoryState>, GroupDirectoryError> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, DirectoryState>, GroupDirectoryError> {
        self.state.write().map_err(poisoned)
    }
}

#[async_trait]
impl GroupDirectory for InMemoryDirectory {
    async fn search(
        &self,
        term: &str,
        window: PageWindow,
    ) -> Result<Vec<Group>, GroupDirectoryError> {
        let needle = term.trim().to_lowercase();
        let state = self.read()?;
        let matched = state
            .groups
            .iter()
            .filter(|(id, record)| matches_term(id, record, &needle))
            .map(|(id, record)| Group::new(id.clone(), record.display_name.clone()))
            .collect();
        Ok(window.apply(matched))
    }

    async fn group_exists(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError> {
        Ok(self.read()?.groups.contains_key(group_id))
    }

    async fn get(&self, group_id: &GroupId) -> Result<Option<Group>, GroupDirectoryError> {
        Ok(self.read()?.group(group_id))
    }

    async fn create_group(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError> {
        let mut state = self.write()?;
        if state.groups.contains_key(group_id) {
            return Ok(false);
        }
        state.groups.insert(
            group_id.clone(),
            GroupRecord {
                display_name: GroupDisplayName::from(group_id),
                members: Vec::new(),
            },
        );
        debug!(%group_id, "group inserted into directory");
        Ok(true)
    }

    async fn delete_group(&self, group_id: &GroupId) -> Result<bool, GroupDirectoryError> {
        let mut state = self.write()?;
        if state.groups.remove(group_id).is_none() {
            return Ok(false);
        }
        state.sub_admins.retain(|(_, group)| group != group_id);
        debug!(%group_id, "group removed from directory");
        Ok(true)
    }

    async fn is_global_admin(&self, user_id: &UserId) -> Result<bool, GroupDirectoryError> {
        let admin_group = GroupId::new(ADMIN_GROUP_ID)
            .map_err(|err| GroupDirectoryError::query(err.to_string()))?;
        Ok(self.read()?.is_member(user_id, &admin_group))
    }

    async fn is_sub_admin_of_group(
        &self,
        user_id: &UserId,
        group_id: &GroupId,
    ) -> Result<bool, GroupDirectoryError> {
        Ok(self.read()?.is_sub_admin(user_id, group_id))
    }

    async fn group_sub_admins(
        &self,
        group_id: &GroupId,
    ) -> Result<Vec<UserId>, GroupDirectoryError> {
        let state = self.read()?;
        Ok(state
            .sub_admins
            .iter()
            .filter(|(_, group)| group == group_id)
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn group_members(&self, group_id: &GroupId) -> Result<Vec<UserId>, GroupDirectoryError> {
        let state = self.read()?;
        Ok(state
            .groups
            .get(group_id)
            .map(|record| record.members.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl UserDetailsQuery for InMemoryDirectory {
    async fn user_detail(&self, user_id: &UserId) -> Result<UserDetail, Error> {
        let state = self
            .read()
            .map_err(|err| Error::internal(err.to_string()))?;
        let record = state.users.get(user_id).ok_or_else(|| {
            Error::not_found(format!("user {user_id} not found"))
                .with_details(serde_json::json!({ "userId": user_id.as_ref() }))
        })?;

        let mut detail = UserDetail::new(user_id.clone(), record.display_name.clone());
        detail.email = record.email.clone();
        detail.enabled = record.enabled;
        detail.groups = state
            .groups
            .iter()
            .filter(|(_, group)| group.members.contains(user_id))
            .map(|(id, _)| id.clone())
            .collect();
        detail.subadmin = state
            .groups
            .keys()
            .filter(|id| state.is_sub_admin(user_id, id))
            .cloned()
            .collect();
        Ok(detail)
    }
}

#[async_trait]
impl LoginService for InMemoryDirectory {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let invalid = || Error::unauthorized("invalid credentials");
        let user_id = UserId::new(credentials.username()).map_err(|_| invalid())?;
        let state = self
            .read()
            .map_err(|err| Error::internal(err.to_string()))?;
        let record = state.users.get(&user_id).ok_or_else(invalid)?;
        let password_matches = record
            .password
            .as_deref()
            .is_some_and(|stored| {
                bool::from(stored.as_bytes().ct_eq(credentials.password().as_bytes()))
            });
        if record.enabled && password_matches {
            Ok(user_id)
        } else {
            Err(invalid())
        }
    }
}
