//! Directory seed documents.
//!
//! A seed describes the initial users, groups, memberships and sub-admin
//! assignments loaded into the in-memory directory at startup. Seeds are
//! parsed from camelCase JSON and validated before use. Every seed must
//! declare the protected `admin` group:
//!
//! ```json
//! {
//!   "users": [{"id": "alice", "displayName": "Alice", "password": "s3cret"}],
//!   "groups": [{"id": "admin", "members": ["alice"]}, {"id": "staff", "members": ["alice"]}],
//!   "subAdmins": [{"userId": "alice", "groupId": "staff"}]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{DisplayName, GroupDisplayName, GroupId, UserId};

const DEVELOPMENT_SEED: &str = r#"{
    "users": [{"id": "admin", "displayName": "Administrator", "password": "password"}],
    "groups": [{"id": "admin", "members": ["admin"]}]
}"#;

/// Errors raised while loading or validating a seed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read directory seed at {path}: {message}")]
    Io { path: PathBuf, message: String },
    /// The document is not valid seed JSON.
    #[error("failed to parse directory seed: {message}")]
    Parse { message: String },
    /// A user entry failed validation.
    #[error("invalid user at index {index}: {message}")]
    InvalidUser { index: usize, message: String },
    /// A group entry failed validation.
    #[error("invalid group at index {index}: {message}")]
    InvalidGroup { index: usize, message: String },
    /// Two user entries share an identifier.
    #[error("duplicate user id: {id}")]
    DuplicateUser { id: String },
    /// Two group entries share an identifier.
    #[error("duplicate group id: {id}")]
    DuplicateGroup { id: String },
    /// A membership or sub-admin entry names an unknown user.
    #[error("unknown user {user_id} referenced by {context}")]
    UnknownUser { user_id: String, context: String },
    /// A sub-admin entry names an unknown group.
    #[error("unknown group {group_id} referenced by sub-admin {user_id}")]
    UnknownGroup { group_id: String, user_id: String },
    /// The same user is assigned as sub-admin of the same group twice.
    #[error("duplicate sub-admin assignment of {user_id} to {group_id}")]
    DuplicateSubAdmin { user_id: String, group_id: String },
    /// The protected `admin` group is absent.
    #[error("seed must declare the admin group")]
    MissingAdminGroup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSeed {
    #[serde(default)]
    users: Vec<RawUser>,
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    sub_admins: Vec<RawSubAdmin>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawUser {
    id: String,
    display_name: Option<String>,
    email: Option<String>,
    enabled: Option<bool>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawGroup {
    id: String,
    display_name: Option<String>,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSubAdmin {
    user_id: String,
    group_id: String,
}

/// Validated user entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub id: UserId,
    pub display_name: DisplayName,
    pub email: Option<String>,
    pub enabled: bool,
    /// Login password; users without one cannot authenticate.
    pub password: Option<Zeroizing<String>>,
}

/// Validated group entry. Members keep seed order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedGroup {
    pub id: GroupId,
    pub display_name: GroupDisplayName,
    pub members: Vec<UserId>,
}

/// Validated sub-admin assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSubAdmin {
    pub user_id: UserId,
    pub group_id: GroupId,
}

/// Validated directory contents.
///
/// # Examples
/// ```
/// use provisioning::outbound::directory::DirectorySeed;
///
/// let seed = DirectorySeed::from_json(
///     r#"{"users": [{"id": "alice"}], "groups": [{"id": "admin", "members": ["alice"]}]}"#,
/// )
/// .expect("valid seed");
/// assert_eq!(seed.groups().len(), 1);
/// assert!(DirectorySeed::from_json(r#"{"groups": [{"id": "staff"}]}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorySeed {
    users: Vec<SeedUser>,
    groups: Vec<SeedGroup>,
    sub_admins: Vec<SeedSubAdmin>,
}

impl DirectorySeed {
    /// Parse and validate a seed document.
    ///
    /// # Errors
    /// Returns [`SeedError`] when the JSON is malformed, an identifier or
    /// sub-admin assignment is invalid or duplicated, a reference points at an
    /// unknown entry, or the `admin` group is missing.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let raw: RawSeed = serde_json::from_str(json).map_err(|e| SeedError::Parse {
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    /// Load a seed document from disk.
    ///
    /// # Errors
    /// Returns [`SeedError::Io`] when the file cannot be read, otherwise as
    /// [`DirectorySeed::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let contents = fs::read_to_string(path).map_err(|e| SeedError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Seed used when no file is configured: an `admin` user with password
    /// `password` who is the sole member of the `admin` group.
    ///
    /// # Errors
    /// Never fails in practice; the document is validated like any other.
    pub fn development() -> Result<Self, SeedError> {
        Self::from_json(DEVELOPMENT_SEED)
    }

    pub fn users(&self) -> &[SeedUser] {
        &self.users
    }

    pub fn groups(&self) -> &[SeedGroup] {
        &self.groups
    }

    pub fn sub_admins(&self) -> &[SeedSubAdmin] {
        &self.sub_admins
    }

    pub(crate) fn into_parts(self) -> (Vec<SeedUser>, Vec<SeedGroup>, Vec<SeedSubAdmin>) {
        (self.users, self.groups, self.sub_admins)
    }

    fn from_raw(raw: RawSeed) -> Result<Self, SeedError> {
        let users = raw
            .users
            .into_iter()
            .enumerate()
            .map(|(index, user)| parse_user(index, user))
            .collect::<Result<Vec<_>, _>>()?;
        let mut user_ids = HashSet::with_capacity(users.len());
        for user in &users {
            if !user_ids.insert(user.id.clone()) {
                return Err(SeedError::DuplicateUser {
                    id: user.id.to_string(),
                });
            }
        }

        let groups = raw
            .groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| parse_group(index, group, &user_ids))
            .collect::<Result<Vec<_>, _>>()?;
        let mut group_ids = HashSet::with_capacity(groups.len());
        for group in &groups {
            if !group_ids.insert(group.id.clone()) {
                return Err(SeedError::DuplicateGroup {
                    id: group.id.to_string(),
                });
            }
        }

        let sub_admins = raw
            .sub_admins
            .into_iter()
            .map(|entry| parse_sub_admin(entry, &user_ids, &group_ids))
            .collect::<Result<Vec<_>, _>>()?;
        let mut assignments = HashSet::with_capacity(sub_admins.len());
        for entry in &sub_admins {
            if !assignments.insert((&entry.user_id, &entry.group_id)) {
                return Err(SeedError::DuplicateSubAdmin {
                    user_id: entry.user_id.to_string(),
                    group_id: entry.group_id.to_string(),
                });
            }
        }

        if !groups.iter().any(|group| group.id.is_admin()) {
            return Err(SeedError::MissingAdminGroup);
        }

        Ok(Self {
            users,
            groups,
            sub_admins,
        })
    }
}

fn parse_user(index: usize, raw: RawUser) -> Result<SeedUser, SeedError> {
    let invalid = |message: String| SeedError::InvalidUser { index, message };
    let id = UserId::new(&raw.id).map_err(|e| invalid(e.to_string()))?;
    let display_name = match raw.display_name {
        Some(name) => DisplayName::new(name).map_err(|e| invalid(e.to_string()))?,
        None => DisplayName::from(&id),
    };
    Ok(SeedUser {
        id,
        display_name,
        email: raw.email.filter(|email| !email.trim().is_empty()),
        enabled: raw.enabled.unwrap_or(true),
        password: raw.password.map(Zeroizing::new),
    })
}

fn parse_group(
    index: usize,
    raw: RawGroup,
    known_users: &HashSet<UserId>,
) -> Result<SeedGroup, SeedError> {
    let invalid = |message: String| SeedError::InvalidGroup { index, message };
    let id = GroupId::new(&raw.id).map_err(|e| invalid(e.to_string()))?;
    let display_name = match raw.display_name {
        Some(name) => GroupDisplayName::new(name).map_err(|e| invalid(e.to_string()))?,
        None => GroupDisplayName::from(&id),
    };
    let members = raw
        .members
        .into_iter()
        .map(|member| {
            UserId::new(&member)
                .ok()
                .filter(|user_id| known_users.contains(user_id))
                .ok_or_else(|| SeedError::UnknownUser {
                    user_id: member,
                    context: format!("group {id}"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SeedGroup {
        id,
        display_name,
        members,
    })
}

fn parse_sub_admin(
    raw: RawSubAdmin,
    known_users: &HashSet<UserId>,
    known_groups: &HashSet<GroupId>,
) -> Result<SeedSubAdmin, SeedError> {
    let user_id = UserId::new(&raw.user_id)
        .ok()
        .filter(|user_id| known_users.contains(user_id))
        .ok_or_else(|| SeedError::UnknownUser {
            user_id: raw.user_id.clone(),
            context: format!("sub-admin assignment for group {}", raw.group_id),
        })?;
    let group_id = GroupId::new(&raw.group_id)
        .ok()
        .filter(|group_id| known_groups.contains(group_id))
        .ok_or_else(|| SeedError::UnknownGroup {
            group_id: raw.group_id,
            user_id: raw.user_id,
        })?;
    Ok(SeedSubAdmin { user_id, group_id })
}
