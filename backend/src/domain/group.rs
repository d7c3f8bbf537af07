//! Group identity, display metadata and listing windows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the protected system group. It can never be deleted and its
/// members are global administrators.
pub const ADMIN_GROUP_ID: &str = "admin";

/// Validation errors returned by the group constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyId,
    EmptyDisplayName,
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "group id must not be empty"),
            Self::EmptyDisplayName => write!(f, "group display name must not be empty"),
        }
    }
}

impl std::error::Error for GroupValidationError {}

/// Unique, opaque group identifier.
///
/// # Examples
/// ```
/// use provisioning::domain::GroupId;
///
/// let id = GroupId::new("staff").unwrap();
/// assert!(!id.is_admin());
/// assert!(GroupId::new("admin").unwrap().is_admin());
/// assert!(GroupId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Validate and construct a [`GroupId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, GroupValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, GroupValidationError> {
        if id.is_empty() {
            return Err(GroupValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Whether this is the protected [`ADMIN_GROUP_ID`] group.
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_GROUP_ID
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GroupId> for String {
    fn from(value: GroupId) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Display name shown for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupDisplayName(String);

impl GroupDisplayName {
    /// Validate and construct a display name.
    pub fn new(display_name: impl Into<String>) -> Result<Self, GroupValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, GroupValidationError> {
        if display_name.trim().is_empty() {
            return Err(GroupValidationError::EmptyDisplayName);
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for GroupDisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupDisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GroupDisplayName> for String {
    fn from(value: GroupDisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupDisplayName {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl From<&GroupId> for GroupDisplayName {
    fn from(value: &GroupId) -> Self {
        // Falls back to the identifier when no name was assigned, which is
        // non-empty by construction.
        Self(value.as_ref().to_owned())
    }
}

/// Group summary as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    display_name: GroupDisplayName,
}

impl Group {
    /// Build a group from validated parts.
    pub fn new(id: GroupId, display_name: GroupDisplayName) -> Self {
        Self { id, display_name }
    }

    /// Build a group whose display name mirrors its identifier.
    pub fn unnamed(id: GroupId) -> Self {
        let display_name = GroupDisplayName::from(&id);
        Self { id, display_name }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn display_name(&self) -> &GroupDisplayName {
        &self.display_name
    }
}

/// Optional `limit`/`offset` pair bounding a listing.
///
/// An absent limit means unbounded; an absent offset means zero.
///
/// # Examples
/// ```
/// use provisioning::domain::PageWindow;
///
/// let window = PageWindow::new(Some(2), Some(1));
/// assert_eq!(window.apply(vec!["a", "b", "c", "d"]), vec!["b", "c"]);
/// assert_eq!(PageWindow::unbounded().apply(vec![1, 2]), vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    limit: Option<usize>,
    offset: Option<usize>,
}

impl PageWindow {
    /// Window with the supplied bounds.
    pub const fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    /// Window covering the whole sequence.
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// Maximum number of items, if bounded.
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of leading items to skip.
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Slice `items` to this window, preserving order.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skipped = items.into_iter().skip(self.offset());
        match self.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        }
    }
}
