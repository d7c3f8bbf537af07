//! Driven port expanding user identifiers into full profile records.
//!
//! Failures are returned as domain errors and surface to callers unchanged,
//! so the adapter decides the error kind.

use async_trait::async_trait;

use crate::domain::{Error, UserDetail, UserId};

/// Port for loading a user's detailed profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDetailsQuery: Send + Sync {
    /// Return the profile record for `user_id`.
    async fn user_detail(&self, user_id: &UserId) -> Result<UserDetail, Error>;
}
