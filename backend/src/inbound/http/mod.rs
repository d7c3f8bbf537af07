//! HTTP inbound adapter exposing the group administration REST endpoints.

pub mod error;
pub mod groups;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
