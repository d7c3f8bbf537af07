//! Domain primitives, ports and the group access gateway.
//!
//! Purpose: Define strongly typed domain entities and the use-cases exposed to
//! inbound adapters. Types stay framework agnostic; HTTP mapping lives in
//! `crate::inbound`.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic error payload.
//! - GroupId, Group, PageWindow: group identity and listing windows.
//! - UserId, UserDetail: user identity and profile records.
//! - ActingIdentity, LoginCredentials: authentication primitives.
//! - GroupAccessService: gateway implementing the group driving ports.

pub mod auth;
pub mod error;
pub mod group;
pub mod group_access;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{ActingIdentity, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::group::{
    ADMIN_GROUP_ID, Group, GroupDisplayName, GroupId, GroupValidationError, PageWindow,
};
pub use self::group_access::GroupAccessService;
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, UserDetail, UserId, UserValidationError};
