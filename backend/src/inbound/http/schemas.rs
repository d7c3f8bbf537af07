//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers below mirror their serialised shape and are registered with
//! utoipa under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication is missing or the caller may not read the group.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested group or user does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The group already exists or the directory refused the change.
    #[schema(rename = "conflict")]
    Conflict,
    /// The group directory is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "The requested group could not be found")]
    message: String,
    /// Request correlation identifier, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "6f1c2d3e-4b5a-4c7d-8e9f-0a1b2c3d4e5f")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending `groupId`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserDetail)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserDetailSchema {
    #[schema(example = "alice")]
    id: String,
    #[schema(rename = "displayName", example = "Alice Example")]
    display_name: String,
    #[schema(example = "alice@example.org")]
    email: Option<String>,
    enabled: bool,
    /// Groups the user belongs to.
    #[schema(example = json!(["staff"]))]
    groups: Vec<String>,
    /// Groups the user administers as a sub-admin.
    #[schema(example = json!(["staff"]))]
    subadmin: Vec<String>,
}
