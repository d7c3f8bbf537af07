//! Group administration handlers.
//!
//! ```text
//! GET    /api/v1/groups?search=&limit=&offset=
//! GET    /api/v1/groups/details?search=&limit=&offset=
//! POST   /api/v1/groups {"groupid":"staff"}
//! GET    /api/v1/groups/{groupId}              (deprecated)
//! DELETE /api/v1/groups/{groupId}
//! GET    /api/v1/groups/{groupId}/users
//! GET    /api/v1/groups/{groupId}/users/details?limit=&offset=
//! GET    /api/v1/groups/{groupId}/subadmins
//! ```
//!
//! Every handler resolves the acting identity from the session before calling
//! a port. Admin-only routes pass the [`crate::domain::ports::AdminGate`]
//! first.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ActingIdentity, Group, GroupId, PageWindow, UserDetail, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserDetailSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{GROUP_ID_FIELD, parse_group_id};

/// Search and window parameters accepted by group listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring matched against id and display name.
    #[serde(default)]
    pub search: String,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    pub offset: Option<usize>,
}

impl ListQuery {
    fn window(&self) -> PageWindow {
        PageWindow::new(self.limit, self.offset)
    }
}

/// Window parameters accepted by the detailed member listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    /// Maximum number of members.
    pub limit: Option<usize>,
    /// Number of leading members to skip.
    pub offset: Option<usize>,
}

impl From<&WindowQuery> for PageWindow {
    fn from(value: &WindowQuery) -> Self {
        PageWindow::new(value.limit, value.offset)
    }
}

/// Request body for `POST /api/v1/groups`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateGroupRequest {
    /// Identifier of the new group. Missing and empty values are rejected.
    #[serde(default)]
    pub groupid: String,
}

/// `{groups: [id...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupIdsResponse {
    pub groups: Vec<String>,
}

/// Group id paired with its display name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupSummary {
    pub id: String,
    pub displayname: String,
}

impl From<Group> for GroupSummary {
    fn from(value: Group) -> Self {
        Self {
            displayname: value.display_name().to_string(),
            id: value.id().to_string(),
        }
    }
}

/// `{groups: [{id, displayname}...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupSummariesResponse {
    pub groups: Vec<GroupSummary>,
}

/// `{users: [id...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberIdsResponse {
    pub users: Vec<String>,
}

/// `{users: [userDetail...]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberDetailsResponse {
    #[schema(value_type = Vec<UserDetailSchema>)]
    pub users: Vec<UserDetail>,
}

fn id_strings<T: AsRef<str>>(ids: Vec<T>) -> Vec<String> {
    ids.into_iter().map(|id| id.as_ref().to_owned()).collect()
}

fn group_path(path: web::Path<String>) -> ApiResult<GroupId> {
    parse_group_id(path.into_inner(), GROUP_ID_FIELD)
}

async fn require_admin(state: &HttpState, identity: &ActingIdentity) -> ApiResult<()> {
    state.admin_gate.require_admin(identity).await
}

/// Register the group routes on a scope.
///
/// Literal segments are registered ahead of `{groupId}` so `/groups/details`
/// is never captured as a group identifier.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_groups_detailed)
        .service(list_groups)
        .service(create_group)
        .service(list_group_members_detailed)
        .service(list_group_members)
        .service(list_sub_admins)
        .service(get_group)
        .service(delete_group);
}

/// List group ids matching a search term.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching group ids", body = GroupIdsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Directory unavailable", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listGroups"
)]
#[get("/groups")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<GroupIdsResponse>> {
    let identity = session.require_identity()?;
    let ids = state
        .groups
        .list_groups(&identity, &query.search, query.window())
        .await?;
    Ok(web::Json(GroupIdsResponse {
        groups: id_strings(ids),
    }))
}

/// List groups matching a search term with their display names.
#[utoipa::path(
    get,
    path = "/api/v1/groups/details",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching groups", body = GroupSummariesResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Directory unavailable", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listGroupsDetailed"
)]
#[get("/groups/details")]
pub async fn list_groups_detailed(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<GroupSummariesResponse>> {
    let identity = session.require_identity()?;
    let groups = state
        .groups
        .list_groups_detailed(&identity, &query.search, query.window())
        .await?;
    Ok(web::Json(GroupSummariesResponse {
        groups: groups.into_iter().map(GroupSummary::from).collect(),
    }))
}

/// Create a group. Global administrators only.
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 200, description = "Group created"),
        (status = 400, description = "Invalid group name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Group already exists", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "createGroup"
)]
#[post("/groups")]
pub async fn create_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateGroupRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    require_admin(&state, &identity).await?;
    let CreateGroupRequest { groupid } = payload.into_inner();
    state.groups_command.create_group(&identity, &groupid).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Deprecated alias of `GET /api/v1/groups/{groupId}/users`.
///
/// A group named `details` is shadowed here by the detailed listing route.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{groupId}",
    description = "Deprecated. Use `GET /api/v1/groups/{groupId}/users`. \
        A group whose id is `details` cannot be read through this alias because \
        `GET /api/v1/groups/details` is the detailed group listing.",
    params(("groupId" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Member ids", body = MemberIdsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "getGroup"
)]
#[get("/groups/{groupId}")]
pub async fn get_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MemberIdsResponse>> {
    let identity = session.require_identity()?;
    let group_id = group_path(path)?;
    let members: Vec<UserId> = state.groups.get_group(&identity, &group_id).await?;
    Ok(web::Json(MemberIdsResponse {
        users: id_strings(members),
    }))
}

/// Delete a group. Global administrators only; `admin` is protected.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{groupId}",
    params(("groupId" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Group deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden or protected group", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema),
        (status = 409, description = "Directory refused the deletion", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "deleteGroup"
)]
#[delete("/groups/{groupId}")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    require_admin(&state, &identity).await?;
    let group_id = group_path(path)?;
    state
        .groups_command
        .delete_group(&identity, &group_id)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// List member ids of a group the caller administers.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{groupId}/users",
    params(("groupId" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Member ids", body = MemberIdsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listGroupMembers"
)]
#[get("/groups/{groupId}/users")]
pub async fn list_group_members(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MemberIdsResponse>> {
    let identity = session.require_identity()?;
    let group_id = group_path(path)?;
    let members = state
        .groups
        .list_group_members(&identity, &group_id)
        .await?;
    Ok(web::Json(MemberIdsResponse {
        users: id_strings(members),
    }))
}

/// List detailed member records of a group the caller administers.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{groupId}/users/details",
    params(("groupId" = String, Path, description = "Group identifier"), WindowQuery),
    responses(
        (status = 200, description = "Member details", body = MemberDetailsResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Group or member not found", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listGroupMembersDetailed"
)]
#[get("/groups/{groupId}/users/details")]
pub async fn list_group_members_detailed(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<WindowQuery>,
) -> ApiResult<web::Json<MemberDetailsResponse>> {
    let identity = session.require_identity()?;
    let group_id = group_path(path)?;
    let users = state
        .groups
        .list_group_members_detailed(&identity, &group_id, PageWindow::from(&*query))
        .await?;
    Ok(web::Json(MemberDetailsResponse { users }))
}

/// List sub-admins of a group. Global administrators only.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{groupId}/subadmins",
    params(("groupId" = String, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Sub-admin ids", body = [String]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Group not found", body = ErrorSchema)
    ),
    tags = ["groups"],
    operation_id = "listSubAdmins"
)]
#[get("/groups/{groupId}/subadmins")]
pub async fn list_sub_admins(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let identity = session.require_identity()?;
    require_admin(&state, &identity).await?;
    let group_id = group_path(path)?;
    let sub_admins = state.groups.list_sub_admins(&identity, &group_id).await?;
    Ok(web::Json(id_strings(sub_admins)))
}

#[cfg(test)]
#[path = "groups_tests.rs"]
mod tests;
