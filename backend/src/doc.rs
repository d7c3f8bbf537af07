//! OpenAPI documentation for the provisioning API.
//!
//! [`ApiDoc`] registers every inbound HTTP handler together with the schema
//! wrappers from [`crate::inbound::http::schemas`], and advertises the session
//! cookie as the default security scheme. Swagger UI serves it in debug
//! builds; `openapi-dump` prints it for external tooling.

use crate::inbound::http::groups::{
    CreateGroupRequest, GroupIdsResponse, GroupSummariesResponse, GroupSummary,
    MemberDetailsResponse, MemberIdsResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, UserDetailSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Group provisioning API",
        description = "Session-authenticated group listing, membership visibility and group lifecycle.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::groups::list_groups,
        crate::inbound::http::groups::list_groups_detailed,
        crate::inbound::http::groups::create_group,
        crate::inbound::http::groups::get_group,
        crate::inbound::http::groups::delete_group,
        crate::inbound::http::groups::list_group_members,
        crate::inbound::http::groups::list_group_members_detailed,
        crate::inbound::http::groups::list_sub_admins,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserDetailSchema,
        LoginRequest,
        CreateGroupRequest,
        GroupIdsResponse,
        GroupSummary,
        GroupSummariesResponse,
        MemberIdsResponse,
        MemberDetailsResponse,
    )),
    tags(
        (name = "users", description = "Session login"),
        (name = "groups", description = "Group listing, membership and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks on the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_DETAIL_SCHEMA_NAME: &str = "crate.domain.UserDetail";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "message")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case(USER_DETAIL_SCHEMA_NAME, "displayName")]
    #[case(USER_DETAIL_SCHEMA_NAME, "subadmin")]
    fn registered_schemas_expose_wire_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let registered = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(registered, field);
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/groups")]
    #[case("/api/v1/groups/details")]
    #[case("/api/v1/groups/{groupId}")]
    #[case("/api/v1/groups/{groupId}/users")]
    #[case("/api/v1/groups/{groupId}/users/details")]
    #[case("/api/v1/groups/{groupId}/subadmins")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn deprecated_group_alias_documents_the_shadowed_details_id() {
        let doc = ApiDoc::openapi();
        let description = doc
            .paths
            .paths
            .get("/api/v1/groups/{groupId}")
            .and_then(|item| item.get.as_ref())
            .and_then(|operation| operation.description.as_deref())
            .expect("getGroup description");
        assert!(description.starts_with("Deprecated."));
        assert!(description.contains("`details`"));
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
