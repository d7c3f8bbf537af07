//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures (malformed query strings, unreadable JSON bodies and
//! empty path identifiers) are reported as `invalid_request` domain errors so
//! clients see the same envelope as for domain validation.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use serde_json::json;

use crate::domain::{Error, GroupId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidQuery,
    InvalidBody,
    EmptyGroupId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::InvalidBody => "invalid_body",
            ErrorCode::EmptyGroupId => "empty_group_id",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const GROUP_ID_FIELD: FieldName = FieldName::new("groupId");

fn request_error(message: impl Into<String>, code: ErrorCode, reason: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "code": code.as_str(),
        "reason": reason,
    }))
}

/// Parse a path segment into a [`GroupId`].
pub(crate) fn parse_group_id(value: String, field: FieldName) -> Result<GroupId, Error> {
    GroupId::try_from(value).map_err(|_| {
        let field = field.as_str();
        Error::invalid_request(format!("{field} must not be empty")).with_details(json!({
            "field": field,
            "code": ErrorCode::EmptyGroupId.as_str(),
        }))
    })
}

/// Error handler installed on [`actix_web::web::QueryConfig`].
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    request_error(
        "query string is malformed",
        ErrorCode::InvalidQuery,
        err.to_string(),
    )
    .into()
}

/// Error handler installed on [`actix_web::web::JsonConfig`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    request_error(
        "request body is not valid JSON for this operation",
        ErrorCode::InvalidBody,
        err.to_string(),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct Window {
        #[serde(rename = "limit")]
        _limit: Option<usize>,
    }

    #[derive(Deserialize)]
    struct Body {
        #[serde(rename = "name")]
        _name: String,
    }

    #[rstest]
    fn parse_group_id_rejects_empty_values() {
        let err = parse_group_id(String::new(), GROUP_ID_FIELD).expect_err("empty id");
        assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "groupId");
        assert_eq!(details["code"], "empty_group_id");
    }

    #[rstest]
    fn parse_group_id_keeps_opaque_values() {
        let id = parse_group_id("Team A".into(), GROUP_ID_FIELD).expect("valid id");
        assert_eq!(id.as_ref(), "Team A");
    }

    #[rstest]
    #[case("/window?limit=-1")]
    #[case("/window?limit=many")]
    #[actix_web::test]
    async fn malformed_query_is_invalid_request(#[case] uri: &str) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .route(
                    "/window",
                    web::get().to(|_: web::Query<Window>| async { HttpResponse::Ok() }),
                ),
        )
        .await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "invalid_query");
    }

    #[actix_web::test]
    async fn malformed_json_is_invalid_request() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .route(
                    "/body",
                    web::post().to(|_: web::Json<Body>| async { HttpResponse::Ok() }),
                ),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/body")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\":")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "invalid_body");
    }
}
