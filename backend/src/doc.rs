//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user endpoint and the health probes. The
//! generated document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::users::{
    CreateUserRequestSchema, MessageResponse, UpdateUserRequestSchema, UserMutationResponse,
    UserPageSchema,
};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User directory API",
        description = "CRUD endpoints for user records plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Error,
        ErrorCode,
        UserPageSchema,
        UserMutationResponse,
        MessageResponse,
        CreateUserRequestSchema,
        UpdateUserRequestSchema,
    )),
    tags(
        (name = "users", description = "User directory operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_named<'a>(doc: &'a utoipa::openapi::OpenApi, name: &str) -> &'a RefOr<Schema> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        schemas
            .iter()
            .find(|(key, _)| key.rsplit('.').next() == Some(name))
            .map(|(_, schema)| schema)
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_has_fields(schema: &RefOr<Schema>, fields: &[&str]) {
        let RefOr::T(Schema::Object(object)) = schema else {
            panic!("expected object schema");
        };
        for field in fields {
            assert!(
                object.properties.contains_key(*field),
                "schema should have field '{field}'"
            );
        }
    }

    #[rstest]
    #[case("/api/users")]
    #[case("/api/users/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn registers_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn user_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        assert_has_fields(
            schema_named(&doc, "User"),
            &["id", "name", "age", "email", "address", "createdAt", "updatedAt"],
        );
    }

    #[rstest]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        assert_has_fields(schema_named(&doc, "Error"), &["code", "message"]);
    }

    #[rstest]
    fn page_schema_exposes_total_pages() {
        let doc = ApiDoc::openapi();
        assert_has_fields(
            schema_named(&doc, "UserPage"),
            &["page", "limit", "total", "totalPages", "data"],
        );
    }
}
