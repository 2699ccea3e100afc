//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures (malformed JSON, bad query strings) are converted into
//! the domain error envelope so every 400 response has the same shape.

use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{Error, UserId, UserValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Path segment holding a user identifier.
pub(crate) const USER_ID_FIELD: FieldName = FieldName::new("id");

/// Parse a user id path segment.
pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err: UserValidationError| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field.as_str(),
            "value": value,
            "code": err.code(),
        }))
    })
}

fn malformed_body_error(err: &actix_web::error::JsonPayloadError) -> Error {
    Error::invalid_request(format!("Dữ liệu JSON không hợp lệ: {err}"))
        .with_details(json!({ "code": "malformed_json" }))
}

fn malformed_query_error(err: &actix_web::error::QueryPayloadError) -> Error {
    Error::invalid_request(format!("Tham số truy vấn không hợp lệ: {err}"))
        .with_details(json!({ "code": "malformed_query" }))
}

/// JSON extractor configuration reporting failures as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed_body_error(&err).into())
}

/// Query extractor configuration reporting failures as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed_query_error(&err).into())
}
