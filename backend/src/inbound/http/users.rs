//! Users API handlers.
//!
//! ```text
//! GET    /api/users?page=1&limit=5&search=an
//! POST   /api/users        {"name":"An","email":"an@x.com"}
//! PUT    /api/users/{id}   {"address":"Huế"}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, User, UserChanges, UserDraft, UserFilter, UserListRequest, UserPatch, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{USER_ID_FIELD, json_config, parse_user_id, query_config};

/// Success message for `POST /api/users`.
pub const CREATED_MESSAGE: &str = "Tạo người dùng thành công";
/// Success message for `PUT /api/users/{id}`.
pub const UPDATED_MESSAGE: &str = "Cập nhật thành công";
/// Success message for `DELETE /api/users/{id}`.
pub const DELETED_MESSAGE: &str = "Xóa người dùng thành công";

/// Query string for `GET /api/users`.
///
/// Values stay raw strings so unparsable numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// One-based page index (default 1).
    #[param(example = "1")]
    pub page: Option<String>,
    /// Page size (default 5, at most 50).
    #[param(example = "5")]
    pub limit: Option<String>,
    /// Case-insensitive substring matched against name, email and address.
    pub search: Option<String>,
}

impl ListUsersParams {
    fn into_request(self) -> UserListRequest {
        UserListRequest::new(
            PageRequest::from_query(self.page.as_deref(), self.limit.as_deref()),
            UserFilter::from_search(self.search.as_deref()),
        )
    }
}

/// Body returned by create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMutationResponse {
    pub message: String,
    pub data: User,
}

/// Body returned by delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// OpenAPI shape of a users page.
#[derive(ToSchema)]
#[schema(as = UserPage, rename_all = "camelCase")]
pub struct UserPageSchema {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<User>,
}

/// OpenAPI shape of a create payload.
#[derive(ToSchema)]
#[schema(as = CreateUserRequest)]
pub struct CreateUserRequestSchema {
    #[schema(example = "Nguyễn Văn An")]
    pub name: String,
    #[schema(example = 30)]
    pub age: Option<i32>,
    #[schema(example = "an@example.com")]
    pub email: String,
    #[schema(example = "12 Lê Lợi, Huế")]
    pub address: Option<String>,
}

/// OpenAPI shape of an update payload. Empty strings and nulls are ignored.
#[derive(ToSchema)]
#[schema(as = UpdateUserRequest)]
pub struct UpdateUserRequestSchema {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// List users, one page at a time.
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users page", body = UserPageSchema),
        (status = 400, description = "Invalid query string", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<Page<User>>> {
    let request = params.into_inner().into_request();
    let page = state.users_query.list_users(&request).await?;
    Ok(web::Json(page))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequestSchema,
    responses(
        (status = 201, description = "User created", body = UserMutationResponse),
        (status = 400, description = "Invalid payload or duplicate email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let profile = UserProfile::validate(payload.into_inner())?;
    let user = state.users_command.create_user(profile).await?;
    Ok(HttpResponse::Created().json(UserMutationResponse {
        message: CREATED_MESSAGE.to_owned(),
        data: user,
    }))
}

/// Update selected fields of a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequestSchema,
    responses(
        (status = 200, description = "User updated", body = UserMutationResponse),
        (status = 400, description = "Invalid id, empty update, invalid field or duplicate email", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPatch>,
) -> ApiResult<web::Json<UserMutationResponse>> {
    let id = parse_user_id(&path.into_inner(), USER_ID_FIELD)?;
    let changes = UserChanges::from_patch(payload.into_inner())?;
    let user = state.users_command.update_user(&id, changes).await?;
    Ok(web::Json(UserMutationResponse {
        message: UPDATED_MESSAGE.to_owned(),
        data: user,
    }))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_user_id(&path.into_inner(), USER_ID_FIELD)?;
    state.users_command.delete_user(&id).await?;
    Ok(web::Json(MessageResponse {
        message: DELETED_MESSAGE.to_owned(),
    }))
}

/// Register the users API under `/api`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_directory::inbound::http::users::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .service(list_users)
            .service(create_user)
            .service(update_user)
            .service(delete_user),
    );
}
