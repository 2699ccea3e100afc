//! Domain primitives, use-case services and ports.
//!
//! Purpose: Define strongly typed user records and the validation rules
//! applied before anything reaches storage. Types validate on construction;
//! serialisation contracts (serde) live on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): persisted user record.
//! - UsersService: implements the user query and command ports.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_changes;
pub mod user_input;
pub mod user_search;
pub mod users_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Address, Age, EmailAddress, PersonName, User, UserField, UserId, UserProfile,
    UserValidationError,
};
pub use self::user_changes::{FieldPatch, PatchValue, UserChanges, UserChangesError, UserPatch};
pub use self::user_input::{UserDraft, ValidationFailure};
pub use self::user_search::{SearchTerm, UserFilter, UserListRequest};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use user_directory::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("Không tìm thấy người dùng"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
