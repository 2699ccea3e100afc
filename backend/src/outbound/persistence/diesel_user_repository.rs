//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Rows are converted back into validated domain users on read. Email
//! uniqueness is enforced by the `users_email_key` constraint and surfaced as
//! [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StorageProbe, UserPersistenceError, UserRepository};
use crate::domain::{
    Address, Age, EmailAddress, PersonName, User, UserChanges, UserFilter, UserId, UserProfile,
};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Name of the unique constraint guarding `users.email`.
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    debug!(error = %error, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            UserPersistenceError::connection(info.message())
        }
        other => UserPersistenceError::query(other.to_string()),
    }
}

/// Like [`map_diesel_error`] but recognises email uniqueness violations.
fn map_write_error(error: DieselError, email: Option<&EmailAddress>) -> UserPersistenceError {
    if let (
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info),
        Some(email),
    ) = (&error, email)
        && info.constraint_name() == Some(EMAIL_CONSTRAINT)
    {
        return UserPersistenceError::duplicate_email(email.as_ref());
    }
    map_diesel_error(error)
}

/// Escape `LIKE` metacharacters so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let query = users::table.into_boxed();
    match filter.search() {
        Some(term) => {
            let pattern = format!("%{}%", escape_like(term.as_str()));
            query
                .filter(users::name.ilike(pattern.clone()))
                .or_filter(users::email.ilike(pattern.clone()))
                .or_filter(users::address.ilike(pattern))
        }
        None => query,
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        name,
        age,
        email,
        address,
        created_at,
        updated_at,
    } = row;
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    };
    let profile = UserProfile {
        name: PersonName::new(name).map_err(invalid)?,
        age: age
            .map(|value| Age::new(i64::from(value)))
            .transpose()
            .map_err(invalid)?,
        email: EmailAddress::new(email).map_err(invalid)?,
        address: address.map(Address::new),
    };
    Ok(User::restore(
        UserId::from_uuid(id),
        profile,
        created_at,
        updated_at,
    ))
}

fn to_i64(value: u64, what: &str) -> Result<i64, UserPersistenceError> {
    i64::try_from(value)
        .map_err(|_| UserPersistenceError::query(format!("{what} {value} exceeds supported range")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            age: user.age().map(Age::value),
            email: user.email().as_ref(),
            address: user.address().map(AsRef::as_ref),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, Some(user.email())))
    }

    async fn find_page(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = filtered(filter)
            .order((users::created_at.asc(), users::id.asc()))
            .offset(to_i64(offset, "offset")?)
            .limit(i64::from(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total)
            .map_err(|_| UserPersistenceError::query(format!("negative user count {total}")))
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = UserChangeset {
            name: changes.name.as_ref().map(AsRef::as_ref),
            age: changes.age.map(Age::value),
            email: changes.email.as_ref().map(AsRef::as_ref),
            address: changes.address.as_ref().map(AsRef::as_ref),
            updated_at,
        };

        let row = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, changes.email.as_ref()))?;

        row.map(row_to_user).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl StorageProbe for DieselUserRepository {
    async fn ping(&self) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case("an", "an")]
    #[case("50%", "50\\%")]
    #[case("a_b", "a\\_b")]
    #[case("c:\\temp", "c:\\\\temp")]
    fn escape_like_neutralises_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(escape_like(term), expected);
    }

    #[rstest]
    fn row_to_user_restores_domain_user() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let user = row_to_user(UserRow {
            id,
            name: "An".to_owned(),
            age: Some(30),
            email: "an@x.com".to_owned(),
            address: None,
            created_at: now,
            updated_at: now,
        })
        .expect("valid row");

        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.age().map(Age::value), Some(30));
        assert!(user.address().is_none());
    }

    #[rstest]
    fn row_to_user_rejects_corrupt_rows() {
        let now = Utc::now();
        let result = row_to_user(UserRow {
            id: Uuid::new_v4(),
            name: "An".to_owned(),
            age: Some(-1),
            email: "an@x.com".to_owned(),
            address: None,
            created_at: now,
            updated_at: now,
        });

        assert!(matches!(result, Err(UserPersistenceError::Query { .. })));
    }

    #[rstest]
    fn pool_failures_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, UserPersistenceError::connection("timed out"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_write_error(DieselError::NotFound, None);
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
