//! Tests for the users service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{Address, Age, EmailAddress, ErrorCode, PersonName, UserFilter};

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn service(repo: MockUserRepository) -> UsersService<MockUserRepository> {
    UsersService::new(Arc::new(repo), fixture_clock())
}

#[fixture]
fn profile() -> UserProfile {
    UserProfile {
        name: PersonName::new("An").expect("valid name"),
        age: Some(Age::new(30).expect("valid age")),
        email: EmailAddress::new("an@x.com").expect("valid email"),
        address: Some(Address::new("Huế")),
    }
}

#[fixture]
fn stored_user(profile: UserProfile) -> User {
    User::create(UserId::random(), profile, fixture_timestamp())
}

fn email_change(raw: &str) -> UserChanges {
    UserChanges {
        email: Some(EmailAddress::new(raw).expect("valid email")),
        ..UserChanges::default()
    }
}

#[rstest]
#[tokio::test]
async fn list_users_combines_page_and_count(stored_user: User) {
    let request = UserListRequest::new(
        PageRequest::new(3, 5),
        UserFilter::from_search(Some("an")),
    );
    let mut repo = MockUserRepository::new();
    let page_data = vec![stored_user.clone()];
    repo.expect_find_page()
        .withf(|filter, offset, limit| {
            filter.search().map(|term| term.as_str()) == Some("an") && *offset == 10 && *limit == 5
        })
        .times(1)
        .return_once(move |_, _, _| Ok(page_data));
    repo.expect_count().times(1).return_once(|_| Ok(11));

    let page = service(repo)
        .list_users(&request)
        .await
        .expect("list succeeds");

    assert_eq!(page.page(), 3);
    assert_eq!(page.limit(), 5);
    assert_eq!(page.total(), 11);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.data(), &[stored_user]);
}

#[rstest]
#[tokio::test]
async fn list_users_maps_persistence_failure_to_internal() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_page()
        .return_once(|_, _, _| Err(UserPersistenceError::query("relation missing")));
    repo.expect_count().returning(|_| Ok(0));

    let error = service(repo)
        .list_users(&UserListRequest::new(PageRequest::default(), UserFilter::all()))
        .await
        .expect_err("list fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(
        error.message(),
        "Lỗi Server: user repository query failed: relation missing"
    );
}

#[rstest]
#[tokio::test]
async fn create_user_stamps_clock_time(profile: UserProfile) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .withf(|user| user.email().as_ref() == "an@x.com")
        .times(1)
        .return_once(|_| Ok(()));

    let user = service(repo)
        .create_user(profile)
        .await
        .expect("create succeeds");

    assert_eq!(user.created_at(), fixture_timestamp());
    assert_eq!(user.updated_at(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_user_maps_duplicate_email_to_conflict(profile: UserProfile) {
    let mut repo = MockUserRepository::new();
    repo.expect_insert()
        .return_once(|_| Err(UserPersistenceError::duplicate_email("an@x.com")));

    let error = service(repo)
        .create_user(profile)
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), EMAIL_TAKEN_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn update_user_rejects_empty_changes_without_storage() {
    let mut repo = MockUserRepository::new();
    repo.expect_update().times(0);

    let error = service(repo)
        .update_user(&UserId::random(), UserChanges::default())
        .await
        .expect_err("empty update");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), EMPTY_UPDATE_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn update_user_passes_clock_time(stored_user: User) {
    let id = *stored_user.id();
    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(move |candidate, changes, updated_at| {
            *candidate == id && changes.email.is_some() && *updated_at == fixture_timestamp()
        })
        .times(1)
        .return_once(move |_, _, _| Ok(Some(stored_user)));

    let user = service(repo)
        .update_user(&id, email_change("binh@x.com"))
        .await
        .expect("update succeeds");

    assert_eq!(*user.id(), id);
}

#[rstest]
#[case(Ok(None), ErrorCode::NotFound, USER_NOT_FOUND_MESSAGE)]
#[case(
    Err(UserPersistenceError::duplicate_email("binh@x.com")),
    ErrorCode::Conflict,
    EMAIL_COLLISION_MESSAGE
)]
#[tokio::test]
async fn update_user_maps_repository_outcomes(
    #[case] outcome: Result<Option<User>, UserPersistenceError>,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_update().return_once(move |_, _, _| outcome);

    let error = service(repo)
        .update_user(&UserId::random(), email_change("binh@x.com"))
        .await
        .expect_err("update fails");

    assert_eq!(error.code(), code);
    assert_eq!(error.message(), message);
}

#[rstest]
#[case(Ok(true), None)]
#[case(Ok(false), Some(ErrorCode::NotFound))]
#[case(Err(UserPersistenceError::connection("pool timed out")), Some(ErrorCode::InternalError))]
#[tokio::test]
async fn delete_user_maps_repository_outcomes(
    #[case] outcome: Result<bool, UserPersistenceError>,
    #[case] expected: Option<ErrorCode>,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().times(1).return_once(move |_| outcome);

    let result = service(repo).delete_user(&UserId::random()).await;

    assert_eq!(result.err().map(|error| error.code()), expected);
}

#[rstest]
#[tokio::test]
async fn delete_user_not_found_uses_delete_message() {
    let mut repo = MockUserRepository::new();
    repo.expect_delete().return_once(|_| Ok(false));

    let error = service(repo)
        .delete_user(&UserId::random())
        .await
        .expect_err("missing user");

    assert_eq!(error.message(), DELETE_NOT_FOUND_MESSAGE);
}
