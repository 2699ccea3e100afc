//! User aggregate and the value types guarding its fields.
//!
//! Every field type normalises its input on construction (trimming, email
//! lowercasing) so a constructed [`User`] always satisfies the storage
//! invariants. Validation messages are user-facing and written in Vietnamese.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// Fields of a user that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    Name,
    Age,
    Email,
    Address,
}

impl UserField {
    /// Field name as it appears in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Age => "age",
            Self::Email => "email",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest age the store can hold.
pub const AGE_MAX: i32 = i32::MAX;

/// Validation errors raised by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    MissingName,
    NonIntegerAge,
    NegativeAge,
    AgeOutOfRange,
    MissingEmail,
    InvalidEmail,
}

impl UserValidationError {
    /// Field the error refers to.
    pub fn field(&self) -> UserField {
        match self {
            Self::InvalidId => UserField::Id,
            Self::MissingName => UserField::Name,
            Self::NonIntegerAge | Self::NegativeAge | Self::AgeOutOfRange => UserField::Age,
            Self::MissingEmail | Self::InvalidEmail => UserField::Email,
        }
    }

    /// Stable machine-readable code for API details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MissingName => "missing_name",
            Self::NonIntegerAge => "non_integer_age",
            Self::NegativeAge => "negative_age",
            Self::AgeOutOfRange => "age_out_of_range",
            Self::MissingEmail => "missing_email",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "ID người dùng không hợp lệ"),
            Self::MissingName => write!(f, "Tên là bắt buộc"),
            Self::NonIntegerAge => write!(f, "Tuổi phải là số nguyên"),
            Self::NegativeAge => write!(f, "Tuổi không được âm"),
            Self::AgeOutOfRange => write!(f, "Tuổi vượt quá giới hạn cho phép"),
            Self::MissingEmail => write!(f, "Email là bắt buộc"),
            Self::InvalidEmail => write!(f, "Email không hợp lệ"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier, rejecting padded or malformed input.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::UserId;
    ///
    /// assert!(UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    /// assert!(UserId::new("65a1f0c2e4b0a1b2c3d4e5f6").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() || raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Person name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Trim and validate a name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::MissingName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Non-negative whole-number age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(i32);

impl Age {
    /// Validate an integer age.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if value < 0 {
            return Err(UserValidationError::NegativeAge);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| UserValidationError::AgeOutOfRange)
    }

    /// Validate an age submitted as arbitrary JSON.
    ///
    /// Numbers must be whole. Strings and booleans are cast the way
    /// JavaScript's `Number()` casts them: blank strings become `0`, `true`
    /// becomes `1` and `false` becomes `0`. Arrays and objects are rejected as
    /// non-integers.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::{Age, UserValidationError};
    /// use serde_json::json;
    ///
    /// assert_eq!(Age::from_json(&json!(30)).map(|age| age.value()), Ok(30));
    /// assert_eq!(Age::from_json(&json!("41")).map(|age| age.value()), Ok(41));
    /// assert_eq!(Age::from_json(&json!(2.5)), Err(UserValidationError::NonIntegerAge));
    /// assert_eq!(Age::from_json(&json!(-1)), Err(UserValidationError::NegativeAge));
    /// assert_eq!(Age::from_json(&json!(true)).map(|age| age.value()), Ok(1));
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, UserValidationError> {
        match value {
            Value::Number(number) => Self::from_number(number),
            Value::Bool(flag) => Self::new(i64::from(*flag)),
            Value::String(raw) if raw.trim().is_empty() => Self::new(0),
            Value::String(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| UserValidationError::NonIntegerAge)
                .and_then(Self::from_float),
            _ => Err(UserValidationError::NonIntegerAge),
        }
    }

    fn from_number(number: &Number) -> Result<Self, UserValidationError> {
        if let Some(value) = number.as_i64() {
            return Self::new(value);
        }
        if number.as_u64().is_some() {
            return Err(UserValidationError::AgeOutOfRange);
        }
        number
            .as_f64()
            .ok_or(UserValidationError::NonIntegerAge)
            .and_then(Self::from_float)
    }

    fn from_float(value: f64) -> Result<Self, UserValidationError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(UserValidationError::NonIntegerAge);
        }
        if value < 0.0 {
            return Err(UserValidationError::NegativeAge);
        }
        if value > f64::from(AGE_MAX) {
            return Err(UserValidationError::AgeOutOfRange);
        }
        // Whole and within range, so the cast is exact.
        Ok(Self(value as i32))
    }

    /// Age in years.
    pub fn value(self) -> i32 {
        self.0
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\S+@\S+\.\S+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed and lowercased.
///
/// Two addresses differing only in case or surrounding whitespace compare
/// equal once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  An@X.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "an@x.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form postal address, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    /// Trim an address. Any text is accepted.
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_owned())
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated user-editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: PersonName,
    pub age: Option<Age>,
    pub email: EmailAddress,
    pub address: Option<Address>,
}

/// Persisted user record.
///
/// ## Invariants
/// - `email` is trimmed and lowercased.
/// - `updated_at >= created_at` for records produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "Nguyễn Văn An")]
    name: PersonName,
    #[schema(value_type = Option<i32>, example = 30)]
    age: Option<Age>,
    #[schema(value_type = String, example = "an@example.com")]
    email: EmailAddress,
    #[schema(value_type = Option<String>, example = "12 Lê Lợi, Huế")]
    address: Option<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly created user; both timestamps are `now`.
    pub fn create(id: UserId, profile: UserProfile, now: DateTime<Utc>) -> Self {
        Self::restore(id, profile, now, now)
    }

    /// Rebuild a user from stored components.
    pub fn restore(
        id: UserId,
        profile: UserProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let UserProfile {
            name,
            age,
            email,
            address,
        } = profile;
        Self {
            id,
            name,
            age,
            email,
            address,
            created_at,
            updated_at,
        }
    }

    /// Apply a partial update and refresh `updated_at`.
    pub fn apply(&mut self, changes: &super::UserChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(age) = changes.age {
            self.age = Some(age);
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(address) = &changes.address {
            self.address = Some(address.clone());
        }
        self.updated_at = now;
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Age in years, when known.
    pub fn age(&self) -> Option<Age> {
        self.age
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Postal address, when known.
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age: Option<i32>,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            age,
            email,
            address,
            created_at,
            updated_at,
        } = value;
        Self {
            id: id.to_string(),
            name: name.0,
            age: age.map(Age::value),
            email: email.0,
            address: address.map(|address| address.0),
            created_at,
            updated_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let profile = UserProfile {
            name: PersonName::new(value.name)?,
            age: value.age.map(|age| Age::new(i64::from(age))).transpose()?,
            email: EmailAddress::new(value.email)?,
            address: value.address.map(Address::new),
        };
        Ok(Self::restore(
            UserId::new(value.id)?,
            profile,
            value.created_at,
            value.updated_at,
        ))
    }
}
