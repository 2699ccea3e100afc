//! Create payload validation.
//!
//! A [`UserDraft`] mirrors what clients send on create; [`UserProfile::validate`]
//! turns it into validated field types or reports every failing field at once.

use std::fmt;

use serde::Deserialize;
use serde_json::{Value, json};

use super::user::{Address, Age, EmailAddress, PersonName, UserProfile, UserValidationError};
use super::Error;

/// One or more field violations collected while validating a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<UserValidationError>,
}

impl ValidationFailure {
    /// Wrap collected violations, returning `None` when nothing failed.
    pub fn from_violations(violations: Vec<UserValidationError>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// Violations in field order.
    pub fn violations(&self) -> &[UserValidationError] {
        &self.violations
    }
}

impl From<UserValidationError> for ValidationFailure {
    fn from(value: UserValidationError) -> Self {
        Self {
            violations: vec![value],
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {violation}", violation.field())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

impl From<ValidationFailure> for Error {
    fn from(value: ValidationFailure) -> Self {
        let fields: Vec<Value> = value
            .violations
            .iter()
            .map(|violation| {
                json!({
                    "field": violation.field().as_str(),
                    "code": violation.code(),
                    "message": violation.to_string(),
                })
            })
            .collect();
        Error::invalid_request(value.to_string()).with_details(json!({ "fields": fields }))
    }
}

/// Unvalidated create payload.
///
/// `age` stays raw JSON so numeric strings can be cast and other types
/// reported as non-integers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

pub(crate) fn collect<T>(
    violations: &mut Vec<UserValidationError>,
    result: Result<T, UserValidationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            violations.push(error);
            None
        }
    }
}

impl UserProfile {
    /// Validate a create payload.
    ///
    /// A null or empty-string `age` counts as absent.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::{UserDraft, UserProfile};
    ///
    /// let draft = UserDraft {
    ///     name: Some("An".into()),
    ///     email: Some("An@X.com".into()),
    ///     ..UserDraft::default()
    /// };
    /// let profile = UserProfile::validate(draft).expect("valid draft");
    /// assert_eq!(profile.email.as_ref(), "an@x.com");
    /// ```
    pub fn validate(draft: UserDraft) -> Result<Self, ValidationFailure> {
        let UserDraft {
            name,
            age,
            email,
            address,
        } = draft;
        let mut violations = Vec::new();

        let name = collect(
            &mut violations,
            name.ok_or(UserValidationError::MissingName)
                .and_then(PersonName::new),
        );
        let age = collect(
            &mut violations,
            match age {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(raw)) if raw.is_empty() => Ok(None),
                Some(raw) => Age::from_json(&raw).map(Some),
            },
        );
        let email = collect(
            &mut violations,
            email
                .ok_or(UserValidationError::MissingEmail)
                .and_then(EmailAddress::new),
        );

        let (Some(name), Some(age), Some(email)) = (name, age, email) else {
            return Err(ValidationFailure { violations });
        };
        Ok(Self {
            name,
            age,
            email,
            address: address.map(Address::new),
        })
    }
}
