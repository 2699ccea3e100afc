//! Partial update payloads.
//!
//! Clients may send any subset of the editable fields. A field only takes
//! part in the update when it is present, non-null and not an empty string,
//! so optional fields cannot be cleared through an update.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use super::user::{Address, Age, EmailAddress, PersonName, UserValidationError};
use super::user_input::{ValidationFailure, collect};
use super::Error;

/// Message returned when an update carries nothing to apply.
pub const EMPTY_UPDATE_MESSAGE: &str = "Không có dữ liệu nào để cập nhật";

/// A JSON field that may be missing, explicitly null, or carry a value.
///
/// Combine with `#[serde(default)]` so missing keys become
/// [`FieldPatch::Absent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldPatch<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<'de, T> Deserialize<'de> for FieldPatch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Present))
    }
}

/// Values whose empty form means "not provided".
pub trait PatchValue {
    /// Whether the value is the empty placeholder.
    fn is_empty_value(&self) -> bool;
}

impl PatchValue for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl PatchValue for Value {
    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(raw) => raw.is_empty(),
            _ => false,
        }
    }
}

impl<T: PatchValue> FieldPatch<T> {
    /// The supplied value, skipping absent, null and empty entries.
    ///
    /// # Examples
    /// ```
    /// use user_directory::domain::FieldPatch;
    ///
    /// assert_eq!(FieldPatch::Present("An".to_owned()).supplied(), Some("An".to_owned()));
    /// assert_eq!(FieldPatch::Present(String::new()).supplied(), None);
    /// assert_eq!(FieldPatch::<String>::Null.supplied(), None);
    /// ```
    pub fn supplied(self) -> Option<T> {
        match self {
            Self::Present(value) if !value.is_empty_value() => Some(value),
            _ => None,
        }
    }
}

/// Raw update payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: FieldPatch<String>,
    pub age: FieldPatch<Value>,
    pub email: FieldPatch<String>,
    pub address: FieldPatch<String>,
}

/// Validated set of field changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<PersonName>,
    pub age: Option<Age>,
    pub email: Option<EmailAddress>,
    pub address: Option<Address>,
}

/// Reasons an update payload cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserChangesError {
    #[error("Không có dữ liệu nào để cập nhật")]
    Empty,
    #[error("{0}")]
    Invalid(ValidationFailure),
}

impl From<UserChangesError> for Error {
    fn from(value: UserChangesError) -> Self {
        match value {
            UserChangesError::Empty => Error::invalid_request(EMPTY_UPDATE_MESSAGE),
            UserChangesError::Invalid(failure) => failure.into(),
        }
    }
}

impl UserChanges {
    /// Validate the supplied fields of a patch.
    ///
    /// Returns [`UserChangesError::Empty`] before any validation when no
    /// field was supplied.
    pub fn from_patch(patch: UserPatch) -> Result<Self, UserChangesError> {
        let name = patch.name.supplied();
        let age = patch.age.supplied();
        let email = patch.email.supplied();
        let address = patch.address.supplied();

        if name.is_none() && age.is_none() && email.is_none() && address.is_none() {
            return Err(UserChangesError::Empty);
        }

        let mut violations: Vec<UserValidationError> = Vec::new();
        let name = name.and_then(|raw| collect(&mut violations, PersonName::new(raw)));
        let age = age.and_then(|raw| collect(&mut violations, Age::from_json(&raw)));
        let email = email.and_then(|raw| collect(&mut violations, EmailAddress::new(raw)));

        if let Some(failure) = ValidationFailure::from_violations(violations) {
            return Err(UserChangesError::Invalid(failure));
        }

        Ok(Self {
            name,
            age,
            email,
            address: address.map(Address::new),
        })
    }

    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.email.is_none() && self.address.is_none()
    }
}
