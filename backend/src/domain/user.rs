//! User resources served by `/api/users`.
//!
//! The mock keeps no store: listings come from a fixed roster, lookups are
//! synthesised from the requested id, and creations are acknowledged with a
//! freshly drawn id that is never remembered.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Upper bound (inclusive) for ids assigned to newly created users.
pub const MAX_CREATED_USER_ID: u64 = 10_000;

/// Validation failures for user inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was not a positive integer.
    #[error("user id must be a positive integer")]
    InvalidId,
    /// The name was missing or blank.
    #[error("name is required")]
    MissingName,
    /// The e-mail was missing or blank.
    #[error("email is required")]
    MissingEmail,
}

impl UserValidationError {
    /// Field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::MissingName => "name",
            Self::MissingEmail => "email",
        }
    }

    /// Machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::MissingName => "missing_name",
            Self::MissingEmail => "missing_email",
        }
    }
}

/// Positive numeric user identifier.
///
/// # Examples
/// ```
/// use mock_api::domain::UserId;
///
/// assert_eq!(UserId::parse("42").map(u64::from), Ok(42));
/// assert!(UserId::parse("0").is_err());
/// assert!(UserId::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Validate a raw numeric id.
    pub const fn new(raw: u64) -> Result<Self, UserValidationError> {
        if raw == 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Parse an id from a path segment.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        raw.trim()
            .parse::<u64>()
            .map_err(|_| UserValidationError::InvalidId)
            .and_then(Self::new)
    }
}

impl From<UserId> for u64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a user without a creation timestamp.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at: None,
        }
    }

    /// Attach a creation timestamp.
    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Synthesise the user a lookup for `id` returns.
    #[must_use]
    pub fn synthesised(id: UserId, at: DateTime<Utc>) -> Self {
        Self::new(id, format!("User {id}"), format!("user{id}@example.com")).created_at(at)
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// E-mail address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Fixed roster returned by `GET /api/users`.
#[must_use]
pub fn roster() -> Vec<User> {
    [
        (1, "John Doe", "john@example.com"),
        (2, "Jane Smith", "jane@example.com"),
        (3, "Bob Johnson", "bob@example.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| User::new(UserId(id), name, email))
    .collect()
}

/// Validated payload for `POST /api/users`.
///
/// ## Invariants
/// - `name` and `email` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    /// Validate raw, possibly absent, inputs.
    ///
    /// # Examples
    /// ```
    /// use mock_api::domain::{NewUser, UserValidationError};
    ///
    /// let user = NewUser::try_from_parts(Some(" Ada "), Some("ada@example.com")).unwrap();
    /// assert_eq!(user.name(), "Ada");
    /// assert_eq!(
    ///     NewUser::try_from_parts(None, Some("a@b.c")),
    ///     Err(UserValidationError::MissingName)
    /// );
    /// ```
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let trimmed_name = non_blank(name).ok_or(UserValidationError::MissingName)?;
        let trimmed_email = non_blank(email).ok_or(UserValidationError::MissingEmail)?;
        Ok(Self {
            name: trimmed_name.to_owned(),
            email: trimmed_email.to_owned(),
        })
    }

    /// Trimmed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Turn the payload into a user under the freshly drawn `id`.
    #[must_use]
    pub fn into_user(self, id: UserId, at: DateTime<Utc>) -> User {
        User::new(id, self.name, self.email).created_at(at)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixture_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid fixture timestamp")
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 17 ", Some(17))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("", None)]
    fn parse_accepts_positive_integers(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(UserId::parse(raw).ok().map(u64::from), expected);
    }

    #[test]
    fn roster_has_three_fixed_users() {
        let users = roster();
        let ids: Vec<u64> = users.iter().map(|u| u64::from(u.id())).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(users.first().map(User::name), Some("John Doe"));
    }

    #[test]
    fn synthesised_user_derives_fields_from_id() {
        let id = UserId::new(42).expect("valid id");
        let user = User::synthesised(id, fixture_time());
        assert_eq!(user.name(), "User 42");
        assert_eq!(user.email(), "user42@example.com");
    }

    #[rstest]
    #[case(None, Some("a@b.c"), UserValidationError::MissingName)]
    #[case(Some("  "), Some("a@b.c"), UserValidationError::MissingName)]
    #[case(Some("Ada"), None, UserValidationError::MissingEmail)]
    #[case(Some("Ada"), Some(""), UserValidationError::MissingEmail)]
    fn new_user_requires_name_and_email(
        #[case] name: Option<&str>,
        #[case] email: Option<&str>,
        #[case] expected: UserValidationError,
    ) {
        assert_eq!(NewUser::try_from_parts(name, email), Err(expected));
    }

    #[test]
    fn user_serialises_camel_case_with_timestamp() {
        let id = UserId::new(7).expect("valid id");
        let user = NewUser::try_from_parts(Some("Ada"), Some("ada@example.com"))
            .expect("valid user")
            .into_user(id, fixture_time());
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(value.get("id").and_then(serde_json::Value::as_u64), Some(7));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
