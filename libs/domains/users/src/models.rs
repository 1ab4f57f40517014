use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::error::{UserError, UserResult};

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;

/// User identifier, assigned by the repository and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(UserId)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name (non-empty, trimmed)
    pub name: String,
    /// Email address (unique, stored lower-case)
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated user data that has not been assigned an id yet.
///
/// The only way to obtain one is [`NewUser::new`], so a repository never sees
/// unvalidated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> UserResult<Self> {
        Ok(Self {
            name: normalize_name(name.as_ref())?,
            email: normalize_email(email.as_ref())?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Input for the create use case
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUser {
    /// Normalized copy of this update, or the first validation failure.
    pub fn validated(&self) -> UserResult<UpdateUser> {
        Ok(UpdateUser {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            email: self.email.as_deref().map(normalize_email).transpose()?,
        })
    }
}

/// Window over the users in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub offset: usize,
    /// `None` means "everything after `offset`"
    pub limit: Option<usize>,
}

impl Pagination {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }
}

impl User {
    /// Builds the stored entity from validated data and a freshly issued id.
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Applies a partial update. Every supplied field is validated before
    /// anything is changed, so a failed update leaves the user intact.
    pub fn apply_update(&mut self, update: &UpdateUser) -> UserResult<()> {
        let update = update.validated()?;

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

fn normalize_name(raw: &str) -> UserResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(UserError::Validation("Name must not be empty".to_string()));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(UserError::Validation(format!(
            "Name cannot exceed {} characters",
            NAME_MAX_CHARS
        )));
    }
    Ok(name.to_string())
}

fn normalize_email(raw: &str) -> UserResult<String> {
    let email = raw.trim().to_lowercase();
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(UserError::Validation(format!(
            "Email cannot exceed {} characters",
            EMAIL_MAX_CHARS
        )));
    }
    if email.is_empty() || !email.validate_email() {
        return Err(UserError::Validation(format!(
            "'{}' is not a valid email address",
            raw.trim()
        )));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_fields() {
        let user = NewUser::new("  Ana  ", " Ana@X.com ").unwrap();
        assert_eq!(user.name(), "Ana");
        assert_eq!(user.email(), "ana@x.com");
    }

    #[test]
    fn test_new_user_rejects_blank_name() {
        let result = NewUser::new("   ", "ana@x.com");
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[test]
    fn test_new_user_rejects_malformed_email() {
        for email in ["", "ana", "ana@", "@x.com", "ana x@x.com"] {
            let result = NewUser::new("Ana", email);
            assert!(
                matches!(result, Err(UserError::Validation(_))),
                "expected {:?} to be rejected",
                email
            );
        }
    }

    #[test]
    fn test_new_user_rejects_overlong_name() {
        let name = "a".repeat(NAME_MAX_CHARS + 1);
        assert!(NewUser::new(name, "ana@x.com").is_err());

        let name = "a".repeat(NAME_MAX_CHARS);
        assert!(NewUser::new(name, "ana@x.com").is_ok());
    }

    #[test]
    fn test_apply_update_changes_only_supplied_fields() {
        let mut user = User::from_new(UserId(1), NewUser::new("Ana", "ana@x.com").unwrap());
        let before = user.clone();

        user.apply_update(&UpdateUser {
            name: Some("Ana Maria".to_string()),
            email: None,
        })
        .unwrap();

        assert_eq!(user.id, before.id);
        assert_eq!(user.email, before.email);
        assert_eq!(user.created_at, before.created_at);
        assert_eq!(user.name, "Ana Maria");
        assert!(user.updated_at.is_some());
    }

    #[test]
    fn test_failed_update_leaves_user_untouched() {
        let mut user = User::from_new(UserId(1), NewUser::new("Ana", "ana@x.com").unwrap());
        let before = user.clone();

        let result = user.apply_update(&UpdateUser {
            name: Some("Valid".to_string()),
            email: Some("broken".to_string()),
        });

        assert!(matches!(result, Err(UserError::Validation(_))));
        assert_eq!(user, before);
    }

    #[test]
    fn test_user_id_parses_and_serializes_as_number() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId(42));
        assert!("abc".parse::<UserId>().is_err());
        assert!("-1".parse::<UserId>().is_err());
        assert_eq!(serde_json::to_value(UserId(7)).unwrap(), serde_json::json!(7));
    }

    #[test]
    fn test_user_serialization_omits_missing_updated_at() {
        let user = User::from_new(UserId(3), NewUser::new("Leo", "leo@x.com").unwrap());
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["email"], "leo@x.com");
        assert!(value.get("updated_at").is_none());
    }
}
