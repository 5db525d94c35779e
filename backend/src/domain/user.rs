//! User data model.
//!
//! Users are created lazily on first successful social login and uniquely
//! keyed by the issuer-supplied subject id. Profile fields are first-write
//! wins: later logins never overwrite them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::VerifiedClaims;

/// Role assigned to users created through social login.
pub const DEFAULT_USER_ROLE: &str = "user";

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptySubject,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptySubject => write!(f, "subject id must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application user.
///
/// ## Invariants
/// - `subject` is non-empty and unique across all users.
/// - Profile fields (`email`, `display_name`) are never rewritten after
///   creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    role: String,
}

impl User {
    /// Build a user record from verified social-login claims.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::auth::VerifiedClaims;
    /// use backend::domain::user::{DEFAULT_USER_ROLE, User, UserId};
    ///
    /// let claims = VerifiedClaims {
    ///     subject: "u1".to_owned(),
    ///     email: Some("a@b.com".to_owned()),
    ///     display_name: None,
    ///     email_verified: true,
    /// };
    /// let user = User::from_claims(UserId::random(), &claims).expect("valid claims");
    /// assert_eq!(user.subject(), "u1");
    /// assert_eq!(user.role(), DEFAULT_USER_ROLE);
    /// ```
    pub fn from_claims(id: UserId, claims: &VerifiedClaims) -> Result<Self, UserValidationError> {
        if claims.subject.trim().is_empty() {
            return Err(UserValidationError::EmptySubject);
        }
        Ok(Self {
            id,
            subject: claims.subject.clone(),
            email: claims.email.clone(),
            display_name: claims.display_name.clone(),
            role: DEFAULT_USER_ROLE.to_owned(),
        })
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Issuer-supplied subject id the user is keyed by.
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Email captured at first login, if the issuer supplied one.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Display name captured at first login.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Role reference assigned at creation.
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}

/// Reduced user shape embedded when a reference field is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(value_type = String)]
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        }
    }
}
