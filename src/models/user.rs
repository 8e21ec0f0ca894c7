//! User model and authentication request types

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::enums::Role;

pub const UNIVERSITY_EMAIL_DOMAIN: &str = "@uwaterloo.ca";

/// Authenticated user as reported by `/auth/me` and `/auth/verify-session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Base64 data URL or remote URL
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Result of `GET /auth/verify-session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub valid: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl SessionStatus {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

/// `{message, user}` returned by login, register and profile updates
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

pub(crate) fn validate_university_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim().to_lowercase();
    let local_part = email.strip_suffix(UNIVERSITY_EMAIL_DOMAIN).unwrap_or("");
    if local_part.is_empty() || local_part.contains('@') {
        return Err(ValidationError::new("university_email")
            .with_message("Only @uwaterloo.ca email addresses are accepted".into()));
    }
    Ok(())
}

/// Login request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_university_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_university_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub role: Role,
}

/// Profile update (`PATCH /auth/profile`); at least one field must be set
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[validate(schema(function = "validate_profile_not_empty"))]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_university_email"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

fn validate_profile_not_empty(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if update.name.is_none() && update.email.is_none() && update.profile_picture.is_none() {
        return Err(ValidationError::new("empty")
            .with_message("Please provide at least one field to update".into()));
    }
    Ok(())
}

impl ProfileUpdate {
    /// Encode raw image bytes as a data URL for `profile_picture`
    pub fn with_picture(mut self, mime: &str, bytes: &[u8]) -> Self {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.profile_picture = Some(format!("data:{};base64,{}", mime, encoded));
        self
    }
}

/// Password change request
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_password_change"))]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
    pub confirm_password: String,
}

fn validate_password_change(req: &ChangePasswordRequest) -> Result<(), ValidationError> {
    if req.new_password != req.confirm_password {
        return Err(ValidationError::new("mismatch")
            .with_message("New passwords do not match".into()));
    }
    if req.new_password == req.current_password {
        return Err(ValidationError::new("unchanged")
            .with_message("New password must be different from current password".into()));
    }
    Ok(())
}

/// Forgot-password request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "validate_university_email"))]
    pub email: String,
}
