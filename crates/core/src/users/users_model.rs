//! User domain models.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::errors::{Result, ValidationError};

/// Display theme stored on the user profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
}

/// The authenticated user as returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub theme_preference: Option<ThemePreference>,
    pub created_at: String,
}

/// Signup payload for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        validate_password(&self.password)
    }
}

/// Profile update for `PATCH /users/me`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_preference: Option<ThemePreference>,
}

/// Payload for `PATCH /users/me/password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.current_password.is_empty() {
            return Err(ValidationError::MissingField("current_password".to_string()).into());
        }
        validate_password(&self.new_password)
    }
}

/// Token response of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH).into());
    }
    Ok(())
}
