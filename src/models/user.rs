// src/models/user.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Letters, digits, underscore, hyphen and CJK ideographs.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-\p{Han}]+$").expect("valid username regex"));

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    pub created_at: Option<DateTime<Utc>>,
}

/// Represents the 'remember_tokens' table.
#[derive(Debug, Clone, FromRow)]
pub struct RememberToken {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_confirmation))]
pub struct RegisterRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may only contain letters, digits, '_', '-' or Chinese characters."
        )
    )]
    pub username: String,
    #[validate(email(message = "Email address is invalid."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters."
    ))]
    pub password: String,
    pub confirm_password: String,
}

fn validate_confirmation(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.password != req.confirm_password {
        let mut err = ValidationError::new("password_mismatch");
        err.message = Some("Passwords do not match.".into());
        return Err(err);
    }
    Ok(())
}

/// DTO for user login. `account` is a username or an email.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub account: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoginRequest {
    #[validate(length(equal = 64, message = "Remember token is malformed."))]
    pub remember_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Returned by register, login and auto-login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: "lin@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register("lin_wei", "password123", "password123").validate().is_ok());
        assert!(register("昆曲迷", "password123", "password123").validate().is_ok());
    }

    #[test]
    fn mismatched_passwords_fail() {
        assert!(register("lin_wei", "password123", "password124").validate().is_err());
    }

    #[test]
    fn odd_usernames_fail() {
        assert!(register("yo", "password123", "password123").validate().is_err());
        assert!(register("lin wei", "password123", "password123").validate().is_err());
        assert!(register("<b>x</b>", "password123", "password123").validate().is_err());
    }

    #[test]
    fn login_remember_me_defaults_to_false() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"account":"lin","password":"pw"}"#).unwrap();
        assert!(!req.remember_me);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            username: "lin".into(),
            email: "lin@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
