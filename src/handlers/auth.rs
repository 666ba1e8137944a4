// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{
        AuthPayload, AutoLoginRequest, LoginRequest, RegisterRequest, RememberToken, User,
        VerifyTokenRequest,
    },
    utils::{
        hash::{hash_password, random_token, verify_password},
        jwt::{Claims, sign_jwt, verify_jwt},
        response::ApiResponse,
    },
};

/// Registers a new user and signs them in.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with a JWT.
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password_hash, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&hashed_password)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for unique violation is 23505
        let is_unique_violation = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == "23505");
        if is_unique_violation {
            AppError::Conflict("Username or email is already in use".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    let token = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(AuthPayload {
            user_id: user.id,
            username: user.username,
            email: user.email,
            token,
            remember_token: None,
        }),
    ))
}

/// Authenticates by username or email and returns a JWT.
///
/// With `rememberMe`, also issues a long-lived remember token.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, created_at
        FROM users
        WHERE username = $1 OR email = $1
        "#,
    )
    .bind(&payload.account)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::from(e)
    })?
    .ok_or(AppError::AuthError("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    let remember_token = if payload.remember_me {
        let remember_token = random_token();
        let expires_at = Utc::now() + Duration::days(config.remember_token_days);
        sqlx::query("INSERT INTO remember_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&remember_token)
            .bind(expires_at)
            .execute(&pool)
            .await?;
        Some(remember_token)
    } else {
        None
    };

    Ok(ApiResponse::new(AuthPayload {
        user_id: user.id,
        username: user.username,
        email: user.email,
        token,
        remember_token,
    }))
}

/// Exchanges a remember token for a fresh JWT. Expired tokens are deleted.
pub async fn auto_login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    payload: Result<Json<AutoLoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = sqlx::query_as::<_, RememberToken>(
        "SELECT user_id, expires_at FROM remember_tokens WHERE token = $1",
    )
    .bind(&payload.remember_token)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::AuthError("Remember token is invalid".to_string()))?;

    if record.expires_at <= Utc::now() {
        sqlx::query("DELETE FROM remember_tokens WHERE token = $1")
            .bind(&payload.remember_token)
            .execute(&pool)
            .await?;
        return Err(AppError::AuthError(
            "Session expired, please sign in again".to_string(),
        ));
    }

    let user = find_user(&pool, record.user_id)
        .await?
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    let token = sign_jwt(user.id, &user.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok(ApiResponse::new(AuthPayload {
        user_id: user.id,
        username: user.username,
        email: user.email,
        token,
        remember_token: None,
    }))
}

/// Reports whether a JWT is still valid.
pub async fn verify_token(
    State(config): State<Config>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    if payload.token.trim().is_empty() {
        return Err(AppError::BadRequest("Token must not be empty".to_string()));
    }

    let claims = verify_jwt(&payload.token, &config.jwt_secret)?;
    let user_id = claims.user_id()?;

    Ok(ApiResponse::new(json!({ "valid": true, "userId": user_id })))
}

/// Current user, resolved from the token injected by `auth_middleware`.
pub async fn me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = find_user(&pool, claims.user_id()?)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::new(user))
}

async fn find_user(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)
}
