// src/handlers/auth.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, Role, User},
    utils::{hash::verify_password, jwt::sign_jwt},
};

/// Checks a username/password pair against the credential table.
///
/// Returns the user and its role on success, `None` for an unknown user or a
/// wrong password.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<(User, Role)>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let Some(user) = user else {
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash)? {
        return Ok(None);
    }

    let role = user
        .role
        .parse::<Role>()
        .map_err(AppError::InternalServerError)?;

    Ok(Some((user, role)))
}

/// Authenticates a manager or administrator and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, role) = authenticate(&pool, &payload.username, &payload.password)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

    let token = sign_jwt(
        user.id,
        &user.username,
        role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    tracing::info!("User {} logged in as {}", user.username, role);

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": role,
        "expires_in": config.jwt_expiration
    })))
}
