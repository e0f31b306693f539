// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::{quiz_session::QuizSession, user::Role},
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Username at the time of login.
    pub name: String,
    /// User's role ('administrator' or 'manager').
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Claims of a quiz session token: the whole session record plus expiry.
#[derive(Debug, Deserialize, Serialize)]
struct SessionClaims {
    #[serde(flatten)]
    session: QuizSession,
    exp: usize,
}

fn expires_in(seconds: u64) -> Result<usize, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs();
    Ok((now + seconds) as usize)
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    id: i64,
    username: &str,
    role: Role,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: id.to_string(), // Store User ID in 'sub' claim
        name: username.to_owned(),
        role: role.as_str().to_owned(),
        exp: expires_in(expiration_seconds)?,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Signs the quiz session state so the client can carry it between answers.
pub fn sign_session_token(
    session: &QuizSession,
    secret: &str,
    ttl_seconds: u64,
) -> Result<String, AppError> {
    let claims = SessionClaims {
        session: session.clone(),
        exp: expires_in(ttl_seconds)?,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Restores a quiz session from its token.
/// Tampered, foreign or expired tokens are rejected.
pub fn verify_session_token(token: &str, secret: &str) -> Result<QuizSession, AppError> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid or expired quiz session".to_string()))?;

    Ok(token_data.claims.session)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header
/// and reloads the account it names. Deleted accounts get 401; the stored role
/// replaces the role carried by the token, so demotions apply immediately.
/// Injects the refreshed `Claims` into the request extensions for handlers to use.
pub async fn auth_middleware(
    State(config): State<Config>,
    State(pool): State<SqlitePool>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let mut claims = {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        verify_jwt(token, &config.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?
    };
    let user_id = claims.user_id().ok_or(StatusCode::UNAUTHORIZED)?;

    let stored_role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user {} for auth: {:?}", user_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let Some(role) = stored_role else {
        tracing::warn!("Rejected token of deleted user {}", user_id);
        return Err(StatusCode::UNAUTHORIZED);
    };

    claims.role = role;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn require(req: &Request<Body>, allowed: fn(&Role) -> bool) -> Result<(), StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match claims.role() {
        Some(role) if allowed(&role) => Ok(()),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

/// Axum Middleware: statistics and reports (managers and administrators).
///
/// Must be used AFTER `auth_middleware`.
pub async fn staff_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require(&req, Role::can_view_results)?;
    Ok(next.run(req).await)
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Checks if the injected `Claims` has the
/// 'administrator' role. If not, returns 403 Forbidden.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require(&req, Role::can_administer)?;
    Ok(next.run(req).await)
}
