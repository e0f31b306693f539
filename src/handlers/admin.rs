// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    error::{AppError, conflict_on_unique},
    models::user::{
        CreateUserRequest, Role, UpdateUserRequest, User, UserPatch,
        check_password_confirmation,
    },
    store,
    utils::{
        hash::{hash_password, verify_password},
        jwt::Claims,
    },
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role, created_at
        FROM users
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// Creates a manager or administrator account.
/// Admin only.
pub async fn create_user(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    check_password_confirmation(&payload.password, Some(&payload.confirm_password))
        .map_err(AppError::BadRequest)?;

    let hashed_password = hash_password(&payload.password)?;

    let id = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&payload.username)
    .bind(hashed_password)
    .bind(payload.role.as_str())
    .execute(&pool)
    .await
    .map_err(|e| {
        conflict_on_unique(e, format!("Username '{}' already exists", payload.username))
    })?
    .last_insert_rowid();

    tracing::info!("Created {} account {}", payload.role, payload.username);

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Updates username, role and/or password of a user.
/// Admin only. Absent fields are left untouched.
/// A password change needs the account's current password; administrators
/// cannot change their own role.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if claims.user_id() == Some(id)
        && payload.role.is_some_and(|role| role != Role::Administrator)
    {
        return Err(AppError::BadRequest(
            "Cannot remove your own administrator role".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            check_password_confirmation(password, payload.confirm_password.as_deref())
                .map_err(AppError::BadRequest)?;

            let current = payload.current_password.as_deref().ok_or_else(|| {
                AppError::BadRequest("Current password is required".to_string())
            })?;
            if !verify_password(current, &user.password_hash)? {
                return Err(AppError::BadRequest(
                    "Current password is incorrect".to_string(),
                ));
            }

            Some(hash_password(password)?)
        }
        None => None,
    };

    let patch = UserPatch {
        username: payload.username,
        password_hash,
        role: payload.role,
    };

    if patch.is_empty() {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");
    let mut columns = builder.separated(", ");
    for (column, value) in patch.assignments() {
        columns.push(format!("{} = ", column.as_sql()));
        columns.push_bind_unseparated(value);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);

    builder.build().execute(&pool).await.map_err(|e| {
        let name = patch.username.clone().unwrap_or_default();
        conflict_on_unique(e, format!("Username '{}' already exists", name))
    })?;

    tracing::info!("Updated user {} ({})", id, user.username);

    Ok(StatusCode::OK)
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if claims.user_id() == Some(id) {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Row counts and response periods of both response tables.
pub async fn database_summary(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store::database_summary(&pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub acknowledge_data_loss: bool,
}

/// Deletes every survey and quiz response. User accounts are kept.
/// Admin only. Both confirmation flags must be set.
pub async fn reset_responses(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ResetRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(payload.confirm && payload.acknowledge_data_loss) {
        return Err(AppError::BadRequest(
            "Reset requires both 'confirm' and 'acknowledge_data_loss'".to_string(),
        ));
    }

    let outcome = store::reset_responses(&pool).await.map_err(|e| {
        tracing::error!("Reset failed, no data was deleted: {:?}", e);
        e
    })?;

    tracing::warn!(
        "User {} reset all responses ({} practice, {} quiz rows deleted)",
        claims.name,
        outcome.practice_responses_deleted,
        outcome.quiz_responses_deleted
    );

    Ok(Json(outcome))
}
