// src/models/user.rs

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("username pattern is valid"));

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    /// 'administrator' or 'manager'. Workers never log in.
    pub role: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Roles that can authenticate. Workers are anonymous and have no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Manager => "manager",
        }
    }

    /// Statistics and reports.
    pub fn can_view_results(&self) -> bool {
        matches!(self, Role::Administrator | Role::Manager)
    }

    /// User management, database summary and reset.
    pub fn can_administer(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Role::Administrator),
            "manager" => Ok(Role::Manager),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for an administrator creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        ),
        custom(function = validate_username)
    )]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// DTO for updating a user. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        ),
        custom(function = validate_username)
    )]
    pub username: Option<String>,
    pub role: Option<Role>,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    /// The account's present password; required together with `password`.
    pub current_password: Option<String>,
}

/// Columns of `users` an administrator may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Username,
    PasswordHash,
    Role,
}

impl UserColumn {
    pub fn as_sql(&self) -> &'static str {
        match self {
            UserColumn::Username => "username",
            UserColumn::PasswordHash => "password_hash",
            UserColumn::Role => "role",
        }
    }
}

/// A validated set of changes to one user row.
/// Values are bound as parameters; only the column names come from `UserColumn`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password_hash.is_none() && self.role.is_none()
    }

    /// The changed columns paired with their new values, in a fixed order.
    pub fn assignments(&self) -> Vec<(UserColumn, String)> {
        let mut out = Vec::new();
        if let Some(username) = &self.username {
            out.push((UserColumn::Username, username.clone()));
        }
        if let Some(hash) = &self.password_hash {
            out.push((UserColumn::PasswordHash, hash.clone()));
        }
        if let Some(role) = self.role {
            out.push((UserColumn::Role, role.as_str().to_string()));
        }
        out
    }
}

/// Ensures passwords and their confirmation are equal.
pub fn check_password_confirmation(
    password: &str,
    confirmation: Option<&str>,
) -> Result<(), String> {
    match confirmation {
        Some(confirm) if confirm == password => Ok(()),
        Some(_) => Err("Passwords do not match".to_string()),
        None => Err("Password confirmation is required".to_string()),
    }
}

fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(validator::ValidationError::new("invalid_username_characters"));
    }
    Ok(())
}
