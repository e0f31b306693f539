// src/db.rs

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{config::Config, error::AppError, models::user::Role, utils::hash::hash_password};

/// Ordered schema migrations, applied once at startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the SQLite pool, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

/// Inserts the configured default accounts when they are missing.
///
/// Safe to run on every start: existing usernames are left untouched.
pub async fn seed_default_accounts(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let accounts = [
        (&config.admin_username, &config.admin_password, Role::Administrator),
        (&config.manager_username, &config.manager_password, Role::Manager),
    ];

    for (username, password, role) in accounts {
        let (Some(username), Some(password)) = (username, password) else {
            tracing::warn!("No default {} account configured, skipping", role);
            continue;
        };

        let hashed_password = hash_password(password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES (?, ?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(hashed_password)
        .bind(role.as_str())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Seeded default {} account: {}", role, username);
        }
    }

    Ok(())
}
