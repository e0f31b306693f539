// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Number of questions in the leadership quiz.
pub const QUIZ_QUESTION_COUNT: usize = 6;

/// Dimension mean at or above which a practice is "High performance".
pub const HIGH_PERFORMANCE_THRESHOLD: f64 = 12.0;

/// Dimension mean at or above which a practice is "Medium".
pub const MEDIUM_PERFORMANCE_THRESHOLD: f64 = 9.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub jwt_expiration: u64,
    /// Lifetime of a quiz session token in seconds.
    pub quiz_session_ttl: u64,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub manager_username: Option<String>,
    pub manager_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://survey.db?mode=rwc".to_string());

        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = parse_seconds("JWT_EXPIRATION", 86_400);
        let quiz_session_ttl = parse_seconds("QUIZ_SESSION_TTL", 3_600);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            database_url,
            bind_address,
            jwt_secret,
            jwt_expiration,
            quiz_session_ttl,
            rust_log,
            cors_origins,
            admin_username: non_empty_var("ADMIN_USERNAME"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            manager_username: non_empty_var("MANAGER_USERNAME"),
            manager_password: non_empty_var("MANAGER_PASSWORD"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_seconds(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
