use std::env;

use anyhow::Context;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cookie_secure: bool,
    /// Assistant assigned to new orders. Falls back to the oldest active assistant.
    pub default_assistant_id: Option<Uuid>,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);
        let default_assistant_id = match env::var("DEFAULT_ASSISTANT_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Uuid::parse_str(raw.trim()).context("DEFAULT_ASSISTANT_ID is not a valid uuid")?,
            ),
            _ => None,
        };
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            token_ttl_hours,
            cookie_secure,
            default_assistant_id,
            db_max_connections,
        })
    }

    /// Config for tests and tooling that never touch the environment.
    pub fn for_secret(secret: impl Into<String>) -> Self {
        Self {
            database_url: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: secret.into(),
            token_ttl_hours: 24,
            cookie_secure: false,
            default_assistant_id: None,
            db_max_connections: 5,
        }
    }
}
