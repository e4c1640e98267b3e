/*
 * Responsibility
 * - 環境変数や設定の読み込み (JWT_SECRET, DATABASE_URL, HTTP の上限値など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Shared HS256 secret used to verify bearer tokens
    pub jwt_secret: String,
    pub token_leeway_seconds: u64,

    // None => in-memory user store
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub request_body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret or credentials embedded in the database url
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("database_configured", &self.database_url.is_some())
            .field("database_max_connections", &self.database_max_connections)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_leeway_seconds: u64 = parse_or(&lookup, "TOKEN_LEEWAY_SECONDS", 0)?;

        let database_url = lookup("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let database_max_connections: u32 = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let request_body_limit_bytes: usize = parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let request_timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            addr,
            app_env,
            jwt_secret,
            token_leeway_seconds,
            database_url,
            database_max_connections,
            request_body_limit_bytes,
            request_timeout_seconds,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
