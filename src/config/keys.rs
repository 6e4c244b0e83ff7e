//! Keys read from the environment, with their kinds and defaults.

use super::value::{Declaration, Kind};

pub const SECRET_KEY: &str = "SECRET_KEY";
pub const DEBUG: &str = "DEBUG";
pub const ALLOWED_HOSTS: &str = "ALLOWED_HOSTS";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const REDIS_URL: &str = "REDIS_URL";
pub const SMS_LOGIN: &str = "SMS_LOGIN";
pub const SMS_PASSWORD: &str = "SMS_PASSWORD";
pub const ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Placeholder secret. Fine for local work, never for a deployment.
pub const INSECURE_SECRET_KEY: &str = "django-insecure-default";
pub const DEFAULT_DATABASE_URL: &str = "postgresql://postgres@localhost:5432/postgres";
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &["localhost", "127.0.0.1"];
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn declarations() -> Vec<Declaration> {
    vec![
        Declaration::string(SECRET_KEY, INSECURE_SECRET_KEY),
        Declaration::bool(DEBUG, false),
        Declaration::list(ALLOWED_HOSTS, DEFAULT_ALLOWED_HOSTS),
        Declaration::string(DATABASE_URL, DEFAULT_DATABASE_URL),
        Declaration::optional(REDIS_URL, Kind::String),
        // Blank rather than absent: an unset credential and a blank one look the same.
        Declaration::string(SMS_LOGIN, ""),
        Declaration::string(SMS_PASSWORD, ""),
        Declaration::optional(ELASTICSEARCH_URL, Kind::String),
        Declaration::string(LOG_LEVEL, DEFAULT_LOG_LEVEL),
    ]
}
