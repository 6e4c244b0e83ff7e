//! Cache backend selection.
//!
//! `REDIS_URL` set and non-empty → networked Redis cache at that location.
//! Otherwise → in-process local-memory cache. Decided once at startup.

use std::convert::Infallible;

use crate::config::{keys, resolve_conditional, ConfigurationSet};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    LocalMemory,
    /// `location` is the connection string exactly as configured.
    Redis { location: String },
}

impl CacheBackend {
    pub fn select(set: &ConfigurationSet) -> Result<Self, AppError> {
        let redis = resolve_conditional(set, keys::REDIS_URL, |url| {
            Ok::<_, Infallible>(CacheBackend::Redis { location: url.to_string() })
        })?;
        Ok(redis.unwrap_or(CacheBackend::LocalMemory))
    }

    /// Dotted path of the framework cache backend.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::LocalMemory => "django.core.cache.backends.locmem.LocMemCache",
            Self::Redis { .. } => "django.core.cache.backends.redis.RedisCache",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::LocalMemory => None,
            Self::Redis { location } => Some(location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolver;
    use std::collections::HashMap;

    fn select_with(redis: Option<&str>) -> CacheBackend {
        let mut env = HashMap::new();
        if let Some(url) = redis {
            env.insert(keys::REDIS_URL.to_string(), url.to_string());
        }
        let mut r = Resolver::new(env);
        r.resolve_all(&keys::declarations()).unwrap();
        CacheBackend::select(&r.finish()).unwrap()
    }

    #[test]
    fn no_redis_url_selects_local_memory() {
        let cache = select_with(None);
        assert_eq!(cache, CacheBackend::LocalMemory);
        assert_eq!(cache.location(), None);
    }

    #[test]
    fn blank_redis_url_selects_local_memory() {
        assert_eq!(select_with(Some("")), CacheBackend::LocalMemory);
    }

    #[test]
    fn redis_url_recorded_verbatim() {
        let cache = select_with(Some("redis://host:6379"));
        assert_eq!(cache.location(), Some("redis://host:6379"));
        assert_eq!(cache.backend(), "django.core.cache.backends.redis.RedisCache");
    }
}
