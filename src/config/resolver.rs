//! Layered key lookup: process environment > env file > default.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;

use super::coerce::coerce;
use super::env_file::EnvFile;
use super::set::ConfigurationSet;
use super::value::{ConfigurationValue, Declaration, Fallback, Kind, Origin};

/// One-shot resolver. The environment is captured when the resolver is
/// built and never re-read; each key is resolved at most once.
#[derive(Debug)]
pub struct Resolver {
    env: HashMap<String, String>,
    file: EnvFile,
    resolved: HashMap<String, ConfigurationValue>,
    order: Vec<String>,
}

impl Resolver {
    /// Build over an explicit environment snapshot.
    /// Tests pass a map here instead of mutating process env vars.
    pub fn new(env: HashMap<String, String>) -> Self {
        Self {
            env,
            file: EnvFile::new(),
            resolved: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Snapshot the process environment. Non-UTF-8 variables are skipped.
    pub fn from_process_env() -> Self {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::new(env)
    }

    /// Add a `.env` file to the file layer. Idempotent per path; values
    /// already resolved are unaffected.
    pub fn load_env_file(&mut self, path: &Path) -> Result<bool, AppError> {
        self.file.load(path)
    }

    pub fn env_file_loaded(&self, path: &Path) -> bool {
        self.file.is_loaded(path)
    }

    /// Resolve `key` as `kind`, falling back to `default`.
    ///
    /// A key resolved earlier returns the memoized value. Redeclaring it with
    /// another kind is a conversion error.
    pub fn resolve(
        &mut self,
        key: &str,
        kind: Kind,
        default: Fallback,
    ) -> Result<ConfigurationValue, AppError> {
        if let Some(existing) = self.resolved.get(key) {
            if existing.kind() != kind {
                return Err(AppError::TypeConversion {
                    key: key.to_string(),
                    expected: kind,
                    found: format!("{} declaration", existing.kind()),
                });
            }
            return Ok(existing.clone());
        }

        let value = self.lookup(key, kind, default)?;
        debug!(key, origin = %value.origin(), "configuration resolved");
        self.resolved.insert(key.to_string(), value.clone());
        self.order.push(key.to_string());
        Ok(value)
    }

    pub fn resolve_declaration(&mut self, decl: &Declaration) -> Result<ConfigurationValue, AppError> {
        self.resolve(decl.key, decl.kind, decl.default.clone())
    }

    /// Resolve every declaration, stopping at the first failure.
    pub fn resolve_all(&mut self, decls: &[Declaration]) -> Result<(), AppError> {
        for decl in decls {
            self.resolve_declaration(decl)?;
        }
        Ok(())
    }

    /// Freeze everything resolved so far into a read-only set.
    pub fn finish(self) -> ConfigurationSet {
        let mut resolved = self.resolved;
        let values = self
            .order
            .into_iter()
            .filter_map(|key| resolved.remove(&key))
            .collect();
        ConfigurationSet::new(values)
    }

    fn lookup(&self, key: &str, kind: Kind, default: Fallback) -> Result<ConfigurationValue, AppError> {
        if let Some(raw) = self.env.get(key) {
            let value = coerce(key, kind, raw)?;
            return Ok(ConfigurationValue::new(key, kind, default, Some(value), Origin::Environment));
        }
        if let Some(raw) = self.file.get(key) {
            let value = coerce(key, kind, raw)?;
            return Ok(ConfigurationValue::new(key, kind, default, Some(value), Origin::EnvFile));
        }
        let (fallback, origin) = match &default {
            Fallback::Value(value) if value.kind() != kind => {
                return Err(AppError::TypeConversion {
                    key: key.to_string(),
                    expected: kind,
                    found: format!("{} default", value.kind()),
                });
            }
            Fallback::Value(value) => (Some(value.clone()), Origin::Default),
            Fallback::Absent => (None, Origin::Unset),
            Fallback::Required => return Err(AppError::missing(key)),
        };
        Ok(ConfigurationValue::new(key, kind, default, fallback, origin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Value;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn with_file(pairs: &[(&str, &str)], content: &str) -> (TempDir, Resolver) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, content).unwrap();
        let mut resolver = Resolver::new(env(pairs));
        resolver.load_env_file(&path).unwrap();
        (dir, resolver)
    }

    #[test]
    fn default_used_when_no_source() {
        let mut r = Resolver::new(HashMap::new());
        let v = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        assert_eq!(v.resolved_value(), Some(&Value::Bool(false)));
        assert_eq!(v.origin(), Origin::Default);
        assert_eq!(v.kind(), Kind::Bool);
    }

    #[test]
    fn file_beats_default() {
        let (_dir, mut r) = with_file(&[], "DEBUG=true\n");
        let v = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        assert_eq!(v.resolved_value(), Some(&Value::Bool(true)));
        assert_eq!(v.origin(), Origin::EnvFile);
    }

    #[test]
    fn environment_beats_file() {
        let (_dir, mut r) = with_file(&[("DEBUG", "0")], "DEBUG=true\n");
        let v = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        assert_eq!(v.resolved_value(), Some(&Value::Bool(false)));
        assert_eq!(v.origin(), Origin::Environment);
    }

    #[test]
    fn bad_environment_value_never_falls_back() {
        let mut r = Resolver::new(env(&[("DEBUG", "notabool")]));
        let err = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap_err();
        assert!(matches!(err, AppError::TypeConversion { .. }));
    }

    #[test]
    fn bad_file_value_errors_too() {
        let (_dir, mut r) = with_file(&[], "CONN_MAX_AGE=ten\n");
        let err = r.resolve("CONN_MAX_AGE", Kind::Integer, Fallback::Value(Value::Integer(600))).unwrap_err();
        assert!(matches!(err, AppError::TypeConversion { .. }));
    }

    #[test]
    fn required_key_missing_fails() {
        let mut r = Resolver::new(HashMap::new());
        let err = r.resolve("SECRET_KEY", Kind::String, Fallback::Required).unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredConfiguration { ref key } if key == "SECRET_KEY"));
    }

    #[test]
    fn optional_key_missing_is_unset() {
        let mut r = Resolver::new(HashMap::new());
        let v = r.resolve("REDIS_URL", Kind::String, Fallback::Absent).unwrap();
        assert!(v.resolved_value().is_none());
        assert_eq!(v.origin(), Origin::Unset);
        assert!(!v.is_set());
    }

    #[test]
    fn repeat_resolution_is_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ALLOWED_HOSTS=a.com, b.com\n").unwrap();
        let mut r = Resolver::new(HashMap::new());
        r.load_env_file(&path).unwrap();
        let default = Fallback::Value(Value::List(vec!["localhost".into()]));
        let first = r.resolve("ALLOWED_HOSTS", Kind::List, default.clone()).unwrap();

        // Neither a changed file nor a reload may alter the memoized value.
        fs::write(&path, "ALLOWED_HOSTS=c.com\n").unwrap();
        r.load_env_file(&path).unwrap();
        let second = r.resolve("ALLOWED_HOSTS", Kind::List, default).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn file_loaded_after_resolution_does_not_change_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late.env");
        fs::write(&path, "DEBUG=true\n").unwrap();
        let mut r = Resolver::new(HashMap::new());
        let before = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        r.load_env_file(&path).unwrap();
        let after = r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        assert_eq!(before, after);
        assert_eq!(after.resolved_value(), Some(&Value::Bool(false)));
    }

    #[test]
    fn redeclaring_with_other_kind_errors() {
        let mut r = Resolver::new(env(&[("DEBUG", "1")]));
        r.resolve("DEBUG", Kind::Bool, Fallback::Value(false.into())).unwrap();
        let err = r.resolve("DEBUG", Kind::Integer, Fallback::Value(Value::Integer(0))).unwrap_err();
        assert!(matches!(err, AppError::TypeConversion { expected: Kind::Integer, .. }));
    }

    #[test]
    fn default_of_wrong_kind_errors() {
        let mut r = Resolver::new(HashMap::new());
        let err = r.resolve("DEBUG", Kind::Bool, Fallback::Value("no".into())).unwrap_err();
        assert!(matches!(err, AppError::TypeConversion { .. }));
    }

    #[test]
    fn finish_keeps_declaration_order() {
        let mut r = Resolver::new(HashMap::new());
        r.resolve("B", Kind::String, Fallback::Value("b".into())).unwrap();
        r.resolve("A", Kind::String, Fallback::Value("a".into())).unwrap();
        let set = r.finish();
        let keys: Vec<&str> = set.iter().map(|v| v.key()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }
}
