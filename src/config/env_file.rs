//! `.env` file layer.
//!
//! Files are parsed with `dotenvy` into a private map; the process
//! environment is never modified. Each path is consumed at most once, and
//! the first file to define a key wins.
//!
//! Values are taken as written. `dotenvy` expands `$NAME` in unquoted and
//! double-quoted values, so every such `$` is escaped before parsing.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AppError;

#[derive(Debug, Default)]
pub struct EnvFile {
    entries: HashMap<String, String>,
    loaded: HashSet<PathBuf>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` into the layer. Returns `true` if this call consumed the
    /// file, `false` if the path was already consumed or does not exist.
    ///
    /// A file that fails to read or parse contributes nothing and may be
    /// loaded again once fixed.
    pub fn load(&mut self, path: &Path) -> Result<bool, AppError> {
        let canonical = canonical(path);
        if self.loaded.contains(&canonical) {
            debug!(path = %path.display(), "env file already loaded, skipping");
            return Ok(false);
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "env file not found");
                return Ok(false);
            }
            Err(e) => {
                return Err(AppError::EnvFile(format!("cannot read {}: {e}", path.display())));
            }
        };

        let escaped = escape_dollars(&text);
        let mut parsed = Vec::new();
        for item in dotenvy::from_read_iter(escaped.as_bytes()) {
            let (key, value) = item
                .map_err(|e| AppError::EnvFile(format!("parse error in {}: {e}", path.display())))?;
            parsed.push((key, value));
        }

        let count = parsed.len();
        for (key, value) in parsed {
            self.entries.entry(key).or_insert(value);
        }
        self.loaded.insert(canonical);
        debug!(path = %path.display(), entries = count, "env file loaded");
        Ok(true)
    }

    /// Whether `path` has been consumed by a successful [`load`](Self::load).
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains(&canonical(path))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    LineStart,
    Comment,
    Key,
    ValueStart,
    Value,
    Trailing,
}

/// Put a backslash before every `$` that `dotenvy` would expand: those in values,
/// outside single quotes and not already escaped. Quote state carries across
/// newlines the same way multi-line quoted values do.
fn escape_dollars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut scan = Scan::LineStart;
    let mut strong = false;
    let mut weak = false;
    let mut escaped = false;

    for c in text.chars() {
        if c == '\n' && !strong && !weak {
            scan = Scan::LineStart;
            escaped = false;
            out.push(c);
            continue;
        }
        match scan {
            Scan::LineStart if c == '#' => scan = Scan::Comment,
            Scan::LineStart if c.is_whitespace() => {}
            Scan::LineStart => scan = Scan::Key,
            Scan::Key if c == '=' => scan = Scan::ValueStart,
            Scan::Comment | Scan::Key | Scan::Trailing => {}
            Scan::ValueStart if c == ' ' || c == '\t' => {}
            Scan::ValueStart if c == '#' => scan = Scan::Comment,
            Scan::ValueStart | Scan::Value => {
                scan = Scan::Value;
                if escaped {
                    escaped = false;
                } else if strong {
                    strong = c != '\'';
                } else if c == '$' {
                    out.push('\\');
                } else if weak {
                    match c {
                        '"' => weak = false,
                        '\\' => escaped = true,
                        _ => {}
                    }
                } else {
                    match c {
                        '\'' => strong = true,
                        '"' => weak = true,
                        '\\' => escaped = true,
                        ' ' | '\t' => scan = Scan::Trailing,
                        _ => {}
                    }
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_env(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, content).unwrap();
        p
    }

    #[test]
    fn parses_assignments_comments_and_quotes() {
        let dir = TempDir::new().unwrap();
        let path = write_env(
            &dir,
            ".env",
            "# local overrides\nDEBUG=true\nexport SECRET_KEY=\"s3cr3t value\"\n\nALLOWED_HOSTS='a.com, b.com'\n",
        );
        let mut file = EnvFile::new();
        assert!(file.load(&path).unwrap());
        assert_eq!(file.get("DEBUG"), Some("true"));
        assert_eq!(file.get("SECRET_KEY"), Some("s3cr3t value"));
        assert_eq!(file.get("ALLOWED_HOSTS"), Some("a.com, b.com"));
        assert_eq!(file.len(), 3);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let mut file = EnvFile::new();
        assert!(!file.load(&dir.path().join(".env")).unwrap());
        assert!(file.is_empty());
    }

    #[test]
    fn second_load_of_same_path_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, ".env", "DEBUG=true\n");
        let mut file = EnvFile::new();
        assert!(file.load(&path).unwrap());

        // Rewrite on disk: a repeat load must not pick up the change.
        fs::write(&path, "DEBUG=false\n").unwrap();
        assert!(!file.load(&path).unwrap());
        assert_eq!(file.get("DEBUG"), Some("true"));
    }

    #[test]
    fn first_file_wins_on_conflict() {
        let dir = TempDir::new().unwrap();
        let first = write_env(&dir, "first.env", "DEBUG=true\nREDIS_URL=redis://one:6379\n");
        let second = write_env(&dir, "second.env", "DEBUG=false\nSMS_LOGIN=shop\n");
        let mut file = EnvFile::new();
        file.load(&first).unwrap();
        file.load(&second).unwrap();
        assert_eq!(file.get("DEBUG"), Some("true"));
        assert_eq!(file.get("REDIS_URL"), Some("redis://one:6379"));
        assert_eq!(file.get("SMS_LOGIN"), Some("shop"));
    }

    #[test]
    fn malformed_file_errors_without_partial_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, ".env", "DEBUG=true\nthis line is not an assignment\n");
        let mut file = EnvFile::new();
        let err = file.load(&path).unwrap_err();
        assert!(err.to_string().contains("env file error"));
        assert!(file.get("DEBUG").is_none());
    }

    #[test]
    fn dollar_signs_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = write_env(
            &dir,
            ".env",
            "SECRET_KEY=k9$x7&abc\nSMS_PASSWORD=\"p@$$word${HOME}\"\nSMS_LOGIN='$shop'\nREDIS_URL=a\\$b\n",
        );
        let mut file = EnvFile::new();
        assert!(file.load(&path).unwrap());
        assert_eq!(file.get("SECRET_KEY"), Some("k9$x7&abc"));
        assert_eq!(file.get("SMS_PASSWORD"), Some("p@$$word${HOME}"));
        assert_eq!(file.get("SMS_LOGIN"), Some("$shop"));
        assert_eq!(file.get("REDIS_URL"), Some("a$b"));
    }

    #[test]
    fn dollar_in_comments_and_multiline_values() {
        let dir = TempDir::new().unwrap();
        let path = write_env(
            &dir,
            ".env",
            "# costs $5\nSMS_LOGIN= # it's $unset\nDEBUG=true # $DEBUG\nSECRET_KEY=\"line one\nline $two\"\n",
        );
        let mut file = EnvFile::new();
        file.load(&path).unwrap();
        assert_eq!(file.get("SMS_LOGIN"), Some(""));
        assert_eq!(file.get("DEBUG"), Some("true"));
        assert_eq!(file.get("SECRET_KEY"), Some("line one\nline $two"));
    }

    #[test]
    fn failed_load_can_be_retried_after_fix() {
        let dir = TempDir::new().unwrap();
        let path = write_env(&dir, ".env", "DEBUG=true\nnot an assignment\n");
        let mut file = EnvFile::new();
        assert!(file.load(&path).is_err());
        assert!(!file.is_loaded(&path));

        fs::write(&path, "DEBUG=true\n").unwrap();
        assert!(file.load(&path).unwrap());
        assert!(file.is_loaded(&path));
        assert_eq!(file.get("DEBUG"), Some("true"));
    }

    #[test]
    fn missing_file_can_be_loaded_once_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let mut file = EnvFile::new();
        assert!(!file.load(&path).unwrap());
        assert!(!file.is_loaded(&path));

        fs::write(&path, "SMS_LOGIN=shop\n").unwrap();
        assert!(file.load(&path).unwrap());
        assert_eq!(file.get("SMS_LOGIN"), Some("shop"));
    }
}
