//! Resolved application settings and the process-wide singleton.
//!
//! Lifecycle: [`init`] runs once at startup, before any worker starts. It
//! snapshots the process environment, loads `<base_dir>/.env`, resolves every
//! key, builds the gated resources and stores the result. After that the
//! settings are read-only; [`get`] hands out `&'static` references that any
//! number of threads may share.
//!
//! - **database**: `DATABASE_URL` → connection parameters.
//! - **cache**: `REDIS_URL` → Redis or local-memory backend.
//! - **framework**: installed apps, middleware, templates and the rest of
//!   the fixed wiring.

pub mod cache;
pub mod database;
pub mod framework;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{keys, ConfigurationSet, Resolver};
use crate::error::AppError;
use crate::integrations::{SearchClient, SmsCredentials};
use crate::logger;

pub use cache::CacheBackend;
pub use database::{DatabaseConfig, DatabaseEngine, CONN_MAX_AGE};
pub use framework::{
    I18nConfig, RestFrameworkConfig, ServedPath, StaticFilesConfig, TemplatesConfig,
};

pub const ENV_FILE_NAME: &str = ".env";

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub secret_key: String,
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub log_level: String,
    pub installed_apps: &'static [&'static str],
    pub middleware: &'static [&'static str],
    pub root_urlconf: &'static str,
    pub wsgi_application: &'static str,
    pub templates: TemplatesConfig,
    pub database: DatabaseConfig,
    pub cache: CacheBackend,
    pub password_validators: &'static [&'static str],
    pub i18n: I18nConfig,
    pub static_files: StaticFilesConfig,
    pub media: ServedPath,
    pub rest_framework: RestFrameworkConfig,
    pub cors_allow_all_origins: bool,
    /// `None` when `SMS_LOGIN` is blank.
    pub sms: Option<SmsCredentials>,
    /// `None` when `ELASTICSEARCH_URL` is unset.
    pub search: Option<SearchClient>,
    /// `<base_dir>/.env` when it was read; `None` when it was missing.
    pub env_file: Option<PathBuf>,
    values: ConfigurationSet,
}

impl Settings {
    /// Resolve all keys through `resolver` and build the settings.
    /// Pure apart from what the resolver already captured; tests call this
    /// directly instead of going through the singleton.
    pub fn resolve(mut resolver: Resolver, base_dir: &Path) -> Result<Self, AppError> {
        let env_file = base_dir.join(ENV_FILE_NAME);
        let env_file = resolver.env_file_loaded(&env_file).then_some(env_file);
        resolver.resolve_all(&keys::declarations())?;
        let mut settings = Self::from_values(resolver.finish(), base_dir)?;
        settings.env_file = env_file;
        Ok(settings)
    }

    pub fn from_values(values: ConfigurationSet, base_dir: &Path) -> Result<Self, AppError> {
        let log_level = values.string(keys::LOG_LEVEL)?;
        logger::parse_level(log_level)?;
        let database = DatabaseConfig::from_url(values.string(keys::DATABASE_URL)?, CONN_MAX_AGE)?;
        let cache = CacheBackend::select(&values)?;
        let sms = SmsCredentials::from_settings(&values)?;
        let search = SearchClient::from_settings(&values)?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            secret_key: values.string(keys::SECRET_KEY)?.to_string(),
            debug: values.bool(keys::DEBUG)?,
            allowed_hosts: values.list(keys::ALLOWED_HOSTS)?.to_vec(),
            log_level: log_level.to_string(),
            installed_apps: framework::INSTALLED_APPS,
            middleware: framework::MIDDLEWARE,
            root_urlconf: framework::ROOT_URLCONF,
            wsgi_application: framework::WSGI_APPLICATION,
            templates: TemplatesConfig::new(base_dir),
            database,
            cache,
            password_validators: framework::PASSWORD_VALIDATORS,
            i18n: I18nConfig::default(),
            static_files: StaticFilesConfig::new(base_dir),
            media: framework::media(base_dir),
            rest_framework: RestFrameworkConfig::default(),
            cors_allow_all_origins: framework::CORS_ALLOW_ALL_ORIGINS,
            sms,
            search,
            env_file: None,
            values,
        })
    }

    /// The raw resolved values, including where each came from.
    pub fn values(&self) -> &ConfigurationSet {
        &self.values
    }

    pub fn uses_insecure_secret(&self) -> bool {
        self.secret_key == keys::INSECURE_SECRET_KEY
    }

    /// Emit the startup log lines. Call after the logger is installed.
    pub fn log_startup(&self) {
        match &self.env_file {
            Some(path) => debug!(path = %path.display(), "env file loaded"),
            None => warn!(
                path = %self.base_dir.join(ENV_FILE_NAME).display(),
                "env file not found; using environment and defaults"
            ),
        }
        for value in self.values.iter() {
            debug!(key = value.key(), origin = %value.origin(), "setting");
        }
        info!(
            base_dir = %self.base_dir.display(),
            debug = self.debug,
            allowed_hosts = ?self.allowed_hosts,
            database = ?self.database.engine,
            cache = self.cache.backend(),
            search = self.search.is_some(),
            sms = self.sms.is_some(),
            "settings resolved"
        );
        if self.uses_insecure_secret() && !self.debug {
            warn!("SECRET_KEY is the insecure placeholder while DEBUG is off; set SECRET_KEY");
        }
    }

    /// Serializable view with secrets masked.
    pub fn summary(&self) -> SettingsSummary<'_> {
        SettingsSummary {
            base_dir: &self.base_dir,
            secret_key: if self.uses_insecure_secret() { "insecure placeholder" } else { "***" },
            debug: self.debug,
            allowed_hosts: &self.allowed_hosts,
            log_level: &self.log_level,
            installed_apps: self.installed_apps,
            middleware: self.middleware,
            root_urlconf: self.root_urlconf,
            database: DatabaseSummary {
                engine: self.database.engine,
                name: &self.database.name,
                user: self.database.user.as_deref(),
                host: self.database.host.as_deref(),
                port: self.database.port,
                conn_max_age_secs: self.database.conn_max_age.as_secs(),
                options: &self.database.options,
            },
            cache: CacheSummary {
                backend: self.cache.backend(),
                location: self.cache.location(),
            },
            templates: &self.templates,
            i18n: &self.i18n,
            static_files: &self.static_files,
            media: &self.media,
            rest_framework: &self.rest_framework,
            cors_allow_all_origins: self.cors_allow_all_origins,
            search_url: self.search.as_ref().map(|s| s.base_url().as_str()),
            sms_login: self.sms.as_ref().map(|s| s.login.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsSummary<'a> {
    pub base_dir: &'a Path,
    pub secret_key: &'static str,
    pub debug: bool,
    pub allowed_hosts: &'a [String],
    pub log_level: &'a str,
    pub installed_apps: &'static [&'static str],
    pub middleware: &'static [&'static str],
    pub root_urlconf: &'static str,
    pub database: DatabaseSummary<'a>,
    pub cache: CacheSummary<'a>,
    pub templates: &'a TemplatesConfig,
    pub i18n: &'a I18nConfig,
    pub static_files: &'a StaticFilesConfig,
    pub media: &'a ServedPath,
    pub rest_framework: &'a RestFrameworkConfig,
    pub cors_allow_all_origins: bool,
    pub search_url: Option<&'a str>,
    pub sms_login: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseSummary<'a> {
    pub engine: DatabaseEngine,
    pub name: &'a str,
    pub user: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub conn_max_age_secs: u64,
    pub options: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct CacheSummary<'a> {
    pub backend: &'static str,
    pub location: Option<&'a str>,
}

/// Build the process-wide settings from the process environment and
/// `<base_dir>/.env`. Fails if called twice.
pub fn init(base_dir: &Path) -> Result<&'static Settings, AppError> {
    if SETTINGS.get().is_some() {
        return Err(AppError::AlreadyInitialized);
    }
    let mut resolver = Resolver::from_process_env();
    resolver.load_env_file(&base_dir.join(ENV_FILE_NAME))?;
    let settings = Settings::resolve(resolver, base_dir)?;
    SETTINGS.set(settings).map_err(|_| AppError::AlreadyInitialized)?;
    get()
}

pub fn get() -> Result<&'static Settings, AppError> {
    SETTINGS.get().ok_or(AppError::NotInitialized)
}

/// Pick the base directory: `override_dir` when given (with `~` expanded),
/// else the current working directory.
pub fn base_dir(override_dir: Option<&str>) -> Result<PathBuf, AppError> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Ok(expand_home(dir)),
        _ => Ok(std::env::current_dir()?),
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
