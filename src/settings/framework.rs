//! Fixed framework wiring: installed apps, middleware order, templates,
//! password validators, REST and i18n defaults. None of it is read from the
//! environment.

use std::path::{Path, PathBuf};

use serde::Serialize;

pub const INSTALLED_APPS: &[&str] = &[
    "django.contrib.admin",
    "django.contrib.auth",
    "django.contrib.contenttypes",
    "django.contrib.sessions",
    "django.contrib.messages",
    "django.contrib.staticfiles",
    // external
    "rest_framework",
    "corsheaders",
    "django_filters",
    // local
    "apps.accounts",
    "apps.orders",
    "apps.products",
    "apps.notifications",
];

/// Order matters: static files must be served before sessions, and CORS
/// headers must be added before the common middleware.
pub const MIDDLEWARE: &[&str] = &[
    "django.middleware.security.SecurityMiddleware",
    "whitenoise.middleware.WhiteNoiseMiddleware",
    "django.contrib.sessions.middleware.SessionMiddleware",
    "corsheaders.middleware.CorsMiddleware",
    "django.middleware.common.CommonMiddleware",
    "django.middleware.csrf.CsrfViewMiddleware",
    "django.contrib.auth.middleware.AuthenticationMiddleware",
    "django.contrib.messages.middleware.MessageMiddleware",
    "django.middleware.clickjacking.XFrameOptionsMiddleware",
];

pub const ROOT_URLCONF: &str = "config.urls";
pub const WSGI_APPLICATION: &str = "config.wsgi.application";

pub const PASSWORD_VALIDATORS: &[&str] = &[
    "django.contrib.auth.password_validation.UserAttributeSimilarityValidator",
    "django.contrib.auth.password_validation.MinimumLengthValidator",
    "django.contrib.auth.password_validation.CommonPasswordValidator",
    "django.contrib.auth.password_validation.NumericPasswordValidator",
];

pub const CORS_ALLOW_ALL_ORIGINS: bool = true;

#[derive(Debug, Clone, Serialize)]
pub struct TemplatesConfig {
    pub backend: &'static str,
    pub dirs: Vec<PathBuf>,
    pub app_dirs: bool,
    pub context_processors: &'static [&'static str],
}

impl TemplatesConfig {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            backend: "django.template.backends.django.DjangoTemplates",
            dirs: vec![base_dir.join("templates")],
            app_dirs: true,
            context_processors: &[
                "django.template.context_processors.debug",
                "django.template.context_processors.request",
                "django.contrib.auth.context_processors.auth",
                "django.contrib.messages.context_processors.messages",
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct I18nConfig {
    pub language_code: &'static str,
    pub time_zone: &'static str,
    pub use_i18n: bool,
    pub use_tz: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language_code: "en-us",
            time_zone: "Asia/Tashkent",
            use_i18n: true,
            use_tz: true,
        }
    }
}

/// A URL prefix and the directory it is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServedPath {
    pub url: &'static str,
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaticFilesConfig {
    #[serde(flatten)]
    pub path: ServedPath,
    pub storage: &'static str,
}

impl StaticFilesConfig {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: ServedPath {
                url: "/static/",
                root: base_dir.join("staticfiles"),
            },
            storage: "whitenoise.storage.CompressedStaticFilesStorage",
        }
    }
}

pub fn media(base_dir: &Path) -> ServedPath {
    ServedPath {
        url: "/media/",
        root: base_dir.join("media"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestFrameworkConfig {
    pub default_filter_backends: &'static [&'static str],
    pub default_authentication_classes: &'static [&'static str],
}

impl Default for RestFrameworkConfig {
    fn default() -> Self {
        Self {
            default_filter_backends: &["django_filters.rest_framework.DjangoFilterBackend"],
            default_authentication_classes: &[
                "rest_framework.authentication.SessionAuthentication",
                "rest_framework.authentication.BasicAuthentication",
            ],
        }
    }
}
