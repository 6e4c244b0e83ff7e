//! SMS gateway credentials.

use std::fmt;

use crate::config::{keys, resolve_conditional, ConfigurationSet};
use crate::error::AppError;

use super::IntegrationError;

#[derive(Clone, PartialEq, Eq)]
pub struct SmsCredentials {
    pub login: String,
    password: String,
}

impl SmsCredentials {
    pub fn new(login: &str, password: &str) -> Result<Self, IntegrationError> {
        if password.is_empty() {
            return Err(IntegrationError::MissingCredential(keys::SMS_PASSWORD));
        }
        Ok(Self {
            login: login.to_string(),
            password: password.to_string(),
        })
    }

    /// Gated on `SMS_LOGIN`. A login without a password fails startup.
    pub fn from_settings(set: &ConfigurationSet) -> Result<Option<Self>, AppError> {
        let password = set.string(keys::SMS_PASSWORD)?;
        resolve_conditional(set, keys::SMS_LOGIN, |login| SmsCredentials::new(login, password))
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for SmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsCredentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}
