//! Optional third-party service handles.
//!
//! Each handle is built at most once, at startup, and only when its gate key
//! is set. Talking to the services is left to the consumers of the handles.

pub mod search;
pub mod sms;

use thiserror::Error;

pub use search::SearchClient;
pub use sms::SmsCredentials;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("{0} must be set when its login is set")]
    MissingCredential(&'static str),
    #[error("http client: {0}")]
    Client(String),
}
