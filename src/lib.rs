// Library root: the binary entry point is src/main.rs.

pub mod config;
pub mod error;
pub mod integrations;
pub mod logger;
pub mod settings;

pub use error::AppError;
pub use settings::Settings;
