//! Shop settings: startup entry point.
//!
//! Startup sequence:
//!   1. Pick the base directory (`SHOP_BASE_DIR`, else the working directory)
//!   2. Resolve settings: process env > `<base>/.env` > defaults
//!   3. Init logger at the resolved `LOG_LEVEL`
//!   4. Log where each setting came from
//!   5. Print the masked settings summary as JSON
//!
//! Any failure aborts with a non-zero exit; there is no degraded mode.

use shop_settings::{error::AppError, logger, settings};

const BASE_DIR_VAR: &str = "SHOP_BASE_DIR";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let base_override = std::env::var(BASE_DIR_VAR).ok();
    let base_dir = settings::base_dir(base_override.as_deref())?;

    let settings = settings::init(&base_dir)?;

    logger::init(&settings.log_level, false)?;
    settings.log_startup();

    let summary = serde_json::to_string_pretty(&settings.summary())
        .map_err(|e| AppError::Io(e.into()))?;
    println!("{summary}");

    Ok(())
}
