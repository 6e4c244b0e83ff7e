//! Raw string → typed value coercion.

use crate::error::AppError;

use super::value::{Kind, Value};

const TRUTHY: &[&str] = &["true", "on", "ok", "y", "yes", "1"];
const FALSY: &[&str] = &["false", "off", "n", "no", "0", ""];

pub const LIST_DELIMITER: char = ',';

/// Coerce `raw` to `kind`. Never falls back to a default on failure.
pub fn coerce(key: &str, kind: Kind, raw: &str) -> Result<Value, AppError> {
    match kind {
        Kind::String => Ok(Value::String(raw.to_string())),
        Kind::Bool => parse_bool(key, raw).map(Value::Bool),
        Kind::Integer => parse_integer(key, raw).map(Value::Integer),
        Kind::List => Ok(Value::List(parse_list(raw))),
    }
}

pub fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    let token = raw.trim().to_ascii_lowercase();
    if TRUTHY.contains(&token.as_str()) {
        Ok(true)
    } else if FALSY.contains(&token.as_str()) {
        Ok(false)
    } else {
        Err(conversion_error(key, Kind::Bool, raw))
    }
}

/// Base-10 with an optional sign. `i64::from_str` already rejects `0x`,
/// underscores and inner whitespace.
pub fn parse_integer(key: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| conversion_error(key, Kind::Integer, raw))
}

/// Split on commas, trim each element, drop empties.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn conversion_error(key: &str, expected: Kind, raw: &str) -> AppError {
    AppError::TypeConversion {
        key: key.to_string(),
        expected,
        found: format!("{raw:?}"),
    }
}
