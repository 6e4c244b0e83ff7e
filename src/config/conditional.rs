//! Gated optional resources.
//!
//! A resource is built only when its gate key resolved to a non-empty value.
//! The decision is made once at startup and the result lives for the process.

use std::fmt::Display;

use tracing::debug;

use crate::error::AppError;

use super::set::ConfigurationSet;
use super::value::{Kind, Value};

/// Invoke `factory` with the gate value if `gate_key` is present and
/// non-empty; otherwise return `None` without calling it.
///
/// Factory failures are returned as
/// [`AppError::ConditionalResourceConstruction`] and never turn into `None`.
pub fn resolve_conditional<T, E, F>(
    set: &ConfigurationSet,
    gate_key: &str,
    factory: F,
) -> Result<Option<T>, AppError>
where
    E: Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    let gate = set.get(gate_key)?;
    let raw = match gate.resolved_value() {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        Some(other) if !other.is_empty() => {
            return Err(AppError::TypeConversion {
                key: gate_key.to_string(),
                expected: Kind::String,
                found: format!("{} gate", other.kind()),
            });
        }
        _ => {
            debug!(gate = gate_key, "gate not set, resource absent");
            return Ok(None);
        }
    };

    let resource = factory(raw).map_err(|e| AppError::ConditionalResourceConstruction {
        key: gate_key.to_string(),
        reason: e.to_string(),
    })?;
    debug!(gate = gate_key, origin = %gate.origin(), "gated resource constructed");
    Ok(Some(resource))
}
