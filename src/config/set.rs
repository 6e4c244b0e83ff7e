//! Read-only set of resolved values with typed accessors.

use std::collections::HashMap;

use crate::error::AppError;

use super::value::{ConfigurationValue, Kind, Value};

/// Built once by [`Resolver::finish`](super::Resolver::finish). No mutation API.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationSet {
    values: Vec<ConfigurationValue>,
    index: HashMap<String, usize>,
}

impl ConfigurationSet {
    pub(super) fn new(values: Vec<ConfigurationValue>) -> Self {
        let index = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.key().to_string(), i))
            .collect();
        Self { values, index }
    }

    /// Undeclared keys are a missing-configuration error.
    pub fn get(&self, key: &str) -> Result<&ConfigurationValue, AppError> {
        self.index
            .get(key)
            .map(|&i| &self.values[i])
            .ok_or_else(|| AppError::missing(key))
    }

    pub fn string(&self, key: &str) -> Result<&str, AppError> {
        match self.typed(key, Kind::String)? {
            Some(Value::String(s)) => Ok(s),
            _ => Err(AppError::missing(key)),
        }
    }

    /// `None` when the key is unset or blank.
    pub fn optional_string(&self, key: &str) -> Result<Option<&str>, AppError> {
        match self.typed(key, Kind::String)? {
            Some(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool, AppError> {
        match self.typed(key, Kind::Bool)? {
            Some(Value::Bool(b)) => Ok(*b),
            _ => Err(AppError::missing(key)),
        }
    }

    pub fn integer(&self, key: &str) -> Result<i64, AppError> {
        match self.typed(key, Kind::Integer)? {
            Some(Value::Integer(n)) => Ok(*n),
            _ => Err(AppError::missing(key)),
        }
    }

    pub fn list(&self, key: &str) -> Result<&[String], AppError> {
        match self.typed(key, Kind::List)? {
            Some(Value::List(items)) => Ok(items),
            _ => Err(AppError::missing(key)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigurationValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn typed(&self, key: &str, kind: Kind) -> Result<Option<&Value>, AppError> {
        let value = self.get(key)?;
        if value.kind() != kind {
            return Err(AppError::TypeConversion {
                key: key.to_string(),
                expected: kind,
                found: format!("{} setting", value.kind()),
            });
        }
        Ok(value.resolved_value())
    }
}
