//! Typed configuration values.

use std::fmt;

/// Declared kind of a setting. Raw strings are coerced to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    Integer,
    List,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Bool => "boolean",
            Kind::Integer => "integer",
            Kind::List => "list of strings",
        };
        f.write_str(name)
    }
}

/// A resolved value of one of the four kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
    Integer(i64),
    List(Vec<String>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Integer(_) => Kind::Integer,
            Value::List(_) => Kind::List,
        }
    }

    /// `true` for the empty string and the empty list. Booleans and integers
    /// are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Bool(_) | Value::Integer(_) => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// What to use when neither the environment nor the env file has the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A concrete default of the declared kind.
    Value(Value),
    /// Optional setting; the "feature disabled" sentinel.
    Absent,
    /// No safe default. Resolution fails if no source supplies the key.
    Required,
}

/// Which layer supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Environment,
    EnvFile,
    Default,
    /// Optional key that nothing supplied.
    Unset,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Environment => "environment",
            Origin::EnvFile => "env file",
            Origin::Default => "default",
            Origin::Unset => "unset",
        };
        f.write_str(name)
    }
}

/// A fully resolved setting. Fields are fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationValue {
    key: String,
    kind: Kind,
    default: Fallback,
    resolved_value: Option<Value>,
    origin: Origin,
}

impl ConfigurationValue {
    pub(super) fn new(
        key: &str,
        kind: Kind,
        default: Fallback,
        resolved_value: Option<Value>,
        origin: Origin,
    ) -> Self {
        Self {
            key: key.to_string(),
            kind,
            default,
            resolved_value,
            origin,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn default(&self) -> &Fallback {
        &self.default
    }

    /// `None` only for an optional key that no layer supplied.
    pub fn resolved_value(&self) -> Option<&Value> {
        self.resolved_value.as_ref()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Present and non-empty. This is the gate for optional resources.
    pub fn is_set(&self) -> bool {
        self.resolved_value.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// A key the application reads, with its kind and fallback.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub key: &'static str,
    pub kind: Kind,
    pub default: Fallback,
}

impl Declaration {
    pub fn string(key: &'static str, default: &str) -> Self {
        Self { key, kind: Kind::String, default: Fallback::Value(default.into()) }
    }

    pub fn bool(key: &'static str, default: bool) -> Self {
        Self { key, kind: Kind::Bool, default: Fallback::Value(default.into()) }
    }

    pub fn integer(key: &'static str, default: i64) -> Self {
        Self { key, kind: Kind::Integer, default: Fallback::Value(default.into()) }
    }

    pub fn list(key: &'static str, default: &[&str]) -> Self {
        let items = default.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self { key, kind: Kind::List, default: Fallback::Value(items.into()) }
    }

    pub fn optional(key: &'static str, kind: Kind) -> Self {
        Self { key, kind, default: Fallback::Absent }
    }

    pub fn required(key: &'static str, kind: Kind) -> Self {
        Self { key, kind, default: Fallback::Required }
    }
}
