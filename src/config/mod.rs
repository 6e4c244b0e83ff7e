//! Layered configuration resolution.
//!
//! Each key is looked up in the process environment, then in the `.env`
//! file layer, then falls back to its declared default. Raw strings are
//! coerced to the declared kind; a value that does not coerce is an error,
//! never a silent fallback.
//!
//! # Module layout
//!
//! - **value**: `Kind`, `Value`, `Fallback`, `Origin`, `ConfigurationValue`,
//!   `Declaration`.
//! - **coerce**: string → typed value conversion.
//! - **env_file**: `.env` parsing into a private layer (process env untouched).
//! - **resolver**: `Resolver`: the lookup itself, memoized per key.
//! - **set**: `ConfigurationSet`: the frozen, read-only result.
//! - **conditional**: `resolve_conditional` for gated optional resources.
//! - **keys**: the keys the application reads.

mod coerce;
mod conditional;
mod env_file;
pub mod keys;
mod resolver;
mod set;
mod value;

pub use coerce::{parse_bool, parse_integer, parse_list};
pub use conditional::resolve_conditional;
pub use env_file::EnvFile;
pub use resolver::Resolver;
pub use set::ConfigurationSet;
pub use value::*;
