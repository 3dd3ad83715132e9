//! Typed, line-oriented configuration files.
//!
//! Each directive binds a dotted key to a declared type and a raw value:
//!
//! ```text
//! # comment
//! bot.name : str = Alice
//! bot.retries : int = 3
//! bot.home : Guild = 81384788765712384
//! ```
//!
//! This crate provides:
//! - A line parser for the `key : Type = value` grammar
//! - A pluggable type registry with built-in resolvers (`str`, `int`, `JSON`, ...)
//! - A reload engine that resolves values in file order, awaiting async resolvers
//!   and skipping deferred ("post-ready") types on demand
//! - Section accessors for navigating dotted keys without a declared schema

pub mod engine;
pub mod error;
pub mod parser;
pub mod registry;
pub mod section;
pub mod value;

pub use engine::{Config, ConfigBuilder, ReloadSummary, Store};
pub use error::{ConfigError, ResolveError, Result};
pub use parser::{parse_line, parse_lines, ConfigLine};
pub use registry::{EntityFetcher, Resolution, TypeEntry, TypeRegistry};
pub use section::{ConfigSection, ConfigView, Lookup};
pub use value::{ApplicationData, ConfigValue, Entity};
