//! Type registry: maps a declared type name to the resolver that builds its value.
//!
//! Entries are plain data (a shared constructor plus a `deferred` flag). The
//! registry handed to the engine is the built-in set merged with caller
//! overrides; on a name collision the caller's entry wins.

mod builtin;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::ResolveError;
use crate::value::{ApplicationData, ConfigValue};

pub use self::builtin::EntityFetcher;

/// Shared resolver callback: `(raw value, application data) -> value or suspension`.
pub type Constructor = Arc<dyn Fn(&str, &ApplicationData) -> Resolution + Send + Sync>;

/// What a constructor hands back to the engine.
pub enum Resolution {
    /// The value (or failure) is available immediately.
    Ready(Result<ConfigValue, ResolveError>),
    /// The value completes later, e.g. after a network round trip.
    Pending(BoxFuture<'static, Result<ConfigValue, ResolveError>>),
}

impl Resolution {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending(_))
    }

    /// Wait for the value, whichever form it arrived in.
    pub async fn into_value(self) -> Result<ConfigValue, ResolveError> {
        match self {
            Resolution::Ready(result) => result,
            Resolution::Pending(fut) => fut.await,
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Resolution::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A registered type: how to build its value and whether it waits for readiness.
#[derive(Clone)]
pub struct TypeEntry {
    constructor: Constructor,
    deferred: bool,
}

impl TypeEntry {
    /// Wrap a raw constructor.
    pub fn new<F>(constructor: F, deferred: bool) -> Self
    where
        F: Fn(&str, &ApplicationData) -> Resolution + Send + Sync + 'static,
    {
        Self {
            constructor: Arc::new(constructor),
            deferred,
        }
    }

    /// A synchronous resolver that always runs, even on an immediate-only reload.
    ///
    /// ```ignore
    /// let upper = TypeEntry::immediate(|v, _| Ok(v.to_uppercase().into()));
    /// ```
    pub fn immediate<F>(resolve: F) -> Self
    where
        F: Fn(&str, &ApplicationData) -> Result<ConfigValue, ResolveError> + Send + Sync + 'static,
    {
        Self::new(move |raw, data| Resolution::Ready(resolve(raw, data)), false)
    }

    /// An async resolver. The raw value and application data are handed over
    /// owned so the returned future can outlive the call.
    pub fn suspending<F, Fut>(resolve: F, deferred: bool) -> Self
    where
        F: Fn(String, ApplicationData) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ConfigValue, ResolveError>> + Send + 'static,
    {
        Self::new(
            move |raw, data| Resolution::Pending(Box::pin(resolve(raw.to_string(), data.clone()))),
            deferred,
        )
    }

    /// The `None` type: never deferred, always resolves to [`ConfigValue::Null`].
    pub fn none() -> Self {
        Self::immediate(|_, _| Ok(ConfigValue::Null))
    }

    /// Whether the entry only runs on a full (`include_deferred`) reload.
    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Invoke the constructor.
    pub fn resolve(&self, raw: &str, data: &ApplicationData) -> Resolution {
        (self.constructor)(raw, data)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}

/// Name → [`TypeEntry`] lookup table.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeEntry>,
}

impl TypeRegistry {
    /// An empty registry (no built-ins).
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in types: `str`, `Base64`, `int`, `JSON`, `Regex`, `None`,
    /// and the deferred `Guild` and `Channel`.
    pub fn builtin() -> Self {
        builtin::entries().into_iter().collect()
    }

    /// Layer `overrides` on top of `self`. Overrides replace same-named entries.
    pub fn merge(mut self, overrides: impl IntoIterator<Item = (String, TypeEntry)>) -> Self {
        self.entries.extend(overrides);
        self
    }

    /// Register (or replace) one entry, returning the entry it shadowed.
    pub fn insert(&mut self, name: impl Into<String>, entry: TypeEntry) -> Option<TypeEntry> {
        self.entries.insert(name.into(), entry)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, entry: TypeEntry) -> Self {
        self.insert(name, entry);
        self
    }

    /// Entry registered under `type_name`. Names are case-sensitive.
    pub fn lookup(&self, type_name: &str) -> Option<&TypeEntry> {
        self.entries.get(type_name)
    }

    /// Whether `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            map.entry(&name, &self.entries[name].deferred);
        }
        map.finish()
    }
}

impl FromIterator<(String, TypeEntry)> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = (String, TypeEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TypeRegistry {
    type Item = (String, TypeEntry);
    type IntoIter = std::collections::hash_map::IntoIter<String, TypeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
