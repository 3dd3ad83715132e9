//! The reload engine.
//!
//! [`Config`] owns the flat key → value store. A reload parses every line,
//! resolves each directive through the registry strictly in file order
//! (awaiting async resolvers one at a time), and only then swaps the new
//! store in. Readers never see a partially built store, and a failed or
//! cancelled reload leaves the previous one installed.

mod builder;


use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::parser::{parse_lines, ConfigLine};
use crate::registry::{TypeEntry, TypeRegistry};
use crate::section::{ConfigSection, ConfigView};
use crate::value::{ApplicationData, ConfigValue};

pub use self::builder::ConfigBuilder;

/// Flat key → value map produced by one reload.
pub type Store = HashMap<String, ConfigValue>;

/// Counters from a successful reload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Directives whose resolver ran.
    pub resolved: usize,
    /// Directives skipped because their type is deferred.
    pub skipped_deferred: usize,
    /// Directives with an unregistered type that resolved as `None`.
    pub substituted_unknown: usize,
    /// Distinct keys in the installed store.
    pub keys: usize,
}

/// A typed config file and its current store.
///
/// Reloads must be serialized by the caller. Reads may run concurrently
/// with a reload and observe either the old or the new store.
pub struct Config {
    path: PathBuf,
    application_data: ApplicationData,
    registry: TypeRegistry,
    ignore_unknown_types: bool,
    store: ArcSwap<Store>,
}

impl Config {
    /// Engine with built-in types only and no application data.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigBuilder::new(path).build()
    }

    pub fn builder(path: impl Into<PathBuf>) -> ConfigBuilder {
        ConfigBuilder::new(path)
    }

    /// Re-read the file and rebuild the store.
    ///
    /// With `include_deferred == false` directives of deferred types are
    /// skipped entirely and their resolvers are never called.
    pub async fn reload(&self, include_deferred: bool) -> Result<ReloadSummary> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.reload_from_str(&content, include_deferred).await
    }

    /// Rebuild the store from in-memory text instead of the file.
    pub async fn reload_from_str(&self, text: &str, include_deferred: bool) -> Result<ReloadSummary> {
        self.reload_from_lines(text.lines(), include_deferred).await
    }

    /// Rebuild the store from raw source lines.
    ///
    /// The whole input is parsed before any resolver runs, so a malformed
    /// line never triggers an external fetch.
    pub async fn reload_from_lines<I, S>(&self, lines: I, include_deferred: bool) -> Result<ReloadSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_lines(lines)?;
        let (store, mut summary) = self.resolve_all(parsed, include_deferred).await?;

        summary.keys = store.len();
        self.store.store(Arc::new(store));

        info!(
            path = %self.path.display(),
            keys = summary.keys,
            skipped_deferred = summary.skipped_deferred,
            include_deferred,
            "config reloaded"
        );
        Ok(summary)
    }

    async fn resolve_all(&self, lines: Vec<ConfigLine>, include_deferred: bool) -> Result<(Store, ReloadSummary)> {
        let none = TypeEntry::none();
        let mut store = Store::with_capacity(lines.len());
        let mut summary = ReloadSummary::default();

        for line in lines {
            let entry = match self.registry.lookup(&line.type_name) {
                Some(entry) => entry,
                None if self.ignore_unknown_types => {
                    warn!(
                        line = line.line,
                        key = %line.key,
                        type_name = %line.type_name,
                        "unknown config type, resolving as None"
                    );
                    summary.substituted_unknown += 1;
                    &none
                }
                None => {
                    return Err(ConfigError::UnknownType {
                        line: line.line,
                        type_name: line.type_name,
                    })
                }
            };

            if entry.is_deferred() && !include_deferred {
                debug!(line = line.line, key = %line.key, type_name = %line.type_name, "skipping deferred type");
                summary.skipped_deferred += 1;
                continue;
            }

            // One directive at a time: a pending resolver finishes (or fails)
            // before the next line is looked at.
            let value = entry
                .resolve(&line.raw_value, &self.application_data)
                .into_value()
                .await
                .map_err(|source| ConfigError::Resolve {
                    line: line.line,
                    key: line.key.clone(),
                    type_name: line.type_name.clone(),
                    source,
                })?;

            debug!(line = line.line, key = %line.key, value_type = value.type_label(), "resolved config value");
            store.insert(line.key, value);
            summary.resolved += 1;
        }

        Ok((store, summary))
    }

    /// Shared handle to the current store.
    pub fn snapshot(&self) -> Arc<Store> {
        self.store.load_full()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.load().contains_key(key)
    }

    /// Keys in the current store, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.load().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.store.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.load().is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn application_data(&self) -> &ApplicationData {
        &self.application_data
    }

    /// The merged registry (built-ins plus custom types).
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn ignores_unknown_types(&self) -> bool {
        self.ignore_unknown_types
    }
}

impl ConfigView for Config {
    fn get_value(&self, key: &str, fallback: Option<ConfigValue>) -> Result<ConfigValue> {
        match self.store.load().get(key) {
            Some(value) => Ok(value.clone()),
            None => fallback.ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() }),
        }
    }

    fn get_section(&self, name: &str) -> ConfigSection<'_> {
        ConfigSection::new(self, name)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("path", &self.path)
            .field("ignore_unknown_types", &self.ignore_unknown_types)
            .field("types", &self.registry)
            .field("keys", &self.len())
            .finish()
    }
}
