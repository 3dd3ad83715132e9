//! Fluent construction of a [`Config`].

use std::path::PathBuf;

use arc_swap::ArcSwap;

use crate::registry::{TypeEntry, TypeRegistry};
use crate::value::ApplicationData;

use super::{Config, Store};

/// Fluent builder for configuring a [`Config`].
///
/// # Example
/// ```ignore
/// let config = ConfigBuilder::new("bot.sfc")
///     .application_data(ApplicationData::new(client))
///     .custom_type("Upper", TypeEntry::immediate(|v, _| Ok(v.to_uppercase().into())))
///     .ignore_unknown_types(true)
///     .build();
/// config.reload(false).await?;
/// ```
pub struct ConfigBuilder {
    path: PathBuf,
    application_data: ApplicationData,
    custom_types: TypeRegistry,
    ignore_unknown_types: bool,
}

impl ConfigBuilder {
    /// Create a new builder for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            application_data: ApplicationData::none(),
            custom_types: TypeRegistry::new(),
            ignore_unknown_types: false,
        }
    }

    /// Context handed to every resolver (default: none).
    pub fn application_data(mut self, data: ApplicationData) -> Self {
        self.application_data = data;
        self
    }

    /// Register one custom type. Shadows a built-in of the same name.
    pub fn custom_type(mut self, name: impl Into<String>, entry: TypeEntry) -> Self {
        self.custom_types.insert(name, entry);
        self
    }

    /// Register several custom types at once.
    pub fn custom_types(mut self, types: impl IntoIterator<Item = (String, TypeEntry)>) -> Self {
        self.custom_types = self.custom_types.merge(types);
        self
    }

    /// Resolve unregistered type names as `None` instead of failing (default: false).
    pub fn ignore_unknown_types(mut self, ignore: bool) -> Self {
        self.ignore_unknown_types = ignore;
        self
    }

    /// Merge the registry and build an engine with an empty store.
    pub fn build(self) -> Config {
        Config {
            path: self.path,
            application_data: self.application_data,
            registry: TypeRegistry::builtin().merge(self.custom_types),
            ignore_unknown_types: self.ignore_unknown_types,
            store: ArcSwap::from_pointee(Store::new()),
        }
    }
}
