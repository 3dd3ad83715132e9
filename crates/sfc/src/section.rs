//! Navigating dotted keys as nested sections.
//!
//! A [`ConfigSection`] holds nothing but a borrowed root and a key prefix.
//! Every query is rewritten to `prefix.key` and handed to the root, so
//! `config.get_section("a").get_section("b").value("c")` and
//! `config.value("a.b.c")` are the same lookup.

use std::fmt;

use crate::error::Result;
use crate::value::ConfigValue;

/// Read access shared by the engine and every section.
pub trait ConfigView {
    /// Value stored under `key`.
    ///
    /// A missing key yields `fallback` when one is given, otherwise
    /// [`ConfigError::KeyNotFound`](crate::ConfigError::KeyNotFound).
    /// `Some(ConfigValue::Null)` is a real fallback, distinct from `None`.
    fn get_value(&self, key: &str, fallback: Option<ConfigValue>) -> Result<ConfigValue>;

    /// Child section rooted at `name`.
    fn get_section(&self, name: &str) -> ConfigSection<'_>;

    /// [`get_value`](Self::get_value) without a fallback.
    fn value(&self, key: &str) -> Result<ConfigValue> {
        self.get_value(key, None)
    }

    /// [`get_value`](Self::get_value) with a fallback.
    fn value_or(&self, key: &str, fallback: impl Into<ConfigValue>) -> Result<ConfigValue>
    where
        Self: Sized,
    {
        self.get_value(key, Some(fallback.into()))
    }

    /// Attribute-style access: the value under `name` if there is one,
    /// otherwise a child section named `name`.
    ///
    /// A misspelled leaf key therefore comes back as an (empty) section
    /// rather than an error.
    fn lookup(&self, name: &str) -> Result<Lookup<'_>> {
        match self.get_value(name, None) {
            Ok(value) => Ok(Lookup::Value(value)),
            Err(e) if e.is_not_found() => Ok(Lookup::Section(self.get_section(name))),
            Err(e) => Err(e),
        }
    }
}

/// Outcome of [`ConfigView::lookup`].
#[derive(Debug)]
pub enum Lookup<'a> {
    Value(ConfigValue),
    Section(ConfigSection<'a>),
}

impl<'a> Lookup<'a> {
    pub fn is_value(&self) -> bool {
        matches!(self, Lookup::Value(_))
    }

    pub fn into_value(self) -> Option<ConfigValue> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Section(_) => None,
        }
    }

    pub fn into_section(self) -> Option<ConfigSection<'a>> {
        match self {
            Lookup::Section(s) => Some(s),
            Lookup::Value(_) => None,
        }
    }
}

/// A prefixed view over a root [`ConfigView`].
#[derive(Clone)]
pub struct ConfigSection<'a> {
    root: &'a dyn ConfigView,
    prefix: String,
}

impl<'a> ConfigSection<'a> {
    pub fn new(root: &'a dyn ConfigView, prefix: impl Into<String>) -> Self {
        Self {
            root,
            prefix: prefix.into(),
        }
    }

    /// Full dotted path of this section.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    /// Nested section. The child borrows the same root, not this section,
    /// so it can outlive `self`.
    pub fn get_section(&self, name: &str) -> ConfigSection<'a> {
        ConfigSection::new(self.root, self.qualify(name))
    }

    /// [`ConfigView::lookup`] whose child section borrows the root, so
    /// `section.lookup("a")?` can be chained off a temporary section.
    pub fn lookup(&self, name: &str) -> Result<Lookup<'a>> {
        match self.get_value(name, None) {
            Ok(value) => Ok(Lookup::Value(value)),
            Err(e) if e.is_not_found() => Ok(Lookup::Section(self.get_section(name))),
            Err(e) => Err(e),
        }
    }
}

impl ConfigView for ConfigSection<'_> {
    fn get_value(&self, key: &str, fallback: Option<ConfigValue>) -> Result<ConfigValue> {
        self.root.get_value(&self.qualify(key), fallback)
    }

    fn get_section(&self, name: &str) -> ConfigSection<'_> {
        ConfigSection::get_section(self, name)
    }

    fn lookup(&self, name: &str) -> Result<Lookup<'_>> {
        ConfigSection::lookup(self, name)
    }
}

impl fmt::Debug for ConfigSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSection")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
