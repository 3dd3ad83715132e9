//! Resolved config values and the opaque application context.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Serialize, Serializer};

/// A value produced by a type resolver.
#[derive(Clone)]
pub enum ConfigValue {
    /// Output of the `None` type (and of unknown types when they are ignored).
    Null,
    Str(String),
    Int(i64),
    Json(serde_json::Value),
    Regex(Regex),
    /// An external entity addressed by kind and id, e.g. a fetched guild.
    Entity(Entity),
    /// Anything else a resolver produces.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl ConfigValue {
    /// Wrap an arbitrary entity.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        ConfigValue::Opaque(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ConfigValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            ConfigValue::Regex(re) => Some(re),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            ConfigValue::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow an entity or opaque value as its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ConfigValue::Entity(e) => e.downcast_ref::<T>(),
            ConfigValue::Opaque(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short name of the variant, used in logs.
    pub fn type_label(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Str(_) => "str",
            ConfigValue::Int(_) => "int",
            ConfigValue::Json(_) => "json",
            ConfigValue::Regex(_) => "regex",
            ConfigValue::Entity(_) => "entity",
            ConfigValue::Opaque(_) => "opaque",
        }
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigValue::Null, ConfigValue::Null) => true,
            (ConfigValue::Str(a), ConfigValue::Str(b)) => a == b,
            (ConfigValue::Int(a), ConfigValue::Int(b)) => a == b,
            (ConfigValue::Json(a), ConfigValue::Json(b)) => a == b,
            (ConfigValue::Regex(a), ConfigValue::Regex(b)) => a.as_str() == b.as_str(),
            (ConfigValue::Entity(a), ConfigValue::Entity(b)) => a == b,
            (ConfigValue::Opaque(a), ConfigValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("Null"),
            ConfigValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            ConfigValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            ConfigValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            ConfigValue::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            ConfigValue::Entity(e) => f.debug_tuple("Entity").field(e).finish(),
            ConfigValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Str(s) => f.write_str(s),
            ConfigValue::Int(n) => write!(f, "{n}"),
            ConfigValue::Json(v) => write!(f, "{v}"),
            ConfigValue::Regex(re) => f.write_str(re.as_str()),
            ConfigValue::Entity(e) => write!(f, "{}({})", e.kind, e.id),
            ConfigValue::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_none(),
            ConfigValue::Str(s) => serializer.serialize_str(s),
            ConfigValue::Int(n) => serializer.serialize_i64(*n),
            ConfigValue::Json(v) => v.serialize(serializer),
            ConfigValue::Regex(re) => serializer.serialize_str(re.as_str()),
            ConfigValue::Entity(e) => e.serialize(serializer),
            ConfigValue::Opaque(_) => serializer.serialize_str("<opaque>"),
        }
    }
}

impl From<Entity> for ConfigValue {
    fn from(e: Entity) -> Self {
        ConfigValue::Entity(e)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Int(n)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(v: serde_json::Value) -> Self {
        ConfigValue::Json(v)
    }
}

impl From<Regex> for ConfigValue {
    fn from(re: Regex) -> Self {
        ConfigValue::Regex(re)
    }
}

/// A fetched external object together with the id it was fetched by.
///
/// Two entities are equal when their kind and id match, so reloading the same
/// file twice yields equal stores even though each fetch returns a fresh
/// object.
#[derive(Clone, Serialize)]
pub struct Entity {
    kind: &'static str,
    id: u64,
    #[serde(skip)]
    data: Arc<dyn Any + Send + Sync>,
}

impl Entity {
    pub fn new(kind: &'static str, id: u64, data: Arc<dyn Any + Send + Sync>) -> Self {
        Self { kind, id, data }
    }

    /// Type name the entity was declared with, e.g. `Guild`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Opaque context forwarded to every resolver call.
///
/// Resolvers that need an external dependency (a network client, a database
/// handle) recover it with [`ApplicationData::downcast_ref`].
#[derive(Clone, Default)]
pub struct ApplicationData(Option<Arc<dyn Any + Send + Sync>>);

impl ApplicationData {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self(Some(Arc::new(data)))
    }

    /// No context.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|d| d.downcast_ref::<T>())
    }
}

impl fmt::Debug for ApplicationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("ApplicationData(..)"),
            None => f.write_str("ApplicationData(None)"),
        }
    }
}
