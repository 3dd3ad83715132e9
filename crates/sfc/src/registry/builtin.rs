//! Built-in resolvers.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

use crate::error::ResolveError;
use crate::value::{ApplicationData, ConfigValue, Entity};

use super::TypeEntry;

/// Client used by the deferred `Guild` and `Channel` types.
///
/// Fetched objects are stored as [`Entity`] values keyed by the requested id;
/// callers get them back with [`ConfigValue::downcast_ref`].
///
/// Pass it as application data wrapped in an `Arc<dyn EntityFetcher>`:
///
/// ```ignore
/// let client: Arc<dyn EntityFetcher> = Arc::new(MyClient::new());
/// let config = ConfigBuilder::new("bot.sfc")
///     .application_data(ApplicationData::new(client))
///     .build();
/// ```
#[async_trait]
pub trait EntityFetcher: Send + Sync {
    async fn fetch_guild(&self, id: u64) -> Result<Arc<dyn Any + Send + Sync>, ResolveError>;

    async fn fetch_channel(&self, id: u64) -> Result<Arc<dyn Any + Send + Sync>, ResolveError>;
}

pub(super) fn entries() -> Vec<(String, TypeEntry)> {
    vec![
        ("str".into(), TypeEntry::immediate(|v, _| Ok(ConfigValue::Str(v.to_string())))),
        ("Base64".into(), TypeEntry::immediate(|v, _| decode_base64(v))),
        ("Guild".into(), TypeEntry::suspending(fetch_guild, true)),
        ("Channel".into(), TypeEntry::suspending(fetch_channel, true)),
        ("int".into(), TypeEntry::immediate(|v, _| Ok(ConfigValue::Int(v.trim().parse()?)))),
        ("JSON".into(), TypeEntry::immediate(|v, _| Ok(ConfigValue::Json(serde_json::from_str(v)?)))),
        ("Regex".into(), TypeEntry::immediate(|v, _| Ok(ConfigValue::Regex(Regex::new(v)?)))),
        ("None".into(), TypeEntry::none()),
    ]
}

/// Characters outside the standard alphabet (whitespace, line breaks) are
/// discarded before decoding; padding is still required.
fn decode_base64(raw: &str) -> Result<ConfigValue, ResolveError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = STANDARD.decode(cleaned)?;
    Ok(ConfigValue::Str(String::from_utf8(bytes)?))
}

fn parse_id(raw: &str) -> Result<u64, ResolveError> {
    raw.trim()
        .parse()
        .map_err(|_| ResolveError::InvalidId(raw.to_string()))
}

fn fetcher(data: &ApplicationData) -> Result<Arc<dyn EntityFetcher>, ResolveError> {
    data.downcast_ref::<Arc<dyn EntityFetcher>>()
        .cloned()
        .ok_or(ResolveError::MissingContext("an EntityFetcher"))
}

async fn fetch_guild(raw: String, data: ApplicationData) -> Result<ConfigValue, ResolveError> {
    let id = parse_id(&raw)?;
    let client = fetcher(&data)?;
    let guild = client.fetch_guild(id).await?;
    Ok(ConfigValue::Entity(Entity::new("Guild", id, guild)))
}

async fn fetch_channel(raw: String, data: ApplicationData) -> Result<ConfigValue, ResolveError> {
    let id = parse_id(&raw)?;
    let client = fetcher(&data)?;
    let channel = client.fetch_channel(id).await?;
    Ok(ConfigValue::Entity(Entity::new("Channel", id, channel)))
}
