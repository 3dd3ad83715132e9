//! sfc-inspect: load a typed config file and print what it resolves to.
//!
//! Without positional keys every stored value is printed. A key that names
//! a prefix instead of a value prints every entry under that prefix.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use sfc::{Config, ConfigValue, ConfigView, Lookup};

// ── CLI ─────────────────────────────────────────────────────────────

/// Resolve a typed config file and print its values.
#[derive(Parser, Debug)]
#[command(name = "sfc-inspect", version, about)]
struct Cli {
    /// Path to the config file.
    #[arg(long, short, env = "SFC_FILE", default_value = "config.sfc")]
    file: String,

    /// Also resolve deferred types (they need an application client, so
    /// the built-in `Guild`/`Channel` types fail here).
    #[arg(long)]
    deferred: bool,

    /// Resolve unregistered types as null instead of failing.
    #[arg(long, env = "SFC_IGNORE_UNKNOWN_TYPES")]
    ignore_unknown_types: bool,

    /// Print a JSON object instead of `key = value` lines.
    #[arg(long)]
    json: bool,

    /// Keys or section prefixes to print (default: everything).
    keys: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = Config::builder(&cli.file)
        .ignore_unknown_types(cli.ignore_unknown_types)
        .build();
    let summary = config
        .reload(cli.deferred)
        .await
        .with_context(|| format!("failed to load {}", cli.file))?;
    debug!(?summary, "reload finished");

    let entries = if cli.keys.is_empty() {
        all_entries(&config)
    } else {
        let mut entries = Vec::new();
        for key in &cli.keys {
            entries.extend(select(&config, key)?);
        }
        entries
    };

    if cli.json {
        let object: serde_json::Map<String, serde_json::Value> = entries
            .into_iter()
            .map(|(k, v)| Ok((k, serde_json::to_value(&v)?)))
            .collect::<Result<_, serde_json::Error>>()
            .context("failed to encode values")?;
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (key, value) in entries {
            println!("{key} = {value}  ({})", value.type_label());
        }
    }

    Ok(())
}

fn all_entries(config: &Config) -> Vec<(String, ConfigValue)> {
    let store = config.snapshot();
    config
        .keys()
        .into_iter()
        .filter_map(|k| store.get(&k).cloned().map(|v| (k, v)))
        .collect()
}

/// A single value, or every entry under `key.` when `key` is a section.
fn select(config: &Config, key: &str) -> Result<Vec<(String, ConfigValue)>> {
    match config.lookup(key)? {
        Lookup::Value(value) => Ok(vec![(key.to_string(), value)]),
        Lookup::Section(section) => {
            let prefix = format!("{}.", section.prefix());
            let found: Vec<_> = all_entries(config)
                .into_iter()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            anyhow::ensure!(!found.is_empty(), "no config value or section named `{key}`");
            Ok(found)
        }
    }
}
