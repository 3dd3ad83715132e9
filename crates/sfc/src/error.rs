//! Error types for parsing, resolving and querying configuration.

use std::path::PathBuf;

/// Errors produced by a reload or a value query.
///
/// Every reload error is fatal to that reload: the previously installed
/// store stays in place.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error reading `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-blank, non-comment line does not match `key : Type = value`.
    #[error("error parsing line {line}")]
    Parse { line: usize },

    /// A line names a type that is not in the registry.
    #[error("invalid config type `{type_name}` on line {line}")]
    UnknownType { line: usize, type_name: String },

    /// A resolver rejected the raw value.
    #[error("failed to resolve `{key}` as {type_name} on line {line}: {source}")]
    Resolve {
        line: usize,
        key: String,
        type_name: String,
        #[source]
        source: ResolveError,
    },

    /// No value is stored under the key and no fallback was supplied.
    #[error("there is no config value for key `{key}` (right now)")]
    KeyNotFound { key: String },
}

impl ConfigError {
    /// Whether this is a per-query miss rather than a reload failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }

    /// 1-based source line for reload errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Parse { line }
            | ConfigError::UnknownType { line, .. }
            | ConfigError::Resolve { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Errors raised by individual type resolvers.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// `int` value that does not fit a signed 64-bit integer.
    #[error("invalid integer: {0}")]
    InvalidInt(#[from] std::num::ParseIntError),

    /// `Base64` value with bad length or padding.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// `Base64` payload that does not decode to text.
    #[error("decoded bytes are not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Malformed `JSON` document.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Pattern the `regex` crate rejects, including backreferences and lookaround.
    #[error("invalid pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// An entity id that is not an unsigned 64-bit integer.
    #[error("invalid id `{0}`")]
    InvalidId(String),

    /// The application data does not carry what the resolver needs.
    #[error("application data does not provide {0}")]
    MissingContext(&'static str),

    /// An external fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Free-form failure from a caller-supplied resolver.
    #[error("{0}")]
    Custom(String),
}

/// Result alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_line() {
        let err = ConfigError::Parse { line: 7 };
        assert_eq!(err.to_string(), "error parsing line 7");
        assert_eq!(err.line(), Some(7));
        assert!(!err.is_not_found());
    }

    #[test]
    fn resolve_error_keeps_source() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = ConfigError::Resolve {
            line: 2,
            key: "bot.retries".into(),
            type_name: "int".into(),
            source: source.into(),
        };
        let display = err.to_string();
        assert!(display.contains("bot.retries"));
        assert!(display.contains("line 2"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn key_not_found_is_not_found() {
        let err = ConfigError::KeyNotFound { key: "a.b".into() };
        assert!(err.is_not_found());
        assert_eq!(err.line(), None);
    }
}
