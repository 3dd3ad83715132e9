//! Line grammar: `<dotted.key> : <TypeName> = <raw value>`.
//!
//! Blank lines and lines starting with `#` (after trimming) are skipped. The
//! raw value is everything after the first `=`, with the whitespace around
//! that `=` dropped; it is not unescaped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConfigError, Result};

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9_.]+)\s*:\s*([a-zA-Z0-9_]+)\s*=\s*(.+)").expect("line pattern compiles")
});

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    /// 1-based position in the source.
    pub line: usize,
    pub key: String,
    pub type_name: String,
    pub raw_value: String,
}

/// Parse a single source line.
///
/// Returns `Ok(None)` for blank and comment lines and [`ConfigError::Parse`]
/// for anything else that does not match the grammar.
pub fn parse_line(line_number: usize, raw: &str) -> Result<Option<ConfigLine>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let caps = LINE_PATTERN
        .captures(line)
        .ok_or(ConfigError::Parse { line: line_number })?;

    Ok(Some(ConfigLine {
        line: line_number,
        key: caps[1].to_string(),
        type_name: caps[2].to_string(),
        raw_value: caps[3].to_string(),
    }))
}

/// Parse a whole document, numbering lines from 1. Stops at the first error.
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<ConfigLine>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Vec::new();
    for (index, raw) in lines.into_iter().enumerate() {
        if let Some(line) = parse_line(index + 1, raw.as_ref())? {
            parsed.push(line);
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ConfigLine {
        parse_line(1, raw).unwrap().expect("directive")
    }

    #[test]
    fn parses_simple_directive() {
        let line = parse("name : str = Alice");
        assert_eq!(line.key, "name");
        assert_eq!(line.type_name, "str");
        assert_eq!(line.raw_value, "Alice");
    }

    #[test]
    fn whitespace_around_separators_is_optional() {
        let line = parse("bot.retry_count:int=3");
        assert_eq!(line.key, "bot.retry_count");
        assert_eq!(line.type_name, "int");
        assert_eq!(line.raw_value, "3");

        let line = parse("   a.b   :   Regex   =   ^x y$   ");
        assert_eq!(line.key, "a.b");
        assert_eq!(line.raw_value, "^x y$");
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let line = parse("db.url : str = postgres://u:p@h/db?sslmode=require&x=1");
        assert_eq!(line.raw_value, "postgres://u:p@h/db?sslmode=require&x=1");
    }

    #[test]
    fn value_keeps_internal_whitespace_and_escapes() {
        let line = parse(r#"greeting : JSON = {"text": "a  b\n"}"#);
        assert_eq!(line.raw_value, r#"{"text": "a  b\n"}"#);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(2, "   \t").unwrap(), None);
        assert_eq!(parse_line(3, "# name : str = x").unwrap(), None);
        assert_eq!(parse_line(4, "    # indented comment").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        for bad in [
            "bad line no colon",
            "Name : str = x",
            "name : str-ish = x",
            "name : str =",
            "name = x",
            ": str = x",
        ] {
            let err = parse_line(9, bad).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { line: 9 }), "{bad:?} -> {err}");
        }
    }

    #[test]
    fn parse_lines_numbers_from_one() {
        let lines = ["# header", "", "a : str = 1", "b : int = 2"];
        let parsed = parse_lines(lines).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].line, 3);
        assert_eq!(parsed[1].line, 4);
    }

    #[test]
    fn parse_lines_reports_first_bad_line() {
        let lines = vec!["a : str = 1".to_string(), "oops".into(), "also bad".into()];
        let err = parse_lines(&lines).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }
}
