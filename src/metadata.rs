//! # Metadata Extraction
//!
//! Pulls `{name: value}` directives and the declared key out of song text.
//!
//! ## Directive Lines
//! - The whole trimmed line must be `{name:value}`
//! - `name` is trimmed and lowercased; the short aliases `t`, `st` and `a`
//!   become `title`, `subtitle` and `artist`
//! - `value` is everything after the first `:` up to the closing `}`, trimmed
//! - The first occurrence of a name wins
//!
//! ## Declared Key
//! Resolution order:
//! 1. An explicit song-level key (see `SongRecord`)
//! 2. A `{key: ...}` directive
//! 3. A plain `key: ...` line anywhere in the body
//! 4. None
//!
//! Key values are normalized by stripping surrounding brackets, trimming, and
//! keeping the first whitespace-delimited token (`key: G major` gives `G`).
//!
//! ## Example
//! ```rust
//! use chordsheet::extract_metadata;
//!
//! let meta = extract_metadata("{title: Amazing Grace}\n{key: G}\n[G]Amazing grace");
//! assert_eq!(meta.title(), Some("Amazing Grace"));
//! assert_eq!(meta.declared_key.as_deref(), Some("G"));
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

/// Directives and declared key of one song.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMetadata {
    pub directives: BTreeMap<String, String>,
    pub declared_key: Option<String>,
}

impl SongMetadata {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.directives
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.get("artist")
    }

    /// Apply an explicit song-level key, which outranks anything in the body.
    pub fn with_explicit_key(mut self, explicit: Option<&str>) -> Self {
        if let Some(key) = explicit.and_then(normalize_key) {
            self.declared_key = Some(key);
        }
        self
    }
}

/// A directive split into its raw parts, with byte ranges into the line.
pub(crate) struct Directive<'a> {
    pub name: String,
    pub value: &'a str,
    /// Byte offset of `value` within the original line.
    pub value_start: usize,
}

/// Parse a `{name:value}` line. Returns `None` for anything else.
pub(crate) fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('{')?.strip_suffix('}')?;
    let (name, raw_value) = inner.split_once(':')?;

    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    let value = raw_value.trim();
    let inner_start = line.len() - line.trim_start().len() + 1;
    let raw_value_start = inner_start + name_len_with_colon(inner);
    let value_start = raw_value_start + (raw_value.len() - raw_value.trim_start().len());

    Some(Directive {
        name: canonical_name(&name).to_string(),
        value,
        value_start,
    })
}

fn name_len_with_colon(inner: &str) -> usize {
    inner.find(':').map(|i| i + 1).unwrap_or(0)
}

fn canonical_name(name: &str) -> &str {
    match name {
        "t" => "title",
        "st" => "subtitle",
        "a" => "artist",
        other => other,
    }
}

/// True if the line is a `{name:value}` directive.
pub fn is_directive_line(line: &str) -> bool {
    parse_directive(line).is_some()
}

/// A plain `key: value` line, with the byte offset of the value in the line.
pub(crate) fn parse_plain_key_line(line: &str) -> Option<(&str, usize)> {
    let lead = line.len() - line.trim_start().len();
    let trimmed = &line[lead..];
    let head = trimmed.get(..3)?;
    if !head.eq_ignore_ascii_case("key") {
        return None;
    }
    let after_key = &trimmed[3..];
    let colon = after_key.len() - after_key.trim_start().len();
    if !after_key[colon..].starts_with(':') {
        return None;
    }
    let value_start = lead + 3 + colon + 1;
    Some((&line[value_start..], value_start))
}

/// Normalize a key value to its first token, without brackets. A token
/// glued to a following marker (`[G]Amazing`) is cut at the bracket.
///
/// # Example
/// ```
/// use chordsheet::normalize_key;
///
/// assert_eq!(normalize_key(" G major ").as_deref(), Some("G"));
/// assert_eq!(normalize_key("[Bbm]").as_deref(), Some("Bbm"));
/// assert_eq!(normalize_key("   "), None);
/// ```
pub fn normalize_key(raw: &str) -> Option<String> {
    let token = raw
        .split_whitespace()
        .next()?
        .trim_start_matches(|c: char| matches!(c, '[' | '{' | '('));
    let end = token
        .find(|c: char| matches!(c, '[' | ']' | '}' | ')'))
        .unwrap_or(token.len());
    let token = &token[..end];
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Scan song text for directives and the declared key.
pub fn extract_metadata(song: &str) -> SongMetadata {
    let mut directives = BTreeMap::new();
    let mut plain_key: Option<String> = None;

    for line in song.lines() {
        if let Some(directive) = parse_directive(line) {
            directives
                .entry(directive.name)
                .or_insert_with(|| directive.value.to_string());
        } else if plain_key.is_none() {
            if let Some((value, _)) = parse_plain_key_line(line) {
                plain_key = normalize_key(value);
            }
        }
    }

    let declared_key = directives
        .get("key")
        .and_then(|value| normalize_key(value))
        .or(plain_key);

    log::debug!(
        "extracted {} directives, declared key {:?}",
        directives.len(),
        declared_key
    );

    SongMetadata {
        directives,
        declared_key,
    }
}

/// Declared key with an optional explicit song-level key taking precedence.
pub fn resolve_declared_key(explicit: Option<&str>, song: &str) -> Option<String> {
    extract_metadata(song)
        .with_explicit_key(explicit)
        .declared_key
}
