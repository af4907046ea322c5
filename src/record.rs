//! Line-level schema for a post. Extra fields are ignored by serde, and every
//! field is optional so each aggregator decides what "malformed" means for it.
//! A field of the wrong shape reads as absent rather than failing the line, so
//! a bad `user` never hides a usable `content`.

use crate::error::{MalformedReason, MalformedRecord};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::borrow::Cow;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PostRecord {
    /// ISO-8601 timestamp, e.g. `2021-02-24T09:23:35+00:00`.
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<UserRef>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
}

fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(T::deserialize(value).ok())
}

pub type PostResult = Result<PostRecord, MalformedRecord>;

impl PostRecord {
    pub fn new(date: impl Into<String>, username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            content: Some(content.into()),
            user: Some(UserRef { username: Some(username.into()) }),
        }
    }

    #[inline]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref())
    }

    /// Post text, or `""` when the field is absent.
    #[inline]
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Parse one NDJSON line (1-based `line_no` for diagnostics).
/// Invalid UTF-8 surfaces as a JSON error, so it is skipped like any other bad line.
/// Escaped lone surrogates (`"\ud83d"`) decode as U+FFFD.
pub fn parse_post(line_no: u64, line: impl AsRef<[u8]>) -> PostResult {
    let line = line.as_ref();
    serde_json::from_slice(line)
        .or_else(|e| match replace_lone_surrogates(line) {
            Cow::Owned(repaired) => serde_json::from_slice(&repaired),
            Cow::Borrowed(_) => Err(e),
        })
        .map_err(|e| MalformedRecord::new(line_no, MalformedReason::Json(e)))
}

/// The UTF-16 unit of a `\uXXXX` escape starting at `at`.
fn escape_unit(line: &[u8], at: usize) -> Option<u16> {
    match line.get(at..at + 6)? {
        [b'\\', b'u', hex @ ..] if hex.iter().all(u8::is_ascii_hexdigit) => {
            u16::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()
        }
        _ => None,
    }
}

fn is_high(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Rewrite unpaired surrogate escapes to `\ufffd`. Borrows when there are none.
fn replace_lone_surrogates(line: &[u8]) -> Cow<'_, [u8]> {
    let mut out: Option<Vec<u8>> = None;
    let mut copied = 0;
    let mut i = 0;
    while i < line.len() {
        if line[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escape_unit(line, i) else {
            // `\\`, `\"` and friends
            i += 2;
            continue;
        };
        if is_high(unit) && escape_unit(line, i + 6).is_some_and(is_low) {
            i += 12;
            continue;
        }
        if !is_high(unit) && !is_low(unit) {
            i += 6;
            continue;
        }
        let buf = out.get_or_insert_with(|| Vec::with_capacity(line.len()));
        buf.extend_from_slice(&line[copied..i]);
        buf.extend_from_slice(b"\\ufffd");
        i += 6;
        copied = i;
    }
    match out {
        Some(mut buf) => {
            buf.extend_from_slice(&line[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(line),
    }
}
