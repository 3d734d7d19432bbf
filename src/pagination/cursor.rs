//! Opaque page cursors
//!
//! A cursor is whatever the backend handed back as `next_page_params`, plus
//! the `page_number` the frontend adds for itself. Only `page_number` is
//! ever interpreted here.

use crate::types::{JsonValue, NETWORK_KEY, PAGE_NUMBER_KEY};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Effective page number for a raw `page_number` value
///
/// Absent, non-numeric and sub-1 values all mean page 1. Decimals such as
/// `"2.0"` count as the page they round down to, and values past `u64::MAX`
/// saturate.
pub fn parse_page_number(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return 1;
    };
    if let Ok(n) = raw.parse::<u64>() {
        return n.max(1);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map_or(1, |n| n.floor() as u64)
}

/// Ordered string-to-string mapping identifying a slice of a collection
///
/// Keys keep their first-insertion order so a cursor is sent back to the
/// backend exactly as it was received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pairs: Vec<(String, String)>,
}

impl Cursor {
    /// Create an empty cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cursor from key/value pairs; later duplicates replace earlier ones
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut cursor = Self::new();
        for (key, value) in pairs {
            cursor.insert(key, value);
        }
        cursor
    }

    /// Parse a URL query string (`a=1&b=2`, leading `?` optional)
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value, keeping the key's original position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Effective page number carried by this cursor
    pub fn page_number(&self) -> u64 {
        parse_page_number(self.get(PAGE_NUMBER_KEY))
    }

    /// Copy of this cursor with `page_number` set
    #[must_use]
    pub fn with_page_number(&self, page_number: u64) -> Self {
        let mut cursor = self.clone();
        cursor.insert(PAGE_NUMBER_KEY, page_number.to_string());
        cursor
    }

    /// Copy of this cursor without the keys that are not backend cursor fields
    #[must_use]
    pub fn without_network(&self) -> Self {
        let mut cursor = self.clone();
        cursor.remove(NETWORK_KEY);
        cursor
    }

    /// Iterate over key/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the cursor has no keys
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize as a form-urlencoded query string (no leading `?`)
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Cursor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (key, value) in &self.pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CursorVisitor)
    }
}

struct CursorVisitor;

impl<'de> Visitor<'de> for CursorVisitor {
    type Value = Cursor;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of cursor fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut cursor = Cursor::new();
        while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
            // Backends mix numbers, strings and nulls in the same params object
            match value {
                JsonValue::Null => {}
                JsonValue::String(s) => cursor.insert(key, s),
                other => cursor.insert(key, other.to_string()),
            }
        }
        Ok(cursor)
    }
}
