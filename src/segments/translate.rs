//! Remap the first segment through a keyword table

use crate::segments::keyword_eq;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered keyword table with case-insensitive lookup
///
/// Entries keep their declaration order (TOML document order when deserialized),
/// and the first key matching a lookup wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
  entries: Vec<(String, String)>,
}

impl TranslationTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an entry (builder style)
  pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.insert(key, value);
    self
  }

  /// Append an entry; earlier entries with an equal key keep precedence
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.entries.push((key.into(), value.into()));
  }

  /// Look up `key` ignoring case, first match wins
  pub fn lookup(&self, key: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(k, _)| keyword_eq(k, key))
      .map(|(_, v)| v.as_str())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Serialize for TranslationTable {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (k, v) in &self.entries {
      map.serialize_entry(k, v)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for TranslationTable {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct TableVisitor;

    impl<'de> Visitor<'de> for TableVisitor {
      type Value = TranslationTable;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of keyword = \"replacement\" entries")
      }

      fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = TranslationTable::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
          table.insert(key, value);
        }
        Ok(table)
      }
    }

    deserializer.deserialize_map(TableVisitor)
  }
}

/// Replace the first segment with its translation from `table`.
///
/// A match is lowercased; a miss falls back to `default` verbatim. Every other
/// segment passes through. An empty sequence is logged and returned as is.
pub fn translate(segments: &[String], table: &TranslationTable, default: &str) -> Vec<String> {
  let mut translated = segments.to_vec();

  let Some(first) = translated.first_mut() else {
    tracing::error!("cannot translate an empty segment list");
    return translated;
  };

  if table.is_empty() {
    tracing::warn!(segment = %first, "translation table is empty");
  }

  match table.lookup(first) {
    Some(value) => {
      tracing::debug!(segment = %first, translated = value, "translated first segment");
      *first = value.to_lowercase();
    }
    None => {
      tracing::info!(segment = %first, default, "no translation, using default");
      *first = default.to_string();
    }
  }

  translated
}
