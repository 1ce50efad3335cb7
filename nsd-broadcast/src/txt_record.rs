//! TXT record key/value metadata for service advertisements

use std::collections::HashMap;
use std::ops::Index;

use crate::{Result, error::Error};

/// String key/value metadata attached to a service advertisement.
///
/// Keys follow the DNS-SD TXT rules: non-empty, ASCII, and free of `=`.
/// Values are arbitrary UTF-8 strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtRecord {
    entries: HashMap<String, String>,
}

impl TxtRecord {
    /// Constructs a new, empty `TxtRecord`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the specified value at the specified key.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<()> {
        check_valid_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Returns the value at the specified key or `None` if no such key exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|value| value.as_str())
    }

    /// Removes the value at the specified key, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Returns true if the `TxtRecord` contains the specified key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the amount of entries in the `TxtRecord`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries in the record.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a new iterator for iterating over the record as you would a `HashMap`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns a new iterator over the record's keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(|key| key.as_str())
    }

    /// Returns a new iterator over the record's values.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.values().map(|value| value.as_str())
    }
}

fn check_valid_key(key: &str) -> Result<()> {
    if key.is_empty() {
        Err(Error::InvalidTxtRecord("key cannot be empty".to_string()))
    } else if key.contains('=') {
        Err(Error::InvalidTxtRecord(format!(
            "key cannot contain `=`: `{key}`"
        )))
    } else if !key.is_ascii() {
        Err(Error::InvalidTxtRecord(format!("key must be ASCII: `{key}`")))
    } else {
        Ok(())
    }
}

impl Index<&str> for TxtRecord {
    type Output = str;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap()
    }
}

impl From<HashMap<String, String>> for TxtRecord {
    fn from(entries: HashMap<String, String>) -> TxtRecord {
        TxtRecord { entries }
    }
}

impl From<HashMap<&str, &str>> for TxtRecord {
    fn from(map: HashMap<&str, &str>) -> TxtRecord {
        map.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<String, String>>()
            .into()
    }
}
