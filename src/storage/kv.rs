//! Durable key-value strings: the stand-in for browser local storage.
//!
//! Drafts, wizard state and the session all go through [`KeyValueStore`]
//! rather than touching tables directly, so they can be exercised against
//! any backing store.

use rusqlite::OptionalExtension;
use serde::{Serialize, de::DeserializeOwned};

use super::{Result, Storage, StorageError};

/// A string-to-string store with no TTL and no encryption.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Idempotent.
    fn remove(&self, key: &str) -> Result<()>;
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// Loads and decodes a JSON value stored under `key`.
///
/// A value that no longer decodes is reported as [`StorageError::Corrupt`].
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Corrupt(format!("{key}: {e}")))
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    #[test]
    fn get_missing_key_is_none() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let storage = Storage::in_memory().unwrap();

        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn remove_is_idempotent() {
        let storage = Storage::in_memory().unwrap();

        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();

        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn json_round_trip() {
        let storage = Storage::in_memory().unwrap();
        let value = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);

        save_json(&storage, "map", &value).unwrap();
        let loaded: Option<BTreeMap<String, i32>> = load_json(&storage, "map").unwrap();

        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn undecodable_json_is_corrupt() {
        let storage = Storage::in_memory().unwrap();
        storage.set("map", "{not json").unwrap();

        let err = load_json::<BTreeMap<String, i32>>(&storage, "map").unwrap_err();

        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
