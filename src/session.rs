//! The signed-in user and their liked items.
//!
//! Kept under the `session` key of the key-value store and passed explicitly
//! to whatever needs it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::storage::{self, KeyValueStore};

const SESSION_KEY: &str = "session";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default)]
    liked: BTreeSet<String>,
}

pub struct Session<'a> {
    store: &'a dyn KeyValueStore,
    data: SessionData,
}

impl<'a> Session<'a> {
    /// Loads the stored session, or an anonymous one.
    pub fn load(store: &'a dyn KeyValueStore) -> storage::Result<Self> {
        let data = storage::load_json(store, SESSION_KEY)?.unwrap_or_default();
        Ok(Self { store, data })
    }

    /// Email of the signed-in user.
    pub fn user(&self) -> Option<&str> {
        self.data.user.as_deref()
    }

    pub fn login(&mut self, email: &str) -> storage::Result<()> {
        self.data.user = Some(email.trim().to_lowercase());
        self.save()?;
        tracing::info!(user = email, "logged in");
        Ok(())
    }

    pub fn logout(&mut self) -> storage::Result<()> {
        self.data.user = None;
        self.save()
    }

    /// Likes an item. Returns `false` if it was already liked.
    pub fn like(&mut self, item: &str) -> storage::Result<bool> {
        let added = self.data.liked.insert(item.to_string());
        if added {
            self.save()?;
        }
        Ok(added)
    }

    /// Removes a like. Returns `false` if the item wasn't liked.
    pub fn unlike(&mut self, item: &str) -> storage::Result<bool> {
        let removed = self.data.liked.remove(item);
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Liked item ids, sorted.
    pub fn liked(&self) -> impl Iterator<Item = &str> {
        self.data.liked.iter().map(String::as_str)
    }

    fn save(&self) -> storage::Result<()> {
        storage::save_json(self.store, SESSION_KEY, &self.data)
    }
}
