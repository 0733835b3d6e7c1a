//! Draft store: the field values of one in-progress post.
//!
//! A draft lives in memory while it is edited and is written to the
//! key-value store only on an explicit save (a Save Draft action or a forward
//! step). Saved drafts are stored as JSON:
//!
//! ```text
//! { "fields": { "title": "Lamp", ... }, "savedAt": "2026-10-16T09:12:44Z" }
//! ```

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    model::Fields,
    storage::{self, KeyValueStore},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedDraft {
    fields: Fields,
    saved_at: Timestamp,
}

/// The in-memory field mapping for one draft key.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftStore {
    key: String,
    fields: Fields,
}

impl DraftStore {
    /// An empty draft that has never been saved.
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: Fields::new(),
        }
    }

    /// A draft with the given in-memory fields, saved or not.
    pub fn with_fields(key: impl Into<String>, fields: Fields) -> Self {
        Self {
            key: key.into(),
            fields,
        }
    }

    /// Loads the last saved mapping for `key`, or starts empty.
    pub fn restore(store: &dyn KeyValueStore, key: &str) -> storage::Result<Self> {
        let draft = match storage::load_json::<SavedDraft>(store, key)? {
            Some(saved) => Self::with_fields(key, saved.fields),
            None => Self::empty(key),
        };
        tracing::debug!(draft = key, fields = draft.fields.len(), "draft restored");
        Ok(draft)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Shallow-merges `partial` into the draft. Last write wins; list values
    /// are replaced whole.
    pub fn update_data(&mut self, partial: Fields) {
        self.fields.extend(partial);
    }

    /// Writes the full mapping under the draft's key.
    ///
    /// Returns a human-readable save time. On failure the in-memory mapping is
    /// untouched and the error is returned to the caller.
    pub fn save_draft(&self, store: &dyn KeyValueStore) -> storage::Result<String> {
        let saved_at = Timestamp::now();
        let saved = SavedDraft {
            fields: self.fields.clone(),
            saved_at,
        };
        storage::save_json(store, &self.key, &saved)?;
        tracing::info!(draft = %self.key, fields = self.fields.len(), "draft saved");
        Ok(format_saved_at(saved_at))
    }

    /// Clears the draft in memory and removes the saved copy.
    pub fn discard(&mut self, store: &dyn KeyValueStore) -> storage::Result<()> {
        store.remove(&self.key)?;
        self.fields.clear();
        tracing::debug!(draft = %self.key, "draft discarded");
        Ok(())
    }
}

fn format_saved_at(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M:%S UTC").to_string()
}
