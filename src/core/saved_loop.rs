use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::{LoopError, PlaybackStore};

/// A named snapshot of a loop range. Never linked back to the live range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLoop {
    pub id: String,
    pub title: String,
    pub start_time: f64, // seconds
    pub end_time: f64,   // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedLoop {
    pub fn new(title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        SavedLoop {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            start_time,
            end_time,
            created_at: Some(Utc::now()),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

/// CRUD over the store's saved loops, validating user input before it
/// reaches the store.
pub struct SavedLoopManager;

impl SavedLoopManager {
    /// Saves the current range under `title`. Whitespace around the title is
    /// dropped; a title with nothing left is rejected without touching the store.
    pub fn create<'a>(store: &'a mut PlaybackStore, title: &str) -> Result<&'a SavedLoop, LoopError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LoopError::EmptyTitle);
        }
        Ok(store.save_loop(title))
    }

    pub fn list(store: &PlaybackStore) -> &[SavedLoop] {
        store.saved_loops()
    }

    pub fn load(store: &mut PlaybackStore, id: &str) -> Result<(), LoopError> {
        let saved = store
            .saved_loops()
            .iter()
            .find(|saved| saved.id == id)
            .cloned()
            .ok_or_else(|| LoopError::NotFound(id.to_string()))?;
        store.load_loop(&saved);
        Ok(())
    }

    pub fn delete(store: &mut PlaybackStore, id: &str) -> Result<SavedLoop, LoopError> {
        store
            .delete_loop(id)
            .ok_or_else(|| LoopError::NotFound(id.to_string()))
    }
}
