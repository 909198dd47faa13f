use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use crate::core::{SavedLoop, PLAYBACK_SPEEDS};

/// Name of the single persisted record.
pub const PERSISTED_RECORD_NAME: &str = "video-loops";

/// The durable subset of the playback state. Transient fields (play state,
/// position, duration) are never written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub saved_loops: Vec<SavedLoop>,
    pub is_looping: bool,
    pub start_time: f64,
    pub end_time: f64,
    pub is_audio_only: bool,
    pub is_snapping_enabled: bool,
    pub playback_speed: f64,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            saved_loops: Vec::new(),
            is_looping: false,
            start_time: 0.0,
            end_time: 0.0,
            is_audio_only: false,
            is_snapping_enabled: true,
            playback_speed: 1.0,
        }
    }
}

impl PersistedState {
    /// Loads the record at `path`. Never fails: a missing, unreadable or
    /// corrupt file yields defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No persisted state at {}, starting with defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => {
                let state = Self::from_json(&content);
                log::info!(
                    "Loaded persisted state from {} ({} saved loops)",
                    path.display(),
                    state.saved_loops.len()
                );
                state
            }
            Err(e) => {
                log::warn!("Failed to read persisted state at {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses a persisted record field by field. Each missing or mistyped
    /// field falls back to its own default instead of discarding the record.
    pub fn from_json(content: &str) -> Self {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Persisted state is not valid JSON ({}), using defaults", e);
                return Self::default();
            }
        };

        // Records written by the web version wrap the fields in {"state": ..., "version": ..}
        let fields = match value.get("state") {
            Some(inner) if inner.is_object() && value.get("savedLoops").is_none() => inner,
            _ => &value,
        };

        if !fields.is_object() {
            log::warn!("Persisted state is not an object, using defaults");
            return Self::default();
        }

        let defaults = Self::default();
        let state = Self {
            saved_loops: parse_saved_loops(fields.get("savedLoops")),
            is_looping: field_or(fields, "isLooping", defaults.is_looping),
            start_time: field_or(fields, "startTime", defaults.start_time),
            end_time: field_or(fields, "endTime", defaults.end_time),
            is_audio_only: field_or(fields, "isAudioOnly", defaults.is_audio_only),
            is_snapping_enabled: field_or(fields, "isSnappingEnabled", defaults.is_snapping_enabled),
            playback_speed: field_or(fields, "playbackSpeed", defaults.playback_speed),
        };

        state.sanitized()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("video-looper")
            .join(format!("{}.json", PERSISTED_RECORD_NAME))
    }

    fn sanitized(mut self) -> Self {
        if !PLAYBACK_SPEEDS.contains(&self.playback_speed) {
            log::warn!("Persisted playback speed {} is not supported, using 1x", self.playback_speed);
            self.playback_speed = 1.0;
        }

        let range_is_valid = self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time >= self.start_time;
        if !range_is_valid {
            log::warn!(
                "Persisted range {}..{} is invalid, resetting",
                self.start_time,
                self.end_time
            );
            self.start_time = 0.0;
            self.end_time = 0.0;
        }

        self
    }
}

fn field_or<T: DeserializeOwned>(fields: &Value, name: &str, fallback: T) -> T {
    match fields.get(name) {
        None | Some(Value::Null) => fallback,
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed `{}` in persisted state ({}), using default", name, e);
            fallback
        }),
    }
}

fn parse_saved_loops(raw: Option<&Value>) -> Vec<SavedLoop> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<SavedLoop>(entry.clone()) {
            Ok(saved) if !saved.title.trim().is_empty() => Some(saved),
            Ok(saved) => {
                log::warn!("Dropping saved loop {} with an empty title", saved.id);
                None
            }
            Err(e) => {
                log::warn!("Dropping malformed saved loop entry: {}", e);
                None
            }
        })
        .collect()
}
