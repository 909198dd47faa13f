use std::path::PathBuf;
use crate::core::{PersistedState, SavedLoop};

/// Playback speeds offered by the transport controls.
pub const PLAYBACK_SPEEDS: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Single source of truth for transport state, the active range and the
/// saved loops. Owned by the app and handed by reference to every component.
///
/// The store accepts every value it is given. Range ordering, minimum loop
/// length and title validation are enforced by the callers (timeline,
/// saved-loop manager). The only adjustment made here is clamping the end of
/// the range to the known duration.
///
/// Mutations of the persisted subset are written through to the backing
/// file when one is configured.
#[derive(Debug)]
pub struct PlaybackStore {
    is_playing: bool,
    is_looping: bool,
    is_audio_only: bool,
    is_snapping_enabled: bool,
    current_time: f64,
    duration: f64,
    start_time: f64,
    end_time: f64,
    playback_speed: f64,
    saved_loops: Vec<SavedLoop>,

    storage_path: Option<PathBuf>,
    last_persisted: PersistedState,
}

impl PlaybackStore {
    pub fn new(persisted: PersistedState, storage_path: Option<PathBuf>) -> Self {
        Self {
            is_playing: false,
            is_looping: persisted.is_looping,
            is_audio_only: persisted.is_audio_only,
            is_snapping_enabled: persisted.is_snapping_enabled,
            current_time: 0.0,
            duration: 0.0,
            start_time: persisted.start_time,
            end_time: persisted.end_time,
            playback_speed: persisted.playback_speed,
            saved_loops: persisted.saved_loops.clone(),
            storage_path,
            last_persisted: persisted,
        }
    }

    /// Restores the store from the record at `path` and keeps writing back to it.
    pub fn open(path: PathBuf) -> Self {
        let persisted = PersistedState::load(&path);
        Self::new(persisted, Some(path))
    }

    /// A store with default state and no backing file.
    pub fn in_memory() -> Self {
        Self::new(PersistedState::default(), None)
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_audio_only(&self) -> bool {
        self.is_audio_only
    }

    pub fn is_snapping_enabled(&self) -> bool {
        self.is_snapping_enabled
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    pub fn saved_loops(&self) -> &[SavedLoop] {
        &self.saved_loops
    }

    /// True when the active range spans a non-empty interval.
    pub fn has_range(&self) -> bool {
        self.end_time > self.start_time
    }

    // -------------------------------------------------------------------------
    // Plain setters
    // -------------------------------------------------------------------------

    pub fn set_is_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn set_is_looping(&mut self, looping: bool) {
        self.is_looping = looping;
        self.persist();
    }

    pub fn set_is_audio_only(&mut self, audio_only: bool) {
        self.is_audio_only = audio_only;
        self.persist();
    }

    pub fn set_is_snapping_enabled(&mut self, enabled: bool) {
        self.is_snapping_enabled = enabled;
        self.persist();
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    pub fn set_playback_speed(&mut self, speed: f64) {
        self.playback_speed = speed;
        self.persist();
    }

    // -------------------------------------------------------------------------
    // Compound mutators
    // -------------------------------------------------------------------------

    /// Records the media duration. The end of the range only follows the new
    /// duration when it was never set (0) or no longer fits.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        if self.end_time == 0.0 || self.end_time > duration {
            self.end_time = duration;
        }
        self.persist();
    }

    /// Sets the active range as given, clamping only the end to the duration.
    pub fn set_time_range(&mut self, start: f64, end: f64) {
        self.start_time = start;
        self.end_time = end.min(self.duration);
        self.persist();
    }

    /// Appends a snapshot of the active range. The title is stored verbatim.
    pub fn save_loop(&mut self, title: &str) -> &SavedLoop {
        let saved = SavedLoop::new(title, self.start_time, self.end_time);
        log::info!(
            "Saved loop '{}' ({:.2}s - {:.2}s)",
            saved.title,
            saved.start_time,
            saved.end_time
        );
        self.saved_loops.push(saved);
        self.persist();
        &self.saved_loops[self.saved_loops.len() - 1]
    }

    /// Removes the loop with `id`. Unknown ids leave the list untouched.
    pub fn delete_loop(&mut self, id: &str) -> Option<SavedLoop> {
        let index = self.saved_loops.iter().position(|saved| saved.id == id)?;
        let removed = self.saved_loops.remove(index);
        log::info!("Deleted loop '{}'", removed.title);
        self.persist();
        Some(removed)
    }

    /// Copies the loop's bounds into the active range, jumps to its start and
    /// turns looping on.
    pub fn load_loop(&mut self, saved: &SavedLoop) {
        self.start_time = saved.start_time;
        self.end_time = saved.end_time.min(self.duration);
        self.current_time = saved.start_time;
        self.is_looping = true;
        log::info!("Loaded loop '{}'", saved.title);
        self.persist();
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            saved_loops: self.saved_loops.clone(),
            is_looping: self.is_looping,
            start_time: self.start_time,
            end_time: self.end_time,
            is_audio_only: self.is_audio_only,
            is_snapping_enabled: self.is_snapping_enabled,
            playback_speed: self.playback_speed,
        }
    }

    fn persist(&mut self) {
        let snapshot = self.persisted();
        if snapshot == self.last_persisted {
            return;
        }

        if let Some(path) = &self.storage_path {
            match snapshot.save(path) {
                Ok(()) => log::debug!("Persisted state to {}", path.display()),
                Err(e) => log::error!("Failed to persist state to {}: {}", path.display(), e),
            }
        }
        self.last_persisted = snapshot;
    }
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
