use crate::core::{MediaSource, PlaybackStore};
use crate::video::{MediaElement, MediaEvent};

/// Translates store intent into media element commands, and media element
/// events back into store updates.
///
/// The driver remembers what it last told the element and what the element
/// last told it, so store writes it made itself are never turned back into
/// commands.
pub struct MediaDriver<E: MediaElement> {
    element: E,
    applied_playing: bool,
    applied_speed: Option<f64>,
    known_position: f64,
}

impl<E: MediaElement> MediaDriver<E> {
    pub fn new(element: E) -> Self {
        Self {
            element,
            applied_playing: false,
            applied_speed: None,
            known_position: 0.0,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    /// Starts loading a new source. Playback stops until the new media is ready.
    pub fn load(&mut self, source: MediaSource, store: &mut PlaybackStore) {
        store.set_is_playing(false);
        self.applied_playing = false;
        self.known_position = store.current_time();
        self.element.load(source);
    }

    /// Drains element events into the store, then pushes store changes to the
    /// element. Call once per frame.
    pub fn pump(&mut self, store: &mut PlaybackStore) {
        for event in self.element.poll_events() {
            self.handle_event(event, store);
        }
        self.sync(store);
    }

    pub fn handle_event(&mut self, event: MediaEvent, store: &mut PlaybackStore) {
        match event {
            MediaEvent::PositionUpdated(position) => {
                if store.is_looping() && store.has_range() && position >= store.end_time() {
                    self.repeat_loop(store);
                } else {
                    store.set_current_time(position);
                    self.known_position = position;
                }
            }
            MediaEvent::MetadataReady(duration) => {
                log::info!("Metadata loaded, duration {:.2}s", duration);
                store.set_duration(duration);
                if !store.is_looping() {
                    store.set_time_range(0.0, duration);
                }
                // Resume wherever the store already is
                self.element.seek(store.current_time());
                self.known_position = store.current_time();
            }
            MediaEvent::Ended => {
                if store.is_looping() && store.has_range() && store.is_playing() {
                    self.repeat_loop(store);
                    self.element.play();
                } else {
                    log::debug!("Playback reached the end of the media");
                    store.set_is_playing(false);
                    self.applied_playing = false;
                }
            }
            MediaEvent::PlayStarted => {
                // The user may have paused while the request was in flight
                if !store.is_playing() {
                    log::debug!("Play completed after pause was requested, pausing again");
                    self.element.pause();
                }
            }
            MediaEvent::PlayRejected(reason) => {
                log::warn!("Playback failed: {}", reason);
                store.set_is_playing(false);
                self.applied_playing = false;
            }
            MediaEvent::LoadFailed(reason) => {
                log::warn!("Media could not be loaded: {}", reason);
                store.set_is_playing(false);
                self.applied_playing = false;
            }
        }
    }

    /// Pushes transport changes made by other components to the element.
    pub fn sync(&mut self, store: &mut PlaybackStore) {
        let speed = store.playback_speed();
        if self.applied_speed != Some(speed) {
            log::debug!("Applying playback rate {}x", speed);
            self.element.set_playback_rate(speed);
            self.applied_speed = Some(speed);
        }

        let position_changed = store.current_time() != self.known_position;

        if store.is_playing() != self.applied_playing {
            self.applied_playing = store.is_playing();
            if store.is_playing() {
                log::info!("Play from {:.2}s", store.current_time());
                self.element.seek(store.current_time());
                self.element.play();
            } else {
                log::info!("Pause at {:.2}s", store.current_time());
                self.element.pause();
                if position_changed {
                    self.element.seek(store.current_time());
                }
            }
            self.known_position = store.current_time();
        } else if position_changed {
            log::debug!("Seek to {:.2}s", store.current_time());
            self.element.seek(store.current_time());
            self.known_position = store.current_time();
        }
    }

    fn repeat_loop(&mut self, store: &mut PlaybackStore) {
        let start = store.start_time();
        log::debug!("Loop end {:.2}s reached, jumping back to {:.2}s", store.end_time(), start);
        self.element.seek(start);
        store.set_current_time(start);
        self.known_position = start;
    }
}
