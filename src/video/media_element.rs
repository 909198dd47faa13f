// =============================================================================
// MEDIA ELEMENT - THE PLAYBACK BOUNDARY
// =============================================================================
//
// The media element is the only thing that knows where playback actually is.
// It takes commands (load, play, pause, seek, rate) and reports what happened
// through events drained once per frame. Only the MediaDriver talks to it.
//
// =============================================================================

use std::time::{Duration, Instant};
use crate::core::MediaSource;
use crate::video::AsyncVideoInfoLoader;

/// Events reported by a media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved (seconds)
    PositionUpdated(f64),
    /// Metadata is known; fires once per load with the total duration
    MetadataReady(f64),
    /// Playback reached the end of the media
    Ended,
    /// A play request was honoured
    PlayStarted,
    /// A play request was refused by the element
    PlayRejected(String),
    /// Loading failed; terminal for this load
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaElementState {
    Unloaded,
    Loading,
    Ready,
    Playing,
    Paused,
    Error(String),
}

impl MediaElementState {
    pub fn can_play(&self) -> bool {
        matches!(
            self,
            MediaElementState::Ready | MediaElementState::Paused | MediaElementState::Playing
        )
    }

    pub fn can_pause(&self) -> bool {
        matches!(self, MediaElementState::Playing)
    }

    pub fn can_seek(&self) -> bool {
        matches!(
            self,
            MediaElementState::Ready | MediaElementState::Playing | MediaElementState::Paused
        )
    }

    pub fn display_text(&self) -> &str {
        match self {
            MediaElementState::Unloaded => "No media loaded",
            MediaElementState::Loading => "Loading media...",
            MediaElementState::Ready => "Ready",
            MediaElementState::Playing => "Playing",
            MediaElementState::Paused => "Paused",
            MediaElementState::Error(msg) => msg,
        }
    }
}

/// Command surface of a playable media element.
///
/// `play` is asynchronous: its outcome arrives later as `PlayStarted` or
/// `PlayRejected` from `poll_events`.
pub trait MediaElement {
    fn load(&mut self, source: MediaSource);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);
    fn set_playback_rate(&mut self, rate: f64);
    fn position(&self) -> f64;
    fn duration(&self) -> f64;
    fn state(&self) -> &MediaElementState;
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

// =============================================================================
// CLOCK ELEMENT
// =============================================================================

/// Media element driven by a presentation clock. Metadata comes from ffprobe;
/// the stream itself is never decoded, so position advances with wall time
/// scaled by the playback rate.
pub struct ClockElement {
    state: MediaElementState,
    position: f64,
    duration: f64,
    playback_rate: f64,
    last_tick: Option<Instant>,
    pending: Vec<MediaEvent>,
    info_loader: AsyncVideoInfoLoader,
    load_id: u64,
}

impl ClockElement {
    pub fn new() -> Self {
        Self {
            state: MediaElementState::Unloaded,
            position: 0.0,
            duration: 0.0,
            playback_rate: 1.0,
            last_tick: None,
            pending: Vec::new(),
            info_loader: AsyncVideoInfoLoader::new(),
            load_id: 0,
        }
    }

    /// Moves the clock forward by `elapsed` wall time and reports the new
    /// position, or the end of the media.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.state != MediaElementState::Playing {
            return;
        }

        self.position += elapsed.as_secs_f64() * self.playback_rate;
        if self.position >= self.duration {
            self.position = self.duration;
            self.state = MediaElementState::Paused;
            self.last_tick = None;
            self.pending.push(MediaEvent::PositionUpdated(self.position));
            self.pending.push(MediaEvent::Ended);
            log::debug!("Clock element reached the end at {:.2}s", self.position);
        } else {
            self.pending.push(MediaEvent::PositionUpdated(self.position));
        }
    }

    fn tick(&mut self) {
        if let Some(last) = self.last_tick {
            let now = Instant::now();
            self.last_tick = Some(now);
            self.advance(now.duration_since(last));
        }
    }

    fn process_probe_results(&mut self) {
        for result in self.info_loader.completed() {
            if result.request_id != self.load_id {
                log::debug!("Ignoring stale probe result for {}", result.source);
                continue;
            }

            match result.result {
                Ok(duration) => {
                    log::info!("Media ready: {} ({:.2}s)", result.source, duration);
                    self.duration = duration;
                    self.position = 0.0;
                    self.state = MediaElementState::Ready;
                    self.pending.push(MediaEvent::MetadataReady(duration));
                }
                Err(msg) => {
                    log::error!("Failed to load {}: {}", result.source, msg);
                    self.state = MediaElementState::Error(msg.clone());
                    self.pending.push(MediaEvent::LoadFailed(msg));
                }
            }
        }
    }

    /// Resets the element for a new source and returns the id its probe
    /// result must carry.
    fn begin_load(&mut self, source: &MediaSource) -> u64 {
        self.load_id += 1;
        log::info!("Loading {} (load {})", source, self.load_id);

        self.state = MediaElementState::Loading;
        self.position = 0.0;
        self.duration = 0.0;
        self.last_tick = None;
        self.pending.clear();
        self.load_id
    }

    #[cfg(test)]
    pub(crate) fn ready_with_duration(duration: f64) -> Self {
        let mut element = Self::new();
        element.duration = duration;
        element.state = MediaElementState::Ready;
        element
    }
}

impl Default for ClockElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for ClockElement {
    fn load(&mut self, source: MediaSource) {
        let load_id = self.begin_load(&source);
        self.info_loader.request(source, load_id);
    }

    fn play(&mut self) {
        if !self.state.can_play() {
            let reason = format!("cannot play while {}", self.state.display_text().to_lowercase());
            log::debug!("Clock element rejected play: {}", reason);
            self.pending.push(MediaEvent::PlayRejected(reason));
            return;
        }

        if self.state != MediaElementState::Playing {
            if self.position >= self.duration {
                self.position = 0.0;
            }
            self.state = MediaElementState::Playing;
            self.last_tick = Some(Instant::now());
        }
        self.pending.push(MediaEvent::PlayStarted);
    }

    fn pause(&mut self) {
        if !self.state.can_pause() {
            return;
        }
        self.tick();
        // The tick may have reached the end and paused already
        if self.state == MediaElementState::Playing {
            self.state = MediaElementState::Paused;
        }
        self.last_tick = None;
    }

    fn seek(&mut self, position: f64) {
        if !self.state.can_seek() {
            log::debug!("Ignoring seek to {:.2}s in state {:?}", position, self.state);
            return;
        }

        let clamped = if position.is_finite() {
            position.clamp(0.0, self.duration)
        } else {
            0.0
        };
        self.position = clamped;
        if self.last_tick.is_some() {
            self.last_tick = Some(Instant::now());
        }
        self.pending.push(MediaEvent::PositionUpdated(clamped));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        // Bank the time played at the old rate first
        self.tick();
        self.playback_rate = rate;
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn state(&self) -> &MediaElementState {
        &self.state
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        self.process_probe_results();
        self.tick();
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::VideoInfoResult;
    use std::path::PathBuf;

    #[test]
    fn test_media_element_state_transitions() {
        let element = ClockElement::new();

        assert_eq!(element.state(), &MediaElementState::Unloaded);
        assert!(!element.state().can_play());
        assert!(!element.state().can_pause());
        assert!(!element.state().can_seek());
    }

    #[test]
    fn test_play_before_ready_is_rejected() {
        let mut element = ClockElement::new();
        element.play();

        let events = element.poll_events();
        assert!(matches!(events.as_slice(), [MediaEvent::PlayRejected(_)]));
        assert_eq!(element.state(), &MediaElementState::Unloaded);
    }

    #[test]
    fn test_probe_result_makes_element_ready() {
        let mut element = ClockElement::new();
        let source = MediaSource::File(PathBuf::from("clip.mp4"));
        let load_id = element.begin_load(&source);
        assert_eq!(element.state(), &MediaElementState::Loading);

        element.info_loader.inject(VideoInfoResult {
            request_id: load_id,
            source,
            result: Ok(42.0),
        });

        let events = element.poll_events();
        assert!(events.contains(&MediaEvent::MetadataReady(42.0)));
        assert_eq!(element.state(), &MediaElementState::Ready);
        assert_eq!(element.duration(), 42.0);
    }

    #[test]
    fn test_stale_probe_results_are_ignored() {
        let mut element = ClockElement::new();
        let source = MediaSource::Url("https://example.com/a.mp4".to_string());
        let stale_id = element.begin_load(&source);
        element.begin_load(&source);

        element.info_loader.inject(VideoInfoResult {
            request_id: stale_id,
            source,
            result: Ok(10.0),
        });

        let events: Vec<MediaEvent> = element
            .poll_events()
            .into_iter()
            .filter(|e| matches!(e, MediaEvent::MetadataReady(_)))
            .collect();
        assert!(events.is_empty());
        assert_eq!(element.state(), &MediaElementState::Loading);
    }

    #[test]
    fn test_failed_probe_is_terminal() {
        let mut element = ClockElement::new();
        let source = MediaSource::Url("https://example.com/broken".to_string());
        let load_id = element.begin_load(&source);
        element.info_loader.inject(VideoInfoResult {
            request_id: load_id,
            source,
            result: Err("unsupported".to_string()),
        });

        let events = element.poll_events();
        assert!(events.contains(&MediaEvent::LoadFailed("unsupported".to_string())));
        assert_eq!(element.state().display_text(), "unsupported");
        assert!(!element.state().can_play());
    }

    #[test]
    fn test_clock_advances_at_playback_rate() {
        let mut element = ClockElement::ready_with_duration(100.0);
        element.set_playback_rate(2.0);
        element.play();
        assert_eq!(element.pending, vec![MediaEvent::PlayStarted]);
        element.pending.clear();

        element.advance(Duration::from_secs(3));
        assert_eq!(element.position(), 6.0);
        assert!(element.pending.contains(&MediaEvent::PositionUpdated(6.0)));
    }

    #[test]
    fn test_reaching_the_end_pauses_and_reports() {
        let mut element = ClockElement::ready_with_duration(10.0);
        element.seek(9.0);
        element.play();
        element.pending.clear();

        element.advance(Duration::from_secs(5));
        assert_eq!(element.position(), 10.0);
        assert_eq!(element.state(), &MediaElementState::Paused);
        assert_eq!(
            element.pending,
            vec![MediaEvent::PositionUpdated(10.0), MediaEvent::Ended]
        );
    }

    #[test]
    fn test_seek_is_clamped_to_media() {
        let mut element = ClockElement::ready_with_duration(30.0);
        element.seek(45.0);
        assert_eq!(element.position(), 30.0);
        element.seek(-3.0);
        assert_eq!(element.position(), 0.0);
        element.seek(f64::NAN);
        assert_eq!(element.position(), 0.0);
    }

    #[test]
    fn test_seek_reports_landed_position() {
        let mut element = ClockElement::ready_with_duration(30.0);
        element.seek(12.0);
        element.seek(45.0);

        assert_eq!(
            element.poll_events(),
            vec![MediaEvent::PositionUpdated(12.0), MediaEvent::PositionUpdated(30.0)]
        );
    }

    #[test]
    fn test_paused_clock_does_not_move() {
        let mut element = ClockElement::ready_with_duration(30.0);
        element.play();
        element.pause();
        element.pending.clear();

        element.advance(Duration::from_secs(5));
        assert!(element.pending.is_empty());
        assert_eq!(element.state(), &MediaElementState::Paused);
    }
}
