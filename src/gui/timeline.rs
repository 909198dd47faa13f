use eframe::egui;
use crate::core::PlaybackStore;
use crate::video::WaveformData;

/// Range handles snap to the playhead when dragged within this distance.
pub const SNAP_THRESHOLD_SECONDS: f64 = 1.0;
/// Shortest loop the range handles can produce.
pub const MIN_LOOP_LENGTH: f64 = 0.5;

const TIMELINE_HEIGHT: f32 = 96.0;
const HANDLE_WIDTH: f32 = 8.0;
const PLAYHEAD_GRAB_WIDTH: f32 = 12.0;
const TICK_COUNT: usize = 10;

const RANGE_COLOR: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const RANGE_ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);
const SNAP_COLOR: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
const PLAYHEAD_COLOR: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(75, 85, 99);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Start,
    End,
    Playhead,
}

/// Horizontal extent of the track in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f32,
    pub width: f32,
}

impl TrackGeometry {
    pub fn time_at(&self, pointer_x: f32, duration: f64) -> f64 {
        if self.width <= 0.0 || duration <= 0.0 {
            return 0.0;
        }
        let width = self.width as f64;
        let offset = ((pointer_x - self.left) as f64).clamp(0.0, width);
        offset * duration / width
    }

    pub fn x_at(&self, time: f64, duration: f64) -> f32 {
        if duration <= 0.0 {
            return self.left;
        }
        self.left + (time / duration).clamp(0.0, 1.0) as f32 * self.width
    }
}

/// Pointer input as seen by the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineEvent {
    /// Primary button pressed on the track
    PointerDown { x: f32 },
    /// Pointer moved, anywhere on screen while dragging
    PointerMove { x: f32, over_track: bool },
    /// Primary button released anywhere
    PointerUp,
    /// Press and release on the track without dragging
    Click { x: f32 },
    /// Pointer left the track
    PointerLeave,
}

/// Drag, snap and hover state of the timeline. Everything persistent goes
/// through the store; only gesture state lives here.
#[derive(Debug, Default)]
pub struct TimelineEngine {
    drag: Option<DragTarget>,
    hovered_time: Option<f64>,
    snap_indicator: Option<DragTarget>,
    last_x: Option<f32>,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> Option<DragTarget> {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn hovered_time(&self) -> Option<f64> {
        self.hovered_time
    }

    pub fn snap_indicator(&self) -> Option<DragTarget> {
        self.snap_indicator
    }

    pub fn handle(&mut self, event: TimelineEvent, track: &TrackGeometry, store: &mut PlaybackStore) {
        match event {
            TimelineEvent::PointerDown { x } => {
                if let Some(target) = self.hit_test(x, track, store) {
                    self.begin_drag(target);
                    self.last_x = Some(x);
                }
            }
            TimelineEvent::PointerMove { x, over_track } => match self.drag {
                // A session only reacts to actual movement
                Some(_) if self.last_x == Some(x) => {}
                Some(target) => {
                    self.last_x = Some(x);
                    self.drag_to(target, x, track, store);
                }
                None if over_track => self.hovered_time = Some(track.time_at(x, store.duration())),
                None => self.hovered_time = None,
            },
            TimelineEvent::PointerUp => self.end_drag(),
            TimelineEvent::Click { x } => {
                if self.drag.is_none() && self.hit_test(x, track, store).is_none() {
                    let time = track.time_at(x, store.duration());
                    log::debug!("Timeline click at {:.2}s", time);
                    store.set_current_time(time);
                }
            }
            TimelineEvent::PointerLeave => self.hovered_time = None,
        }
    }

    /// Which grabbable marker sits under `x`. The range handles, which only
    /// exist while looping, win over the playhead so they stay reachable when
    /// the playhead rests on a loop bound.
    pub fn hit_test(&self, x: f32, track: &TrackGeometry, store: &PlaybackStore) -> Option<DragTarget> {
        let duration = store.duration();

        if store.is_looping() {
            let start_x = track.x_at(store.start_time(), duration);
            if x >= start_x && x <= start_x + HANDLE_WIDTH {
                return Some(DragTarget::Start);
            }
            let end_x = track.x_at(store.end_time(), duration);
            if x >= end_x - HANDLE_WIDTH && x <= end_x {
                return Some(DragTarget::End);
            }
        }

        let playhead_x = track.x_at(store.current_time(), duration);
        if (x - playhead_x).abs() <= PLAYHEAD_GRAB_WIDTH / 2.0 {
            return Some(DragTarget::Playhead);
        }

        None
    }

    pub fn begin_drag(&mut self, target: DragTarget) {
        log::debug!("Drag started on {:?}", target);
        self.drag = Some(target);
        self.hovered_time = None;
        self.last_x = None;
    }

    pub fn end_drag(&mut self) {
        if let Some(target) = self.drag.take() {
            log::debug!("Drag ended on {:?}", target);
        }
        self.snap_indicator = None;
        self.last_x = None;
    }

    fn drag_to(&mut self, target: DragTarget, x: f32, track: &TrackGeometry, store: &mut PlaybackStore) {
        let candidate = track.time_at(x, store.duration());

        match target {
            DragTarget::Start => {
                let time = self.snap(candidate, target, store);
                let end = store.end_time();
                store.set_time_range(time.min(end - MIN_LOOP_LENGTH), end);
            }
            DragTarget::End => {
                let time = self.snap(candidate, target, store);
                let start = store.start_time();
                store.set_time_range(start, time.max(start + MIN_LOOP_LENGTH));
            }
            DragTarget::Playhead => store.set_current_time(candidate),
        }
    }

    fn snap(&mut self, candidate: f64, handle: DragTarget, store: &PlaybackStore) -> f64 {
        if !store.is_snapping_enabled() {
            self.snap_indicator = None;
            return candidate;
        }

        let playhead = store.current_time();
        if (candidate - playhead).abs() <= SNAP_THRESHOLD_SECONDS {
            if self.snap_indicator != Some(handle) {
                log::debug!("{:?} handle snapped to playhead at {:.2}s", handle, playhead);
            }
            self.snap_indicator = Some(handle);
            playhead
        } else {
            self.snap_indicator = None;
            candidate
        }
    }
}

pub struct TimelineWidget {
    pub engine: TimelineEngine,
}

impl TimelineWidget {
    pub fn new() -> Self {
        Self {
            engine: TimelineEngine::new(),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &mut PlaybackStore,
        waveform: Option<&WaveformData>,
    ) -> egui::Response {
        let available_width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(
            egui::Vec2::new(available_width, TIMELINE_HEIGHT),
            egui::Sense::click_and_drag(),
        );
        let track = TrackGeometry {
            left: rect.min.x,
            width: rect.width(),
        };

        // Apply input before painting so this frame shows the result
        for event in self.collect_events(ui, &response, rect) {
            self.engine.handle(event, &track, store);
        }

        if self.engine.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        } else if let Some(pos) = response.hover_pos() {
            if self.engine.hit_test(pos.x, &track, store).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            }
        }

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect, &track, store, waveform);
        }

        ui.add_space(6.0);
        self.show_readout(ui, store);

        response
    }

    fn collect_events(&self, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) -> Vec<TimelineEvent> {
        let (pressed, released, hover_pos, press_origin) = ui.ctx().input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
                i.pointer.press_origin(),
            )
        });

        let mut events = Vec::new();

        if pressed {
            if let Some(origin) = press_origin {
                if rect.contains(origin) {
                    events.push(TimelineEvent::PointerDown { x: origin.x });
                }
            }
        }

        match hover_pos {
            Some(pos) if self.engine.is_dragging() || rect.contains(pos) => {
                // The press frame only opens the session
                if !pressed {
                    events.push(TimelineEvent::PointerMove {
                        x: pos.x,
                        over_track: rect.contains(pos),
                    });
                }
            }
            _ => {
                if self.engine.hovered_time().is_some() {
                    events.push(TimelineEvent::PointerLeave);
                }
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(TimelineEvent::Click { x: pos.x });
            }
        }

        // Release ends a drag wherever the pointer is
        if released {
            events.push(TimelineEvent::PointerUp);
        }

        events
    }

    fn paint(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        track: &TrackGeometry,
        store: &PlaybackStore,
        waveform: Option<&WaveformData>,
    ) {
        let painter = ui.painter_at(rect);
        let duration = store.duration();

        painter.rect_filled(rect, egui::Rounding::same(6.0), ui.visuals().extreme_bg_color);

        if let Some(waveform) = waveform {
            let bar_width = rect.width() / waveform.peaks.len().max(1) as f32;
            let height_scale = rect.height() / 2.0;
            for (i, &peak) in waveform.peaks.iter().enumerate() {
                let height = peak * height_scale;
                let bar = egui::Rect::from_min_size(
                    egui::Pos2::new(rect.min.x + i as f32 * bar_width, rect.center().y - height / 2.0),
                    egui::Vec2::new(bar_width * 0.8, height),
                );
                painter.rect_filled(bar, egui::Rounding::ZERO, ui.visuals().widgets.inactive.bg_fill);
            }
        }

        // Loop region
        let start_x = track.x_at(store.start_time(), duration);
        let end_x = track.x_at(store.end_time(), duration);
        if store.is_looping() {
            let region = egui::Rect::from_min_max(
                egui::Pos2::new(start_x, rect.min.y),
                egui::Pos2::new(end_x.max(start_x), rect.max.y),
            );
            painter.rect_filled(region, egui::Rounding::ZERO, RANGE_COLOR.gamma_multiply(0.25));
        }

        // Time markers
        for i in 0..=TICK_COUNT {
            let fraction = i as f32 / TICK_COUNT as f32;
            let x = rect.min.x + fraction * rect.width();
            let align = match i {
                0 => egui::Align2::LEFT_BOTTOM,
                i if i == TICK_COUNT => egui::Align2::RIGHT_BOTTOM,
                _ => egui::Align2::CENTER_BOTTOM,
            };
            painter.text(
                egui::Pos2::new(x, rect.max.y - 2.0),
                align,
                format_time(duration * fraction as f64),
                egui::FontId::monospace(10.0),
                ui.visuals().weak_text_color(),
            );
        }

        // Range handles
        if store.is_looping() {
            for (target, handle_rect, time) in [
                (
                    DragTarget::Start,
                    egui::Rect::from_min_max(
                        egui::Pos2::new(start_x, rect.min.y),
                        egui::Pos2::new(start_x + HANDLE_WIDTH, rect.max.y),
                    ),
                    store.start_time(),
                ),
                (
                    DragTarget::End,
                    egui::Rect::from_min_max(
                        egui::Pos2::new(end_x - HANDLE_WIDTH, rect.min.y),
                        egui::Pos2::new(end_x, rect.max.y),
                    ),
                    store.end_time(),
                ),
            ] {
                let color = if self.engine.snap_indicator() == Some(target) {
                    SNAP_COLOR
                } else if self.engine.drag() == Some(target) {
                    RANGE_ACTIVE_COLOR
                } else {
                    RANGE_COLOR
                };
                painter.rect_filled(handle_rect, egui::Rounding::same(2.0), color);
                paint_chip(&painter, rect, handle_rect.center().x, rect.min.y + 2.0, &format_time(time), color);
            }
        }

        // Playhead
        let current_x = track.x_at(store.current_time(), duration);
        painter.line_segment(
            [egui::Pos2::new(current_x, rect.min.y), egui::Pos2::new(current_x, rect.max.y)],
            egui::Stroke::new(2.0, PLAYHEAD_COLOR),
        );
        painter.circle_filled(egui::Pos2::new(current_x, rect.min.y + 4.0), 6.0, PLAYHEAD_COLOR);
        paint_chip(
            &painter,
            rect,
            current_x,
            rect.min.y + 22.0,
            &format_time(store.current_time()),
            PLAYHEAD_COLOR,
        );

        // Hover preview
        if let (Some(hovered), false) = (self.engine.hovered_time(), self.engine.is_dragging()) {
            let hover_x = track.x_at(hovered, duration);
            painter.line_segment(
                [egui::Pos2::new(hover_x, rect.min.y), egui::Pos2::new(hover_x, rect.max.y)],
                egui::Stroke::new(1.0, HOVER_COLOR.gamma_multiply(0.8)),
            );
            paint_chip(&painter, rect, hover_x, rect.min.y + 42.0, &format_time(hovered), HOVER_COLOR);
        }
    }

    fn show_readout(&self, ui: &mut egui::Ui, store: &PlaybackStore) {
        ui.horizontal(|ui| {
            if store.is_looping() {
                ui.label("Start:");
                ui.label(egui::RichText::new(format_time(store.start_time())).color(RANGE_COLOR).monospace());
                ui.separator();
                ui.label("Current:");
                ui.label(egui::RichText::new(format_time(store.current_time())).color(PLAYHEAD_COLOR).monospace());
                ui.separator();
                ui.label("End:");
                ui.label(egui::RichText::new(format_time(store.end_time())).color(RANGE_COLOR).monospace());
            } else {
                ui.label("Current:");
                ui.label(egui::RichText::new(format_time(store.current_time())).color(PLAYHEAD_COLOR).monospace());
                ui.label("/");
                ui.label(egui::RichText::new(format_time(store.duration())).monospace());
            }
        });
    }
}

impl Default for TimelineWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_chip(painter: &egui::Painter, bounds: egui::Rect, center_x: f32, top: f32, text: &str, fill: egui::Color32) {
    let galley = painter.layout_no_wrap(text.to_string(), egui::FontId::monospace(10.0), egui::Color32::WHITE);
    let padding = egui::Vec2::new(4.0, 2.0);
    let size = galley.size() + padding * 2.0;

    let left = (center_x - size.x / 2.0).clamp(bounds.min.x, (bounds.max.x - size.x).max(bounds.min.x));
    let chip = egui::Rect::from_min_size(egui::Pos2::new(left, top), size);

    painter.rect_filled(chip, egui::Rounding::same(3.0), fill);
    painter.galley(chip.min + padding, galley, egui::Color32::WHITE);
}

/// Formats seconds as `m:ss.cc`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", mins, secs, centis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SavedLoop;

    const TRACK: TrackGeometry = TrackGeometry { left: 100.0, width: 1000.0 };

    /// 100 s of media on a 1000 px track: 10 px per second.
    fn store_with_media() -> PlaybackStore {
        let mut store = PlaybackStore::in_memory();
        store.set_duration(100.0);
        store
    }

    fn looping_store(start: f64, end: f64, current: f64) -> PlaybackStore {
        let mut store = store_with_media();
        store.set_time_range(start, end);
        store.set_is_looping(true);
        store.set_current_time(current);
        store
    }

    fn x_for(time: f64) -> f32 {
        TRACK.left + (time * 10.0) as f32
    }

    fn drag(engine: &mut TimelineEngine, store: &mut PlaybackStore, target: DragTarget, to_time: f64) {
        engine.begin_drag(target);
        engine.handle(TimelineEvent::PointerMove { x: x_for(to_time), over_track: true }, &TRACK, store);
    }

    #[test]
    fn test_time_mapping_is_clamped() {
        assert_eq!(TRACK.time_at(100.0, 100.0), 0.0);
        assert_eq!(TRACK.time_at(600.0, 100.0), 50.0);
        assert_eq!(TRACK.time_at(1100.0, 100.0), 100.0);
        assert_eq!(TRACK.time_at(-500.0, 100.0), 0.0);
        assert_eq!(TRACK.time_at(5000.0, 100.0), 100.0);
    }

    #[test]
    fn test_time_mapping_without_media() {
        assert_eq!(TRACK.time_at(600.0, 0.0), 0.0);
        let empty = TrackGeometry { left: 0.0, width: 0.0 };
        assert_eq!(empty.time_at(10.0, 100.0), 0.0);
    }

    #[test]
    fn test_hit_test_targets() {
        let engine = TimelineEngine::new();
        let store = looping_store(20.0, 80.0, 50.0);

        assert_eq!(engine.hit_test(x_for(50.0), &TRACK, &store), Some(DragTarget::Playhead));
        assert_eq!(engine.hit_test(x_for(20.0) + 4.0, &TRACK, &store), Some(DragTarget::Start));
        assert_eq!(engine.hit_test(x_for(80.0) - 4.0, &TRACK, &store), Some(DragTarget::End));
        assert_eq!(engine.hit_test(x_for(35.0), &TRACK, &store), None);
    }

    #[test]
    fn test_handles_only_exist_while_looping() {
        let engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);
        store.set_is_looping(false);

        assert_eq!(engine.hit_test(x_for(20.0) + 4.0, &TRACK, &store), None);
        assert_eq!(engine.hit_test(x_for(80.0) - 4.0, &TRACK, &store), None);
    }

    #[test]
    fn test_pointer_down_starts_exclusive_session() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);

        engine.handle(TimelineEvent::PointerDown { x: x_for(20.0) + 2.0 }, &TRACK, &mut store);
        assert_eq!(engine.drag(), Some(DragTarget::Start));

        // Moving over the end handle keeps dragging the start handle
        engine.handle(TimelineEvent::PointerMove { x: x_for(30.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(engine.drag(), Some(DragTarget::Start));
        assert_eq!(store.start_time(), 30.0);
        assert_eq!(store.end_time(), 80.0);

        engine.handle(TimelineEvent::PointerUp, &TRACK, &mut store);
        assert_eq!(engine.drag(), None);
    }

    #[test]
    fn test_handles_reachable_when_playhead_rests_on_them() {
        let engine = TimelineEngine::new();
        let mut store = store_with_media();
        store.load_loop(&SavedLoop::new("Verse", 20.0, 80.0));
        assert_eq!(store.current_time(), store.start_time());

        for offset in 0..=8 {
            let x = x_for(20.0) + offset as f32;
            assert_eq!(engine.hit_test(x, &TRACK, &store), Some(DragTarget::Start), "x = {}", x);
        }
        // The playhead is still reachable beside the handle
        assert_eq!(engine.hit_test(x_for(20.0) - 4.0, &TRACK, &store), Some(DragTarget::Playhead));

        store.set_current_time(80.0);
        for offset in 0..=8 {
            let x = x_for(80.0) - offset as f32;
            assert_eq!(engine.hit_test(x, &TRACK, &store), Some(DragTarget::End), "x = {}", x);
        }
    }

    #[test]
    fn test_press_without_motion_keeps_range() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);
        let press_x = x_for(20.0) + 7.0;

        engine.handle(TimelineEvent::PointerDown { x: press_x }, &TRACK, &mut store);
        for _ in 0..3 {
            engine.handle(TimelineEvent::PointerMove { x: press_x, over_track: true }, &TRACK, &mut store);
        }
        assert_eq!(engine.drag(), Some(DragTarget::Start));
        assert_eq!(store.start_time(), 20.0);
        assert_eq!(store.end_time(), 80.0);

        engine.handle(TimelineEvent::PointerMove { x: x_for(25.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(store.start_time(), 25.0);
    }

    #[test]
    fn test_held_handle_does_not_follow_playhead() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);

        engine.handle(TimelineEvent::PointerDown { x: x_for(80.0) - 2.0 }, &TRACK, &mut store);
        engine.handle(TimelineEvent::PointerMove { x: x_for(70.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(store.end_time(), 70.0);

        // Playback carries the playhead into the snap window while the pointer rests
        store.set_current_time(70.5);
        engine.handle(TimelineEvent::PointerMove { x: x_for(70.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(store.end_time(), 70.0);
        assert_eq!(engine.snap_indicator(), None);
    }

    #[test]
    fn test_pointer_down_on_empty_track_does_not_drag() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);

        engine.handle(TimelineEvent::PointerDown { x: x_for(35.0) }, &TRACK, &mut store);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_release_outside_track_ends_drag() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);
        drag(&mut engine, &mut store, DragTarget::End, 90.0);

        engine.handle(TimelineEvent::PointerMove { x: 5000.0, over_track: false }, &TRACK, &mut store);
        assert_eq!(store.end_time(), 100.0);

        engine.handle(TimelineEvent::PointerUp, &TRACK, &mut store);
        assert!(!engine.is_dragging());
        assert_eq!(engine.snap_indicator(), None);
    }

    #[test]
    fn test_start_handle_snaps_to_playhead() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(10.0, 80.0, 30.0);

        drag(&mut engine, &mut store, DragTarget::Start, 30.7);
        assert_eq!(store.start_time(), 30.0);
        assert_eq!(engine.snap_indicator(), Some(DragTarget::Start));

        engine.handle(TimelineEvent::PointerMove { x: x_for(25.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(store.start_time(), 25.0);
        assert_eq!(engine.snap_indicator(), None);
    }

    #[test]
    fn test_end_handle_snaps_to_playhead() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(10.0, 80.0, 60.0);

        drag(&mut engine, &mut store, DragTarget::End, 59.2);
        assert_eq!(store.end_time(), 60.0);
        assert_eq!(engine.snap_indicator(), Some(DragTarget::End));
    }

    #[test]
    fn test_snap_window_boundaries() {
        let mut store = looping_store(0.0, 100.0, 50.0);

        for (candidate, expected) in [(49.0, 50.0), (51.0, 50.0), (50.4, 50.0), (48.9, 48.9), (51.2, 51.2)] {
            let mut engine = TimelineEngine::new();
            store.set_time_range(0.0, 100.0);
            drag(&mut engine, &mut store, DragTarget::End, candidate);
            assert!(
                (store.end_time() - expected).abs() < 1e-9,
                "candidate {} resolved to {}, expected {}",
                candidate,
                store.end_time(),
                expected
            );
        }
    }

    #[test]
    fn test_snapping_disabled_uses_raw_time() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(10.0, 80.0, 30.0);
        store.set_is_snapping_enabled(false);

        drag(&mut engine, &mut store, DragTarget::Start, 30.5);
        assert_eq!(store.start_time(), 30.5);
        assert_eq!(engine.snap_indicator(), None);
    }

    #[test]
    fn test_minimum_separation_is_enforced() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(40.0, 60.0, 0.0);

        drag(&mut engine, &mut store, DragTarget::Start, 75.0);
        assert_eq!(store.start_time(), 59.5);
        assert!(store.end_time() - store.start_time() >= MIN_LOOP_LENGTH);
        engine.end_drag();

        drag(&mut engine, &mut store, DragTarget::End, 10.0);
        assert_eq!(store.end_time(), 60.0);
        assert!(store.end_time() - store.start_time() >= MIN_LOOP_LENGTH);
    }

    #[test]
    fn test_separation_holds_across_sweeps() {
        let mut store = looping_store(30.0, 70.0, 0.0);
        store.set_is_snapping_enabled(false);

        for target in [DragTarget::Start, DragTarget::End] {
            let mut engine = TimelineEngine::new();
            engine.begin_drag(target);
            for step in 0..=200 {
                let x = TRACK.left - 50.0 + step as f32 * 6.0;
                engine.handle(TimelineEvent::PointerMove { x, over_track: true }, &TRACK, &mut store);
                assert!(
                    store.end_time() - store.start_time() >= MIN_LOOP_LENGTH - 1e-9,
                    "{:?} drag produced {}..{}",
                    target,
                    store.start_time(),
                    store.end_time()
                );
            }
        }
    }

    #[test]
    fn test_playhead_drag_sets_position_without_snapping() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(10.0, 80.0, 50.0);

        drag(&mut engine, &mut store, DragTarget::Playhead, 10.4);
        assert!((store.current_time() - 10.4).abs() < 1e-9);
        assert_eq!(store.start_time(), 10.0);
        assert_eq!(engine.snap_indicator(), None);

        engine.handle(TimelineEvent::PointerMove { x: 9000.0, over_track: false }, &TRACK, &mut store);
        assert_eq!(store.current_time(), 100.0);
    }

    #[test]
    fn test_click_on_track_seeks() {
        let mut engine = TimelineEngine::new();
        let mut store = store_with_media();

        engine.handle(TimelineEvent::Click { x: x_for(42.0) }, &TRACK, &mut store);
        assert_eq!(store.current_time(), 42.0);
    }

    #[test]
    fn test_click_on_handle_does_not_seek() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);

        engine.handle(TimelineEvent::Click { x: x_for(20.0) + 3.0 }, &TRACK, &mut store);
        assert_eq!(store.current_time(), 50.0);
    }

    #[test]
    fn test_hover_tracks_and_clears() {
        let mut engine = TimelineEngine::new();
        let mut store = store_with_media();

        engine.handle(TimelineEvent::PointerMove { x: x_for(12.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(engine.hovered_time(), Some(12.0));

        engine.handle(TimelineEvent::PointerLeave, &TRACK, &mut store);
        assert_eq!(engine.hovered_time(), None);
    }

    #[test]
    fn test_drag_clears_hover() {
        let mut engine = TimelineEngine::new();
        let mut store = looping_store(20.0, 80.0, 50.0);

        engine.handle(TimelineEvent::PointerMove { x: x_for(30.0), over_track: true }, &TRACK, &mut store);
        assert!(engine.hovered_time().is_some());

        engine.handle(TimelineEvent::PointerDown { x: x_for(50.0) }, &TRACK, &mut store);
        assert_eq!(engine.drag(), Some(DragTarget::Playhead));
        assert_eq!(engine.hovered_time(), None);

        engine.handle(TimelineEvent::PointerMove { x: x_for(60.0), over_track: true }, &TRACK, &mut store);
        assert_eq!(engine.hovered_time(), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.00");
        assert_eq!(format_time(5.5), "0:05.50");
        assert_eq!(format_time(65.25), "1:05.25");
        assert_eq!(format_time(600.0), "10:00.00");
        assert_eq!(format_time(-3.0), "0:00.00");
        assert_eq!(format_time(f64::NAN), "0:00.00");
    }
}
