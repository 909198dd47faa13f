use eframe::egui;
use crate::core::{MediaSource, PersistedState, PlaybackStore, SourceError};
use crate::gui::controls::{self, TransportCommand};
use crate::gui::saved_loops::SavedLoopsPanel;
use crate::gui::timeline::{format_time, TimelineWidget};
use crate::hotkeys;
use crate::video::{ClockElement, MediaDriver, MediaElement, MediaElementState, WaveformData};

const MEDIA_EXTENSIONS: [&str; 11] = [
    "mp4", "mkv", "webm", "mov", "avi", "m4v", "mp3", "wav", "ogg", "flac", "m4a",
];

pub struct LooperApp {
    pub(crate) store: PlaybackStore,
    pub(crate) driver: MediaDriver<ClockElement>,
    pub(crate) timeline: TimelineWidget,
    pub(crate) saved_loops_panel: SavedLoopsPanel,
    pub(crate) source_input: String,
    pub(crate) source_error: Option<SourceError>,
    pub(crate) current_source: Option<MediaSource>,
    pub(crate) waveform: Option<WaveformData>,
}

impl LooperApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_source: Option<String>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let storage_path = PersistedState::default_path();
        log::info!("Using state file {}", storage_path.display());

        let mut app = Self::with_store(PlaybackStore::open(storage_path));
        if let Some(input) = initial_source {
            app.open_source(&input);
        }
        app
    }

    pub(crate) fn with_store(store: PlaybackStore) -> Self {
        Self {
            store,
            driver: MediaDriver::new(ClockElement::new()),
            timeline: TimelineWidget::new(),
            saved_loops_panel: SavedLoopsPanel::new(),
            source_input: String::new(),
            source_error: None,
            current_source: None,
            waveform: None,
        }
    }

    /// Resolves what the user typed and hands it to the driver. Bad input is
    /// shown next to the field and leaves the current media alone.
    pub fn open_source(&mut self, input: &str) {
        match MediaSource::resolve(input) {
            Ok(source) => {
                log::info!("Opening {}", source);
                self.source_input = source.as_probe_input();
                self.source_error = None;
                self.waveform = None;
                self.driver.load(source.clone(), &mut self.store);
                self.current_source = Some(source);
            }
            Err(e) => {
                log::warn!("Rejected media reference '{}': {}", input, e);
                self.source_error = Some(e);
            }
        }
    }

    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Media", &MEDIA_EXTENSIONS)
            .pick_file();

        if let Some(path) = picked {
            self.open_source(&path.to_string_lossy());
        }
    }

    pub(crate) fn handle_commands(&mut self, commands: Vec<TransportCommand>) {
        for command in commands {
            controls::apply(&mut self.store, command);
        }
    }

    /// Regenerates the decorative waveform whenever a new duration shows up.
    pub(crate) fn refresh_waveform(&mut self) {
        let duration = self.store.duration();
        if duration <= 0.0 {
            return;
        }
        let stale = self
            .waveform
            .as_ref()
            .map_or(true, |waveform| !waveform.matches_duration(duration));
        if stale {
            self.waveform = Some(WaveformData::illustrative(duration));
        }
    }

    fn show_source_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Media:");
            let field_width = (ui.available_width() - 160.0).max(120.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.source_input)
                    .hint_text("File path or http(s) URL")
                    .desired_width(field_width),
            );
            if response.changed() {
                self.source_error = None;
            }

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || submitted {
                let input = self.source_input.clone();
                self.open_source(&input);
            }
            if ui.button("📁 Browse...").clicked() {
                self.pick_file();
            }
        });

        if let Some(error) = &self.source_error {
            ui.colored_label(ui.visuals().error_fg_color, error.to_string());
        }
    }

    fn show_player(&self, ui: &mut egui::Ui) {
        let height = if self.store.is_audio_only() { 80.0 } else { 320.0 };
        let (rect, _) = ui.allocate_exact_size(
            egui::Vec2::new(ui.available_width(), height),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::Rounding::same(6.0), egui::Color32::BLACK);

        let title = match &self.current_source {
            Some(source) if self.store.is_audio_only() => format!("🎵 {}", source.display_name()),
            Some(source) => format!("🎬 {}", source.display_name()),
            None => "Open a video to start looping".to_string(),
        };
        painter.text(
            rect.center() - egui::Vec2::new(0.0, 10.0),
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0),
            egui::Color32::WHITE,
        );

        let state = self.driver.element().state();
        let state_color = match state {
            MediaElementState::Error(_) => ui.visuals().error_fg_color,
            _ => egui::Color32::GRAY,
        };
        painter.text(
            rect.center() + egui::Vec2::new(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            state.display_text(),
            egui::FontId::proportional(13.0),
            state_color,
        );
    }
}

impl eframe::App for LooperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.driver.pump(&mut self.store);
        self.refresh_waveform();

        // After the pump, so element reports cannot overwrite them before the sync
        let shortcuts = hotkeys::collect_commands(ctx);
        self.handle_commands(shortcuts);

        egui::TopBottomPanel::top("source_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_source_bar(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let element = self.driver.element();
                ui.label(element.state().display_text());
                if element.duration() > 0.0 {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} / {}",
                            format_time(element.position()),
                            format_time(element.duration())
                        ))
                        .monospace()
                        .weak(),
                    );
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small("Space play/pause · ←/→ skip 5s · Home restart · L loop · S snap · A audio");
                });
            });
        });

        egui::SidePanel::right("saved_loops")
            .default_width(280.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                self.saved_loops_panel.show(ui, &mut self.store);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_player(ui);
            ui.add_space(8.0);

            let commands = controls::show_controls(ui, &self.store);
            self.handle_commands(commands);
            ui.add_space(8.0);

            self.timeline.show(ui, &mut self.store, self.waveform.as_ref());
        });

        self.driver.sync(&mut self.store);

        if self.store.is_playing() || self.timeline.engine.is_dragging() {
            ctx.request_repaint();
        } else if *self.driver.element().state() == MediaElementState::Loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
