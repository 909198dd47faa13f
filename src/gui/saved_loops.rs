use eframe::egui;
use crate::core::{LoopError, PlaybackStore, SavedLoopManager};
use crate::gui::timeline::format_time;

#[derive(Debug, Clone, PartialEq)]
enum LoopAction {
    Load(String),
    Delete(String),
}

/// Side panel listing saved loops, with a form to save the current range.
#[derive(Debug, Default)]
pub struct SavedLoopsPanel {
    pub new_title: String,
    pub error: Option<LoopError>,
}

impl SavedLoopsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the active range under the typed title. On success the form is
    /// cleared; on failure the title stays so the user can fix it.
    pub fn submit(&mut self, store: &mut PlaybackStore) {
        match SavedLoopManager::create(store, &self.new_title) {
            Ok(_) => {
                self.new_title.clear();
                self.error = None;
            }
            Err(e) => {
                log::debug!("Rejected loop save: {}", e);
                self.error = Some(e);
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, store: &mut PlaybackStore) {
        ui.heading("Saved loops");
        ui.add_space(4.0);

        let has_media = store.duration() > 0.0;
        ui.add_enabled_ui(has_media, |ui| {
            ui.horizontal(|ui| {
                let field_width = (ui.available_width() - 60.0).max(80.0);
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.new_title)
                        .hint_text("Loop name")
                        .desired_width(field_width),
                );
                if response.changed() {
                    self.error = None;
                }

                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("💾 Save").clicked() || submitted {
                    self.submit(store);
                }
            });
            ui.small(format!(
                "{} - {}",
                format_time(store.start_time()),
                format_time(store.end_time())
            ));
        });

        if let Some(error) = &self.error {
            ui.colored_label(ui.visuals().error_fg_color, error.to_string());
        }

        ui.separator();

        let mut action = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let loops = SavedLoopManager::list(store);
                if loops.is_empty() {
                    ui.label("No saved loops yet");
                    ui.small("Set a range on the timeline and give it a name to keep it");
                    return;
                }

                for saved in loops {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(&saved.title);
                                ui.small(format!(
                                    "{} - {} ({:.1}s)",
                                    format_time(saved.start_time),
                                    format_time(saved.end_time),
                                    saved.length()
                                ));
                                if let Some(created) = saved.created_at {
                                    ui.small(
                                        created
                                            .with_timezone(&chrono::Local)
                                            .format("%Y-%m-%d %H:%M")
                                            .to_string(),
                                    );
                                }
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    action = Some(LoopAction::Delete(saved.id.clone()));
                                }
                                if ui
                                    .add_enabled(has_media, egui::Button::new("▶").small())
                                    .on_hover_text("Load")
                                    .clicked()
                                {
                                    action = Some(LoopAction::Load(saved.id.clone()));
                                }
                            });
                        });
                    });
                }
            });

        if let Some(action) = action {
            self.perform(action, store);
        }
    }

    fn perform(&mut self, action: LoopAction, store: &mut PlaybackStore) {
        let result = match &action {
            LoopAction::Load(id) => SavedLoopManager::load(store, id),
            LoopAction::Delete(id) => SavedLoopManager::delete(store, id).map(|_| ()),
        };
        if let Err(e) = result {
            log::warn!("{:?} failed: {}", action, e);
        }
    }
}
