use eframe::egui;
use crate::core::{PlaybackStore, PLAYBACK_SPEEDS};

pub const SKIP_SECONDS: f64 = 5.0;

/// Everything the transport bar and keyboard shortcuts can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    TogglePlayback,
    Restart,
    SkipBackward,
    SkipForward,
    ToggleLoop,
    ToggleAudioOnly,
    ToggleSnapping,
    SetSpeed(f64),
}

/// Applies a transport command to the store. The media driver picks the
/// result up on its next sync.
pub fn apply(store: &mut PlaybackStore, command: TransportCommand) {
    log::debug!("Transport command: {:?}", command);

    match command {
        TransportCommand::TogglePlayback => store.set_is_playing(!store.is_playing()),
        TransportCommand::Restart => {
            let target = if store.is_looping() { store.start_time() } else { 0.0 };
            store.set_current_time(target);
            store.set_is_playing(true);
        }
        TransportCommand::SkipBackward => skip(store, -SKIP_SECONDS),
        TransportCommand::SkipForward => skip(store, SKIP_SECONDS),
        TransportCommand::ToggleLoop => {
            let looping = !store.is_looping();
            store.set_is_looping(looping);
            if looping {
                let position = store.current_time();
                if position < store.start_time() || position > store.end_time() {
                    log::debug!("Position {:.2}s outside loop, jumping to start", position);
                    store.set_current_time(store.start_time());
                }
            }
        }
        TransportCommand::ToggleAudioOnly => store.set_is_audio_only(!store.is_audio_only()),
        TransportCommand::ToggleSnapping => store.set_is_snapping_enabled(!store.is_snapping_enabled()),
        TransportCommand::SetSpeed(speed) => {
            if PLAYBACK_SPEEDS.contains(&speed) {
                store.set_playback_speed(speed);
            } else {
                log::warn!("Ignoring unsupported playback speed {}", speed);
            }
        }
    }
}

fn skip(store: &mut PlaybackStore, delta: f64) {
    let (lower, upper) = if store.is_looping() {
        (store.start_time(), store.end_time())
    } else if store.duration() > 0.0 {
        (0.0, store.duration())
    } else {
        (0.0, f64::INFINITY)
    };
    let target = (store.current_time() + delta).min(upper).max(lower);
    store.set_current_time(target);
}

fn speed_label(speed: f64) -> String {
    format!("{}x", speed)
}

/// Draws the transport bar and returns the commands the user issued this frame.
pub fn show_controls(ui: &mut egui::Ui, store: &PlaybackStore) -> Vec<TransportCommand> {
    let mut commands = Vec::new();
    let has_media = store.duration() > 0.0;

    ui.horizontal(|ui| {
        let play_label = if store.is_playing() { "⏸ Pause" } else { "▶ Play" };
        if ui.add_enabled(has_media, egui::Button::new(play_label)).clicked() {
            commands.push(TransportCommand::TogglePlayback);
        }
        if ui
            .add_enabled(has_media, egui::Button::new("⏮ Restart"))
            .on_hover_text("Home")
            .clicked()
        {
            commands.push(TransportCommand::Restart);
        }
        if ui
            .add_enabled(has_media, egui::Button::new("⏪ 5s"))
            .on_hover_text("Left arrow")
            .clicked()
        {
            commands.push(TransportCommand::SkipBackward);
        }
        if ui
            .add_enabled(has_media, egui::Button::new("5s ⏩"))
            .on_hover_text("Right arrow")
            .clicked()
        {
            commands.push(TransportCommand::SkipForward);
        }

        ui.separator();

        if ui
            .selectable_label(store.is_looping(), "🔁 Loop")
            .on_hover_text("L")
            .clicked()
        {
            commands.push(TransportCommand::ToggleLoop);
        }
        if ui
            .selectable_label(store.is_snapping_enabled(), "🧲 Snap")
            .on_hover_text("Snap range handles to the playhead (S)")
            .clicked()
        {
            commands.push(TransportCommand::ToggleSnapping);
        }
        if ui
            .selectable_label(store.is_audio_only(), "🎵 Audio only")
            .on_hover_text("A")
            .clicked()
        {
            commands.push(TransportCommand::ToggleAudioOnly);
        }

        ui.separator();

        let mut selected = store.playback_speed();
        egui::ComboBox::from_id_source("playback_speed")
            .selected_text(speed_label(selected))
            .width(70.0)
            .show_ui(ui, |ui| {
                for speed in PLAYBACK_SPEEDS {
                    ui.selectable_value(&mut selected, speed, speed_label(speed));
                }
            });
        if selected != store.playback_speed() {
            commands.push(TransportCommand::SetSpeed(selected));
        }
    });

    commands
}
