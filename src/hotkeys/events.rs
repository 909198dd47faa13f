use eframe::egui;
use crate::gui::TransportCommand;

/// Keyboard shortcuts for the transport. Each one maps to the same command
/// as its button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutId {
    PlayPause,
    SkipBackward,
    SkipForward,
    Restart,
    ToggleLoop,
    ToggleAudioOnly,
    ToggleSnapping,
}

impl ShortcutId {
    pub const ALL: [ShortcutId; 7] = [
        ShortcutId::PlayPause,
        ShortcutId::SkipBackward,
        ShortcutId::SkipForward,
        ShortcutId::Restart,
        ShortcutId::ToggleLoop,
        ShortcutId::ToggleAudioOnly,
        ShortcutId::ToggleSnapping,
    ];

    pub fn key(self) -> egui::Key {
        match self {
            ShortcutId::PlayPause => egui::Key::Space,
            ShortcutId::SkipBackward => egui::Key::ArrowLeft,
            ShortcutId::SkipForward => egui::Key::ArrowRight,
            ShortcutId::Restart => egui::Key::Home,
            ShortcutId::ToggleLoop => egui::Key::L,
            ShortcutId::ToggleAudioOnly => egui::Key::A,
            ShortcutId::ToggleSnapping => egui::Key::S,
        }
    }

    pub fn from_key(key: egui::Key) -> Option<Self> {
        Self::ALL.into_iter().find(|shortcut| shortcut.key() == key)
    }

    pub fn to_transport_command(self) -> TransportCommand {
        match self {
            ShortcutId::PlayPause => TransportCommand::TogglePlayback,
            ShortcutId::SkipBackward => TransportCommand::SkipBackward,
            ShortcutId::SkipForward => TransportCommand::SkipForward,
            ShortcutId::Restart => TransportCommand::Restart,
            ShortcutId::ToggleLoop => TransportCommand::ToggleLoop,
            ShortcutId::ToggleAudioOnly => TransportCommand::ToggleAudioOnly,
            ShortcutId::ToggleSnapping => TransportCommand::ToggleSnapping,
        }
    }
}

/// Transport commands for the shortcut keys pressed this frame. Nothing is
/// reported while a text field has keyboard focus.
pub fn collect_commands(ctx: &egui::Context) -> Vec<TransportCommand> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }

    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if modifiers.is_none() => ShortcutId::from_key(*key),
                _ => None,
            })
            .map(ShortcutId::to_transport_command)
            .collect()
    })
}
