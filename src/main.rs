mod core;
mod gui;
mod hotkeys;
mod video;

use eframe::egui;
use gui::LooperApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional media reference to open on startup
    let initial_source = std::env::args().nth(1);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 560.0])
            .with_title("Video Looper"),
        ..Default::default()
    };

    eframe::run_native(
        "Video Looper",
        options,
        Box::new(|cc| Ok(Box::new(LooperApp::new(cc, initial_source)))),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
