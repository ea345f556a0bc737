mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::FtthViewerApp;
use eframe::egui;
use ftth_viewer::config::{ViewerConfig, WINDOW_TITLE};
use ftth_viewer::data::loader::load_dataset;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    // Both tables must load before the window opens; failures are fatal.
    let config = ViewerConfig::default();
    let dataset = load_dataset(&config)
        .inspect_err(|e| log::error!("Failed to load results: {e}"))
        .with_context(|| format!("loading results from {}", config.data_dir.display()))?;
    let state = AppState::new(config, &dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(FtthViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
