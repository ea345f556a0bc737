use std::path::PathBuf;

use ftth_viewer::config::ViewerConfig;
use ftth_viewer::data::loader::load_dataset;
use ftth_viewer::data::model::NetworkDataset;
use ftth_viewer::data::views::ChartViews;

use crate::color::StatusColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Chart inputs derived from the loaded result tables.
    pub views: ChartViews,

    pub colors: StatusColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig, dataset: &NetworkDataset) -> Self {
        let views = ChartViews::build(dataset, &config);
        Self {
            config,
            views,
            colors: StatusColors::default(),
            status_message: None,
        }
    }

    /// Replace the snapshot and recompute every derived view.
    pub fn set_dataset(&mut self, dataset: &NetworkDataset) {
        self.views = ChartViews::build(dataset, &self.config);
        self.status_message = None;
    }

    /// Re-read both tables from the current data directory.
    pub fn reload(&mut self) {
        self.load_from(self.config.clone());
    }

    /// Switch to another results folder.
    pub fn open_dir(&mut self, dir: PathBuf) {
        self.load_from(self.config.with_data_dir(dir));
    }

    /// On failure the previous snapshot stays on screen.
    fn load_from(&mut self, config: ViewerConfig) {
        match load_dataset(&config) {
            Ok(dataset) => {
                self.config = config;
                self.set_dataset(&dataset);
            }
            Err(e) => {
                log::error!("Failed to load results: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
