use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Fixed parameters
// ---------------------------------------------------------------------------

/// Per-terminal results table, looked up inside the data directory.
pub const ONT_RESULTS_FILE: &str = "ont_results.csv";

/// Per-splitter aggregate table, looked up inside the data directory.
pub const SPLITTER_RESULTS_FILE: &str = "splitter_results.csv";

/// Number of worst-margin terminals highlighted in the bottom-right chart.
pub const TOP_N: usize = 5;

/// Reference receiver sensitivity, drawn as the threshold line.
pub const RXMIN_DBM: f64 = -25.0;

/// Bucket count of the received-power histogram.
pub const HISTOGRAM_BINS: usize = 12;

pub const WINDOW_TITLE: &str = "FTTH Viewer – GPON Link Budget";
pub const FIGURE_TITLE: &str = "FTTH/GPON optical network analysis";

// ---------------------------------------------------------------------------
// ViewerConfig
// ---------------------------------------------------------------------------

/// Everything one run of the viewer needs to know before loading data.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Directory holding both result tables.
    pub data_dir: PathBuf,
    pub top_n: usize,
    pub rxmin_dbm: f64,
    pub histogram_bins: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            top_n: TOP_N,
            rxmin_dbm: RXMIN_DBM,
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

impl ViewerConfig {
    /// Same parameters, different data directory.
    pub fn with_data_dir(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..self.clone()
        }
    }

    pub fn ont_path(&self) -> PathBuf {
        self.data_dir.join(ONT_RESULTS_FILE)
    }

    pub fn splitter_path(&self) -> PathBuf {
        self.data_dir.join(SPLITTER_RESULTS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_match_fixed_parameters() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.rxmin_dbm, -25.0);
        assert_eq!(cfg.histogram_bins, 12);
        assert_eq!(cfg.ont_path(), PathBuf::from("./ont_results.csv"));
        assert_eq!(cfg.splitter_path(), PathBuf::from("./splitter_results.csv"));
    }

    #[test]
    fn with_data_dir_keeps_parameters() {
        let cfg = ViewerConfig {
            top_n: 3,
            ..ViewerConfig::default()
        };
        let moved = cfg.with_data_dir("/srv/results");
        assert_eq!(moved.top_n, 3);
        assert_eq!(moved.data_dir, Path::new("/srv/results"));
        assert_eq!(moved.ont_path(), PathBuf::from("/srv/results/ont_results.csv"));
    }
}
