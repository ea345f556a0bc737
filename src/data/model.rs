use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CsvSchema – required header columns per record type
// ---------------------------------------------------------------------------

/// A record type read from a headed CSV table.
///
/// `COLUMNS` lists the header names that must be present; any further
/// columns in the file are ignored.
pub trait CsvSchema {
    const COLUMNS: &'static [&'static str];
}

// ---------------------------------------------------------------------------
// OntStatus – link state of one terminal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OntStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
    /// Upstream path is cut; `rx_dbm` carries no meaningful reading.
    #[serde(rename = "DOWN")]
    Down,
}

impl OntStatus {
    pub const ALL: [OntStatus; 3] = [OntStatus::Ok, OntStatus::Fail, OntStatus::Down];

    pub fn as_str(self) -> &'static str {
        match self {
            OntStatus::Ok => "OK",
            OntStatus::Fail => "FAIL",
            OntStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for OntStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OntRecord – one row of ont_results.csv
// ---------------------------------------------------------------------------

/// Link metrics of a single optical network terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntRecord {
    pub ont_id: i64,
    pub total_dist_km: f64,
    pub total_loss_db: f64,
    /// Received optical power.
    pub rx_dbm: f64,
    /// `rx_dbm - RXmin`; negative below threshold.
    pub margin_db: f64,
    pub status: OntStatus,
    /// Topology path from the OLT, when the producer wrote one.
    #[serde(default)]
    pub path: Option<String>,
}

impl CsvSchema for OntRecord {
    const COLUMNS: &'static [&'static str] = &[
        "ont_id",
        "total_dist_km",
        "total_loss_db",
        "rx_dbm",
        "margin_db",
        "status",
    ];
}

impl OntRecord {
    pub fn label(&self) -> String {
        format!("ONT {}", self.ont_id)
    }

    pub fn is_powered(&self) -> bool {
        self.status != OntStatus::Down
    }
}

// ---------------------------------------------------------------------------
// SplitterRecord – one row of splitter_results.csv
// ---------------------------------------------------------------------------

/// Aggregate statistics of the terminals below one splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterRecord {
    pub name: String,
    /// Fan-out, e.g. 32 for a 1:32 splitter.
    pub ratio: u32,
    pub ont_count: u32,
    pub ok_count: u32,
    pub fail_count: u32,
    pub down_count: u32,
    pub avg_rx_dbm: f64,
    pub avg_loss_db: f64,
    pub worst_rx_dbm: f64,
}

impl CsvSchema for SplitterRecord {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "ratio",
        "ont_count",
        "ok_count",
        "fail_count",
        "down_count",
        "avg_rx_dbm",
        "avg_loss_db",
        "worst_rx_dbm",
    ];
}

impl SplitterRecord {
    /// Terminals below this splitter that are not OK.
    pub fn bad_count(&self) -> u64 {
        u64::from(self.fail_count) + u64::from(self.down_count)
    }

    pub fn label(&self) -> String {
        format!("{} (1:{})", self.name, self.ratio)
    }

    /// `ok + fail + down`, which the table does not guarantee to equal
    /// `ont_count`.
    pub fn tallied_count(&self) -> u64 {
        u64::from(self.ok_count) + self.bad_count()
    }

    /// Whether the per-status tallies add up to `ont_count`.
    pub fn tallies_consistent(&self) -> bool {
        self.tallied_count() == u64::from(self.ont_count)
    }
}

// ---------------------------------------------------------------------------
// NetworkDataset – both tables of one run
// ---------------------------------------------------------------------------

/// Immutable snapshot of the two result tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkDataset {
    pub onts: Vec<OntRecord>,
    pub splitters: Vec<SplitterRecord>,
}

impl NetworkDataset {
    pub fn new(onts: Vec<OntRecord>, splitters: Vec<SplitterRecord>) -> Self {
        Self { onts, splitters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(ok: u32, fail: u32, down: u32, total: u32) -> SplitterRecord {
        SplitterRecord {
            name: "SPL-A".into(),
            ratio: 32,
            ont_count: total,
            ok_count: ok,
            fail_count: fail,
            down_count: down,
            avg_rx_dbm: -21.0,
            avg_loss_db: 24.0,
            worst_rx_dbm: -26.5,
        }
    }

    #[test]
    fn splitter_label_and_bad_count() {
        let s = splitter(20, 3, 9, 32);
        assert_eq!(s.label(), "SPL-A (1:32)");
        assert_eq!(s.bad_count(), 12);
        assert!(s.tallies_consistent());
    }

    #[test]
    fn inconsistent_tallies_are_detected_not_fixed() {
        let s = splitter(20, 3, 1, 32);
        assert!(!s.tallies_consistent());
        assert_eq!(s.bad_count(), 4);
    }

    #[test]
    fn huge_tallies_do_not_overflow() {
        let s = splitter(u32::MAX, 4_000_000_000, 400_000_000, 1);
        assert_eq!(s.bad_count(), 4_400_000_000);
        assert_eq!(s.tallied_count(), u64::from(u32::MAX) + 4_400_000_000);
        assert!(!s.tallies_consistent());
    }

    #[test]
    fn status_wire_form() {
        let names: Vec<String> = OntStatus::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["OK", "FAIL", "DOWN"]);
        assert!(!OntRecord {
            ont_id: 1,
            total_dist_km: 0.0,
            total_loss_db: 0.0,
            rx_dbm: 0.0,
            margin_db: 0.0,
            status: OntStatus::Down,
            path: None,
        }
        .is_powered());
    }
}
