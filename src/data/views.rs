use super::model::{NetworkDataset, OntRecord, OntStatus, SplitterRecord};
use crate::config::ViewerConfig;

// ---------------------------------------------------------------------------
// Received-power histogram
// ---------------------------------------------------------------------------

/// `rx_dbm` of every terminal that is not DOWN, in file order.
pub fn powered_rx(onts: &[OntRecord]) -> Vec<f64> {
    onts.iter()
        .filter(|o| o.is_powered())
        .map(|o| o.rx_dbm)
        .collect()
}

/// Equal-width bins over the value range.
///
/// `edges` has `counts.len() + 1` entries.  Every bin is half-open except
/// the last, which also takes the maximum value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self::default();
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if hi == lo {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }

    /// `(center, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| ((w[0] + w[1]) / 2.0, c))
    }
}

// ---------------------------------------------------------------------------
// Power vs distance, grouped by status
// ---------------------------------------------------------------------------

/// `[total_dist_km, rx_dbm]` points per status, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusGroups {
    pub ok: Vec<[f64; 2]>,
    pub fail: Vec<[f64; 2]>,
    pub down: Vec<[f64; 2]>,
}

impl StatusGroups {
    pub fn partition(onts: &[OntRecord]) -> Self {
        let mut groups = Self::default();
        for o in onts {
            let point = [o.total_dist_km, o.rx_dbm];
            match o.status {
                OntStatus::Ok => groups.ok.push(point),
                OntStatus::Fail => groups.fail.push(point),
                OntStatus::Down => groups.down.push(point),
            }
        }
        groups
    }

    pub fn get(&self, status: OntStatus) -> &[[f64; 2]] {
        match status {
            OntStatus::Ok => &self.ok,
            OntStatus::Fail => &self.fail,
            OntStatus::Down => &self.down,
        }
    }
}

// ---------------------------------------------------------------------------
// Faults per splitter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SplitterFaults {
    pub label: String,
    /// FAIL + DOWN as reported by the splitter table itself.
    pub bad: u64,
}

pub fn splitter_faults(splitters: &[SplitterRecord]) -> Vec<SplitterFaults> {
    splitters
        .iter()
        .map(|s| SplitterFaults {
            label: s.label(),
            bad: s.bad_count(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Worst terminals by margin
// ---------------------------------------------------------------------------

/// The `n` terminals with the lowest `margin_db`, worst first.
///
/// The sort is stable: equal margins keep their file order.  `-0.0` and
/// `0.0` count as equal.
pub fn worst_by_margin(onts: &[OntRecord], n: usize) -> Vec<&OntRecord> {
    let mut sorted: Vec<&OntRecord> = onts.iter().collect();
    sorted.sort_by(|a, b| margin_key(a.margin_db).total_cmp(&margin_key(b.margin_db)));
    sorted.truncate(n);
    sorted
}

/// Folds `-0.0` onto `0.0` so `total_cmp` only orders distinct values.
fn margin_key(margin_db: f64) -> f64 {
    if margin_db == 0.0 {
        0.0
    } else {
        margin_db
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarginBar {
    pub label: String,
    pub margin_db: f64,
    pub rx_dbm: f64,
    pub path: Option<String>,
}

impl MarginBar {
    /// Annotation drawn above the bar.
    pub fn rx_text(&self) -> String {
        format!("RX {:.1}", self.rx_dbm)
    }
}

impl From<&OntRecord> for MarginBar {
    fn from(o: &OntRecord) -> Self {
        Self {
            label: o.label(),
            margin_db: o.margin_db,
            rx_dbm: o.rx_dbm,
            path: o.path.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Network summary
// ---------------------------------------------------------------------------

/// Headline numbers over the whole ONT table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSummary {
    pub ont_count: usize,
    pub ok_count: usize,
    pub fail_count: usize,
    pub down_count: usize,
    /// `(best, worst, average)` received power; `None` without terminals.
    pub rx_range: Option<(f64, f64, f64)>,
}

impl NetworkSummary {
    pub fn from_onts(onts: &[OntRecord]) -> Self {
        let count = |status: OntStatus| onts.iter().filter(|o| o.status == status).count();

        let rx_range = if onts.is_empty() {
            None
        } else {
            let best = onts.iter().map(|o| o.rx_dbm).fold(f64::NEG_INFINITY, f64::max);
            let worst = onts.iter().map(|o| o.rx_dbm).fold(f64::INFINITY, f64::min);
            let avg = onts.iter().map(|o| o.rx_dbm).sum::<f64>() / onts.len() as f64;
            Some((best, worst, avg))
        };

        Self {
            ont_count: onts.len(),
            ok_count: count(OntStatus::Ok),
            fail_count: count(OntStatus::Fail),
            down_count: count(OntStatus::Down),
            rx_range,
        }
    }
}

// ---------------------------------------------------------------------------
// ChartViews – everything the four charts draw
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartViews {
    pub histogram: Histogram,
    /// Number of samples that went into `histogram`.
    pub powered_count: usize,
    pub scatter: StatusGroups,
    pub rxmin_dbm: f64,
    pub faults: Vec<SplitterFaults>,
    pub worst: Vec<MarginBar>,
    pub top_n: usize,
    pub summary: NetworkSummary,
}

impl ChartViews {
    pub fn build(dataset: &NetworkDataset, config: &ViewerConfig) -> Self {
        let rx = powered_rx(&dataset.onts);
        Self {
            histogram: Histogram::from_values(&rx, config.histogram_bins),
            powered_count: rx.len(),
            scatter: StatusGroups::partition(&dataset.onts),
            rxmin_dbm: config.rxmin_dbm,
            faults: splitter_faults(&dataset.splitters),
            worst: worst_by_margin(&dataset.onts, config.top_n)
                .into_iter()
                .map(MarginBar::from)
                .collect(),
            top_n: config.top_n,
            summary: NetworkSummary::from_onts(&dataset.onts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ont(id: i64, dist: f64, rx: f64, margin: f64, status: OntStatus) -> OntRecord {
        OntRecord {
            ont_id: id,
            total_dist_km: dist,
            total_loss_db: 0.0,
            rx_dbm: rx,
            margin_db: margin,
            status,
            path: None,
        }
    }

    fn scenario() -> Vec<OntRecord> {
        vec![
            ont(1, 2.0, -20.0, -5.0, OntStatus::Ok),
            ont(2, 5.0, -30.0, -5.0, OntStatus::Down),
            ont(3, 1.0, -10.0, 15.0, OntStatus::Ok),
        ]
    }

    #[test]
    fn test_powered_rx_excludes_down() {
        let onts = scenario();
        assert_eq!(powered_rx(&onts), vec![-20.0, -10.0]);

        let cfg = ViewerConfig::default();
        let views = ChartViews::build(&NetworkDataset::new(onts, Vec::new()), &cfg);
        assert_eq!(views.powered_count, 2);
        assert_eq!(views.histogram.total(), 2);
    }

    #[test]
    fn test_worst_by_margin_scenario() {
        let onts = scenario();
        let worst = worst_by_margin(&onts, 2);
        let ids: Vec<i64> = worst.iter().map(|o| o.ont_id).collect();
        // ONT 1 and ONT 2 tie at -5.0; file order decides.
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_worst_by_margin_sorted_and_bounded() {
        let onts: Vec<OntRecord> = [3.0, -7.5, 0.0, -7.5, 12.0, -1.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, &m)| ont(i as i64 + 1, 1.0, -25.0 + m, m, OntStatus::Ok))
            .collect();

        let worst = worst_by_margin(&onts, 5);
        assert_eq!(worst.len(), 5);
        assert!(worst.windows(2).all(|w| w[0].margin_db <= w[1].margin_db));
        assert_eq!(worst[0].ont_id, 2);
        assert_eq!(worst[1].ont_id, 4);

        assert_eq!(worst_by_margin(&onts[..3], 5).len(), 3);
        assert!(worst_by_margin(&[], 5).is_empty());
    }

    #[test]
    fn test_worst_by_margin_signed_zero_keeps_file_order() {
        let pos: f64 = "0.0000".parse().unwrap();
        let neg: f64 = "-0.0000".parse().unwrap();
        assert_eq!(pos, neg);
        let onts = vec![
            ont(1, 1.0, -25.0, pos, OntStatus::Ok),
            ont(2, 1.0, -25.0, neg, OntStatus::Ok),
            ont(3, 1.0, -26.0, -1.0, OntStatus::Fail),
        ];
        let ids: Vec<i64> = worst_by_margin(&onts, 3).iter().map(|o| o.ont_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_margin_bar_annotation() {
        let bar = MarginBar::from(&ont(42, 9.0, -27.349, -2.349, OntStatus::Fail));
        assert_eq!(bar.label, "ONT 42");
        assert_eq!(bar.rx_text(), "RX -27.3");
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values = [-28.0, -25.0, -22.5, -20.0, -18.0, -16.0];
        let h = Histogram::from_values(&values, 12);
        assert_eq!(h.counts.len(), 12);
        assert_eq!(h.edges.len(), 13);
        assert_eq!(h.total(), values.len());
        assert_eq!(h.edges[0], -28.0);
        assert!((h.edges[12] - -16.0).abs() < 1e-9);
        // Maximum lands in the last, closed bin.
        assert_eq!(h.counts[11], 1);
        assert_eq!(h.counts[0], 1);
        assert!((h.bin_width() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_single_value_and_empty() {
        let h = Histogram::from_values(&[-21.0, -21.0], 12);
        assert_eq!(h.total(), 2);
        assert_eq!(h.edges[0], -21.5);

        // Distinct values, however close, keep their own range.
        let tight = Histogram::from_values(&[0.0, 1e-300], 4);
        assert_eq!(tight.edges[0], 0.0);
        assert_eq!(tight.edges[4], 1e-300);
        assert_eq!(tight.counts, vec![1, 0, 0, 1]);

        let empty = Histogram::from_values(&[], 12);
        assert!(empty.is_empty());
        assert_eq!(empty.bins().count(), 0);
        assert_eq!(empty.bin_width(), 0.0);
    }

    #[test]
    fn test_status_groups_partition() {
        let mut onts = scenario();
        onts.push(ont(4, 20.0, -27.0, -2.0, OntStatus::Fail));
        let groups = StatusGroups::partition(&onts);
        assert_eq!(groups.ok, vec![[2.0, -20.0], [1.0, -10.0]]);
        assert_eq!(groups.fail, vec![[20.0, -27.0]]);
        assert_eq!(groups.get(OntStatus::Down), &[[5.0, -30.0]]);
    }

    #[test]
    fn test_splitter_faults_empty() {
        assert!(splitter_faults(&[]).is_empty());
    }

    #[test]
    fn test_splitter_faults_not_reconciled() {
        let s = SplitterRecord {
            name: "SPL-3".into(),
            ratio: 16,
            ont_count: 16,
            ok_count: 10,
            fail_count: 2,
            down_count: 1,
            avg_rx_dbm: -22.0,
            avg_loss_db: 25.0,
            worst_rx_dbm: -27.0,
        };
        let faults = splitter_faults(&[s]);
        assert_eq!(faults[0].label, "SPL-3 (1:16)");
        assert_eq!(faults[0].bad, 3);
    }

    #[test]
    fn test_summary() {
        let s = NetworkSummary::from_onts(&scenario());
        assert_eq!(s.ont_count, 3);
        assert_eq!((s.ok_count, s.fail_count, s.down_count), (2, 0, 1));
        let (best, worst, avg) = s.rx_range.unwrap();
        assert_eq!(best, -10.0);
        assert_eq!(worst, -30.0);
        assert!((avg - -20.0).abs() < 1e-9);

        assert_eq!(NetworkSummary::from_onts(&[]).rx_range, None);
    }

    #[test]
    fn test_views_all_down_and_empty() {
        let cfg = ViewerConfig::default();
        let all_down = vec![ont(1, 3.0, -40.0, -15.0, OntStatus::Down)];
        let views = ChartViews::build(&NetworkDataset::new(all_down, Vec::new()), &cfg);
        assert!(views.histogram.is_empty());
        assert_eq!(views.worst.len(), 1);

        let empty = ChartViews::build(&NetworkDataset::default(), &cfg);
        assert!(empty.faults.is_empty());
        assert!(empty.worst.is_empty());
        assert_eq!(empty.summary, NetworkSummary::default());
    }
}
