//! Writes a synthetic `ont_results.csv` / `splitter_results.csv` pair so the
//! viewer can be tried without the link-budget simulator.
//!
//! Usage: `generate-sample [OUTPUT_DIR]` (defaults to the current directory).

use std::path::PathBuf;

use anyhow::{Context, Result};

use ftth_viewer::config::{ONT_RESULTS_FILE, RXMIN_DBM, SPLITTER_RESULTS_FILE};
use ftth_viewer::data::loader::write_records;
use ftth_viewer::data::model::{OntRecord, OntStatus, SplitterRecord};

const OLT_TX_DBM: f64 = 5.0;
const FIBER_DB_PER_KM: f64 = 0.35;
const CONNECTOR_LOSS_DB: f64 = 1.0;
/// Chance that a whole distribution branch is cut.
const BRANCH_DOWN_PROB: f64 = 0.15;
/// Chance that a single drop is cut.
const DROP_DOWN_PROB: f64 = 0.03;

/// Typical insertion loss of a PLC splitter.
fn splitter_loss_db(ratio: u32) -> f64 {
    match ratio {
        2 => 3.7,
        4 => 7.3,
        8 => 10.5,
        16 => 13.7,
        32 => 17.1,
        64 => 20.5,
        other => 3.4 * (other as f64).log2(),
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Running per-splitter tally over the terminals below it.
#[derive(Default)]
struct Tally {
    ont_count: u32,
    ok: u32,
    fail: u32,
    down: u32,
    sum_rx: f64,
    sum_loss: f64,
    worst_rx: Option<f64>,
}

impl Tally {
    fn add(&mut self, ont: &OntRecord) {
        self.ont_count += 1;
        match ont.status {
            OntStatus::Ok => self.ok += 1,
            OntStatus::Fail => self.fail += 1,
            OntStatus::Down => self.down += 1,
        }
        self.sum_rx += ont.rx_dbm;
        self.sum_loss += ont.total_loss_db;
        self.worst_rx = Some(self.worst_rx.map_or(ont.rx_dbm, |w| w.min(ont.rx_dbm)));
    }

    fn merge(&mut self, other: &Tally) {
        self.ont_count += other.ont_count;
        self.ok += other.ok;
        self.fail += other.fail;
        self.down += other.down;
        self.sum_rx += other.sum_rx;
        self.sum_loss += other.sum_loss;
        self.worst_rx = match (self.worst_rx, other.worst_rx) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    fn into_record(self, name: String, ratio: u32) -> SplitterRecord {
        let n = f64::from(self.ont_count.max(1));
        SplitterRecord {
            name,
            ratio,
            ont_count: self.ont_count,
            ok_count: self.ok,
            fail_count: self.fail,
            down_count: self.down,
            avg_rx_dbm: round4(self.sum_rx / n),
            avg_loss_db: round4(self.sum_loss / n),
            worst_rx_dbm: round4(self.worst_rx.unwrap_or(0.0)),
        }
    }
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Two-stage tree: one 1:4 feeder splitter, each output feeding a
    // distribution splitter with its own fan-out.
    let feeder_ratio = 4;
    let branch_ratios = [8u32, 16, 32, 16];
    let feeder_km = rng.uniform(3.0, 8.0);

    let mut onts: Vec<OntRecord> = Vec::new();
    let mut splitters: Vec<SplitterRecord> = Vec::new();
    let mut feeder = Tally::default();
    let mut next_id = 1i64;

    for (b, &ratio) in branch_ratios.iter().enumerate() {
        let branch_name = format!("SPL-1.{}", b + 1);
        let branch_km = rng.uniform(0.5, 6.0);
        let branch_down = rng.chance(BRANCH_DOWN_PROB);
        let mut branch = Tally::default();

        for _ in 0..ratio {
            let drop_km = rng.uniform(0.05, 1.5);
            let dist = feeder_km + branch_km + drop_km;
            let loss = dist * FIBER_DB_PER_KM
                + splitter_loss_db(feeder_ratio)
                + splitter_loss_db(ratio)
                + CONNECTOR_LOSS_DB
                + rng.uniform(0.0, 1.5);
            let rx = OLT_TX_DBM - loss;

            let status = if branch_down || rng.chance(DROP_DOWN_PROB) {
                OntStatus::Down
            } else if rx >= RXMIN_DBM {
                OntStatus::Ok
            } else {
                OntStatus::Fail
            };

            let ont = OntRecord {
                ont_id: next_id,
                total_dist_km: round4(dist),
                total_loss_db: round4(loss),
                rx_dbm: round4(rx),
                margin_db: round4(rx - RXMIN_DBM),
                status,
                path: Some(format!("OLT/SPL-1/{branch_name}/ONT#{next_id}")),
            };
            branch.add(&ont);
            onts.push(ont);
            next_id += 1;
        }

        feeder.merge(&branch);
        splitters.push(branch.into_record(branch_name, ratio));
    }
    // Children first, then the feeder splitter that aggregates them.
    splitters.push(feeder.into_record("SPL-1".to_string(), feeder_ratio));

    let ont_path = out_dir.join(ONT_RESULTS_FILE);
    write_records(&ont_path, &onts).context("writing ONT results")?;
    let splitter_path = out_dir.join(SPLITTER_RESULTS_FILE);
    write_records(&splitter_path, &splitters).context("writing splitter results")?;

    println!(
        "Wrote {} ONTs to {} and {} splitters to {}",
        onts.len(),
        ont_path.display(),
        splitters.len(),
        splitter_path.display()
    );
    Ok(())
}
