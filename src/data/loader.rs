use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::model::{CsvSchema, NetworkDataset, OntRecord, SplitterRecord};
use crate::config::ViewerConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: line {line}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn open_error(path: &Path, source: io::Error) -> LoadError {
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn parse_error(path: &Path, source: csv::Error) -> LoadError {
    let line = source.position().map(|p| p.line()).unwrap_or(0);
    LoadError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both result tables from the configured data directory.
///
/// The ONT table is read first; neither table is cross-checked against
/// the other.
pub fn load_dataset(config: &ViewerConfig) -> Result<NetworkDataset, LoadError> {
    let onts = load_ont_csv(&config.ont_path())?;
    let splitters = load_splitter_csv(&config.splitter_path())?;

    for s in splitters.iter().filter(|s| !s.tallies_consistent()) {
        log::warn!(
            "Splitter '{}': ok+fail+down = {} but ont_count = {}",
            s.name,
            s.tallied_count(),
            s.ont_count
        );
    }

    log::info!(
        "Loaded {} ONT rows and {} splitter rows from {}",
        onts.len(),
        splitters.len(),
        config.data_dir.display()
    );
    Ok(NetworkDataset::new(onts, splitters))
}

pub fn load_ont_csv(path: &Path) -> Result<Vec<OntRecord>, LoadError> {
    load_records(path)
}

pub fn load_splitter_csv(path: &Path) -> Result<Vec<SplitterRecord>, LoadError> {
    load_records(path)
}

/// Read a headed CSV table into typed rows, preserving file order.
pub fn load_records<T>(path: &Path) -> Result<Vec<T>, LoadError>
where
    T: CsvSchema + DeserializeOwned,
{
    // The handle is dropped as soon as all rows are read.
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    read_records(file, path)
}

/// Write rows back out with a header line.  An empty slice still produces
/// the header so the file stays loadable.
pub fn write_records<T>(path: &Path, records: &[T]) -> Result<(), LoadError>
where
    T: CsvSchema + Serialize,
{
    let write_error = |source: csv::Error| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    if records.is_empty() {
        writer.write_record(T::COLUMNS).map_err(write_error)?;
    }
    for record in records {
        writer.serialize(record).map_err(write_error)?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// `path` is only used for error messages.
fn read_records<T, R>(input: R, path: &Path) -> Result<Vec<T>, LoadError>
where
    T: CsvSchema + DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(path, e))?
        .clone();

    if let Some(column) = T::COLUMNS
        .iter()
        .copied()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| parse_error(path, e)))
        .collect()
}
