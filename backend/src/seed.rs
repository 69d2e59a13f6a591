//! Startup record seeding.
//!
//! Loads a JSON array of `{"name": ...}` objects and stores it through the
//! record service, so seeded names are validated like any other batch: one
//! invalid name rejects the whole file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::AnimeCommand;
use crate::domain::{AnimeDraft, Error};

/// Errors returned while seeding records at startup.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Seed file could not be opened.
    #[error("failed to read seed file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Seed file is not a JSON array of records.
    #[error("failed to parse seed file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The record service refused the batch.
    #[error("seed records rejected: {0}")]
    Rejected(#[source] Error),
}

#[derive(Debug, Deserialize)]
struct SeedRecord {
    name: String,
}

/// Insert the records listed in `path`, returning how many were stored.
pub async fn seed_records_on_startup(
    path: &Path,
    commands: &dyn AnimeCommand,
) -> Result<usize, StartupSeedingError> {
    let file = File::open(path).map_err(|source| StartupSeedingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<SeedRecord> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            StartupSeedingError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let drafts = records
        .into_iter()
        .map(|record| AnimeDraft::new(record.name))
        .collect();
    let stored = commands
        .save_all(drafts)
        .await
        .map_err(StartupSeedingError::Rejected)?;
    info!(path = %path.display(), count = stored.len(), "seed records applied");
    Ok(stored.len())
}
