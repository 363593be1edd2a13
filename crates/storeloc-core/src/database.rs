//! Dataset file I/O.
//!
//! The dataset is a single JSON array of [`StoreRecord`]s, written once by
//! the scraper and read once at server startup.

use std::path::Path;

use crate::error::DatabaseError;
use crate::records::StoreRecord;

/// Read the dataset file at `path`.
///
/// # Errors
///
/// Returns [`DatabaseError::Io`] if the file cannot be read and
/// [`DatabaseError::Json`] if it is not a JSON array of store records.
pub fn load_database(path: &Path) -> Result<Vec<StoreRecord>, DatabaseError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatabaseError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| DatabaseError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write `records` to `path`, replacing any existing file.
///
/// Parent directories are created when missing.
///
/// # Errors
///
/// Returns [`DatabaseError::Io`] if the file or its parent directory cannot
/// be written.
pub fn save_database(path: &Path, records: &[StoreRecord]) -> Result<(), DatabaseError> {
    let io_err = |source| DatabaseError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let body = serde_json::to_string_pretty(records).map_err(|e| DatabaseError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, body).map_err(io_err)
}
