use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::io::store_io::{StoreError, StoreFile};

/// Snapshot directory, created next to the store file
pub const BACKUP_DIR: &str = ".tododump";

/// Where the snapshot taken at `at` goes:
/// `<store dir>/.tododump/YYYYMMDDHHMMSS.<txt|json>.gz`
pub fn backup_path(file: &StoreFile, at: NaiveDateTime) -> PathBuf {
    let name = format!(
        "{}.{}.gz",
        at.format("%Y%m%d%H%M%S"),
        file.format.extension()
    );
    file.dir().join(BACKUP_DIR).join(name)
}

/// Write a gzip-compressed copy of the just-saved `blob`
pub fn write_backup(file: &StoreFile, blob: &str, at: NaiveDateTime) -> Result<PathBuf, StoreError> {
    let path = backup_path(file, at);
    let backup_err = |e: std::io::Error| StoreError::BackupError {
        path: path.clone(),
        source: e,
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(backup_err)?;
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(blob.as_bytes()).map_err(backup_err)?;
    let compressed = encoder.finish().map_err(backup_err)?;
    fs::write(&path, compressed).map_err(backup_err)?;

    debug!(path = %path.display(), "wrote backup");
    Ok(path)
}
