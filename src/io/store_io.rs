use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::model::config::StoreFormat;
use crate::model::store::TaskStore;
use crate::parse::{parse_json_store, parse_store, serialize_json_store, serialize_store};

/// File name of the legacy JSON store looked for next to a text store
pub const LEGACY_JSON_NAME: &str = "todo.json";

/// Error type for store I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON store {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write backup {path}: {source}")]
    BackupError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A store location together with its encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFile {
    pub path: PathBuf,
    pub format: StoreFormat,
}

impl StoreFile {
    /// Use `format` when given, otherwise infer it from the extension.
    pub fn new(path: impl Into<PathBuf>, format: Option<StoreFormat>) -> Self {
        let path = path.into();
        let format = format.unwrap_or_else(|| format_for_path(&path));
        StoreFile { path, format }
    }

    /// Directory holding the store (and its `.tododump/`)
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// `.json` files are JSON stores, anything else is text
pub fn format_for_path(path: &Path) -> StoreFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => StoreFormat::Json,
        _ => StoreFormat::Text,
    }
}

/// How `load_store` obtained its store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Read from the store file
    Loaded,
    /// No store file yet
    Missing,
    /// Imported from a sibling legacy JSON store
    Migrated,
    /// The file could not be read or decoded; the store is empty
    Failed(String),
}

/// Load the store. Never fails: any read or decode problem yields an
/// empty store and a `Failed` status.
pub fn load_store(file: &StoreFile, now: NaiveDateTime) -> (TaskStore, LoadStatus) {
    if !file.path.exists() {
        if file.format == StoreFormat::Text {
            let legacy = file.dir().join(LEGACY_JSON_NAME);
            if legacy.is_file() {
                match read_store(&legacy, StoreFormat::Json, now) {
                    Ok(store) => {
                        info!(from = %legacy.display(), to = %file.path.display(), "migrating legacy JSON store");
                        return (store, LoadStatus::Migrated);
                    }
                    Err(e) => {
                        warn!(error = %e, "could not import legacy store, starting empty");
                        return (TaskStore::at(now), LoadStatus::Failed(e.to_string()));
                    }
                }
            }
        }
        debug!(path = %file.path.display(), "no store file, starting empty");
        return (TaskStore::at(now), LoadStatus::Missing);
    }

    match read_store(&file.path, file.format, now) {
        Ok(store) => {
            debug!(
                path = %file.path.display(),
                todo = store.todo().len(),
                done = store.done().len(),
                "loaded store"
            );
            (store, LoadStatus::Loaded)
        }
        Err(e) => {
            warn!(error = %e, "could not load store, starting empty");
            (TaskStore::at(now), LoadStatus::Failed(e.to_string()))
        }
    }
}

fn read_store(path: &Path, format: StoreFormat, now: NaiveDateTime) -> Result<TaskStore, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let source = String::from_utf8_lossy(&bytes);
    match format {
        StoreFormat::Text => Ok(parse_store(&source, now)),
        StoreFormat::Json => {
            let (store, forced) =
                parse_json_store(&source, now).map_err(|e| StoreError::JsonError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if forced {
                debug!(path = %path.display(), "store version differs, recomputed task info");
            }
            Ok(store)
        }
    }
}

/// Encode the store in the given format
pub fn encode_store(store: &TaskStore, file: &StoreFile) -> Result<String, StoreError> {
    match file.format {
        StoreFormat::Text => Ok(serialize_store(store)),
        StoreFormat::Json => serialize_json_store(store).map_err(|e| StoreError::JsonError {
            path: file.path.clone(),
            source: e,
        }),
    }
}

/// Sort, encode and atomically write the store. Returns the written blob
/// so a backup can be taken of exactly what landed on disk.
pub fn save_store(store: &mut TaskStore, file: &StoreFile) -> Result<String, StoreError> {
    store.sort();
    let blob = encode_store(store, file)?;

    let write_err = |e: io::Error| StoreError::WriteError {
        path: file.path.clone(),
        source: e,
    };
    fs::create_dir_all(file.dir()).map_err(write_err)?;
    atomic_write(&file.path, blob.as_bytes()).map_err(write_err)?;
    debug!(path = %file.path.display(), bytes = blob.len(), "saved store");
    Ok(blob)
}

/// Write `content` to a temp file in the target's directory, then rename
/// it over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
