use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::io::store_io::StoreFile;
use crate::model::config::{Config, StoreFormat};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "TASQ_CONFIG";

const APP_DIR: &str = "tasq";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `$TASQ_CONFIG`, else `<config dir>/tasq/config.toml`
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Read the config at `path`. A missing file gives the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the config from its default location
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

/// `<data dir>/tasq/todo.txt`, falling back to the working directory
pub fn default_store_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR).join("todo.txt"),
        None => PathBuf::from("todo.txt"),
    }
}

/// Pick the store file. Precedence: explicit path, `--here` (in `cwd`),
/// the config's `store`, the default location.
pub fn resolve_store(config: &Config, explicit: Option<&Path>, here: bool, cwd: &Path) -> StoreFile {
    let path = if let Some(path) = explicit {
        path.to_path_buf()
    } else if here {
        let ext = config.format.unwrap_or(StoreFormat::Text).extension();
        cwd.join(format!("todo.{}", ext))
    } else if let Some(ref path) = config.store {
        path.clone()
    } else {
        default_store_path()
    };
    StoreFile::new(path, config.format)
}
