use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk encoding of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    /// Blank-line separated blocks with `@due` / `@done` markers
    Text,
    /// Legacy `{"todo", "done", "info", "version"}` document
    Json,
}

impl StoreFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StoreFormat::Text => "txt",
            StoreFormat::Json => "json",
        }
    }
}

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    #[default]
    Auto,
    Always,
    Never,
}

/// Configuration from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default store file
    #[serde(default)]
    pub store: Option<PathBuf>,
    /// Store encoding; inferred from the file extension when absent
    #[serde(default)]
    pub format: Option<StoreFormat>,
    /// Editor command line for `edit`
    #[serde(default)]
    pub editor: Option<String>,
    /// Write gzip snapshots to `.tododump/` after each change
    #[serde(default = "default_true")]
    pub backups: bool,
    #[serde(default)]
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: None,
            format: None,
            editor: None,
            backups: true,
            color: ColorMode::Auto,
        }
    }
}

fn default_true() -> bool {
    true
}
