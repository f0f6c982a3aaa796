use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

use tracing::debug;

/// Error type for the external editor round trip
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("could not parse editor command {command:?}: {source}")]
    BadCommand {
        command: String,
        source: shell_words::ParseError,
    },
    #[error("could not run editor {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },
    #[error("editor exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("temp file error: {0}")]
    TempFile(#[from] std::io::Error),
}

/// The configured editor, else `$VISUAL`, `$EDITOR`, then `vi`
pub fn resolve_editor_command(configured: Option<&str>) -> String {
    if let Some(cmd) = configured.filter(|c| !c.trim().is_empty()) {
        return cmd.to_string();
    }
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".into())
}

/// Hand `initial` to `editor` in a temp file and return what was saved.
pub fn edit_text(editor: &str, initial: &str) -> Result<String, EditorError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".todotempedit")
        .suffix(".txt")
        .tempfile()?;
    tmp.write_all(initial.as_bytes())?;
    tmp.flush()?;

    let mut parts = shell_words::split(editor).map_err(|e| EditorError::BadCommand {
        command: editor.to_string(),
        source: e,
    })?;
    if parts.is_empty() {
        parts.push(editor.to_string());
    }
    let program = parts.remove(0);

    debug!(%program, path = %tmp.path().display(), "launching editor");
    let status = Command::new(&program)
        .args(&parts)
        .arg(tmp.path())
        .status()
        .map_err(|e| EditorError::Launch {
            program: program.clone(),
            source: e,
        })?;
    if !status.success() {
        return Err(EditorError::Failed(status));
    }

    let bytes = fs::read(tmp.path())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
