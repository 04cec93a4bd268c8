//! On-disk persistence helpers
//!
//! Records are replaced atomically: the new content goes to a sibling
//! `.tmp` file which is then renamed over the old one, so a crash mid-write
//! never leaves a torn favorites record behind.

use crate::config::app::NAME;
use crate::error::{AppError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Per-user directory holding favorites, settings and the log
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(NAME))
        .ok_or_else(|| AppError::Config("No config directory for this user (is HOME set?)".to_string()))
}

/// Turn an io error into something a user can act on
fn describe(action: &str, path: &Path, e: io::Error) -> AppError {
    let reason = match e.kind() {
        ErrorKind::PermissionDenied => "permission denied".to_string(),
        ErrorKind::ReadOnlyFilesystem => "filesystem is read-only".to_string(),
        _ => e.to_string(),
    };
    AppError::Config(format!("Cannot {} {}: {}", action, path.display(), reason))
}

/// Sibling path the next version of `path` is staged in
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Contents of `path`, or `None` when there is no such file
pub fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(describe("read", path, e)),
    }
}

/// Replace `path` with `content` in one step
///
/// Parent directories are created as needed. If staging fails the
/// previous file is left untouched.
pub fn replace_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| describe("create", parent, e))?;
    }

    let staged = staging_path(path);
    let written = File::create(&staged).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&staged);
        return Err(describe("write", &staged, e));
    }

    fs::rename(&staged, path).map_err(|e| {
        let _ = fs::remove_file(&staged);
        describe("replace", path, e)
    })
}

/// Parse a JSON document; missing or blank files give `None`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let Some(content) = read_text(path)? else {
        return Ok(None);
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| AppError::Config(format!("{} is not valid: {}", path.display(), e)))
}

/// Write `data` as pretty JSON, atomically
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::Config(format!("Cannot encode {}: {}", path.display(), e)))?;
    replace_text(path, &content)
}
