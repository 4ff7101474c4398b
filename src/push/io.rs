// src/push/io.rs

//! Loading push-level inputs: the push context, the last backstop record and
//! the list of files changed by the push.

use std::path::Path;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::push::backstop::BackstopState;
use crate::push::context::PushContext;

pub fn load_push_context(fs: &dyn FileSystem, path: &Path) -> Result<PushContext> {
    let contents = fs.read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn load_backstop_state(fs: &dyn FileSystem, path: &Path) -> Result<BackstopState> {
    let contents = fs.read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// One repository-relative path per line. Blank lines and `#` comments are
/// skipped; backslashes are normalised to forward slashes.
pub fn parse_changed_files(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.replace('\\', "/"))
        .collect()
}

pub fn load_changed_files(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    let contents = fs.read_to_string(path)?;
    Ok(parse_changed_files(&contents))
}
