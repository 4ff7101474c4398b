// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (intervals, durations, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - a zero backstop push interval or worker count,
///   - unparseable `min_interval` durations,
///   - empty attribute names / kinds.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Parse and validate TOML config text.
pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    let raw: RawConfigFile = toml::from_str(contents)?;
    ConfigFile::try_from(raw)
}

/// Like [`load_and_validate`], but reads through a [`FileSystem`] and a
/// missing file yields the built-in defaults instead of an error.
pub fn load_with_fs(fs: &dyn FileSystem, path: &Path) -> Result<ConfigFile> {
    if !fs.exists(path) {
        debug!(path = %path.display(), "no config file found; using defaults");
        return Ok(ConfigFile::default());
    }
    parse_config(&fs.read_to_string(path)?)
}

/// Default config location: `Taskprune.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskprune.toml")
}
