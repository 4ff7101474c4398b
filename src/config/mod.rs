// src/config/mod.rs

//! Configuration loading and validation for taskprune.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate invariants and resolve durations (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_with_fs, parse_config,
};
pub use model::{
    BackstopSection, ConfigFile, CoverageSection, ExclusionSection, OptimizerSection,
    RawConfigFile,
};
