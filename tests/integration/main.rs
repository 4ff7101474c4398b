#[path = "../common/mod.rs"]
mod common;

mod cli_run;
mod error_handling;
mod fs_abstraction;
