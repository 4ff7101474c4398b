// src/push/mod.rs

//! Push-level inputs to the optimizer.
//!
//! - [`context`]: the immutable description of the push.
//! - [`backstop`]: cadence rules that force a full run.
//! - [`io`]: loaders for context, backstop state and changed files.

pub mod backstop;
pub mod context;
pub mod io;

pub use backstop::{is_backstop, BackstopPolicy, BackstopReason, BackstopState};
pub use context::PushContext;
