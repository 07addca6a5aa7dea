//! Command-line interface for tools built on the pipe runner.
//!
//! This module organises the CLI pipeline:
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Tool identity string and the shared display-level atomic (`DISPLAY_LEVEL`) with its environment initialiser. |
//! | [`args`]      | Option surface assembly and the pure argv → [`args::Config`] resolution, including stream-handle opening. |
//!
//! Typical call sequence: `args::build_command` → `args::configure_from` →
//! hand the resulting [`args::Config`] to the runner.

pub mod args;
pub mod constants;
