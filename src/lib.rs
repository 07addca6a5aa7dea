// linepipe — scaffold for Unix-style line-oriented filter tools

pub mod cli;
pub mod config;
pub mod runner;
pub mod stream;

// ── Version constants ─────────────────────────────────────────────────────────
pub const LINEPIPE_VERSION_MAJOR: u32 = 0;
pub const LINEPIPE_VERSION_MINOR: u32 = 1;
pub const LINEPIPE_VERSION_RELEASE: u32 = 0;
pub const LINEPIPE_VERSION_NUMBER: u32 = LINEPIPE_VERSION_MAJOR * 100 * 100
    + LINEPIPE_VERSION_MINOR * 100
    + LINEPIPE_VERSION_RELEASE;
pub const LINEPIPE_VERSION_STRING: &str = "0.1.0";

/// Returns the runtime version number.
pub fn version_number() -> u32 {
    LINEPIPE_VERSION_NUMBER
}

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    LINEPIPE_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use runner::{LineHandler, PipeRunner, RunOutcome};
pub use stream::{strip_line_terminator, LineInput, Output, SinkSpec, SourceSpec};
