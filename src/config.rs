// config.rs — Compile-time configuration constants.

/// Marker prepended to every raw input line re-emitted by `-e`/`--echo`.
pub const ECHO_MARK: &str = "#> ";

/// Default display level.
/// 0 = silent; 1 = errors only; 2 = normal; 3 = info; 4 = verbose.
/// Can be overridden by the `LINEPIPE_VERBOSITY` environment variable at
/// runtime, or adjusted per invocation with `-v` / `-q`.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

/// Highest meaningful display level.
pub const DISPLAY_LEVEL_MAX: u32 = 4;
