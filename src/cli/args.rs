//! Option surface and configuration resolution for pipe tools.
//!
//! [`build_command`] assembles the clap [`Command`] from a tool's
//! description string; [`configure_from`] parses an explicit argv into a
//! resolved [`Config`], opening the selected input and output streams on
//! the way. Parsing is pure over its argv argument, so it is callable
//! from tests without touching `std::env`.
//!
//! Help and version requests surface as `clap::Error` values with the
//! matching [`ErrorKind`]; deciding how to terminate stays with the
//! caller. A named file that cannot be opened is converted to an
//! [`ErrorKind::Io`] error so configuration failures share the parser's
//! standard error reporting.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::cli::constants::{init_display_level, set_display_level, TOOL_NAME};
use crate::config::DISPLAY_LEVEL_MAX;
use crate::stream::{LineInput, Output, SinkSpec, SourceSpec};

/// Resolved option state for one run.
///
/// Both stream handles are opened here, during configuration; the runner
/// never re-resolves them. Immutable once built.
pub struct Config {
    /// Opened input provider.
    pub input: LineInput,
    /// Opened output sink.
    pub output: Output,
    /// Re-emit each raw input line before dispatching it.
    pub echo: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("echo", &self.echo)
            .finish_non_exhaustive()
    }
}

/// Assemble the command-line definition for a tool described by
/// `description`. clap supplies `-h/--help` and `-V/--version`.
pub fn build_command(description: &str) -> Command {
    Command::new(TOOL_NAME)
        .about(description.to_owned())
        .version(crate::LINEPIPE_VERSION_STRING)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Read input from PATH instead of standard input"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Write output to PATH instead of standard output"),
        )
        .arg(
            Arg::new("echo")
                .short('e')
                .long("echo")
                .action(ArgAction::SetTrue)
                .help(
                    "Echo each raw input line, prefixed with \"#> \", before the \
                     output generated for that line",
                ),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Raise diagnostic verbosity (repeatable)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::Count)
                .help("Lower diagnostic verbosity (repeatable)"),
        )
}

/// Parse `argv` (argv[0] included) and resolve it into a [`Config`].
///
/// The input stream is opened before the output stream, so a failed input
/// open leaves the output untouched.
pub fn configure_from(cmd: &mut Command, argv: Vec<OsString>) -> Result<Config, clap::Error> {
    let matches = cmd.try_get_matches_from_mut(argv)?;

    // Display level: environment first, then per-invocation adjustment.
    let bump = matches.get_count("verbose") as i64 - matches.get_count("quiet") as i64;
    let level = (init_display_level() as i64 + bump).clamp(0, DISPLAY_LEVEL_MAX as i64);
    set_display_level(level as u32);

    let source = match matches.get_one::<PathBuf>("file") {
        Some(path) => SourceSpec::File(path.clone()),
        None => SourceSpec::Standard,
    };
    let sink = match matches.get_one::<PathBuf>("out") {
        Some(path) => SinkSpec::File(path.clone()),
        None => SinkSpec::Standard,
    };

    let input = source
        .open()
        .map_err(|e| cmd.error(ErrorKind::Io, format!("{source}: {e}")))?;
    let output = sink
        .open()
        .map_err(|e| cmd.error(ErrorKind::Io, format!("{sink}: {e}")))?;

    Ok(Config {
        input,
        output,
        echo: matches.get_flag("echo"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn option_surface_is_complete() {
        let cmd = build_command("test tool");
        let ids: Vec<&str> = cmd.get_arguments().map(|a| a.get_id().as_str()).collect();
        for id in ["file", "out", "echo", "verbose", "quiet"] {
            assert!(ids.contains(&id), "missing option: {id}");
        }
    }

    #[test]
    fn echo_defaults_to_off() {
        let mut cmd = build_command("test tool");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let config = configure_from(
            &mut cmd,
            argv(&["tool", "-o", out.to_str().unwrap()]),
        )
        .unwrap();
        assert!(!config.echo);
        assert!(!config.input.from_file);
    }

    #[test]
    fn echo_flag_enables_echo() {
        let mut cmd = build_command("test tool");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let config = configure_from(
            &mut cmd,
            argv(&["tool", "-e", "-o", out.to_str().unwrap()]),
        )
        .unwrap();
        assert!(config.echo);
    }

    #[test]
    fn named_input_file_marks_explicit_selection() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "one\n").unwrap();
        let out = dir.path().join("out.txt");

        let mut cmd = build_command("test tool");
        let config = configure_from(
            &mut cmd,
            argv(&[
                "tool",
                "-f",
                input.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ]),
        )
        .unwrap();
        assert!(config.input.from_file);
    }

    #[test]
    fn missing_input_file_is_an_io_error() {
        let mut cmd = build_command("test tool");
        let err = configure_from(
            &mut cmd,
            argv(&["tool", "--file", "/nonexistent/input.txt"]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/input.txt"));
    }

    #[test]
    fn help_request_surfaces_as_display_help() {
        let mut cmd = build_command("test tool");
        let err = configure_from(&mut cmd, argv(&["tool", "--help"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_request_surfaces_as_display_version() {
        let mut cmd = build_command("test tool");
        let err = configure_from(&mut cmd, argv(&["tool", "--version"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let mut cmd = build_command("test tool");
        let err = configure_from(&mut cmd, argv(&["tool", "--bogus"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_text_carries_the_description() {
        let mut cmd = build_command("reverse every line");
        let rendered = cmd.render_help().to_string();
        assert!(rendered.contains("reverse every line"));
        assert!(rendered.contains("--echo"));
    }
}
