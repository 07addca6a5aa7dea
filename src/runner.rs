//! The pipe runner: wires stream configuration to a tool's lifecycle
//! hooks.
//!
//! [`PipeRunner`] is the single control object of the crate. It owns the
//! command-line definition built from a tool's description and an
//! injectable interactivity probe. [`PipeRunner::run`] parses the command
//! line, decides between processing the stream and printing usage, and
//! drives the [`LineHandler`] hooks in order: start, one call per input
//! line, end.
//!
//! Processing is single-threaded and strictly sequential: one line is in
//! flight at a time, delivered in input order, and echo output for a line
//! lands in the sink before anything the per-line hook writes for it.

use std::ffi::OsString;
use std::io::IsTerminal;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Command;

use crate::cli::args::{build_command, configure_from, Config};
use crate::config::ECHO_MARK;
use crate::stream::{strip_line_terminator, Output};

// ---------------------------------------------------------------------------
// Hook interface
// ---------------------------------------------------------------------------

/// Behavior a concrete tool plugs into the runner.
///
/// Every hook defaults to doing nothing, so a tool overrides only what it
/// needs. Hooks produce output exclusively through
/// [`Output::write_str`], which honors the resolved output sink. The
/// runner does not intercept hook failures: the first `Err` ends the run
/// and propagates to the caller unchanged.
pub trait LineHandler {
    /// Called once, before the first line is read.
    fn on_start(&mut self, _out: &mut Output) -> Result<()> {
        Ok(())
    }

    /// Called once per input line, in input order. The line terminator
    /// has already been removed when this is called.
    fn on_line(&mut self, _line: &str, _out: &mut Output) -> Result<()> {
        Ok(())
    }

    /// Called once, after the last line. Typically used for trailing
    /// summary output.
    fn on_end(&mut self, _out: &mut Output) -> Result<()> {
        Ok(())
    }
}

/// How a completed invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The stream was processed through the hooks.
    Processed,
    /// Usage or version text was printed; no hook ran.
    UsageShown,
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}

/// The control object tying option parsing, stream resolution, and hooks
/// together. Single-use: create one per process invocation.
pub struct PipeRunner {
    command: Command,
    interactive: fn() -> bool,
}

impl PipeRunner {
    /// Create a runner. `description` is used solely for help text;
    /// construction has no other side effect.
    pub fn new(description: &str) -> Self {
        Self {
            command: build_command(description),
            interactive: stdin_is_terminal,
        }
    }

    /// Replace the probe that decides whether standard input is attached
    /// to an interactive terminal. Tests stub this to exercise the usage
    /// path without a real terminal.
    pub fn with_interactive_probe(mut self, probe: fn() -> bool) -> Self {
        self.interactive = probe;
        self
    }

    /// Run the tool against the process's real command line.
    pub fn run(&mut self, handler: &mut dyn LineHandler) -> Result<RunOutcome> {
        let argv: Vec<OsString> = std::env::args_os().collect();
        self.run_from(argv, handler)
    }

    /// Testable core of [`run`]: takes an explicit argv, argv[0]
    /// included.
    pub fn run_from(
        &mut self,
        argv: Vec<OsString>,
        handler: &mut dyn LineHandler,
    ) -> Result<RunOutcome> {
        let config = match configure_from(&mut self.command, argv) {
            Ok(config) => config,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.print()?;
                return Ok(RunOutcome::UsageShown);
            }
            Err(e) => return Err(e.into()),
        };

        // Process only when a file was named explicitly or input is
        // already piped/redirected; a bare invocation on a terminal would
        // otherwise block on a read that never comes.
        if config.input.from_file || !(self.interactive)() {
            self.process_stream(config, handler)?;
            Ok(RunOutcome::Processed)
        } else {
            self.command.print_help()?;
            Ok(RunOutcome::UsageShown)
        }
    }

    fn process_stream(&mut self, config: Config, handler: &mut dyn LineHandler) -> Result<()> {
        let Config {
            mut input,
            mut output,
            echo,
        } = config;

        handler.on_start(&mut output)?;
        while let Some(raw) = input.next_line()? {
            if echo {
                output.write_str(ECHO_MARK)?;
                output.write_str(&raw)?;
            }
            handler.on_line(strip_line_terminator(&raw), &mut output)?;
        }
        handler.on_end(&mut output)?;
        output.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Records every hook invocation in order.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl LineHandler for Recorder {
        fn on_start(&mut self, _out: &mut Output) -> Result<()> {
            self.events.push("start".to_owned());
            Ok(())
        }
        fn on_line(&mut self, line: &str, _out: &mut Output) -> Result<()> {
            self.events.push(format!("line:{line}"));
            Ok(())
        }
        fn on_end(&mut self, _out: &mut Output) -> Result<()> {
            self.events.push("end".to_owned());
            Ok(())
        }
    }

    /// Writes each stripped line back out followed by a newline.
    struct Passthrough;

    impl LineHandler for Passthrough {
        fn on_line(&mut self, line: &str, out: &mut Output) -> Result<()> {
            out.write_str(line)?;
            out.write_str("\n")?;
            Ok(())
        }
    }

    fn argv(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    /// Drive a runner over `contents` staged in a temp file, collecting
    /// whatever the run wrote to the `-o` target. The interactivity probe
    /// pretends stdin is a terminal, so processing only happens because
    /// the input file is named explicitly.
    fn run_file_to_file(
        contents: &str,
        extra: &[&str],
        handler: &mut dyn LineHandler,
    ) -> (RunOutcome, String) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, contents).unwrap();

        let mut args = vec![
            "tool",
            "-f",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);

        let outcome = PipeRunner::new("test tool")
            .with_interactive_probe(|| true)
            .run_from(argv(&args), handler)
            .unwrap();
        (outcome, fs::read_to_string(&output).unwrap())
    }

    #[test]
    fn hooks_run_in_order_once_per_line() {
        let mut recorder = Recorder::default();
        let (outcome, _) = run_file_to_file("a\nb\nc\n", &[], &mut recorder);
        assert_eq!(outcome, RunOutcome::Processed);
        assert_eq!(
            recorder.events,
            vec!["start", "line:a", "line:b", "line:c", "end"]
        );
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut recorder = Recorder::default();
        run_file_to_file("a\r\nb\r\n", &[], &mut recorder);
        assert_eq!(recorder.events, vec!["start", "line:a", "line:b", "end"]);
    }

    #[test]
    fn unterminated_final_line_is_delivered() {
        let mut recorder = Recorder::default();
        run_file_to_file("a\nb", &[], &mut recorder);
        assert_eq!(recorder.events, vec!["start", "line:a", "line:b", "end"]);
    }

    #[test]
    fn empty_input_still_runs_start_and_end() {
        let mut recorder = Recorder::default();
        let (outcome, written) = run_file_to_file("", &[], &mut recorder);
        assert_eq!(outcome, RunOutcome::Processed);
        assert_eq!(recorder.events, vec!["start", "end"]);
        assert_eq!(written, "");
    }

    #[test]
    fn passthrough_round_trip() {
        let (_, written) = run_file_to_file("a\nb\nc\n", &[], &mut Passthrough);
        assert_eq!(written, "a\nb\nc\n");
    }

    #[test]
    fn echo_interleaves_raw_lines_before_processed_output() {
        let (_, written) = run_file_to_file("a\nb\nc\n", &["-e"], &mut Passthrough);
        assert_eq!(written, "#> a\na\n#> b\nb\n#> c\nc\n");
    }

    #[test]
    fn no_echo_means_no_marker() {
        let (_, written) = run_file_to_file("a\nb\n", &[], &mut Passthrough);
        assert!(!written.contains("#> "));
    }

    #[test]
    fn echo_preserves_the_unterminated_raw_tail() {
        // The raw tail has no terminator, so the echoed text runs straight
        // into the processed output for the same line.
        let (_, written) = run_file_to_file("a", &["-e"], &mut Passthrough);
        assert_eq!(written, "#> aa\n");
    }

    #[test]
    fn missing_input_aborts_before_any_hook() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output.txt");
        let mut recorder = Recorder::default();

        let result = PipeRunner::new("test tool")
            .with_interactive_probe(|| true)
            .run_from(
                argv(&[
                    "tool",
                    "-f",
                    "/nonexistent/input.txt",
                    "-o",
                    output.to_str().unwrap(),
                ]),
                &mut recorder,
            );
        assert!(result.is_err());
        assert!(recorder.events.is_empty());
        // Input is opened before output, so nothing was written or created.
        assert!(!output.exists());
    }

    #[test]
    fn interactive_terminal_without_file_shows_usage() {
        let mut recorder = Recorder::default();
        let outcome = PipeRunner::new("test tool")
            .with_interactive_probe(|| true)
            .run_from(argv(&["tool"]), &mut recorder)
            .unwrap();
        assert_eq!(outcome, RunOutcome::UsageShown);
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn named_file_overrides_the_interactive_terminal() {
        let mut recorder = Recorder::default();
        let (outcome, _) = run_file_to_file("a\n", &[], &mut recorder);
        // run_file_to_file's probe claims a terminal; the explicit -f wins.
        assert_eq!(outcome, RunOutcome::Processed);
        assert_eq!(recorder.events, vec!["start", "line:a", "end"]);
    }

    #[test]
    fn help_flag_shows_usage_without_hooks() {
        let mut recorder = Recorder::default();
        let outcome = PipeRunner::new("test tool")
            .with_interactive_probe(|| false)
            .run_from(argv(&["tool", "--help"]), &mut recorder)
            .unwrap();
        assert_eq!(outcome, RunOutcome::UsageShown);
        assert!(recorder.events.is_empty());
    }

    /// Fails on the first per-line call, recording how far it got.
    #[derive(Default)]
    struct FailOnFirstLine {
        lines_seen: usize,
    }

    impl LineHandler for FailOnFirstLine {
        fn on_line(&mut self, _line: &str, _out: &mut Output) -> Result<()> {
            self.lines_seen += 1;
            anyhow::bail!("handler refused the line")
        }
    }

    #[test]
    fn hook_failure_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, "a\nb\n").unwrap();

        let mut handler = FailOnFirstLine::default();
        let result = PipeRunner::new("test tool")
            .with_interactive_probe(|| true)
            .run_from(
                argv(&[
                    "tool",
                    "-f",
                    input.to_str().unwrap(),
                    "-o",
                    output.to_str().unwrap(),
                ]),
                &mut handler,
            );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("handler refused the line"));
        assert_eq!(handler.lines_seen, 1, "second line must never be read");
    }

    #[test]
    fn runner_construction_has_no_side_effects() {
        // Constructing and dropping a runner must not create files or
        // touch the streams.
        let dir = tempfile::tempdir().unwrap();
        let marker: PathBuf = dir.path().join("untouched");
        let _runner = PipeRunner::new("test tool");
        assert!(!marker.exists());
    }
}
