//! Binary entry point for the `linepipe` command-line tool.
//!
//! The smallest useful tool buildable on the runner scaffold: a
//! pass-through filter that copies each input line to the output sink
//! unchanged. It works as a neutral pipe stage
//! (`generator | linepipe | consumer`), and with `--echo` it marks where
//! the output generated for each input line begins and ends.

use anyhow::Result;
use linepipe::runner::{LineHandler, PipeRunner};
use linepipe::stream::Output;

const DESCRIPTION: &str = "Copy lines from standard input or a named file to standard output \
     or a named file, one line at a time.";

/// Writes each stripped input line back out, one per line.
struct Passthrough;

impl LineHandler for Passthrough {
    fn on_line(&mut self, line: &str, out: &mut Output) -> Result<()> {
        out.write_str(line)?;
        out.write_str("\n")?;
        Ok(())
    }
}

/// Returns the process exit code (0 = success, non-zero = error).
fn run() -> i32 {
    let mut runner = PipeRunner::new(DESCRIPTION);
    match runner.run(&mut Passthrough) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("linepipe: {e}");
            1
        }
    }
}

fn main() {
    std::process::exit(run());
}
