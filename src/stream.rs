//! Input providers and output sinks for the pipe runner.
//!
//! [`SourceSpec`] and [`SinkSpec`] name where text comes from and goes
//! to; their `open` methods resolve each selection once into the concrete
//! handle ([`LineInput`], [`Output`]) that the runner owns exclusively
//! for the duration of a run. Exactly one of each is active per run, and
//! both default to the process's standard streams.
//!
//! Verbosity-gated diagnostics are emitted on stderr via the global
//! display level.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::displaylevel;

// ---------------------------------------------------------------------------
// Stream selection
// ---------------------------------------------------------------------------

/// Where input lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// The process's standard input.
    Standard,
    /// An explicitly named file, opened for reading.
    File(PathBuf),
}

/// Where produced text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSpec {
    /// The process's standard output.
    Standard,
    /// An explicitly named file, created or truncated for writing.
    File(PathBuf),
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Standard => f.write_str("standard input"),
            SourceSpec::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Display for SinkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkSpec::Standard => f.write_str("standard output"),
            SinkSpec::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl SourceSpec {
    /// Resolve this selection into an open [`LineInput`].
    pub fn open(&self) -> io::Result<LineInput> {
        match self {
            SourceSpec::Standard => {
                displaylevel!(4, "using standard input\n");
                Ok(LineInput::from_reader(io::stdin().lock(), false))
            }
            SourceSpec::File(path) => {
                displaylevel!(4, "reading from {}\n", path.display());
                let f = File::open(path)?;
                Ok(LineInput::from_reader(BufReader::new(f), true))
            }
        }
    }
}

impl SinkSpec {
    /// Resolve this selection into an open [`Output`].
    pub fn open(&self) -> io::Result<Output> {
        match self {
            SinkSpec::Standard => {
                displaylevel!(4, "using standard output\n");
                Ok(Output::from_writer(io::stdout()))
            }
            SinkSpec::File(path) => {
                displaylevel!(4, "writing to {}\n", path.display());
                let f = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                Ok(Output::from_writer(BufWriter::new(f)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved handles
// ---------------------------------------------------------------------------

/// A resolved, readable line sequence.
pub struct LineInput {
    reader: Box<dyn BufRead>,
    /// `true` when the source was an explicitly named file.
    pub from_file: bool,
}

impl LineInput {
    /// Wrap an arbitrary reader. `from_file` records whether the source
    /// was named explicitly on the command line.
    pub fn from_reader(reader: impl BufRead + 'static, from_file: bool) -> Self {
        Self {
            reader: Box::new(reader),
            from_file,
        }
    }

    /// Return the next raw line with its terminator intact, or `None`
    /// once the source is exhausted. A final line without a terminator is
    /// still returned.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// A resolved, writable destination for produced text.
pub struct Output {
    sink: Box<dyn Write>,
}

impl Output {
    /// Wrap an arbitrary writer.
    pub fn from_writer(sink: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Write `text` exactly as given, with no added formatting.
    ///
    /// This is the only sanctioned way for hooks to produce output, so
    /// that everything a tool emits honors the resolved sink selection.
    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.sink.write_all(text.as_bytes())
    }

    /// Flush buffered output through to the underlying destination.
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

// ---------------------------------------------------------------------------
// Line terminators
// ---------------------------------------------------------------------------

/// Remove exactly one trailing line terminator (`\r\n` or `\n`) from
/// `line`. Text without a trailing terminator is returned unchanged.
pub fn strip_line_terminator(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        stripped
    } else if let Some(stripped) = line.strip_suffix('\n') {
        stripped
    } else {
        line
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
