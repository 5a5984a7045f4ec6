//! Converts source documents into HTML fragments. The builder only ever
//! talks to the [`Converter`] trait; [`Pandoc`] shells out to an external
//! program and [`Markdown`] converts in-process with [`pulldown_cmark`].

use pulldown_cmark::{html, Options, Parser};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

/// Turns the document at `source` into an HTML fragment.
pub trait Converter {
    fn convert(&self, source: &Path) -> Result<String>;
}

/// Runs `{program} -f markdown {source} -o {tmp}` and reads the fragment back
/// from `{tmp}`. Each call gets its own temporary output file which is removed
/// when the call returns.
#[derive(Clone, Debug)]
pub struct Pandoc {
    program: OsString,
}

impl Pandoc {
    /// Creates a converter which invokes `program` (a name looked up on
    /// `PATH`, or a path).
    pub fn new(program: impl Into<OsString>) -> Pandoc {
        Pandoc {
            program: program.into(),
        }
    }
}

impl Default for Pandoc {
    fn default() -> Self {
        Pandoc::new("pandoc")
    }
}

impl Converter for Pandoc {
    fn convert(&self, source: &Path) -> Result<String> {
        let output = tempfile::Builder::new()
            .prefix("postmill-")
            .suffix(".html")
            .tempfile()?;

        let mut command = Command::new(&self.program);
        command
            .args(["-f", "markdown"])
            .arg(source)
            .arg("-o")
            .arg(output.path());
        debug!("Running {:?}", command);

        let status = command.status().map_err(|err| Error::Spawn {
            program: self.program.clone(),
            err,
        })?;
        if !status.success() {
            return Err(Error::Status {
                program: self.program.clone(),
                source: source.to_owned(),
                status,
            });
        }

        Ok(std::fs::read_to_string(output.path())?)
    }
}

/// Converts CommonMark (plus tables, footnotes, strikethrough, and task
/// lists) without any external program.
#[derive(Clone, Copy, Debug, Default)]
pub struct Markdown;

impl Markdown {
    /// Converts markdown text to an HTML fragment.
    pub fn to_html(markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, options));
        out
    }
}

impl Converter for Markdown {
    fn convert(&self, source: &Path) -> Result<String> {
        Ok(Markdown::to_html(&std::fs::read_to_string(source)?))
    }
}

/// The result of a fallible conversion.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error converting a document.
#[derive(Debug)]
pub enum Error {
    /// The converter program could not be started (typically it isn't
    /// installed).
    Spawn { program: OsString, err: io::Error },

    /// The converter program ran but exited unsuccessfully.
    Status {
        program: OsString,
        source: PathBuf,
        status: ExitStatus,
    },

    /// Reading the source document or the converted fragment failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Spawn { program, err } => write!(
                f,
                "Running converter '{}': {}",
                program.to_string_lossy(),
                err
            ),
            Error::Status {
                program,
                source,
                status,
            } => write!(
                f,
                "Converter '{}' failed on '{}': {}",
                program.to_string_lossy(),
                source.display(),
                status
            ),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn { program: _, err } => Some(err),
            Error::Status { .. } => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
