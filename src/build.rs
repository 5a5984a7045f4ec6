//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: listing the source documents
//! ([`crate::post`]), converting and rendering each post page, then rendering
//! the index page ([`crate::write`]).

use crate::config::Config;
use crate::convert::Converter;
use crate::post::{list_sources, Post};
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// The post template's file name within the template directory.
pub const POST_TEMPLATE: &str = "post.html";

/// The index template's file name within the template directory.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Builds the site from a [`Config`] object. Every document is reprocessed
/// from scratch, one at a time, in file-name order. The first failure aborts
/// the build before the index is written; pages written up to that point are
/// left in place.
///
/// Returns the [`Post`]s listed on the index page.
pub fn build_site(config: &Config, converter: &dyn Converter) -> Result<Vec<Post>> {
    // Parse the templates up front so a broken theme fails before we touch
    // the output directory.
    let posts_template = parse_template(&config.template_directory.join(POST_TEMPLATE))?;
    let index_template = parse_template(&config.template_directory.join(INDEX_TEMPLATE))?;

    let posts_directory = config.output_directory.join("posts");
    std::fs::create_dir_all(&posts_directory).map_err(|err| Error::CreateDir {
        path: posts_directory,
        err,
    })?;

    let sources = list_sources(&config.source_directory);
    info!(
        "Building {} post(s) from '{}'",
        sources.len(),
        config.source_directory.display()
    );

    let writer = Writer {
        posts_template: &posts_template,
        index_template: &index_template,
        output_directory: &config.output_directory,
        converter,
    };
    let posts = writer.write_posts(&sources)?;
    writer.write_index(&posts)?;

    Ok(posts)
}

// Loads the template file contents and parses them into a template.
fn parse_template(template_file: &Path) -> Result<Template> {
    let contents = std::fs::read_to_string(template_file).map_err(|err| {
        Error::OpenTemplateFile {
            path: template_file.to_owned(),
            err,
        }
    })?;

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            path: template_file.to_owned(),
            err,
        })?;
    Ok(template)
}

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during template
/// loading, output directory creation, or writing pages.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned for I/O problems while creating output directories.
    CreateDir { path: PathBuf, err: io::Error },

    /// Returned for errors converting, templating, or writing pages.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::CreateDir { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::CreateDir { path: _, err } => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
