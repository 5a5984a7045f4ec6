use crate::convert::{Converter, Markdown, Pandoc};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The project file the builder looks for in the working directory.
pub const PROJECT_FILE: &str = "postmill.yaml";

/// Which [`Converter`] turns source documents into HTML.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Shell out to pandoc (or whatever [`Config::pandoc`] names).
    Pandoc,

    /// Convert in-process with the built-in markdown renderer.
    Builtin,
}

// Every key is optional; missing keys keep their [`Config::default`] values.
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct Project {
    source_directory: Option<PathBuf>,
    template_directory: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    converter: Option<ConverterKind>,
    pandoc: Option<String>,
}

/// Site builder configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one source document per post.
    pub source_directory: PathBuf,

    /// Directory holding `post.html` and `index.html`.
    pub template_directory: PathBuf,

    /// Directory the site is written to.
    pub output_directory: PathBuf,

    /// Turns each source document into the page body.
    pub converter: ConverterKind,

    /// Program run by [`ConverterKind::Pandoc`].
    pub pandoc: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_directory: PathBuf::from("posts"),
            template_directory: PathBuf::from("template"),
            output_directory: PathBuf::from("generated"),
            converter: ConverterKind::Pandoc,
            pandoc: String::from("pandoc"),
        }
    }
}

impl Config {
    /// Loads the project file at `path`. If the file doesn't exist and
    /// `required` is false, the defaults are returned instead.
    pub fn load(path: &Path, required: bool) -> Result<Config> {
        if !required && !path.exists() {
            return Ok(Config::default());
        }
        Config::from_project_file(path)
            .map_err(|e| anyhow!("Loading configuration: {:#}", e))
    }

    /// Reads a project file. Relative directories in the file are resolved
    /// against the directory containing it.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = match serde_yaml::from_reader(file) {
            Ok(project) => project,
            // An empty file deserializes as a YAML null rather than a mapping.
            Err(_) if std::fs::metadata(path)?.len() == 0 => Project::default(),
            Err(e) => return Err(e.into()),
        };
        let project_root = match path.parent() {
            Some(dir) => dir,
            None => {
                return Err(anyhow!(
                    "Can't get parent directory for provided project file path '{:?}'",
                    path
                ))
            }
        };

        let defaults = Config::default();
        let resolve = |dir: Option<PathBuf>, default: PathBuf| {
            project_root.join(dir.unwrap_or(default))
        };
        Ok(Config {
            source_directory: resolve(project.source_directory, defaults.source_directory),
            template_directory: resolve(
                project.template_directory,
                defaults.template_directory,
            ),
            output_directory: resolve(project.output_directory, defaults.output_directory),
            converter: project.converter.unwrap_or(defaults.converter),
            pandoc: project.pandoc.unwrap_or(defaults.pandoc),
        })
    }

    /// Constructs the configured [`Converter`].
    pub fn converter(&self) -> Box<dyn Converter> {
        match self.converter {
            ConverterKind::Pandoc => Box::new(Pandoc::new(&self.pandoc)),
            ConverterKind::Builtin => Box::new(Markdown),
        }
    }
}

/// Static server configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServeConfig {
    /// Directory to serve. It must exist before the server starts.
    pub directory: PathBuf,

    /// Port to listen on, on all interfaces.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            directory: PathBuf::from("./generated"),
            port: 3000,
        }
    }
}
