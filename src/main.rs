use clap::Parser;
use postmill::build::build_site;
use postmill::config::{Config, ConverterKind, PROJECT_FILE};
use postmill::logging;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Builds the blog: every document in the source directory becomes
/// `{output}/posts/{name}.html`, plus an `{output}/index.html` listing them.
#[derive(Parser)]
#[command(name = "postmill", version)]
struct Cli {
    /// Project file. Without this flag `postmill.yaml` is used if present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of source documents [default: posts]
    #[arg(long)]
    source: Option<PathBuf>,

    /// Directory holding post.html and index.html [default: template]
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output directory [default: generated]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document converter [default: pandoc]
    #[arg(long, value_enum)]
    converter: Option<ConverterKind>,

    /// Program run by the pandoc converter [default: pandoc]
    #[arg(long)]
    pandoc: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path, true)?,
            None => Config::load(&PathBuf::from(PROJECT_FILE), false)?,
        };
        if let Some(source) = self.source {
            config.source_directory = source;
        }
        if let Some(templates) = self.templates {
            config.template_directory = templates;
        }
        if let Some(output) = self.output {
            config.output_directory = output;
        }
        if let Some(converter) = self.converter {
            config.converter = converter;
        }
        if let Some(pandoc) = self.pandoc {
            config.pandoc = pandoc;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let converter = config.converter();
    match build_site(&config, &*converter) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
