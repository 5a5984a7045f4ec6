use clap::Parser;
use postmill::config::ServeConfig;
use postmill::logging;
use postmill::serve::serve;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Serves a site built by `postmill`.
#[derive(Parser)]
#[command(name = "postmill-serve", version)]
struct Cli {
    /// Directory to serve [default: ./generated]
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Port to listen on [default: 3000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let defaults = ServeConfig::default();
    let config = ServeConfig {
        directory: cli.dir.unwrap_or(defaults.directory),
        port: cli.port.unwrap_or(defaults.port),
    };
    match serve(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
