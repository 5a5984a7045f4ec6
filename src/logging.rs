use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global log subscriber, writing to stderr. `RUST_LOG` takes
/// precedence; otherwise `verbose` picks between `debug` and `info`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
