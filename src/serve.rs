//! Serves a built site over HTTP. There is no routing: every request goes
//! to [`ServeDir`], which handles `index.html` lookup for directories, byte
//! ranges, and content types.

use crate::config::ServeConfig;
use axum::Router;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the router serving the files under `directory`.
pub fn router(directory: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(directory))
        .layer(TraceLayer::new_for_http())
}

/// Serves `config.directory` on `config.port` until the process is killed.
/// The directory has to exist up front; otherwise this fails without
/// binding the port.
pub async fn serve(config: &ServeConfig) -> Result<()> {
    if !config.directory.is_dir() {
        return Err(Error::MissingDirectory(config.directory.clone()));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| Error::Bind { addr, err })?;

    info!("Listening on http://localhost:{}", config.port);
    axum::serve(listener, router(&config.directory))
        .await
        .map_err(Error::Serve)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error starting or running the server.
#[derive(Debug)]
pub enum Error {
    /// The directory to serve doesn't exist (or isn't a directory).
    MissingDirectory(PathBuf),

    /// The listener couldn't be bound.
    Bind { addr: SocketAddr, err: io::Error },

    /// The server stopped with an I/O error.
    Serve(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingDirectory(path) => {
                write!(f, "Directory {} does not exist", path.display())
            }
            Error::Bind { addr, err } => write!(f, "Binding {}: {}", addr, err),
            Error::Serve(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingDirectory(_) => None,
            Error::Bind { addr: _, err } => Some(err),
            Error::Serve(err) => Some(err),
        }
    }
}
