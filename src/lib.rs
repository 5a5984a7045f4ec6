//! The library code for the `postmill` static blog generator. Building a site
//! is a single sequential pass:
//!
//! 1. Listing the source documents on disk ([`crate::post`])
//! 2. Converting each document into an HTML fragment ([`crate::convert`])
//! 3. Rendering each fragment through the post template and writing it to
//!    disk, then rendering the index page over all posts ([`crate::write`])
//!
//! [`crate::build::build_site`] ties these together. The first failure stops
//! the build before the index is written.
//!
//! Serving the result is entirely separate ([`crate::serve`]): the server only
//! reads the output directory the builder left behind.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod convert;
pub mod logging;
pub mod post;
pub mod serve;
pub mod write;
