//! # CLI Module
//!
//! Command implementations invoked by the binary. Each command takes its
//! configuration and collaborators explicitly, so tests can drive a full run
//! against a fake browser and mocked Spotify endpoints.
//!
//! ## Commands
//!
//! - [`download`] - Authorize, walk the saved albums and download every cover
//!
//! ## Run Stages
//!
//! ```text
//! Idle → ListenerStarted → BrowserOpened → CodeReceived → TokenObtained
//!      → AlbumsFetching(page k) → CoversDownloading(i of N) → Done
//! ```
//!
//! No stage is entered twice. Any unrecovered error ends the run and the
//! binary maps it onto an exit code.

mod download;

pub use download::{DownloadOptions, download};
