//! Spotify Album Cover Downloader Library
//!
//! This library authenticates against the Spotify Web API with the OAuth 2.0
//! authorization-code flow, walks the user's saved albums page by page and
//! downloads the first cover image of every album into a local directory.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local callback server
//! - `browser` - Opening the authorization URL in a browser
//! - `cli` - Command implementations driving a whole run
//! - `config` - Configuration loaded from environment variables and `.env` files
//! - `covers` - File name sanitizing and cover downloads
//! - `error` - The error type shared by every stage of a run
//! - `server` - Local HTTP server capturing the OAuth redirect
//! - `spotify` - Spotify Web API client functions
//! - `types` - Data structures mirroring Spotify's JSON bodies
//!
//! # Example
//!
//! ```
//! use albumcovers::{browser::SystemBrowser, cli, config};
//!
//! #[tokio::main]
//! async fn main() -> albumcovers::Res<()> {
//!     let _ = config::load_env().await;
//!     let config = config::Config::from_env()?;
//!     cli::download(&config, &SystemBrowser, &Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod browser;
pub mod cli;
pub mod config;
pub mod covers;
pub mod error;
pub mod server;
pub mod spotify;
pub mod types;

/// Result alias used by every fallible operation of a run.
pub type Res<T> = std::result::Result<T, error::AppError>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching saved albums...");
/// info!("Found {} albums", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr.
///
/// Unlike a panic this does not stop the program; callers decide the exit
/// code themselves (see [`error::AppError::exit_code`]).
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues: a favicon probe hitting the callback server,
/// an album without artwork, a single failed download.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
