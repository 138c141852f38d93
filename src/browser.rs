//! Opening the Spotify consent page.
//!
//! The rest of the flow only sees the [`BrowserLauncher`] trait, which keeps it
//! platform independent and lets tests stand in for the user's browser.

use std::io;

use crate::info;

pub trait BrowserLauncher: Send + Sync {
    /// Shows `url` to the user.
    fn open(&self, url: &str) -> io::Result<()>;
}

/// The operating system's default browser (`xdg-open`, `open`, `start`, ...
/// as picked by the `webbrowser` crate).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

/// Prints the URL instead of launching anything, for headless machines.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintUrl;

impl BrowserLauncher for PrintUrl {
    fn open(&self, url: &str) -> io::Result<()> {
        info!("Open the following URL in your browser to continue:\n{}", url);
        Ok(())
    }
}
