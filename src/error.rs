use std::{io, path::PathBuf};

use thiserror::Error;

/// Exit code for a missing or malformed configuration.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the user could not be authenticated.
pub const EXIT_AUTH: i32 = 3;
/// Exit code for failed API or image requests.
pub const EXIT_NETWORK: i32 = 4;
/// Exit code for local filesystem failures.
pub const EXIT_FILESYSTEM: i32 = 5;

/// Every way a run can fail.
///
/// Each variant carries enough context (stage, offset, album, URL, path) to
/// diagnose the failure by hand.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing configuration value {0}; set it in the environment or in a .env file")]
    MissingConfig(&'static str),

    #[error("invalid configuration value {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("callback server on {addr} failed: {source}")]
    Server {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("callback server stopped before an authorization code arrived")]
    AuthChannelClosed,

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("fetching saved albums at offset {offset} failed: {source}")]
    PageFetch {
        offset: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("downloading cover of \"{name}\" from {url} failed: {reason}")]
    Download {
        name: String,
        url: String,
        reason: String,
    },

    #[error("cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// Maps the failure onto the process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::MissingConfig(_) | AppError::InvalidConfig { .. } => EXIT_CONFIG,
            AppError::Server { .. } | AppError::AuthChannelClosed | AppError::TokenExchange(_) => {
                EXIT_AUTH
            }
            AppError::PageFetch { .. } | AppError::Download { .. } => EXIT_NETWORK,
            AppError::CreateDir { .. } => EXIT_FILESYSTEM,
        }
    }
}
