//! Configuration management for the album cover downloader.
//!
//! Values come from environment variables. Before reading them, `.env` files
//! are loaded so users can keep their Spotify credentials out of the shell
//! history. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/albumcovers/.env`)
//! 4. Application defaults (everything except the credentials)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::{Res, error::AppError};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-library-read";
pub const DEFAULT_MARKET: &str = "GB";

/// Loads `.env` files from the working directory and the local data directory.
///
/// Variables that are already set in the process environment are never
/// overwritten, and missing files are silently skipped. The only error is a
/// failure to create the `albumcovers` folder in the local data directory.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/albumcovers/.env`
/// - macOS: `~/Library/Application Support/albumcovers/.env`
/// - Windows: `%LOCALAPPDATA%/albumcovers/.env`
pub async fn load_env() -> Result<(), String> {
    let _ = dotenv::dotenv();

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("albumcovers/.env");
    path
}

/// Everything a run needs to know about the outside world.
///
/// Built once at startup and passed by reference to the listener, the token
/// exchange and the album fetcher. Nothing in the crate reads the environment
/// after this value exists.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub server_addr: SocketAddr,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
    pub market: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingConfig`] when the client id or secret is
    /// absent or blank and [`AppError::InvalidConfig`] when `SERVER_ADDRESS`
    /// is not a socket address.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The credentials are also accepted under the lowercase `client_id` and
    /// `client_secret` names used by older `.env` files.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or_default = |key: &str, default: &str| value(key).unwrap_or_else(|| default.to_string());

        let client_id = value("SPOTIFY_CLIENT_ID")
            .or_else(|| value("client_id"))
            .ok_or(AppError::MissingConfig("SPOTIFY_CLIENT_ID"))?;
        let client_secret = value("SPOTIFY_CLIENT_SECRET")
            .or_else(|| value("client_secret"))
            .ok_or(AppError::MissingConfig("SPOTIFY_CLIENT_SECRET"))?;

        let server_addr = or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS);
        let server_addr =
            SocketAddr::from_str(&server_addr).map_err(|e| AppError::InvalidConfig {
                key: "SERVER_ADDRESS",
                reason: format!("{server_addr}: {e}"),
            })?;

        Ok(Config {
            client_id,
            client_secret,
            server_addr,
            redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            auth_url: or_default("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            scope: or_default("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            market: or_default("SPOTIFY_MARKET", DEFAULT_MARKET),
        })
    }
}
