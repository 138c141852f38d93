//! # Spotify Integration Module
//!
//! The Web API calls a run needs, grouped by concern:
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow: consent URL, callback
//!   wait and the code-for-token exchange (client secret, Basic auth)
//! - [`albums`] - Walking `GET /me/albums` page by page and turning each
//!   saved album into a cover download task
//!
//! Every function takes the shared `reqwest::Client` and the run's
//! [`Config`](crate::config::Config) explicitly. Failures are reported as
//! [`AppError`](crate::error::AppError) values naming the stage that broke;
//! nothing here retries.

pub mod albums;
pub mod auth;

use serde_json::Value;

/// Human readable summary of a Spotify error body.
///
/// The accounts service answers `{"error": "...", "error_description": "..."}`
/// while the Web API wraps it as `{"error": {"status": .., "message": ".."}}`.
/// Anything else is returned as is.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    if let Some(message) = json["error"]["message"].as_str() {
        return message.to_string();
    }

    match (json["error"].as_str(), json["error_description"].as_str()) {
        (Some(error), Some(description)) => format!("{error} ({description})"),
        (Some(error), None) => error.to_string(),
        _ => body.trim().to_string(),
    }
}
