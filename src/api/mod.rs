//! # API Module
//!
//! HTTP handlers served by the local callback server during the OAuth 2.0
//! authorization-code flow.
//!
//! Spotify redirects the user's browser to the registered redirect URI with
//! `?code=...&state=...` appended. [`callback`] accepts that request on any
//! path, validates it and forwards the code to the waiting login flow through
//! a [`PendingAuthorization`].
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router};
//! use albumcovers::api::{PendingAuthorization, callback};
//!
//! let (pending, code_rx) = PendingAuthorization::new("state");
//! let app = Router::new()
//!     .fallback(callback)
//!     .layer(Extension(pending));
//! ```

mod callback;

pub use callback::{CONFIRMATION_PAGE, PendingAuthorization, callback};
