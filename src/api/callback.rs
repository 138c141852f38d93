use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::{types::AuthorizationCode, warning};

/// Body served to the browser once the code has been handed over.
pub const CONFIRMATION_PAGE: &str =
    "<h2>Auth code obtained.</h2><p>This window can be closed.</p>";

/// One authorization waiting for its redirect.
///
/// Holds the `state` value sent to Spotify and the sending half of the
/// channel the login flow is waiting on. The sender is taken on first use, so
/// at most one code ever leaves the callback server.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    state: String,
    sender: Arc<Mutex<Option<oneshot::Sender<AuthorizationCode>>>>,
}

impl PendingAuthorization {
    /// Creates the pending authorization for `state` together with the
    /// receiver the login flow awaits.
    pub fn new(state: impl Into<String>) -> (Self, oneshot::Receiver<AuthorizationCode>) {
        let (tx, rx) = oneshot::channel();
        let pending = Self {
            state: state.into(),
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (pending, rx)
    }

    /// The `state` value a redirect must carry to be accepted.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Hands the code to the waiting flow. Returns `false` when a code was
    /// already delivered or nobody is waiting anymore.
    pub async fn deliver(&self, code: AuthorizationCode) -> bool {
        match self.sender.lock().await.take() {
            Some(tx) => tx.send(code).is_ok(),
            None => false,
        }
    }
}

/// Handles every request reaching the callback server, whatever its path.
///
/// Only a query carrying a non-empty `code` and the expected `state` moves the
/// login forward. Everything else (favicon probes, `error=access_denied`
/// redirects, replays) is answered and otherwise ignored.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(pending): Extension<PendingAuthorization>,
) -> Html<&'static str> {
    if let Some(reason) = params.get("error") {
        warning!("Spotify did not grant access: {}", reason);
        return Html("<h4>Authorization was not granted.</h4>");
    }

    let Some(code) = params.get("code").cloned().and_then(AuthorizationCode::new) else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    if params.get("state").map(String::as_str) != Some(pending.state()) {
        warning!("Ignoring callback with an unexpected state parameter.");
        return Html("<h4>Invalid state parameter.</h4>");
    }

    if pending.deliver(code).await {
        Html(CONFIRMATION_PAGE)
    } else {
        Html("<h4>Authorization code already received.</h4>")
    }
}
