use std::net::SocketAddr;

use axum::{Extension, Router};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    Res,
    api::{self, PendingAuthorization},
    error::AppError,
    warning,
};

/// The local HTTP server receiving Spotify's redirect.
///
/// Runs in a background task. [`CallbackServer::shutdown`] stops accepting new
/// connections; exiting the process ends it in any case.
pub struct CallbackServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    _handle: JoinHandle<()>,
}

impl CallbackServer {
    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops the server gracefully.
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
    }
}

/// Binds `addr` and serves the callback handler on every path in a
/// background task.
///
/// # Errors
///
/// [`AppError::Server`] when the address cannot be bound, typically because
/// the port is already in use.
///
/// # Example
///
/// ```ignore
/// let (pending, code_rx) = PendingAuthorization::new(state);
/// let server = start_callback_server(config.server_addr, pending).await?;
/// let code = code_rx.await?;
/// server.shutdown();
/// ```
pub async fn start_callback_server(
    addr: SocketAddr,
    pending: PendingAuthorization,
) -> Res<CallbackServer> {
    let app = Router::new()
        .fallback(api::callback)
        .layer(Extension(pending));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Server {
            addr: addr.to_string(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| AppError::Server {
        addr: addr.to_string(),
        source,
    })?;

    let (shutdown, stop) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = stop.await;
        });
        if let Err(e) = server.await {
            warning!("Callback server on {} stopped: {}", local_addr, e);
        }
    });

    Ok(CallbackServer {
        local_addr,
        shutdown,
        _handle: handle,
    })
}
