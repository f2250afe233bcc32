use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};

use crate::{
    Res,
    api::{self, RedirectSlot},
    error::SpottiError,
    types::{Redirect, RedirectParams},
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// One-shot local endpoint that captures the OAuth redirect.
///
/// The socket is bound up front so the browser can never reach the redirect
/// URI before something is listening on it.
pub struct RedirectListener {
    listener: TcpListener,
}

impl RedirectListener {
    pub async fn bind(port: u16) -> Res<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_port(&self) -> Res<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Serves `/callback` until the first redirect arrives, then shuts down.
    ///
    /// # Errors
    ///
    /// - [`SpottiError::AuthorizationDenied`] for `error=access_denied`
    /// - [`SpottiError::AuthorizationFailed`] for any other `error` value
    /// - [`SpottiError::AuthorizationTimeout`] when nothing arrives in time
    /// - [`SpottiError::AuthorizationCancelled`] on Ctrl-C
    pub async fn await_redirect(self, timeout: Duration) -> Res<Redirect> {
        let (tx, rx) = oneshot::channel::<RedirectParams>();
        let slot: RedirectSlot = Arc::new(Mutex::new(Some(tx)));
        let app = Router::new().route("/callback", get(api::callback).layer(Extension(slot)));

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        let received = tokio::select! {
            params = rx => params.map_err(|_| {
                SpottiError::AuthorizationFailed("redirect listener stopped unexpectedly".to_string())
            }),
            _ = tokio::time::sleep(timeout) => Err(SpottiError::AuthorizationTimeout(timeout)),
            Ok(()) = tokio::signal::ctrl_c() => Err(SpottiError::AuthorizationCancelled),
        };

        let _ = stop_tx.send(());
        // Bounded: a lingering keep-alive connection must not stall shutdown.
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, server).await;

        into_redirect(received?)
    }
}

fn into_redirect(params: RedirectParams) -> Res<Redirect> {
    match params.error.as_deref() {
        Some("access_denied") => Err(SpottiError::AuthorizationDenied),
        Some(other) => Err(SpottiError::AuthorizationFailed(other.to_string())),
        None => Ok(Redirect {
            code: params.code.unwrap_or_default(),
            state: params.state,
        }),
    }
}
