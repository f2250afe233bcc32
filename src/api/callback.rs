use std::sync::Arc;

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::types::RedirectParams;

/// Hand-off point between the callback route and the waiting session.
///
/// Holds the sending half until the first redirect arrives; afterwards it is
/// empty and later requests are turned away.
pub type RedirectSlot = Arc<Mutex<Option<oneshot::Sender<RedirectParams>>>>;

pub async fn callback(
    Query(params): Query<RedirectParams>,
    Extension(slot): Extension<RedirectSlot>,
) -> Html<&'static str> {
    let Some(sender) = slot.lock().await.take() else {
        return Html("<h4>Authorization already completed.</h4>");
    };

    let page = if params.error.is_some() {
        Html("<h2>Authorization was not granted.</h2><p>You can close this window.</p>")
    } else {
        Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
    };

    // The receiver only disappears when the wait already timed out.
    let _ = sender.send(params);
    page
}
