//! # API Module
//!
//! Route handlers for the short-lived HTTP server that receives Spotify's
//! OAuth redirect. Spotify sends the browser to the registered redirect URI
//! with either `code` and `state` or an `error` in the query string; the
//! [`callback`] handler forwards those values to the session waiting in
//! [`crate::server::RedirectListener::await_redirect`].
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotti::api::{RedirectSlot, callback};
//!
//! let app = Router::new().route("/callback", get(callback).layer(Extension(slot)));
//! ```

mod callback;

pub use callback::RedirectSlot;
pub use callback::callback;
