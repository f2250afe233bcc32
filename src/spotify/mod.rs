//! # Spotify Integration Module
//!
//! This module talks to Spotify's two services: the accounts service, which
//! hands out OAuth tokens, and the Web API, which exposes the user's player.
//!
//! ## Architecture
//!
//! ```text
//! CLI
//!  ↓
//! Playback (Web API, bearer auth, refresh-and-retry on 401)
//!  ↓
//! Session (management) ── auth (accounts service: authorize URL, token exchange)
//!  ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication Module
//!
//! [`auth`] implements the token side of OAuth 2.0 PKCE:
//! - **Authorize URL**: client id, redirect URI, scopes, S256 challenge and state
//! - **Code Exchange**: authorization code + code verifier for a token pair
//! - **Refresh**: refresh token for a new access token (and possibly a rotated
//!   refresh token)
//!
//! Non-200 answers from the token endpoint become
//! [`crate::error::SpottiError::TokenExchange`]; this layer never retries.
//!
//! ## Playback Module
//!
//! [`playback`] covers the player endpoints:
//! - `GET /me/player` - current playback state (204 when nothing plays)
//! - `PUT /me/player/play` and `PUT /me/player/pause`
//! - `POST /me/player/next` and `POST /me/player/previous`
//!
//! Every call follows the same protocol: a 401 causes exactly one token
//! refresh and one retry, 429 is reported as rate limiting without backoff,
//! and any other failure carries the message from Spotify's error envelope.

pub mod auth;
pub mod playback;

pub use playback::Playback;
