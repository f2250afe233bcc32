use std::time::Duration;

/// Everything that can go wrong between the CLI and Spotify.
///
/// Authorization failures, token endpoint failures and playback failures are
/// kept apart so the caller can decide what to do: keep the prompt running,
/// ask the user to authorize again, or give up.
#[derive(Debug, thiserror::Error)]
pub enum SpottiError {
    #[error("secure random source failed: {0}")]
    EntropyFailure(String),

    #[error("authorization was denied in the browser")]
    AuthorizationDenied,

    #[error("no authorization redirect received within {} seconds", .0.as_secs())]
    AuthorizationTimeout(Duration),

    #[error("authorization was cancelled")]
    AuthorizationCancelled,

    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("authorization redirect carried an unexpected state value")]
    StateMismatch,

    #[error("token request failed ({status}): {message}")]
    TokenExchange { status: u16, message: String },

    #[error("not authenticated, run `spotti auth` first")]
    NotAuthenticated,

    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    #[error("access token rejected even after a refresh")]
    Unauthorized,

    #[error("{status}: {message}")]
    Provider { status: u16, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("credential store error: {0}")]
    CredentialStore(#[from] keyring::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SpottiError {
    /// Whether the held tokens are unusable and only a new consent flow helps.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            SpottiError::Unauthorized
                | SpottiError::NotAuthenticated
                | SpottiError::TokenExchange { .. }
        )
    }
}
