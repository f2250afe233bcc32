use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Body of a successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    /// Absent on refresh responses when Spotify keeps the current refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
}

/// Error body of the accounts service (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Values generated for one PKCE authorization attempt.
#[derive(Debug, Clone)]
pub struct PkceCodes {
    pub state: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

/// The two secrets kept in the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: String,
    pub refresh_token: String,
}

/// Query values captured from the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// An accepted redirect: the authorization code and the echoed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub code: String,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<PlaybackItem>,
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackItem {
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
}

impl PlaybackState {
    pub fn progress_ms(&self) -> u64 {
        self.progress_ms.unwrap_or_default()
    }

    pub fn track_name(&self) -> Option<&str> {
        self.item.as_ref().map(|item| item.name.as_str())
    }

    pub fn track_duration_ms(&self) -> u64 {
        self.item.as_ref().map(|item| item.duration_ms).unwrap_or_default()
    }

    pub fn artist_names(&self) -> Vec<&str> {
        self.item
            .as_ref()
            .map(|item| item.artists.iter().map(|a| a.name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Result of asking Spotify what is playing.
#[derive(Debug, Clone)]
pub enum PlaybackInfo {
    Playing(PlaybackState),
    NothingPlaying,
}

/// Provider error envelope (`{"error": {"status": 400, "message": "..."}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[derive(Tabled)]
pub struct CommandTableRow {
    pub command: String,
    pub description: String,
}
