//! Configuration management for the Spotify remote.
//!
//! This module handles loading configuration values from environment
//! variables and an optional `.env` file. Every value has a default that
//! talks to Spotify directly, so a fresh install works without any setup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use reqwest::Url;

use crate::{Res, error::SpottiError};

pub const DEFAULT_CLIENT_ID: &str = "f1b6295487874fafb175fb5818c5abcf";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:7171/callback";
pub const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 180;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotti` data directory if it doesn't exist and loads
/// variables from `spotti/.env` inside it when that file is present. A
/// missing file is not an error: the defaults in [`Config`] apply.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotti/.env`
/// - macOS: `~/Library/Application Support/spotti/.env`
/// - Windows: `%LOCALAPPDATA%/spotti/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotti/.env");
    path
}

/// Runtime settings for the authorization flow and the Web API client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public client identifier of the registered Spotify application.
    pub client_id: String,
    /// Redirect URI registered with Spotify; its port is where the listener binds.
    pub redirect_uri: String,
    /// Space separated OAuth scopes.
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    /// Web API base, without trailing slash.
    pub api_url: String,
    /// How long to wait for the browser redirect before giving up.
    pub auth_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Builds the configuration from `SPOTTI_*` environment variables,
    /// falling back to the defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`SpottiError::Config`] when `SPOTTI_AUTH_TIMEOUT_SECS` is not
    /// a positive number or the redirect URI has no usable port.
    pub fn from_env() -> Res<Self> {
        let defaults = Self::default();
        let auth_timeout = match env::var("SPOTTI_AUTH_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(SpottiError::Config(format!(
                        "SPOTTI_AUTH_TIMEOUT_SECS must be a positive number of seconds, got {raw:?}"
                    )));
                }
            },
            Err(_) => defaults.auth_timeout,
        };

        let config = Self {
            client_id: var_or("SPOTTI_CLIENT_ID", defaults.client_id),
            redirect_uri: var_or("SPOTTI_REDIRECT_URI", defaults.redirect_uri),
            scope: var_or("SPOTTI_SCOPE", defaults.scope),
            auth_url: var_or("SPOTTI_AUTH_URL", defaults.auth_url),
            token_url: var_or("SPOTTI_TOKEN_URL", defaults.token_url),
            api_url: var_or("SPOTTI_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            auth_timeout,
        };
        config.redirect_port()?;
        Ok(config)
    }

    /// Port of the local redirect listener, taken from the redirect URI.
    pub fn redirect_port(&self) -> Res<u16> {
        let url = Url::parse(&self.redirect_uri).map_err(|e| {
            SpottiError::Config(format!("invalid redirect URI {}: {e}", self.redirect_uri))
        })?;
        url.port_or_known_default().ok_or_else(|| {
            SpottiError::Config(format!("redirect URI {} has no port", self.redirect_uri))
        })
    }
}

fn var_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}
