use reqwest::{
    Method, Response, StatusCode,
    header::{CONTENT_LENGTH, RETRY_AFTER},
};

use crate::{
    Res,
    error::SpottiError,
    management::{CredentialStore, Session},
    types::{ApiErrorResponse, PlaybackInfo, PlaybackState},
};

/// Client for the `/me/player` endpoints of the Spotify Web API.
///
/// The playback client owns the [`Session`] it was built with and asks it
/// for bearer tokens. A 401 answer triggers one silent token refresh and one
/// retry of the same request; a second 401 is reported as
/// [`SpottiError::Unauthorized`].
///
/// # Errors
///
/// Every request can fail with:
/// - [`SpottiError::NotAuthenticated`] when the session holds no token
/// - [`SpottiError::Unauthorized`] after the single retry was also rejected
/// - [`SpottiError::RateLimited`] on 429, carrying `Retry-After` when sent
/// - [`SpottiError::Provider`] for any other non-2xx status
/// - whatever the token refresh reported, if that failed
pub struct Playback<S: CredentialStore> {
    session: Session<S>,
}

impl<S: CredentialStore> Playback<S> {
    /// Wraps an existing session. The session does not have to be authorized
    /// yet; requests without a token fail with [`SpottiError::NotAuthenticated`].
    pub fn new(session: Session<S>) -> Self {
        Self { session }
    }

    /// The session backing this client.
    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Mutable access to the session, e.g. to re-run the consent flow.
    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    /// Retrieves what the user is currently listening to.
    ///
    /// Spotify answers `204 No Content` when no device is playing; that, and
    /// any other success without a body, is reported as
    /// [`PlaybackInfo::NothingPlaying`] rather than an error.
    ///
    /// # Errors
    ///
    /// The request errors described on [`Playback`], or
    /// [`SpottiError::Json`] when the body is not a playback state.
    pub async fn get_playback_info(&mut self) -> Res<PlaybackInfo> {
        let response = self.send(Method::GET, "/me/player").await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(PlaybackInfo::NothingPlaying);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(PlaybackInfo::NothingPlaying);
        }
        let state = serde_json::from_str::<PlaybackState>(&body)?;
        Ok(PlaybackInfo::Playing(state))
    }

    /// Resumes playback on the active device (`PUT /me/player/play`).
    pub async fn play(&mut self) -> Res<()> {
        self.send(Method::PUT, "/me/player/play").await.map(drop)
    }

    /// Pauses playback on the active device (`PUT /me/player/pause`).
    pub async fn pause(&mut self) -> Res<()> {
        self.send(Method::PUT, "/me/player/pause").await.map(drop)
    }

    /// Skips to the next track (`POST /me/player/next`).
    pub async fn next_track(&mut self) -> Res<()> {
        self.send(Method::POST, "/me/player/next").await.map(drop)
    }

    /// Goes back to the previous track (`POST /me/player/previous`).
    pub async fn previous_track(&mut self) -> Res<()> {
        self.send(Method::POST, "/me/player/previous").await.map(drop)
    }

    async fn send(&mut self, method: Method, path: &str) -> Res<Response> {
        let url = format!("{}{}", self.session.config().api_url, path);
        let mut refreshed = false;

        loop {
            let token = self
                .session
                .access_token()
                .ok_or(SpottiError::NotAuthenticated)?
                .to_string();

            let response = self
                .session
                .client()
                .request(method.clone(), &url)
                .bearer_auth(token)
                .header(CONTENT_LENGTH, 0)
                .send()
                .await?;

            match response.status() {
                StatusCode::UNAUTHORIZED if !refreshed => {
                    refreshed = true;
                    self.session.refresh().await?;
                }
                StatusCode::UNAUTHORIZED => return Err(SpottiError::Unauthorized),
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok());
                    return Err(SpottiError::RateLimited { retry_after });
                }
                status if status.is_success() => return Ok(response),
                _ => return Err(provider_error(response).await),
            }
        }
    }
}

async fn provider_error(response: Response) -> SpottiError {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("unexpected response")
        .to_string();

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    };

    SpottiError::Provider {
        status: status.as_u16(),
        message,
    }
}
