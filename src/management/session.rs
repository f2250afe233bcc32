use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{
    Res,
    config::Config,
    error::SpottiError,
    info,
    management::CredentialStore,
    server::RedirectListener,
    spotify,
    types::{CredentialRecord, PkceCodes, Token},
    utils, warning,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the session stands in the authorization lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authorizing,
    Authorized,
    Refreshing,
}

type BrowserOpener = Box<dyn Fn(&str) + Send + Sync>;

/// Owner of the Spotify tokens for the lifetime of the process.
///
/// The session loads the token pair from the credential store, runs the
/// interactive PKCE consent flow when there is nothing usable, and refreshes
/// the access token on request. Every token change is written through to the
/// store.
pub struct Session<S: CredentialStore> {
    config: Config,
    client: Client,
    store: S,
    state: AuthState,
    access_token: Option<String>,
    refresh_token: Option<String>,
    pkce: Option<PkceCodes>,
    open_browser: BrowserOpener,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(config: Config, store: S) -> Res<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            config,
            client,
            store,
            state: AuthState::Unauthenticated,
            access_token: None,
            refresh_token: None,
            pkce: None,
            open_browser: Box::new(open_in_browser),
        })
    }

    /// Replaces how the authorization URL is handed to the user.
    pub fn with_browser(mut self, open: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.open_browser = Box::new(open);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Current bearer credential, if the session holds one.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Makes sure the session holds a token pair.
    ///
    /// Persisted credentials are used as-is without touching the network.
    /// When there are none, or `force_reauth` is set, the user is sent
    /// through the browser consent flow.
    ///
    /// # Errors
    ///
    /// Any failure of the consent flow or the code exchange. The session is
    /// left `Unauthenticated` in that case.
    pub async fn ensure_authorized(&mut self, force_reauth: bool) -> Res<()> {
        if !force_reauth {
            if self.state == AuthState::Authorized {
                return Ok(());
            }

            if let Some(record) = self.store.load()? {
                self.access_token = Some(record.token);
                self.refresh_token = Some(record.refresh_token);
                self.state = AuthState::Authorized;
                return Ok(());
            }
        }

        let result = self.authorize().await;
        if result.is_err() {
            self.state = AuthState::Unauthenticated;
        }
        self.pkce = None;
        result
    }

    async fn authorize(&mut self) -> Res<()> {
        info!("Authorizing...");
        self.state = AuthState::Authorizing;

        let pkce = utils::generate_pkce()?;
        let listener = RedirectListener::bind(self.config.redirect_port()?).await?;
        let auth_url = spotify::auth::authorize_url(&self.config, &pkce)?;
        let expected_state = pkce.state.clone();
        self.pkce = Some(pkce);

        (self.open_browser)(&auth_url);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message("Waiting for authorization in the browser...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let redirect = listener.await_redirect(self.config.auth_timeout).await;
        spinner.finish_and_clear();
        let redirect = redirect?;

        if redirect.state.as_deref() != Some(expected_state.as_str()) {
            return Err(SpottiError::StateMismatch);
        }
        if redirect.code.is_empty() {
            return Err(SpottiError::AuthorizationFailed(
                "redirect did not carry an authorization code".to_string(),
            ));
        }
        let verifier = self
            .pkce
            .as_ref()
            .map(|pkce| pkce.code_verifier.clone())
            .ok_or_else(|| {
                SpottiError::AuthorizationFailed("missing PKCE code verifier".to_string())
            })?;

        info!("Getting auth token...");
        let token =
            spotify::auth::exchange_code_pkce(&self.client, &self.config, &redirect.code, &verifier)
                .await?;
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| SpottiError::TokenExchange {
                status: 200,
                message: "token response carried no refresh token".to_string(),
            })?;

        self.store_tokens(token.access_token, refresh_token)?;
        self.state = AuthState::Authorized;
        Ok(())
    }

    /// Trades the held refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// [`SpottiError::NotAuthenticated`] without a refresh token, otherwise
    /// whatever the token endpoint or the credential store reported. On
    /// failure the session drops to `Unauthenticated`; re-running the consent
    /// flow is up to the caller.
    pub async fn refresh(&mut self) -> Res<()> {
        let Some(current_refresh) = self.refresh_token.clone() else {
            return Err(SpottiError::NotAuthenticated);
        };

        info!("Refreshing token...");
        self.state = AuthState::Refreshing;
        let response =
            spotify::auth::refresh_token(&self.client, &self.config, &current_refresh).await;
        let result = response.and_then(|token| self.apply_refresh(token, current_refresh));
        self.state = match result {
            Ok(()) => AuthState::Authorized,
            Err(_) => AuthState::Unauthenticated,
        };
        result
    }

    fn apply_refresh(&mut self, token: Token, current_refresh: String) -> Res<()> {
        let refresh_token = token.refresh_token.unwrap_or(current_refresh);
        self.store_tokens(token.access_token, refresh_token)
    }

    /// Forgets the token pair, both in memory and in the credential store.
    pub fn logout(&mut self) -> Res<()> {
        self.store.clear()?;
        self.access_token = None;
        self.refresh_token = None;
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    /// Memory is updated first; a failed write still leaves the new pair in use.
    fn store_tokens(&mut self, access_token: String, refresh_token: String) -> Res<()> {
        let record = CredentialRecord {
            token: access_token,
            refresh_token,
        };
        self.access_token = Some(record.token.clone());
        self.refresh_token = Some(record.refresh_token.clone());
        self.store.save(&record)
    }
}

fn open_in_browser(url: &str) {
    if webbrowser::open(url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            url
        )
    }
}
