use reqwest::{Client, Response, StatusCode, Url};

use crate::{
    Res,
    config::Config,
    error::SpottiError,
    types::{PkceCodes, Token, TokenErrorResponse},
};

/// Builds the Spotify authorization URL the user is sent to in the browser.
///
/// The URL carries the client id, the redirect URI, the requested scopes,
/// the S256 code challenge and the random `state` that the redirect must echo
/// back unchanged. All values are query-encoded.
///
/// # Errors
///
/// Returns [`SpottiError::Config`] if the configured authorization endpoint
/// is not a valid URL.
pub fn authorize_url(config: &Config, pkce: &PkceCodes) -> Res<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", pkce.code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
            ("state", pkce.state.as_str()),
        ],
    )
    .map_err(|e| SpottiError::Config(format!("invalid authorization URL: {e}")))?;

    Ok(url.into())
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the OAuth 2.0 PKCE flow by posting the authorization code
/// together with the code verifier that produced the challenge sent in the
/// authorization request. The code is single use; calling this twice with
/// the same code fails at the provider.
///
/// # Errors
///
/// - [`SpottiError::TokenExchange`] for any non-200 answer or a body that is
///   not a token response
/// - [`SpottiError::Http`] for network failures
pub async fn exchange_code_pkce(
    client: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Res<Token> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    read_token_response(res).await
}

/// Refreshes an expired access token using a refresh token.
///
/// Spotify may rotate the refresh token; the returned [`Token`] carries the
/// new one in that case and `None` when the current one stays valid.
///
/// # Errors
///
/// Same as [`exchange_code_pkce`]. A revoked or expired refresh token comes
/// back as `TokenExchange { status: 400, .. }` with `invalid_grant`.
pub async fn refresh_token(client: &Client, config: &Config, refresh_token: &str) -> Res<Token> {
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ])
        .send()
        .await?;

    read_token_response(res).await
}

async fn read_token_response(res: Response) -> Res<Token> {
    let status = res.status();
    let body = res.text().await?;

    if status != StatusCode::OK {
        let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) => err.error_description.unwrap_or(err.error),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        return Err(SpottiError::TokenExchange {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<Token>(&body).map_err(|e| SpottiError::TokenExchange {
        status: status.as_u16(),
        message: format!("malformed token response: {e}"),
    })
}
