use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    Res,
    api::PendingAuthorization,
    browser::BrowserLauncher,
    config::Config,
    error::AppError,
    info,
    server::start_callback_server,
    success,
    types::{AccessToken, AuthorizationCode, TokenResponse},
    warning,
};

/// Runs the complete authorization-code flow and returns an access token.
///
/// 1. Starts the callback server on `config.server_addr`
/// 2. Opens the consent page through `launcher`
/// 3. Waits until the callback server captured a code
/// 4. Stops the callback server and exchanges the code for a token
///
/// There is no timeout: the user can take as long as they need to log in.
/// If the browser cannot be opened the URL is printed so the login can be
/// finished by hand.
///
/// # Errors
///
/// - [`AppError::Server`] when the callback address cannot be bound
/// - [`AppError::AuthChannelClosed`] when the server died before a code arrived
/// - [`AppError::TokenExchange`] when Spotify rejected the code
pub async fn authorize(
    http: &Client,
    config: &Config,
    launcher: &dyn BrowserLauncher,
) -> Res<AccessToken> {
    let state = generate_state();
    let (pending, code_rx) = PendingAuthorization::new(state.clone());

    let server = start_callback_server(config.server_addr, pending).await?;
    info!("Listening for the Spotify redirect on {}", server.local_addr());

    let auth_url = authorization_url(config, &state)?;
    if let Err(e) = launcher.open(&auth_url) {
        warning!(
            "Failed to open browser ({}). Please navigate to the following URL manually:\n{}",
            e,
            auth_url
        );
    }

    info!("Waiting for authorization...");
    let code = code_rx.await.map_err(|_| AppError::AuthChannelClosed)?;
    server.shutdown();
    success!("Authorization code received.");

    let token = exchange_code(http, config, &code).await?;
    success!("Authentication successful!");
    Ok(token)
}

/// Builds the consent page URL for the given `state`.
pub fn authorization_url(config: &Config, state: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::InvalidConfig {
        key: "SPOTIFY_AUTH_URL",
        reason: format!("{}: {}", config.auth_url, e),
    })?;

    Ok(url.into())
}

/// Random value tying a redirect to the request that started it.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// `base64(client_id:client_secret)`, the payload of the Basic auth header.
pub fn basic_credentials(config: &Config) -> String {
    STANDARD.encode(format!("{}:{}", config.client_id, config.client_secret))
}

/// Exchanges an authorization code for an access token.
///
/// Sends a single form-encoded POST to the token endpoint, authenticated
/// with the client credentials. Nothing is retried.
pub async fn exchange_code(
    http: &Client,
    config: &Config,
    code: &AuthorizationCode,
) -> Res<AccessToken> {
    let response = http
        .post(&config.token_url)
        .header(AUTHORIZATION, format!("Basic {}", basic_credentials(config)))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AppError::TokenExchange(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::TokenExchange(format!(
            "{status}: {}",
            super::error_message(&body)
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::TokenExchange(format!("unexpected response body: {e}")))?;

    if token.access_token.is_empty() {
        return Err(AppError::TokenExchange(
            "response did not contain an access token".to_string(),
        ));
    }

    Ok(AccessToken::new(token.access_token))
}
