use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

const SCOPE: &str = "https://www.googleapis.com/auth/youtube";
const STATE_TOKEN_LENGTH: usize = 32;
const REDIRECT_RESPONSE: &str = "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\n\r\n\
    <html><body>Authorization received. You can close this tab.</body></html>";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("could not read client secret file: {0}")]
    ClientSecretRead(std::io::Error),
    #[error("loopback listener failed: {0}")]
    Listener(#[from] std::io::Error),
    #[error("could not parse client secret file: {0}")]
    ClientSecretParse(#[from] serde_json::Error),
    #[error("auth_uri in the client secret file is not a valid URL: {0}")]
    InvalidAuthUri(#[from] url::ParseError),
    #[error("consent was denied: {0}")]
    ConsentDenied(String),
    #[error("redirect request was malformed")]
    MalformedRedirect,
    #[error("redirect state token did not match")]
    StateMismatch,
    #[error("token exchange request failed: {0}")]
    TokenExchange(#[from] reqwest::Error),
    #[error("token endpoint returned status {status}: {message}")]
    TokenStatus { status: u16, message: String },
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: OauthClient,
}

#[derive(Deserialize)]
pub struct OauthClient {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Runs the installed-app OAuth2 consent flow for playlist management and
/// returns a bearer token: opens the consent page in a browser, receives the
/// authorization code on a loopback listener, and exchanges it for a token.
pub async fn authorize(
    http_client: &reqwest::Client,
    client_secret_path: impl AsRef<Path>,
) -> Result<String, AuthError> {
    let oauth_client = read_client_secret(client_secret_path.as_ref())?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

    let state = state_token();
    let consent_url = consent_url(&oauth_client, &redirect_uri, &state)?;

    tracing::info!(url = %consent_url, "requesting playlist-management consent");
    if webbrowser::open(consent_url.as_str()).is_err() {
        tracing::warn!("could not open a browser, visit the consent URL manually");
    }

    let code = receive_code(&listener, &state).await?;
    exchange_code(http_client, &oauth_client, &redirect_uri, &code).await
}

fn read_client_secret(path: &Path) -> Result<OauthClient, AuthError> {
    let contents = std::fs::read_to_string(path).map_err(AuthError::ClientSecretRead)?;
    let file: ClientSecretFile = serde_json::from_str(&contents)?;
    Ok(file.installed)
}

fn state_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn consent_url(
    oauth_client: &OauthClient,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &oauth_client.auth_uri,
        [
            ("client_id", oauth_client.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("state", state),
        ],
    )
}

async fn receive_code(listener: &TcpListener, expected_state: &str) -> Result<String, AuthError> {
    let (mut stream, _) = listener.accept().await?;

    let mut buffer = vec![0_u8; 4096];
    let read = stream.read(&mut buffer).await?;
    let request = String::from_utf8_lossy(&buffer[..read]).into_owned();

    _ = stream.write_all(REDIRECT_RESPONSE.as_bytes()).await;

    redirect_code(&request, expected_state)
}

/// Extracts the authorization code from the redirect request, verifying the
/// state token round-tripped unchanged.
fn redirect_code(request: &str, expected_state: &str) -> Result<String, AuthError> {
    let request_target = request
        .split_whitespace()
        .nth(1)
        .ok_or(AuthError::MalformedRedirect)?;
    let url = Url::parse(&format!("http://localhost{}", request_target))
        .map_err(|_| AuthError::MalformedRedirect)?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => return Err(AuthError::ConsentDenied(value.into_owned())),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }

    code.ok_or(AuthError::MalformedRedirect)
}

async fn exchange_code(
    http_client: &reqwest::Client,
    oauth_client: &OauthClient,
    redirect_uri: &str,
    code: &str,
) -> Result<String, AuthError> {
    let response = http_client
        .post(&oauth_client.token_uri)
        .form(&[
            ("code", code),
            ("client_id", &oauth_client.client_id),
            ("client_secret", &oauth_client.client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::TokenStatus {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        });
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}
