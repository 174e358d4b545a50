use pretalx_core::{Credentials, PretalxError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Url};
use tracing::debug;

use crate::types::AuthResponse;

const CLIENT_ID: &str = concat!("pretalx-rs/", env!("CARGO_PKG_VERSION"));
const AUTH_PATH: &str = "/api/auth/";

/// Authenticated pretalx client.
///
/// The token and headers are fixed at construction and never refreshed.
#[derive(Clone)]
pub struct PretalxClient {
    client: Client,
    root_url: Url,
    token: String,
    headers: HeaderMap,
}

impl PretalxClient {
    /// Build a client from optional credential parts.
    ///
    /// Username and password together trigger the token exchange and any
    /// token is ignored; otherwise the token is used directly.
    pub async fn new(
        url: &str,
        username: Option<&str>,
        password: Option<&str>,
        token: Option<&str>,
    ) -> Result<Self> {
        let credentials = Credentials::resolve(
            username.map(str::to_string),
            password.map(str::to_string),
            token.map(str::to_string),
        )?;
        Self::connect(url, credentials).await
    }

    pub async fn connect(url: &str, credentials: Credentials) -> Result<Self> {
        Self::connect_with(Client::new(), url, credentials).await
    }

    /// Like [`connect`](Self::connect), on a caller-configured transport
    /// (timeouts, proxies, TLS).
    pub async fn connect_with(client: Client, url: &str, credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        let root_url = parse_root(url)?;

        let token = match credentials {
            Credentials::Password { username, password } => {
                fetch_token(&client, &root_url, &username, &password).await?
            }
            Credentials::Token(token) => token,
        };

        Self::from_parts(client, root_url, token)
    }

    /// Token-only construction; issues no request.
    pub fn with_token(url: &str, token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(PretalxError::MissingAuthParameter);
        }
        Self::from_parts(Client::new(), parse_root(url)?, token.to_string())
    }

    fn from_parts(client: Client, root_url: Url, token: String) -> Result<Self> {
        let headers = build_headers(&token)?;
        Ok(Self {
            client,
            root_url,
            token,
            headers,
        })
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Resolve an absolute API path against the root URL
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        self.root_url
            .join(path)
            .map_err(|e| PretalxError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

impl std::fmt::Debug for PretalxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PretalxClient")
            .field("root_url", &self.root_url.as_str())
            .finish_non_exhaustive()
    }
}

fn parse_root(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| PretalxError::InvalidUrl(format!("{}: {}", url, e)))
}

fn build_headers(token: &str) -> Result<HeaderMap> {
    let mut auth = HeaderValue::from_str(&format!("Token {}", token))
        .map_err(|e| PretalxError::InvalidHeader(format!("Authorization: {}", e)))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_ID));
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Exchange username and password for an API token. Single attempt.
async fn fetch_token(client: &Client, root_url: &Url, username: &str, password: &str) -> Result<String> {
    let url = root_url
        .join(AUTH_PATH)
        .map_err(|e| PretalxError::InvalidUrl(format!("{}: {}", AUTH_PATH, e)))?;

    debug!(%url, username, "requesting API token");

    let response = client
        .post(url)
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .map_err(|e| PretalxError::Network(e.to_string()))?;

    let body = response
        .text()
        .await
        .map_err(|e| PretalxError::Network(e.to_string()))?;

    match serde_json::from_str::<AuthResponse>(&body) {
        Ok(auth) if !auth.token.is_empty() => Ok(auth.token),
        _ => Err(PretalxError::UnexpectedResponse(body)),
    }
}
