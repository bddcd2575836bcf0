use crate::app_config::AppConfig;
use crate::backend::error::BackendError;
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque credential obtained from the login call and attached to every
/// request/response call. Never refreshed by the sync client itself.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        AuthToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Builds a client that carries the bearer token on every request. Requests
/// are bounded by the configured timeout so a silent backend feeds the same
/// failure path as any other transport error.
pub fn new_client(config: &AppConfig, token: &AuthToken) -> Result<Client, BackendError> {
    let mut headers = header::HeaderMap::new();
    let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))?;
    authorization.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, authorization);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.backend().request_timeout())
        .build()?;
    Ok(client)
}

#[derive(Serialize, Debug)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Debug)]
struct LoginResponse {
    token: String,
}

/// Exchanges credentials for a bearer token. Rejected credentials surface
/// as `BackendError::Auth`.
pub async fn login(config: &AppConfig, username: &str, password: &str) -> Result<AuthToken, BackendError> {
    let response = Client::builder()
        .timeout(config.backend().request_timeout())
        .build()?
        .post(format!("{}/api/login", config.backend().url()))
        .json(&LoginRequest { username, password })
        .send()
        .await?
        .error_for_status()?;

    let login_response = response.json::<LoginResponse>().await?;
    Ok(AuthToken::new(login_response.token))
}
