//! Access token acquisition from the identity API.

use formation_api::models::ErrorBody;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;

#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("failed to send token request: {0}")]
    SendRequest(reqwest::Error),
    #[error("token API error ({0}): {1}")]
    ApiError(StatusCode, String),
    #[error("failed to deserialize token response: {0}")]
    ReceiveBody(reqwest::Error),
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Exchanges the configured API key for short-lived access tokens.
///
/// Tokens are not cached: each call to [`TokenApi::access_token`] performs one
/// exchange, keeping every management API call independent of prior calls.
#[derive(Debug, Clone)]
pub struct TokenApi {
    identity_api_endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl TokenApi {
    pub fn new(config: &Config) -> Self {
        Self::from_client(reqwest::Client::new(), config)
    }

    pub fn from_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            identity_api_endpoint: config.identity_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    /// Acquire a fresh access token.
    ///
    /// Uses `POST {identity}/token` with the API key as bearer credential.
    pub async fn access_token(&self) -> Result<String, TokenError> {
        let url = format!("{}/token", self.identity_api_endpoint);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(TokenError::SendRequest)?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let msg = match resp.json::<ErrorBody>().await {
                Ok(body) => body.detail,
                Err(_) => status.to_string(),
            };
            return Err(TokenError::ApiError(status, msg));
        }

        let body: TokenResponse = resp.json().await.map_err(TokenError::ReceiveBody)?;
        Ok(body.token)
    }
}
