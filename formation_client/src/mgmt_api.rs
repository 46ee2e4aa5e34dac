//! Client for the `/formations` management API.

use formation_api::models::{
    ActiveConfigurations, ErrorBody, FormationConfiguration, FormationNames,
};
use reqwest::{Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::token::{TokenApi, TokenError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to acquire access token: {0}")]
    Token(#[from] TokenError),

    #[error("failed to send HTTP request: {0}")]
    SendRequest(reqwest::Error),

    #[error("formation API error ({0}): {1}")]
    ApiError(StatusCode, String),

    #[error("failed to deserialize response with status code {0} at {1}: {2}")]
    DeserializationError(StatusCode, Url, reqwest::Error),

    #[error("active configuration set is empty; pass force to stop the formation instead")]
    MissingActiveConfigurations,
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResponseErrorMessageExt: Sized {
    fn error_from_body(self) -> impl std::future::Future<Output = Result<Self>> + Send;
}

impl ResponseErrorMessageExt for reqwest::Response {
    /// Map a non-2xx response to [`Error::ApiError`] using the platform's
    /// JSON error body.
    async fn error_from_body(self) -> Result<Self> {
        let status = self.status();
        if !(status.is_client_error() || status.is_server_error()) {
            return Ok(self);
        }

        let url = self.url().to_owned();
        Err(match self.json::<ErrorBody>().await {
            Ok(ErrorBody { detail, .. }) => Error::ApiError(status, detail),
            Err(err) => Error::DeserializationError(status, url, err),
        })
    }
}

/// Client for the formation management API.
///
/// Holds only the endpoint, a [`TokenApi`] and a connection pool; no state is
/// carried between calls, so a single client may be cloned and shared across
/// tasks freely.
#[derive(Debug, Clone)]
pub struct Client {
    mgmt_api_endpoint: String,
    token_api: TokenApi,
    client: reqwest::Client,
}

impl Client {
    pub fn new(config: &Config) -> Self {
        Self::from_client(reqwest::Client::new(), config)
    }

    /// Build a client on top of an existing `reqwest::Client`, sharing its
    /// connection pool with the token exchange.
    pub fn from_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            mgmt_api_endpoint: config.compute_url.trim_end_matches('/').to_string(),
            token_api: TokenApi::from_client(client.clone(), config),
            client,
        }
    }

    fn formations_url(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("{}/formations", self.mgmt_api_endpoint)
        } else {
            format!("{}/formations/{}", self.mgmt_api_endpoint, suffix)
        }
    }

    // One token exchange, then one HTTP request. Token failure returns before
    // anything is sent to the management endpoint.
    async fn start_request<RQ: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<&RQ>,
    ) -> Result<reqwest::Response> {
        let token = self.token_api.access_token().await?;
        debug!(%method, url, "dispatching formation API request");
        let mut req = self.client.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(Error::SendRequest)?;
        resp.error_from_body().await
    }

    async fn request<RQ: Serialize, RS: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<&RQ>,
    ) -> Result<RS> {
        let resp = self.start_request(method, url, body).await?;
        let status = resp.status();
        let url = resp.url().to_owned();
        resp.json()
            .await
            .map_err(|err| Error::DeserializationError(status, url, err))
    }

    // For endpoints whose success body carries no information.
    async fn request_noresult<RQ: Serialize>(
        &self,
        method: Method,
        url: String,
        body: Option<&RQ>,
    ) -> Result<()> {
        self.start_request(method, url, body).await.map(|_| ())
    }

    /// Names of all formations visible to the caller.
    ///
    /// Uses `GET /formations`.
    pub async fn list_names(&self) -> Result<FormationNames> {
        self.request(Method::GET, self.formations_url(""), None::<&()>)
            .await
    }

    /// Create a formation with an initial configuration, optionally setting
    /// it active. The formation name must not already exist. Returns the IDs
    /// of the created configurations.
    ///
    /// Uses `POST /formations/{name}?active={bool}`.
    pub async fn create_formation(
        &self,
        formation_name: &str,
        configuration: &FormationConfiguration,
        active: bool,
    ) -> Result<Vec<Uuid>> {
        let url = format!("{}?active={active}", self.formations_url(formation_name));
        self.request(Method::POST, url, Some(configuration)).await
    }

    /// Create a formation by cloning an existing formation's configurations.
    ///
    /// Uses `POST /formations/{name}?active={bool}&source={source}`.
    pub async fn clone_formation(
        &self,
        formation_name: &str,
        source_name: &str,
        active: bool,
    ) -> Result<Vec<Uuid>> {
        let url = format!(
            "{}?active={active}&source={source_name}",
            self.formations_url(formation_name)
        );
        self.request(Method::POST, url, None::<&()>).await
    }

    /// Delete a formation and all of its configurations. With `force` the
    /// formation is deleted even while running. Returns the IDs of the
    /// deleted configurations.
    ///
    /// Uses `DELETE /formations/{name}?force={bool}`.
    pub async fn delete_formation(&self, formation_name: &str, force: bool) -> Result<Vec<Uuid>> {
        let url = format!("{}?force={force}", self.formations_url(formation_name));
        self.request(Method::DELETE, url, None::<&()>).await
    }

    /// Add a configuration to an existing formation, optionally setting it
    /// active. Returns the server-assigned ID of the new configuration.
    ///
    /// Uses `POST /formations/{name}/configurations?active={bool}`.
    pub async fn create_configuration(
        &self,
        formation_name: &str,
        configuration: &FormationConfiguration,
        active: bool,
    ) -> Result<Uuid> {
        let url = format!(
            "{}/configurations?active={active}",
            self.formations_url(formation_name)
        );
        self.request(Method::POST, url, Some(configuration)).await
    }

    /// IDs of all configurations of a formation.
    ///
    /// Uses `GET /formations/{name}/configurations`.
    pub async fn list_configurations(&self, formation_name: &str) -> Result<Vec<Uuid>> {
        let url = format!("{}/configurations", self.formations_url(formation_name));
        self.request(Method::GET, url, None::<&()>).await
    }

    /// Fetch one configuration by ID.
    ///
    /// Uses `GET /formations/{name}/configurations/{id}`.
    pub async fn get_configuration(
        &self,
        formation_name: &str,
        id: Uuid,
    ) -> Result<FormationConfiguration> {
        let url = format!("{}/configurations/{id}", self.formations_url(formation_name));
        self.request(Method::GET, url, None::<&()>).await
    }

    /// Remove one configuration from a formation.
    ///
    /// Uses `DELETE /formations/{name}/configurations/{id}`.
    pub async fn delete_configuration(&self, formation_name: &str, id: Uuid) -> Result<()> {
        let url = format!("{}/configurations/{id}", self.formations_url(formation_name));
        self.request_noresult(Method::DELETE, url, None::<&()>)
            .await
    }

    /// The active configuration set of a formation, with traffic weights.
    ///
    /// Uses `GET /formations/{name}/activeConfiguration`.
    pub async fn get_active_configurations(
        &self,
        formation_name: &str,
    ) -> Result<ActiveConfigurations> {
        let url = format!(
            "{}/activeConfiguration",
            self.formations_url(formation_name)
        );
        self.request(Method::GET, url, None::<&()>).await
    }

    /// Replace the active configuration set of a formation.
    ///
    /// An empty set brings the formation down, so it is rejected client-side
    /// unless `force` is given; use [`Client::stop`] to stop intentionally.
    ///
    /// Uses `PUT /formations/{name}/activeConfiguration?force={bool}`.
    pub async fn set_active_configurations(
        &self,
        formation_name: &str,
        configs: &ActiveConfigurations,
        force: bool,
    ) -> Result<()> {
        if !force && configs.is_empty() {
            return Err(Error::MissingActiveConfigurations);
        }
        let url = format!(
            "{}/activeConfiguration?force={force}",
            self.formations_url(formation_name)
        );
        self.request_noresult(Method::PUT, url, Some(configs)).await
    }

    /// Stop a formation by deleting its active configuration set.
    ///
    /// Uses `DELETE /formations/{name}/activeConfiguration`.
    pub async fn stop(&self, formation_name: &str) -> Result<()> {
        let url = format!(
            "{}/activeConfiguration",
            self.formations_url(formation_name)
        );
        self.request_noresult(Method::DELETE, url, None::<&()>)
            .await
    }
}
