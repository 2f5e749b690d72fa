//! HTTP client for the Linode Block Storage API.

mod types;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::backend::BackendFuture;
use crate::config::{Credentials, LinodeConfig};
use crate::volume::{ProviderError, ProviderVolume, VolumeApi};
use types::{CloneVolumeRequest, UpdateVolumeRequest, error_message};

const USER_AGENT: &str = concat!("linode-snapshotter/", env!("CARGO_PKG_VERSION"));

/// Linode API client bound to a single bearer token.
///
/// Requests carry no client-side timeout and are never retried.
#[derive(Clone, Debug)]
pub struct LinodeClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    debug: bool,
}

impl LinodeClient {
    /// Creates a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            credentials,
            debug: false,
        }
    }

    /// Creates a client from loaded settings.
    #[must_use]
    pub fn from_config(config: &LinodeConfig) -> Self {
        Self::new(&config.api_url, config.credentials()).with_debug(config.debug)
    }

    /// Enables logging of response bodies at debug level.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn volume_url(&self, volume_id: u64, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/volumes/{volume_id}/{action}", self.base_url),
            None => format!("{}/volumes/{volume_id}", self.base_url),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        if self.debug {
            tracing::debug!(%method, url, "linode api request");
        }
        self.http
            .request(method, url)
            .bearer_auth(self.credentials.bearer_token())
    }

    async fn execute(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|err| ProviderError::transport(operation, err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ProviderError::transport(operation, err.to_string()))?;

        if self.debug {
            tracing::debug!(
                operation,
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "linode api response"
            );
        }

        if status.is_success() {
            return Ok(body.to_vec());
        }
        Err(ProviderError::rejected(
            operation,
            status.as_u16(),
            error_message(&body),
        ))
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let body = self.execute(operation, request).await?;
        serde_json::from_slice(&body).map_err(|err| {
            ProviderError::transport(operation, format!("unexpected response body: {err}"))
        })
    }
}

impl VolumeApi for LinodeClient {
    fn get_volume(&self, volume_id: u64) -> BackendFuture<'_, ProviderVolume, ProviderError> {
        Box::pin(async move {
            let operation = format!("get volume {volume_id}");
            let request = self.request(Method::GET, &self.volume_url(volume_id, None));
            self.execute_json(&operation, request).await
        })
    }

    fn clone_volume<'a>(
        &'a self,
        volume_id: u64,
        label: &'a str,
    ) -> BackendFuture<'a, ProviderVolume, ProviderError> {
        Box::pin(async move {
            let operation = format!("clone volume {volume_id}");
            let request = self
                .request(Method::POST, &self.volume_url(volume_id, Some("clone")))
                .json(&CloneVolumeRequest { label });
            self.execute_json(&operation, request).await
        })
    }

    fn replace_volume_tags(
        &self,
        volume_id: u64,
        tags: Vec<String>,
    ) -> BackendFuture<'_, ProviderVolume, ProviderError> {
        Box::pin(async move {
            let operation = format!("update tags of volume {volume_id}");
            let request = self
                .request(Method::PUT, &self.volume_url(volume_id, None))
                .json(&UpdateVolumeRequest { tags });
            self.execute_json(&operation, request).await
        })
    }

    fn delete_volume(&self, volume_id: u64) -> BackendFuture<'_, (), ProviderError> {
        Box::pin(async move {
            let operation = format!("delete volume {volume_id}");
            let request = self.request(Method::DELETE, &self.volume_url(volume_id, None));
            self.execute(&operation, request).await.map(drop)
        })
    }
}
