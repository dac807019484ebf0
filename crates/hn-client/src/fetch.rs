use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// One request for one upstream resource, returning the raw response body.
///
/// `path` is the resource path without the `.json` suffix, e.g. `/item/8863`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, path: &str) -> ClientResult<String>;
}

/// [`Transport`] over HTTPS using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    /// Returns [`ClientError::InvalidConfig`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| {
                ClientError::InvalidConfig(format!("failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str) -> ClientResult<String> {
        let url = format!("{}{path}.json", self.base_url);
        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|err| ClientError::transport(path, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { path: path.to_string(), status: status.as_u16() });
        }
        response.text().await.map_err(|err| ClientError::transport(path, err))
    }
}

/// Request `path` and decode the body as `T`.
///
/// # Errors
/// A body that is the JSON literal `null` is [`ClientError::NotFound`]; a body
/// that does not decode as `T` is [`ClientError::Decode`]. Transport failures
/// pass through unchanged.
pub async fn fetch<T, R>(transport: &R, method: Method, path: &str) -> ClientResult<T>
where
    T: DeserializeOwned,
    R: Transport + ?Sized,
{
    let body = transport.send(method, path).await?;
    if body.trim() == "null" {
        debug!(path, "upstream returned null");
        return Err(ClientError::NotFound(path.to_string()));
    }
    serde_json::from_str(&body)
        .map_err(|source| ClientError::Decode { path: path.to_string(), source })
}
