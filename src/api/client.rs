use std::sync::Arc;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::credentials::CredentialStore;
use crate::config::config;
use crate::error::{ApiError, ApiResult};

/// JSON-over-HTTP wrapper shared by the resource clients.
///
/// Every call is a single attempt. Failures come back as [`ApiError`]; the
/// cause of an unexpected failure is logged here and never shown to the user.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: Url,
    credentials: Option<Arc<dyn CredentialStore>>,
    token_header: String,
    log_requests: bool,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_credentials", &self.credentials.is_some())
            .field("token_header", &self.token_header)
            .finish()
    }
}

impl HttpClient {
    /// Client without token injection
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_reqwest(reqwest::Client::new(), base_url)
    }

    /// Share an existing connection pool
    pub fn with_reqwest(inner: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let api = &config().api;

        Ok(Self {
            inner,
            base_url,
            credentials: None,
            token_header: api.token_header.clone(),
            log_requests: api.enable_request_logging,
        })
    }

    /// Attach the token from `credentials` to every outgoing request
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
        self.token_header = header.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path)?.json(body)).await?;
        decode(response).await
    }

    /// POST whose response body is irrelevant
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.send(self.request(Method::POST, path)?.json(body)).await?;
        Ok(())
    }

    /// PUT whose response body is irrelevant
    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.send(self.request(Method::PUT, path)?.json(body)).await?;
        Ok(())
    }

    /// DELETE whose response body is irrelevant
    pub async fn delete_unit(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.resolve(path)?;

        if self.log_requests {
            tracing::debug!("{} {}", method, url);
        }

        let mut builder = self
            .inner
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.credentials.as_ref().and_then(|c| c.token()) {
            match HeaderValue::from_str(&token) {
                Ok(value) => builder = builder.header(self.token_header.as_str(), value),
                Err(_) => tracing::warn!("Stored token is not a valid header value; sending without it"),
            }
        }

        Ok(builder)
    }

    fn resolve(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                tracing::warn!("Cannot build request URL for {}: {}", path, e);
                ApiError::unexpected(e)
            })
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Request failed before a response arrived: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_error_body(status.as_u16(), &body);
        tracing::warn!("Backend returned {}: {}", status, err.message());
        Err(err)
    }
}

/// A success status whose body is a `{message}` object instead of the
/// expected payload is reported as a server error carrying that message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| match ApiError::message_in(&body) {
        Some(message) => {
            tracing::warn!("Backend returned {} with message instead of payload: {}", status, message);
            ApiError::server(status, message)
        }
        None => {
            tracing::warn!("Response body did not match the expected shape: {}", e);
            ApiError::unexpected(e)
        }
    })
}

/// Normalize so relative paths append to any path prefix in the base URL
fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {}", raw, e))?;

    if url.cannot_be_a_base() {
        anyhow::bail!("API base URL '{}' cannot carry a path", raw);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
