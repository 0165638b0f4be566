//! Cloudlets API client.
//!
//! The client is a thin session over [`reqwest`]: it builds request URLs
//! against a base endpoint, performs exactly one request/response exchange
//! per operation, checks the expected status and decodes the JSON body.
//! Authentication (EdgeGrid signing) is the caller's concern; inject a
//! pre-configured [`reqwest::Client`] via [`Client::with_http_client`].

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{ApiError, Error, Result};

/// Configuration for the Cloudlets client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API host, e.g. `https://akaa-xxxx.luna.akamaiapis.net`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: 60,
        }
    }
}

/// Cloudlets v2 API client.
///
/// Cheap to clone; all operations take `&self`, so concurrent use needs no
/// locking.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Client {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| Error::Config(format!("invalid base URL: {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|err| Error::Config(err.to_string()))?;
        Ok(Self { http, base_url })
    }

    /// Creates a client around an injected transport, e.g. one whose
    /// middleware performs EdgeGrid request signing.
    #[must_use]
    pub const fn with_http_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, op: &'static str, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| Error::Url { op, source })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        op: &'static str,
        url: Url,
        expected: StatusCode,
    ) -> Result<T> {
        let response = self.execute(op, self.http.get(url), expected).await?;
        response
            .json()
            .await
            .map_err(|source| Error::Request { op, source })
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        op: &'static str,
        method: Method,
        url: Url,
        body: &B,
        expected: StatusCode,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.http.request(method, url).json(body);
        let response = self.execute(op, builder, expected).await?;
        response
            .json()
            .await
            .map_err(|source| Error::Request { op, source })
    }

    pub(crate) async fn delete_empty(
        &self,
        op: &'static str,
        url: Url,
        expected: StatusCode,
    ) -> Result<()> {
        self.execute(op, self.http.delete(url), expected).await?;
        Ok(())
    }

    async fn execute(
        &self,
        op: &'static str,
        builder: RequestBuilder,
        expected: StatusCode,
    ) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| Error::Request { op, source })?;
        if response.status() != expected {
            return Err(Error::Api {
                op,
                source: ApiError::from_response(response).await,
            });
        }
        Ok(response)
    }
}
