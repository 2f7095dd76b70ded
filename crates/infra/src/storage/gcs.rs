//! Google Cloud Storage JSON API object store
//!
//! - Read: `GET {api}/b/{bucket}/o/{name}?alt=media`; the generation comes
//!   from the `x-goog-generation` header of the same response.
//! - Write: `POST {upload}/b/{bucket}/o?uploadType=media&name={name}`, plus
//!   `ifGenerationMatch` for conditional writes (412 on mismatch).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use timealign_core::{BearerTokenProvider, Generation, ObjectStore, StoredObject, WriteOutcome};
use timealign_domain::{Result, StoreConfig, TimeAlignError};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::http::HttpClient;

const GENERATION_HEADER: &str = "x-goog-generation";

/// Object store client for one bucket.
///
/// Holds no state besides its configuration and token source; every call is
/// an independent round trip.
pub struct GcsObjectStore {
    http: HttpClient,
    config: StoreConfig,
    tokens: Arc<dyn BearerTokenProvider>,
}

impl GcsObjectStore {
    /// Build a client with its own HTTP transport from `config`.
    pub fn new(config: StoreConfig, tokens: Arc<dyn BearerTokenProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .max_attempts(config.http_max_attempts)
            .build()?;
        Ok(Self::with_http_client(config, tokens, http))
    }

    /// Store sharing an existing HTTP client.
    pub fn with_http_client(
        config: StoreConfig,
        tokens: Arc<dyn BearerTokenProvider>,
        http: HttpClient,
    ) -> Self {
        Self { http, config, tokens }
    }

    /// Bucket holding the poll objects.
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    async fn bearer(&self) -> Result<String> {
        match self.tokens.current_token().await {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(TimeAlignError::Auth("no bearer token available for object store".into())),
        }
    }

    fn object_url(&self, name: &str) -> Result<Url> {
        let mut url = parse_base(&self.config.api_base_url)?;
        url.path_segments_mut()
            .map_err(|_| TimeAlignError::Config("object store API URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["b", self.config.bucket.as_str(), "o", name]);
        Ok(url)
    }

    fn upload_url(&self) -> Result<Url> {
        let mut url = parse_base(&self.config.upload_base_url)?;
        url.path_segments_mut()
            .map_err(|_| TimeAlignError::Config("object store upload URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["b", self.config.bucket.as_str(), "o"]);
        Ok(url)
    }

    async fn upload(
        &self,
        name: &str,
        body: Vec<u8>,
        expected: Option<&Generation>,
    ) -> Result<Response> {
        let token = self.bearer().await?;

        let mut query = vec![("uploadType", "media"), ("name", name)];
        if let Some(generation) = expected {
            query.push(("ifGenerationMatch", generation.as_str()));
        }

        let request = self
            .http
            .request(Method::POST, self.upload_url()?)
            .bearer_auth(token)
            .query(&query)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        self.http.send(request).await.map_err(transport_failure)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    #[instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn conditional_get(&self, name: &str) -> Result<Option<StoredObject>> {
        let token = self.bearer().await?;

        let request = self
            .http
            .request(Method::GET, self.object_url(name)?)
            .bearer_auth(token)
            .query(&[("alt", "media")]);
        let response = self.http.send(request).await.map_err(transport_failure)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(object = name, "object not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_failure(status, response).await);
        }

        let generation = response
            .headers()
            .get(GENERATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Generation::new)
            .ok_or_else(|| {
                TimeAlignError::Store(format!("read of {} returned no {} header", name, GENERATION_HEADER))
            })?;

        let body = response
            .bytes()
            .await
            .map_err(|e| TimeAlignError::Store(format!("failed to read body of {}: {}", name, e)))?;

        debug!(object = name, generation = %generation, bytes = body.len(), "object read");
        Ok(Some(StoredObject { body: body.to_vec(), generation }))
    }

    #[instrument(skip(self, body), fields(bucket = %self.config.bucket, bytes = body.len()))]
    async fn unconditional_put(&self, name: &str, body: Vec<u8>) -> Result<()> {
        let response = self.upload(name, body, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(status, response).await);
        }
        debug!(object = name, "object overwritten");
        Ok(())
    }

    #[instrument(skip(self, body), fields(bucket = %self.config.bucket, bytes = body.len()))]
    async fn conditional_put(
        &self,
        name: &str,
        body: Vec<u8>,
        expected: &Generation,
    ) -> Result<WriteOutcome> {
        let response = self.upload(name, body, Some(expected)).await?;
        let status = response.status();

        if status == StatusCode::PRECONDITION_FAILED {
            warn!(object = name, expected = %expected, "generation precondition failed");
            return Ok(WriteOutcome::Conflict);
        }
        if !status.is_success() {
            return Err(status_failure(status, response).await);
        }

        debug!(object = name, expected = %expected, "conditional write committed");
        Ok(WriteOutcome::Committed)
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| TimeAlignError::Config(format!("invalid object store URL {}: {}", raw, e)))
}

/// Transport failures (timeouts included) are store errors, never conflicts.
fn transport_failure(error: TimeAlignError) -> TimeAlignError {
    match error {
        TimeAlignError::Auth(_) | TimeAlignError::Store(_) => error,
        other => TimeAlignError::Store(other.to_string()),
    }
}

async fn status_failure(status: StatusCode, response: Response) -> TimeAlignError {
    let detail = response.text().await.unwrap_or_default();
    let message = format!("HTTP {}: {}", status.as_u16(), detail.trim());

    // 401 means the token itself was rejected. A valid token without access
    // to the bucket (403) is a store-side permission denial.
    match status {
        StatusCode::UNAUTHORIZED => TimeAlignError::Auth(message),
        _ => TimeAlignError::Store(message),
    }
}
