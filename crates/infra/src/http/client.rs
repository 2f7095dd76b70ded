use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use timealign_domain::constants::DEFAULT_STORE_TIMEOUT_SECS;
use timealign_domain::TimeAlignError;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with timeout and optional transient-failure retries.
///
/// Retries cover transport failures, 429 and 5xx only. Every other status,
/// 412 included, is handed back to the caller on the first response.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TimeAlignError> {
        Self::builder().build()
    }

    /// Total attempts per request.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request, retrying transient failures while attempts remain.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, TimeAlignError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    TimeAlignError::Internal(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| TimeAlignError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            let last_attempt = attempt == attempts;
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if is_transient_status(status) && !last_attempt {
                        self.pause(attempt).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if is_transient_error(&err) && !last_attempt {
                        self.pause(attempt).await;
                        continue;
                    }
                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(TimeAlignError::Internal("http client exhausted retries without producing a result".into()))
    }

    /// Send, require a success status and decode the JSON body.
    pub async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, TimeAlignError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send(builder)
            .await?
            .error_for_status()
            .map_err(|err| TimeAlignError::from(InfraError::from(err)))?;

        response.json::<T>().await.map_err(|err| InfraError::from(err).into())
    }

    /// Delay after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`.
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn pause(&self, attempt: usize) {
        let delay = self.backoff_delay(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: Some(concat!("timealign/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles each attempt.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client; fails only if TLS setup fails.
    pub fn build(self) -> Result<HttpClient, TimeAlignError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| TimeAlignError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn is_transient_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};
    use serde::Deserialize;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn retrying_client() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .build()
            .expect("http client")
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let server = MockServer::start().await;
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                let current = attempts_clone.fetch_add(1, Ordering::SeqCst);
                if current < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = retrying_client();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn precondition_failure_is_returned_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(412))
            .expect(1)
            .mount(&server)
            .await;

        let client = retrying_client();
        let response = client
            .send(client.request(Method::POST, server.uri()).body("{}"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[tokio::test]
    async fn single_attempt_client_returns_first_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().max_attempts(1).build().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn send_json_decodes_success_and_maps_status() {
        #[derive(Deserialize)]
        struct Body {
            ok: bool,
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::path("/good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::path("/denied"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = retrying_client();
        let body: Body = client
            .send_json(client.request(Method::GET, format!("{}/good", server.uri())))
            .await
            .expect("json");
        assert!(body.ok);

        let denied = client
            .send_json::<Body>(client.request(Method::GET, format!("{}/denied", server.uri())))
            .await;
        assert!(matches!(denied, Err(TimeAlignError::Auth(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{}", addr);

        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .build()
            .expect("http client");

        let result = client.send(client.request(Method::GET, &url)).await;
        match result {
            Err(TimeAlignError::Network(msg)) => {
                assert!(msg.to_lowercase().contains("http"));
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
