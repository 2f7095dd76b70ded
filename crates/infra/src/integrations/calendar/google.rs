//! Google Calendar busy-time lookup
//!
//! Lists timed events in the window with `singleEvents=true` so recurring
//! series arrive expanded. All-day events carry no `dateTime` and are skipped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use timealign_core::{BearerTokenProvider, BusyTimeProvider};
use timealign_domain::{BusyInterval, CalendarConfig, Result, TimeAlignError};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Busy-time provider over the creator's Google calendar
pub struct GoogleCalendarBusyTime {
    http: HttpClient,
    config: CalendarConfig,
    tokens: Arc<dyn BearerTokenProvider>,
}

impl GoogleCalendarBusyTime {
    /// Client for the configured calendar, authenticating through `tokens`.
    pub fn new(
        config: CalendarConfig,
        tokens: Arc<dyn BearerTokenProvider>,
        http: HttpClient,
    ) -> Self {
        Self { http, config, tokens }
    }

    fn events_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            TimeAlignError::Config(format!("invalid calendar URL {}: {}", self.config.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| TimeAlignError::Config("calendar URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["calendars", self.config.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    async fn fetch_page(
        &self,
        token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Result<EventsPage> {
        let mut query = vec![
            ("timeMin", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("timeMax", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("showDeleted", "false".to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(page) = page_token {
            query.push(("pageToken", page.to_string()));
        }

        let request =
            self.http.request(Method::GET, self.events_url()?).bearer_auth(token).query(&query);
        let response = self.http.send(request).await?;
        let status = response.status();

        match status {
            s if s.is_success() => {
                response.json().await.map_err(|e| TimeAlignError::from(InfraError::from(e)))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(TimeAlignError::Auth(format!("calendar rejected credentials ({})", status)))
            }
            _ => {
                let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
                Err(TimeAlignError::Upstream(format!("Google Calendar error ({}): {}", status, body)))
            }
        }
    }
}

#[async_trait]
impl BusyTimeProvider for GoogleCalendarBusyTime {
    #[instrument(skip(self), fields(calendar_id = %self.config.calendar_id))]
    async fn busy_intervals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let token = match self.tokens.current_token().await {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Err(TimeAlignError::Auth("no bearer token available for calendar".into())),
        };

        let mut busy = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(&token, start, end, page_token.as_deref()).await?;
            busy.extend(page.items.into_iter().filter_map(GoogleEvent::into_busy));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!(count = busy.len(), "busy intervals fetched");
        Ok(busy)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<GoogleEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<DateTime<chrono::FixedOffset>>,
}

impl GoogleEvent {
    fn into_busy(self) -> Option<BusyInterval> {
        let start = self.start.and_then(|t| t.date_time)?;
        let end = self.end.and_then(|t| t.date_time)?;
        if end <= start {
            warn!(event_id = ?self.id, "skipping event with non-positive duration");
            return None;
        }
        Some(BusyInterval::new(start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::StaticTokenProvider;

    fn provider(server: &MockServer, token: Option<&str>) -> GoogleCalendarBusyTime {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");
        let config = CalendarConfig { calendar_id: "primary".into(), base_url: server.uri() };
        let tokens = Arc::new(StaticTokenProvider::new(token.map(str::to_string)));
        GoogleCalendarBusyTime::new(config, tokens, http)
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn lists_timed_events_and_skips_all_day() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(header("authorization", "Bearer token-1"))
            .and(query_param("timeMin", "2025-06-02T00:00:00Z"))
            .and(query_param("timeMax", "2025-06-03T00:00:00Z"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .and(query_param("showDeleted", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "e1",
                        "start": { "dateTime": "2025-06-02T11:00:00+02:00" },
                        "end": { "dateTime": "2025-06-02T12:00:00+02:00" }
                    },
                    { "id": "e2", "start": { "date": "2025-06-02" }, "end": { "date": "2025-06-03" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (start, end) = window();
        let busy = provider(&server, Some("token-1")).busy_intervals(start, end).await.unwrap();

        assert_eq!(
            busy,
            vec![BusyInterval::new(
                Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
            )]
        );
    }

    #[tokio::test]
    async fn follows_page_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("pageToken", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "start": { "dateTime": "2025-06-02T15:00:00Z" },
                    "end": { "dateTime": "2025-06-02T16:00:00Z" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "start": { "dateTime": "2025-06-02T09:00:00Z" },
                    "end": { "dateTime": "2025-06-02T10:00:00Z" }
                }],
                "nextPageToken": "next"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (start, end) = window();
        let busy = provider(&server, Some("t")).busy_intervals(start, end).await.unwrap();

        assert_eq!(busy.len(), 2);
        assert_eq!(busy[1].start, Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn missing_token_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let (start, end) = window();
        let result = provider(&server, None).busy_intervals(start, end).await;

        assert!(matches!(result, Err(TimeAlignError::Auth(_))));
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(401)).mount(&server).await;

        let (start, end) = window();
        let result = provider(&server, Some("stale")).busy_intervals(start, end).await;

        assert!(matches!(result, Err(TimeAlignError::Auth(_))));
    }

    #[tokio::test]
    async fn server_errors_are_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let (start, end) = window();
        let result = provider(&server, Some("t")).busy_intervals(start, end).await;

        assert!(matches!(result, Err(TimeAlignError::Upstream(msg)) if msg.contains("503")));
    }
}
