/// Gemini client for slot suggestions and vote summaries
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use timealign_core::{SlotSuggester, SummaryProvider};
use timealign_domain::config::GeminiConfig;
use timealign_domain::{Participant, SlotProposal, TimeAlignError, TimeSlot};
use tracing::{debug, info, warn};

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GeminiError, GenerationConfig,
    RawSlot,
};
use crate::http::HttpClient;

const SUGGEST_INSTRUCTION: &str = "You are a scheduling assistant. Convert the user's request \
into concrete meeting slots. Return an array of objects with ISO 8601 startTime and endTime. \
Split time ranges into consecutive slots of the requested duration. For recurring requests, \
return the next 4 occurrences. Resolve relative dates against the reference date. For generic \
requests, propose 3 to 5 slots within business hours.";

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini `generateContent` client
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Client for the configured model.
    pub fn new(config: GeminiConfig, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Point the client at a different API root (for testing)
    #[cfg(test)]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for candidate slots.
    ///
    /// Entries whose timestamps do not parse are dropped. Timestamps without
    /// an offset are read as UTC.
    pub async fn generate_slots(
        &self,
        prompt: &str,
        reference_date: NaiveDate,
        duration_minutes: u32,
    ) -> Result<Vec<SlotProposal>, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(format!(
                "Reference date: {}\nDefault duration: {} minutes\nRequest: {}",
                reference_date.format("%Y-%m-%d"),
                duration_minutes,
                prompt.trim()
            ))],
            system_instruction: Some(Content::system(SUGGEST_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: slot_schema(),
            }),
        };

        let Some(text) = self.call_api(&request).await?.text() else {
            debug!("model returned no slot text");
            return Ok(Vec::new());
        };

        let raw: Vec<RawSlot> = serde_json::from_str(&text).map_err(|e| {
            GeminiError::InvalidSchema(format!("Failed to parse slots: {}. Content: {}", e, text))
        })?;

        let proposals: Vec<SlotProposal> = raw
            .into_iter()
            .filter_map(|slot| match (parse_timestamp(&slot.start_time), parse_timestamp(&slot.end_time)) {
                (Some(start_time), Some(end_time)) => Some(SlotProposal { start_time, end_time }),
                _ => {
                    warn!(start = %slot.start_time, end = %slot.end_time, "dropping unparseable slot");
                    None
                }
            })
            .collect();

        info!(count = proposals.len(), "Gemini slot suggestions received");
        Ok(proposals)
    }

    /// One-sentence recommendation for the best slot.
    pub async fn analyze_best_slot(
        &self,
        slots: &[TimeSlot],
        participants: &[Participant],
    ) -> Result<String, GeminiError> {
        let slots_json = serde_json::to_string(slots)
            .map_err(|e| GeminiError::InvalidSchema(format!("Failed to encode slots: {}", e)))?;
        let participants_json = serde_json::to_string(participants).map_err(|e| {
            GeminiError::InvalidSchema(format!("Failed to encode participants: {}", e))
        })?;

        let prompt = format!(
            "Analyze these meeting poll results and recommend the best time slot.\n\
             Slots: {}\nParticipants and votes: {}\n\
             Prefer the slot with the most YES votes, count MAYBE as half, and treat NO as a \
             blocker. Answer with one short, friendly sentence naming the time and why.",
            slots_json, participants_json
        );

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        };

        self.call_api(&request)
            .await?
            .text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| GeminiError::InvalidSchema("Response contained no text".to_string()))
    }

    async fn call_api(
        &self,
        payload: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request_builder = self
            .http_client
            .request(Method::POST, &url)
            .header("x-goog-api-key", &self.api_key)
            .json(payload);

        let response = self.http_client.send(request_builder).await.map_err(|err| match err {
            TimeAlignError::Network(msg) | TimeAlignError::Internal(msg) => GeminiError::Network(msg),
            other => GeminiError::Network(format!("HTTP error: {}", other)),
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), model = %self.model, "Received Gemini API response");

        if !status.is_success() {
            return Err(handle_error_status(status.as_u16(), response).await);
        }

        response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidSchema(format!("Failed to parse response: {}", e)))
    }
}

async fn handle_error_status(status: u16, response: reqwest::Response) -> GeminiError {
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        401 | 403 => GeminiError::Authentication(format!("Invalid API key ({})", status)),
        429 => GeminiError::RateLimit(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        _ => GeminiError::Api { status, message },
    }
}

fn slot_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "startTime": { "type": "STRING" },
                "endTime": { "type": "STRING" }
            },
            "required": ["startTime", "endTime"]
        }
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

impl From<GeminiError> for TimeAlignError {
    fn from(err: GeminiError) -> Self {
        TimeAlignError::Upstream(format!("gemini: {}", err))
    }
}

#[async_trait]
impl SlotSuggester for GeminiClient {
    async fn suggest_slots(
        &self,
        prompt: &str,
        reference_date: NaiveDate,
        duration_minutes: u32,
    ) -> timealign_domain::Result<Vec<SlotProposal>> {
        Ok(self.generate_slots(prompt, reference_date, duration_minutes).await?)
    }
}

#[async_trait]
impl SummaryProvider for GeminiClient {
    async fn summarize(
        &self,
        slots: &[TimeSlot],
        participants: &[Participant],
    ) -> timealign_domain::Result<String> {
        Ok(self.analyze_best_slot(slots, participants).await?)
    }
}
