//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use timealign_domain::TimeAlignError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TimeAlignError);

impl From<InfraError> for TimeAlignError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TimeAlignError> for InfraError {
    fn from(value: TimeAlignError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTimeAlignError {
    fn into_timealign(self) -> TimeAlignError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TimeAlignError */
/* -------------------------------------------------------------------------- */

impl IntoTimeAlignError for HttpError {
    fn into_timealign(self) -> TimeAlignError {
        if self.is_timeout() {
            return TimeAlignError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TimeAlignError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return TimeAlignError::Codec(format!("HTTP response body: {}", self));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TimeAlignError::Auth(message),
                404 => TimeAlignError::NotFound(message),
                400..=499 => TimeAlignError::Validation(message),
                _ => TimeAlignError::Network(message),
            };
        }

        TimeAlignError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_timealign())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → TimeAlignError */
/* -------------------------------------------------------------------------- */

impl IntoTimeAlignError for JsonError {
    fn into_timealign(self) -> TimeAlignError {
        TimeAlignError::Codec(format!(
            "invalid JSON at line {} column {}: {}",
            self.line(),
            self.column(),
            self
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_timealign())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TimeAlignError */
/* -------------------------------------------------------------------------- */

impl IntoTimeAlignError for IoError {
    fn into_timealign(self) -> TimeAlignError {
        match self.kind() {
            std::io::ErrorKind::NotFound => TimeAlignError::NotFound(self.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                TimeAlignError::Store(format!("permission denied: {}", self))
            }
            _ => TimeAlignError::Store(format!("I/O failure: {}", self)),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_timealign())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
