//! Error types for Cloudlets API operations.

use std::fmt;

use cloudlets_rules::ValidationErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during Cloudlets API operations.
///
/// Every variant carries the operation name (`list origins`, `create policy
/// versions`, ...) so the failing call is visible in the rendered message.
#[derive(Debug, Error)]
pub enum Error {
    /// The client could not be constructed from its configuration.
    #[error("client configuration: {0}")]
    Config(String),

    /// Request parameters failed local validation; nothing was sent.
    #[error("{op}: struct validation:\n{errors}")]
    Validation {
        /// The failing operation.
        op: &'static str,
        /// The aggregated field violations.
        errors: ValidationErrors,
    },

    /// The request URL could not be built.
    #[error("{op}: failed to parse url: {source}")]
    Url {
        /// The failing operation.
        op: &'static str,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent, or its response body not decoded.
    #[error("{op}: request failed: {source}")]
    Request {
        /// The failing operation.
        op: &'static str,
        /// The underlying transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with an unexpected status.
    #[error("{op}: {source}")]
    Api {
        /// The failing operation.
        op: &'static str,
        /// The structured error envelope.
        #[source]
        source: ApiError,
    },
}

impl Error {
    /// Whether this error was a local pre-flight validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The aggregated violations, when this is a validation failure.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// The structured API error, when the API rejected the request.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for Cloudlets API operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero_u16(value: &u16) -> bool {
    *value == 0
}

/// Akamai's Problem-Details-style error envelope.
///
/// Two errors compare equal when their status codes and serialized content
/// match, so a returned error can be compared against a hand-built expected
/// one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiError {
    /// Error type URI.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Short, human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Detailed explanation.
    pub detail: String,
    /// URI identifying this specific occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Behavior the error originates from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_name: Option<String>,
    /// JSON pointer to the offending location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_location: Option<String>,
    /// HTTP status code of the response.
    #[serde(skip_serializing_if = "is_zero_u16")]
    pub status_code: u16,
    /// Nested error objects, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    /// Nested warning objects, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<serde_json::Value>,
}

impl ApiError {
    /// Builds the envelope from a response status and body. A body that is
    /// not valid JSON degrades to a synthetic error carrying the raw text.
    #[must_use]
    pub fn from_body(status_code: u16, body: &[u8]) -> Self {
        serde_json::from_slice::<Self>(body).map_or_else(
            |_| Self {
                title: Some("Failed to unmarshal error body".to_string()),
                detail: String::from_utf8_lossy(body).into_owned(),
                status_code,
                ..Self::default()
            },
            |mut parsed| {
                parsed.status_code = status_code;
                parsed
            },
        )
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status_code = response.status().as_u16();
        let body = response.bytes().await.unwrap_or_default();
        Self::from_body(status_code, &body)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(body) => write!(f, "API error:\n{body}"),
            Err(err) => write!(f, "error marshaling API error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.status_code == other.status_code && self.to_string() == other.to_string()
    }
}
