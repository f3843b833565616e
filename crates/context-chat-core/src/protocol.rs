use serde::{Deserialize, Serialize};

pub const ASK_PATH: &str = "/api/v1/ask";
pub const HEALTH_PATH: &str = "/health";
pub const GENERIC_FAILURE_DETAIL: &str = "Failed to get response";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// One backend processing step reported alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub step: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    /// Detail text worth opening in the modal. Empty detail counts as absent.
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_deref().filter(|detail| !detail.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// FastAPI validation errors carry `detail` as an array; only a non-empty
    /// string is shown verbatim.
    fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Failure of a single ask round trip, rendered into the transcript as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskFailure {
    #[error("Error: {detail}")]
    Application { status: u16, detail: String },
    #[error("Critical Error: {message}")]
    Transport { message: String },
}

impl AskFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

pub fn encode_ask_request(query: &str) -> Result<String, AskFailure> {
    serde_json::to_string(&AskRequest {
        query: query.to_string(),
    })
    .map_err(|error| AskFailure::transport(format!("failed to encode request: {error}")))
}

/// Decodes an ask response body.
///
/// The body is parsed before the status is inspected, so a body that is not
/// JSON is a transport failure on either path.
pub fn decode_ask_response(status: u16, raw: &str) -> Result<AskResponse, AskFailure> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|error| AskFailure::transport(format!("invalid JSON in response: {error}")))?;

    if !is_success_status(status) {
        let detail = serde_json::from_value::<ErrorBody>(value)
            .ok()
            .and_then(|body| body.detail_message())
            .unwrap_or_else(|| GENERIC_FAILURE_DETAIL.to_string());
        return Err(AskFailure::Application { status, detail });
    }

    serde_json::from_value(value)
        .map_err(|error| AskFailure::transport(format!("unexpected response shape: {error}")))
}
