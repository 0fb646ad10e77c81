//! Per-attempt outcome tags.
//!
//! Every attempt is reduced to exactly one [`AttemptOutcome`] at the transport
//! boundary. The retry loop in the client only matches on the tag.

use reqwest::StatusCode;
use serde_json::Value;

use crate::ApiError;

#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    /// 2xx with a decodable body.
    Success {
        data: Value,
        message: Option<String>,
    },
    /// 401. Clears the token; never retried.
    AuthError,
    /// 403. Never retried.
    PermissionError,
    /// Worth another attempt if any remain.
    RetryableError(ApiError),
    /// Stops the loop immediately.
    TerminalError(ApiError),
}

/// Status-only classification, decided before the body is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusClass {
    Success,
    Unauthorized,
    Forbidden,
    Retryable,
}

pub(crate) fn classify_status(status: StatusCode) -> StatusClass {
    match status {
        s if s.is_success() => StatusClass::Success,
        StatusCode::UNAUTHORIZED => StatusClass::Unauthorized,
        StatusCode::FORBIDDEN => StatusClass::Forbidden,
        _ => StatusClass::Retryable,
    }
}

/// Builds the outcome for a response whose body has been read.
pub(crate) fn classify_response(status: StatusCode, body: &str) -> AttemptOutcome {
    match classify_status(status) {
        StatusClass::Unauthorized => AttemptOutcome::AuthError,
        StatusClass::Forbidden => AttemptOutcome::PermissionError,
        StatusClass::Retryable => AttemptOutcome::RetryableError(ApiError::Status {
            status: status.as_u16(),
            message: error_message(status, body),
        }),
        StatusClass::Success => match parse_body(body) {
            Ok(payload) => {
                let (data, message) = split_payload(payload);
                AttemptOutcome::Success { data, message }
            }
            Err(err) => AttemptOutcome::RetryableError(err),
        },
    }
}

/// Timeouts and request-construction failures end the loop; every other
/// transport failure may be retried.
pub(crate) fn classify_transport_error(err: reqwest::Error, timeout_ms: u64) -> AttemptOutcome {
    if err.is_timeout() {
        AttemptOutcome::TerminalError(ApiError::Timeout { timeout_ms })
    } else if err.is_builder() {
        AttemptOutcome::TerminalError(ApiError::InvalidRequest(err.to_string()))
    } else {
        AttemptOutcome::RetryableError(ApiError::Transport(err))
    }
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|err| ApiError::Decode(format!("invalid response JSON: {err}; body: {body}")))
}

/// Prefers a nested `data` field, otherwise the whole body is the payload.
fn split_payload(payload: Value) -> (Value, Option<String>) {
    match payload {
        Value::Object(mut map) => {
            let message = match map.get("message") {
                Some(Value::String(text)) => Some(text.clone()),
                _ => None,
            };
            match map.remove("data") {
                Some(data) => (data, message),
                None => (Value::Object(map), message),
            }
        }
        other => (other, None),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            ["message", "error", "detail"]
                .iter()
                .filter_map(|key| value.get(*key).and_then(Value::as_str))
                .find(|text| !text.trim().is_empty())
        })
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
