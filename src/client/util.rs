// src/client/util.rs

use reqwest::{StatusCode, Url};
use serde_json::Value;

use super::types::{ApiEnvelope, SUCCESS_CODE};
use crate::error::CliError;

const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// Helper to join a path onto the configured base URL.
pub(super) fn build_url(base: &Url, path: &str) -> Result<Url, CliError> {
    base.join(path).map_err(CliError::UrlParse)
}

/// Fold transport-layer failures into the error kinds callers branch on:
/// a deadline that fired becomes `Timeout`, a connection that never opened
/// becomes `BackendUnreachable`, anything else stays a raw transport error.
pub(super) fn classify_transport_error(err: reqwest::Error) -> CliError {
    if err.is_timeout() {
        return CliError::Timeout;
    }
    if err.is_connect() {
        return CliError::BackendUnreachable(err.to_string());
    }
    CliError::Transport(err)
}

/// Best-effort extraction of a human-readable message from a failed
/// response body: structured `message`/`error`/`msg` fields first, then the
/// raw body capped at 200 characters, then the HTTP status reason.
pub(super) fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error", "msg"] {
            if let Some(text) = value.get(field).and_then(Value::as_str) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Interpret a 2xx JSON body according to the envelope contract.
///
/// Precedence: a non-success `code` fails the call, then `success == false`
/// fails it, then a present `data` field (even `null`) is the payload, else
/// the whole body is the payload. Non-object bodies (older endpoints return
/// bare arrays) skip the envelope entirely.
pub(super) fn unwrap_envelope(raw: Value) -> Result<Value, CliError> {
    if !raw.is_object() {
        return Ok(raw);
    }
    let envelope: ApiEnvelope = serde_json::from_value(raw.clone())
        .map_err(|e| CliError::InvalidResponse(format!("malformed response envelope: {e}")))?;

    if let Some(code) = envelope.code {
        if code != SUCCESS_CODE {
            let message = envelope
                .reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Backend reported failure code {code}"));
            return Err(CliError::Business {
                code: Some(code),
                message,
                envelope: raw,
            });
        }
    }
    if envelope.success == Some(false) {
        let message = envelope
            .reason()
            .map(str::to_string)
            .unwrap_or_else(|| "Backend reported failure".to_string());
        return Err(CliError::Business {
            code: None,
            message,
            envelope: raw,
        });
    }
    match envelope.data {
        Some(data) => Ok(data),
        None => Ok(raw),
    }
}
