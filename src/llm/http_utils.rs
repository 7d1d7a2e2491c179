//! HTTP utilities for backend providers
//!
//! Request/response handling shared by provider implementations.

use crate::config::get_llm_http_timeout_secs;
use crate::llm::LlmError;
use crate::utils::truncate_str;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Creates an HTTP client configured with the standard backend timeout.
///
/// Uses `LLM_HTTP_TIMEOUT_SECS` environment variable or the 60s default.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let timeout = Duration::from_secs(get_llm_http_timeout_secs());
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends an HTTP POST request with a JSON body and returns the parsed JSON response.
///
/// # Errors
///
/// Returns `LlmError::NetworkError` on connectivity issues, `LlmError::ApiError` on
/// non-success status codes, or `LlmError::JsonError` if parsing fails.
pub async fn send_json_request(
    client: &HttpClient,
    url: &str,
    body: &Value,
    auth_header: Option<&str>,
    extra_headers: &[(&str, &str)],
) -> Result<Value, LlmError> {
    let mut request = client.post(url).json(body);

    if let Some(auth) = auth_header {
        request = request.header("Authorization", auth);
    }

    for (key, value) in extra_headers {
        request = request.header(*key, *value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| LlmError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(LlmError::ApiError(describe_error_body(status, &error_text)));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::JsonError(e.to_string()))
}

/// Builds a compact error description, dropping proxy HTML pages
/// and truncating long bodies.
fn describe_error_body(status: reqwest::StatusCode, body: &str) -> String {
    let trimmed = body.trim_start();
    let is_html = trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<HTML");

    if is_html {
        return format!("{status} (Server returned HTML error page)");
    }

    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let head = truncate_str(body, MAX_ERROR_BODY_CHARS);
        format!("{status} - {head}... (truncated)")
    } else {
        format!("{status} - {body}")
    }
}

/// Extracts the assistant text from an OpenAI-compatible completion response.
///
/// # Errors
///
/// Returns `LlmError::ApiError` if the response has no choices or the
/// message content is missing or empty.
pub fn extract_message_content(response: &Value) -> Result<String, LlmError> {
    let content = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(LlmError::ApiError("Empty response".to_string()));
    }
    Ok(content.to_string())
}
