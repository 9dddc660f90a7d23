use crate::error::{IvoneError, Result};
use serde_json::Value;

/// Reply text at `choices[0].message.content`. Anything else, including an
/// empty string, is a malformed response.
pub fn extract_reply(response_json: &Value) -> Result<String> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| IvoneError::MalformedResponse("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| IvoneError::MalformedResponse("Empty choices array".to_string()))?;

    let message = first_choice
        .get("message")
        .ok_or_else(|| IvoneError::MalformedResponse("No message in response".to_string()))?;

    match message.get("content").and_then(|c| c.as_str()) {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        Some(_) => Err(IvoneError::MalformedResponse("Empty content".to_string())),
        None => Err(IvoneError::MalformedResponse(
            "No content in message".to_string(),
        )),
    }
}

/// Best-effort error text from an upstream error body.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error").and_then(|e| {
                e.as_str()
                    .map(str::to_string)
                    .or_else(|| e.get("message").and_then(|m| m.as_str()).map(str::to_string))
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}
