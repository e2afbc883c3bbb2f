use serde_json::Value;

use crate::errors::AnalysisError;
use crate::models::NutritionText;

/// Pulls `choices[0].message.content` out of a chat completion envelope.
///
/// Any other shape (no `choices`, an empty list, missing or non-string
/// content, empty content) is a [`AnalysisError::MalformedResponse`].
pub fn extract(raw: &Value) -> Result<NutritionText, AnalysisError> {
    let first_choice = raw
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or(AnalysisError::MalformedResponse)?;

    let content = first_choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or(AnalysisError::MalformedResponse)?;

    NutritionText::new(content).ok_or(AnalysisError::MalformedResponse)
}

/// `error.message` from a failure envelope, if the service sent one
pub fn remote_error_message(raw: &Value) -> Option<String> {
    raw.get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
