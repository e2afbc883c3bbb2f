use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base64-encoded JPEG bytes, consumed once by the inference client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    /// Inline `data:` URI form sent as the `image_url` part
    pub fn into_data_uri(self) -> String {
        format!("data:image/jpeg;base64,{}", self.0)
    }
}

/// Result of a gallery/file pick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PickedImage {
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub base64: String,
}

impl PickedImage {
    /// Splits into display URI and payload; `None` when the pick was cancelled
    pub fn into_parts(self) -> Option<(String, ImagePayload)> {
        if self.cancelled {
            return None;
        }
        Some((self.uri, ImagePayload::new(self.base64)))
    }
}

/// Non-empty answer text taken from the first completion choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionText(String);

impl NutritionText {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedNutrition {
    pub title: String,
    pub items: Vec<String>,
}

impl std::fmt::Display for FormattedNutrition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.title)?;
        for item in &self.items {
            write!(f, "\n• {}", item)?;
        }
        Ok(())
    }
}

/// The single "current displayed result" slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub image_uri: Option<String>,
    pub loading: bool,
    pub nutrition: Option<FormattedNutrition>,
    pub notification: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            image_uri: None,
            loading: false,
            nutrition: None,
            notification: None,
            updated_at: Utc::now(),
        }
    }
}

/// What happened to one pick-and-analyze invocation
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Displayed(FormattedNutrition),
    /// User-visible notification text
    Failed(String),
    /// A newer invocation (or a cancel) made this result stale
    Superseded,
}
