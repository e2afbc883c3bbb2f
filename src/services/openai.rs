use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::errors::{AnalysisError, REMOTE_FALLBACK_MESSAGE};
use crate::models::{ImagePayload, NutritionText};
use crate::services::ai_service::NutritionAnalyzer;
use crate::services::extractor;

pub const NUTRITION_PROMPT: &str =
    "What food is in this image? Provide only Total Estimated Nutrition. No more details";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageData,
    },
}

#[derive(Debug, Serialize)]
struct ImageData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

impl ChatRequest {
    fn nutrition(model: &str, image: ImagePayload) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        content_type: "text".to_string(),
                        text: NUTRITION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        content_type: "image_url".to_string(),
                        image_url: ImageData {
                            url: image.into_data_uri(),
                        },
                    },
                ],
            }],
        }
    }
}

/// OpenAI chat completions client for food photos
pub struct OpenAiService {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAiService {
    pub fn new(api_key: String, model: String, base_url: &str) -> Self {
        Self {
            api_key,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key.clone(), config.model.clone(), &config.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl NutritionAnalyzer for OpenAiService {
    async fn analyze(&self, image: ImagePayload) -> Result<NutritionText, AnalysisError> {
        log::debug!("🔄 Base64 image size: {} bytes", image.encoded_len());

        let request = ChatRequest::nutrition(&self.model, image);

        log::info!("🤖 Sending request to OpenAI with model: {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 OpenAI response status: {}", status);

        let body = response.text().await?;
        log::debug!("📄 Raw OpenAI response: {}", body);

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(extractor::remote_error_message)
                .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string());
            log::error!("❌ OpenAI API error ({}): {}", status, message);
            return Err(AnalysisError::Remote(message));
        }

        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            log::error!("❌ OpenAI response is not JSON: {}", e);
            AnalysisError::MalformedResponse
        })?;

        let text = extractor::extract(&raw)?;
        log::info!("💬 OpenAI response content: {}", text.as_str());

        Ok(text)
    }
}
