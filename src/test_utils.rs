//! Test doubles shared by the handler and server tests

use std::collections::HashMap;
use std::time::Duration;

use crate::errors::AnalysisError;
use crate::models::{ImagePayload, NutritionText};
use crate::services::NutritionAnalyzer;

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(&'static str),
    Remote(&'static str),
    Malformed,
}

/// Analyzer that answers per base64 payload after a fixed delay
#[derive(Default)]
pub struct FakeAnalyzer {
    replies: HashMap<String, (Duration, FakeReply)>,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, base64: &str, delay_ms: u64, reply: FakeReply) -> Self {
        self.replies
            .insert(base64.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }
}

#[async_trait::async_trait]
impl NutritionAnalyzer for FakeAnalyzer {
    async fn analyze(&self, image: ImagePayload) -> Result<NutritionText, AnalysisError> {
        let uri = image.into_data_uri();
        let key = uri.trim_start_matches("data:image/jpeg;base64,");
        let (delay, reply) = self
            .replies
            .get(key)
            .cloned()
            .unwrap_or((Duration::ZERO, FakeReply::Malformed));

        tokio::time::sleep(delay).await;

        match reply {
            FakeReply::Text(text) => NutritionText::new(text).ok_or(AnalysisError::MalformedResponse),
            FakeReply::Remote(message) => Err(AnalysisError::Remote(message.to_string())),
            FakeReply::Malformed => Err(AnalysisError::MalformedResponse),
        }
    }
}
