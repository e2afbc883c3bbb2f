use crate::errors::AnalysisError;
use crate::models::{ImagePayload, NutritionText};

/// Trait for vision services that estimate nutrition from a food photo
#[async_trait::async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    async fn analyze(&self, image: ImagePayload) -> Result<NutritionText, AnalysisError>;
}
