pub mod ai_service;
pub mod extractor;
pub mod formatter;
pub mod image_source;
pub mod openai; // OpenAI chat completions client

pub use ai_service::NutritionAnalyzer;
pub use openai::OpenAiService;
