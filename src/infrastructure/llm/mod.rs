mod gemini_generative_client;
mod gemini_insight_analyzer;
mod gemini_wire;

pub use gemini_generative_client::GeminiGenerativeClient;
pub use gemini_insight_analyzer::GeminiInsightAnalyzer;
