pub mod extractor;
pub mod matcher;

pub use extractor::QaSpanModel;
pub use matcher::find_context;

use thiserror::Error;

use crate::tokenize::TokenizerError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to load QA model: {0}")]
    LoadFailed(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Cannot extract an answer from an empty context")]
    EmptyContext,
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Output shape error: {0}")]
    ShapeError(String),
    #[error("No answer span found in context")]
    NoSpan,
    #[error("Answer span offsets {start}..{end} fall outside the context")]
    SpanOutOfBounds { start: usize, end: usize },
}

/// An answer span pulled out of a context passage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAnswer {
    pub answer: String,
    pub score: f32,
}

/// Extractive question answering over a single passage.
pub trait AnswerExtractor: Send + Sync {
    fn extract_answer(
        &self,
        question: &str,
        context: &str,
    ) -> Result<ExtractedAnswer, ExtractionError>;
}
