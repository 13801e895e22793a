use std::sync::Arc;

use ndarray::Axis;
use thiserror::Error;
use tract_onnx::prelude::*;

use crate::config::EncoderConfig;
use crate::tokenize::{TextTokenizer, TokenizerError};

/// Type alias for the tract typed model
type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Failed to load embedding model: {0}")]
    LoadFailed(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Input of {tokens} tokens exceeds the model maximum of {max}")]
    InputTooLong { tokens: usize, max: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Output shape error: {0}")]
    ShapeError(String),
    #[error("Model produced a {actual}-dimensional vector, expected {expected}")]
    DimensionMismatch { actual: usize, expected: usize },
}

/// BERT-style text encoder. Every text maps to the hidden state of the
/// first sequence position, so the output length is fixed by the model
/// regardless of input length.
pub struct EmbeddingEncoder {
    model: Arc<TractModel>,
    tokenizer: TextTokenizer,
    dimensions: usize,
    max_length: usize,
}

impl EmbeddingEncoder {
    pub fn load(config: &EncoderConfig) -> Result<Self, EncodingError> {
        log::info!("Loading embedding model from {}", config.model_path);

        let model = tract_onnx::onnx()
            .model_for_path(&config.model_path)
            .map_err(|e| EncodingError::LoadFailed(e.to_string()))?
            .into_optimized()
            .map_err(|e| EncodingError::LoadFailed(e.to_string()))?
            .into_runnable()
            .map_err(|e| EncodingError::LoadFailed(e.to_string()))?;

        let tokenizer = TextTokenizer::from_file(&config.tokenizer_path, config.max_length)?;

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            dimensions: config.dimensions,
            max_length: config.max_length,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Encode a single text into a fixed-length vector.
    ///
    /// Inputs that tokenize past the model maximum are rejected rather
    /// than truncated, so a caller never gets a vector computed from a
    /// silently shortened text.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EncodingError> {
        let encoded = self.tokenizer.encode(text)?;
        let seq_len = encoded.input_ids.len();

        if seq_len > self.max_length {
            return Err(EncodingError::InputTooLong {
                tokens: seq_len,
                max: self.max_length,
            });
        }

        let input_ids = self.build_tensor(&encoded.input_ids, seq_len)?;
        let attention_mask = self.build_tensor(&encoded.attention_mask, seq_len)?;
        let token_type_ids = self.build_tensor(&encoded.token_type_ids, seq_len)?;

        let inputs: TVec<TValue> = tvec![
            input_ids.into(),
            attention_mask.into(),
            token_type_ids.into(),
        ];

        let outputs = self
            .model
            .run(inputs)
            .map_err(|e| EncodingError::InferenceFailed(e.to_string()))?;

        // (batch, seq_len, hidden)
        let hidden = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| EncodingError::ShapeError(e.to_string()))?
            .to_owned()
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| EncodingError::ShapeError(e.to_string()))?;

        // Keep only the vector at sequence position 0
        let vector: Vec<f32> = hidden.index_axis(Axis(0), 0).row(0).to_vec();

        if vector.len() != self.dimensions {
            return Err(EncodingError::DimensionMismatch {
                actual: vector.len(),
                expected: self.dimensions,
            });
        }

        Ok(vector)
    }

    /// Encode a corpus sequentially, failing on the first bad text.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EncodingError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.encode(text)?);
        }
        Ok(embeddings)
    }

    fn build_tensor(&self, data: &[i64], seq_len: usize) -> Result<Tensor, EncodingError> {
        Tensor::from_shape(&[1, seq_len], data)
            .map_err(|e| EncodingError::ShapeError(e.to_string()))
    }
}
