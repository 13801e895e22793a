use std::path::Path;

use thiserror::Error;
use tokenizers::{Tokenizer, TruncationParams, TruncationStrategy};

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Failed to load tokenizer: {0}")]
    LoadFailed(String),
    #[error("Failed to encode text: {0}")]
    EncodeFailed(String),
}

/// Tokenized single text ready for model inference.
#[derive(Debug, Clone)]
pub struct TokenizedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

/// Tokenized (question, context) pair, keeping enough alignment
/// information to map token positions back into the context string.
#[derive(Debug, Clone)]
pub struct TokenizedPair {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    /// Byte offsets into the originating sequence, per token.
    pub offsets: Vec<(usize, usize)>,
    /// Which input sequence each token came from: 0 = question,
    /// 1 = context, None = special token.
    pub sequence_ids: Vec<Option<usize>>,
}

/// Wrapper around a HuggingFace `tokenizer.json` file.
pub struct TextTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl TextTokenizer {
    /// Load a tokenizer that produces encodings verbatim. Inputs longer
    /// than `max_length` are the caller's problem to reject.
    pub fn from_file(path: impl AsRef<Path>, max_length: usize) -> Result<Self, TokenizerError> {
        let tokenizer = Tokenizer::from_file(path.as_ref())
            .map_err(|e| TokenizerError::LoadFailed(e.to_string()))?;

        Ok(Self { tokenizer, max_length })
    }

    /// Load a tokenizer for (question, context) pairs. Overlong pairs are
    /// truncated from the context side only, matching how SQuAD-style
    /// models are run.
    pub fn for_pairs(path: impl AsRef<Path>, max_length: usize) -> Result<Self, TokenizerError> {
        let mut tokenizer = Tokenizer::from_file(path.as_ref())
            .map_err(|e| TokenizerError::LoadFailed(e.to_string()))?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                strategy: TruncationStrategy::OnlySecond,
                ..Default::default()
            }))
            .map_err(|e| TokenizerError::LoadFailed(e.to_string()))?;

        Ok(Self { tokenizer, max_length })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn encode(&self, text: &str) -> Result<TokenizedInput, TokenizerError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TokenizerError::EncodeFailed(e.to_string()))?;

        Ok(TokenizedInput {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding.get_attention_mask().iter().map(|&m| m as i64).collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&id| id as i64).collect(),
        })
    }

    pub fn encode_pair(
        &self,
        question: &str,
        context: &str,
    ) -> Result<TokenizedPair, TokenizerError> {
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| TokenizerError::EncodeFailed(e.to_string()))?;

        Ok(TokenizedPair {
            input_ids: encoding.get_ids().iter().map(|&id| id as i64).collect(),
            attention_mask: encoding.get_attention_mask().iter().map(|&m| m as i64).collect(),
            offsets: encoding.get_offsets().to_vec(),
            sequence_ids: encoding.get_sequence_ids(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenized_input_keeps_parallel_lengths() {
        let input = TokenizedInput {
            input_ids: vec![101, 7592, 2088, 102],
            attention_mask: vec![1, 1, 1, 1],
            token_type_ids: vec![0, 0, 0, 0],
        };

        assert_eq!(input.input_ids.len(), input.attention_mask.len());
        assert_eq!(input.input_ids.len(), input.token_type_ids.len());
    }
}
