use std::sync::Arc;

use tract_onnx::prelude::*;

use super::{AnswerExtractor, ExtractedAnswer, ExtractionError};
use crate::config::QaConfig;
use crate::tokenize::TextTokenizer;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// SQuAD-style span extraction model. The ONNX export takes
/// (input_ids, attention_mask) and returns start/end logits per token;
/// the best-scoring span inside the context is decoded back to a
/// substring through the tokenizer's byte offsets.
pub struct QaSpanModel {
    model: Arc<TractModel>,
    tokenizer: TextTokenizer,
    max_answer_tokens: usize,
}

impl QaSpanModel {
    pub fn load(config: &QaConfig) -> Result<Self, ExtractionError> {
        log::info!("Loading QA model from {}", config.model_path);

        let model = tract_onnx::onnx()
            .model_for_path(&config.model_path)
            .map_err(|e| ExtractionError::LoadFailed(e.to_string()))?
            .into_optimized()
            .map_err(|e| ExtractionError::LoadFailed(e.to_string()))?
            .into_runnable()
            .map_err(|e| ExtractionError::LoadFailed(e.to_string()))?;

        let tokenizer = TextTokenizer::for_pairs(&config.tokenizer_path, config.max_length)?;

        Ok(Self {
            model: Arc::new(model),
            tokenizer,
            max_answer_tokens: config.max_answer_tokens,
        })
    }

    fn logits(&self, output: &TValue) -> Result<Vec<f32>, ExtractionError> {
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ExtractionError::ShapeError(e.to_string()))?;

        Ok(view.iter().copied().collect())
    }
}

impl AnswerExtractor for QaSpanModel {
    fn extract_answer(
        &self,
        question: &str,
        context: &str,
    ) -> Result<ExtractedAnswer, ExtractionError> {
        if context.is_empty() {
            return Err(ExtractionError::EmptyContext);
        }

        let pair = self.tokenizer.encode_pair(question, context)?;
        let seq_len = pair.input_ids.len();

        let input_ids = Tensor::from_shape(&[1, seq_len], &pair.input_ids)
            .map_err(|e| ExtractionError::ShapeError(e.to_string()))?;
        let attention_mask = Tensor::from_shape(&[1, seq_len], &pair.attention_mask)
            .map_err(|e| ExtractionError::ShapeError(e.to_string()))?;

        let outputs = self
            .model
            .run(tvec![input_ids.into(), attention_mask.into()])
            .map_err(|e| ExtractionError::InferenceFailed(e.to_string()))?;

        let start_logits = self.logits(&outputs[0])?;
        let end_logits = self.logits(&outputs[1])?;

        // Only spans made of context tokens qualify; question and special
        // tokens are excluded.
        let allowed: Vec<bool> = pair
            .sequence_ids
            .iter()
            .map(|seq| *seq == Some(1))
            .collect();

        let (start, end, score) =
            best_span(&start_logits, &end_logits, &allowed, self.max_answer_tokens)
                .ok_or(ExtractionError::NoSpan)?;

        let byte_start = pair.offsets[start].0;
        let byte_end = pair.offsets[end].1;

        let answer = context
            .get(byte_start..byte_end)
            .ok_or(ExtractionError::SpanOutOfBounds {
                start: byte_start,
                end: byte_end,
            })?
            .to_string();

        Ok(ExtractedAnswer { answer, score })
    }
}

/// Highest-scoring (start, end) token pair with start <= end, both inside
/// the allowed region, spanning at most `max_span` tokens. Score is the
/// sum of the start and end logits.
pub(crate) fn best_span(
    start_logits: &[f32],
    end_logits: &[f32],
    allowed: &[bool],
    max_span: usize,
) -> Option<(usize, usize, f32)> {
    let len = start_logits.len().min(end_logits.len()).min(allowed.len());
    let mut best: Option<(usize, usize, f32)> = None;

    for start in 0..len {
        if !allowed[start] {
            continue;
        }
        let span_end = len.min(start + max_span);
        for end in start..span_end {
            if !allowed[end] {
                continue;
            }
            let score = start_logits[start] + end_logits[end];
            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((start, end, score));
            }
        }
    }

    best
}
