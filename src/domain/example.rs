use serde::{Deserialize, Serialize};

/// One pooled candidate answer, pre-encoded at load time.
///
/// `length`, `ids` and `tokens` always agree: the loader truncates the
/// token list to the configured maximum sequence length before
/// encoding, so `length == ids.len() == tokens.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub length: usize,
    pub ids:    Vec<u32>,
    pub tokens: Vec<String>,
}

/// A labeled (question, answer) training example.
///
/// Label 1.0 marks a relevant pair, 0.0 a non-relevant one. Every
/// example built from the same pair-file line shares identical
/// question fields; the answer fields come from the answer pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub question_id:     String,
    pub question_len:    usize,
    pub question_ids:    Vec<u32>,
    pub answer_id:       String,
    pub answer_len:      usize,
    pub answer_ids:      Vec<u32>,
    pub label:           f32,
    pub question_tokens: Vec<String>,
    pub answer_tokens:   Vec<String>,
}

impl Example {
    /// Whether this pair is labeled relevant.
    pub fn is_positive(&self) -> bool {
        self.label > 0.0
    }
}
