// ============================================================
// Layer 4 — Tensor Conversion
// ============================================================
// Converts an assembled Batch into backend tensors for the model
// forward pass. Each column is flattened into one Vec and reshaped:
//
//   [r1_p1, r1_p2, ..., r1_pS, r2_p1, ..., rN_pS] → [N, S]
//
// All rows already share the same padded shape, so no dynamic padding
// happens here. B is the Burn Backend — generic so the same conversion
// works on any device. The id triples are bookkeeping, not model
// input, and ride along as a plain list.

use burn::tensor::{backend::Backend, Int, Tensor};

use crate::data::batcher::Batch;

/// A batch in numeric form, ready for a model forward pass. All
/// tensors have the row count as their first dimension.
#[derive(Debug, Clone)]
pub struct TensorBatch<B: Backend> {
    /// Question word ids — [rows, max_seq_len]
    pub question: Tensor<B, 2, Int>,
    /// Answer word ids — [rows, max_seq_len]
    pub answer: Tensor<B, 2, Int>,
    /// Pre-padding question lengths — [rows]
    pub question_len: Tensor<B, 1, Int>,
    /// Pre-padding answer lengths — [rows]
    pub answer_len: Tensor<B, 1, Int>,
    /// Labels — [rows]
    pub targets: Tensor<B, 1>,
    /// Per-row sample weights — [rows]
    pub target_weights: Tensor<B, 1>,
    /// (question_id, answer_id, label) per row
    pub id_pairs: Vec<(String, String, i32)>,
    /// Overlap ratio pair — [rows, 2]
    pub overlap_features: Tensor<B, 2>,
    /// Question positional TF-IDF features — [rows, max_seq_len, 2]
    pub question_word_features: Tensor<B, 3>,
    /// Answer positional TF-IDF features — [rows, max_seq_len, 2]
    pub answer_word_features: Tensor<B, 3>,
    /// Question character ids — [rows, max_seq_len, max_word_len]
    pub question_chars: Tensor<B, 3, Int>,
    /// Question per-token character counts — [rows, max_seq_len]
    pub question_char_len: Tensor<B, 2, Int>,
    /// Answer character ids — [rows, max_seq_len, max_word_len]
    pub answer_chars: Tensor<B, 3, Int>,
    /// Answer per-token character counts — [rows, max_seq_len]
    pub answer_char_len: Tensor<B, 2, Int>,
}

/// Converts batches to tensors on one device. The sequence dimensions
/// come from configuration, not from the batch, so zero-row batches
/// still convert to well-formed (0 × …) tensors.
#[derive(Clone, Debug)]
pub struct TensorBatcher<B: Backend> {
    device:       B::Device,
    max_seq_len:  usize,
    max_word_len: usize,
}

impl<B: Backend> TensorBatcher<B> {
    pub fn new(device: B::Device, max_seq_len: usize, max_word_len: usize) -> Self {
        Self { device, max_seq_len, max_word_len }
    }

    /// Flatten and reshape every column of `batch`.
    pub fn batch(&self, batch: &Batch) -> TensorBatch<B> {
        let rows = batch.row_count();

        // ── Word-index matrices ───────────────────────────────────────────────
        let question_flat: Vec<i32> = batch
            .question
            .iter()
            .flat_map(|row| row.iter().map(|&id| id as i32))
            .collect();
        let answer_flat: Vec<i32> = batch
            .answer
            .iter()
            .flat_map(|row| row.iter().map(|&id| id as i32))
            .collect();

        let question = Tensor::<B, 1, Int>::from_ints(question_flat.as_slice(), &self.device)
            .reshape([rows, self.max_seq_len]);
        let answer = Tensor::<B, 1, Int>::from_ints(answer_flat.as_slice(), &self.device)
            .reshape([rows, self.max_seq_len]);

        // ── Lengths, labels, weights ──────────────────────────────────────────
        let question_len: Vec<i32> = batch.question_len.iter().map(|&l| l as i32).collect();
        let answer_len: Vec<i32>   = batch.answer_len.iter().map(|&l| l as i32).collect();

        let question_len = Tensor::<B, 1, Int>::from_ints(question_len.as_slice(), &self.device);
        let answer_len   = Tensor::<B, 1, Int>::from_ints(answer_len.as_slice(), &self.device);

        let targets = Tensor::<B, 1>::from_floats(batch.targets.as_slice(), &self.device);
        let target_weights =
            Tensor::<B, 1>::from_floats(batch.target_weights.as_slice(), &self.device);

        // ── Overlap and positional features ───────────────────────────────────
        let overlap_flat: Vec<f32> = batch
            .overlap_features
            .iter()
            .flat_map(|pair| pair.iter().copied())
            .collect();
        let overlap_features = Tensor::<B, 1>::from_floats(overlap_flat.as_slice(), &self.device)
            .reshape([rows, 2]);

        let question_word_features = self.word_features(&batch.question_word_features, rows);
        let answer_word_features   = self.word_features(&batch.answer_word_features, rows);

        // ── Character grids ───────────────────────────────────────────────────
        let question_chars    = self.char_grid(&batch.question_chars, rows);
        let answer_chars      = self.char_grid(&batch.answer_chars, rows);
        let question_char_len = self.char_lengths(&batch.question_char_len, rows);
        let answer_char_len   = self.char_lengths(&batch.answer_char_len, rows);

        TensorBatch {
            question,
            answer,
            question_len,
            answer_len,
            targets,
            target_weights,
            id_pairs: batch.id_pairs.clone(),
            overlap_features,
            question_word_features,
            answer_word_features,
            question_chars,
            question_char_len,
            answer_chars,
            answer_char_len,
        }
    }

    fn word_features(&self, rows: &[Vec<[f32; 2]>], count: usize) -> Tensor<B, 3> {
        let flat: Vec<f32> = rows
            .iter()
            .flat_map(|row| row.iter().flat_map(|pair| pair.iter().copied()))
            .collect();
        Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([count, self.max_seq_len, 2])
    }

    fn char_grid(&self, grids: &[Vec<Vec<u32>>], count: usize) -> Tensor<B, 3, Int> {
        let flat: Vec<i32> = grids
            .iter()
            .flat_map(|grid| grid.iter().flat_map(|row| row.iter().map(|&id| id as i32)))
            .collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([count, self.max_seq_len, self.max_word_len])
    }

    fn char_lengths(&self, lengths: &[Vec<u32>], count: usize) -> Tensor<B, 2, Int> {
        let flat: Vec<i32> = lengths
            .iter()
            .flat_map(|row| row.iter().map(|&l| l as i32))
            .collect();
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([count, self.max_seq_len])
    }
}
