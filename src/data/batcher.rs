// ============================================================
// Layer 4 — Batch Generator
// ============================================================
// Drives shuffled epochs over the example list and assembles one
// column-aligned Batch per slice.
//
// The generator is a lazy, finite iterator: it yields exactly
// num_epochs × (n / batch_size + 1) batches and then ends. At each
// epoch start it re-shuffles the example list in place (Fisher-Yates
// via rand::seq::SliceRandom), so every epoch sees a fresh full
// permutation. The final batch of an epoch may be shorter than
// batch_size — and when n is an exact multiple of batch_size it is
// empty, but still structurally valid with every column present.
//
// Per example in a slice the generator computes the lexical-overlap
// ratios, the question-side TF-IDF map over the common-term set,
// positional word features over the *padded* id vectors (padding
// positions fall through to the absent row), and the character grids
// for both sides.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::data::dataset::ExampleSet;
use crate::data::encoder::{encode_chars, pad_to};
use crate::data::features::{common_terms, lexical_overlap, positional_features, term_frequency_idf};
use crate::data::vocab::{CharVocabulary, Vocabulary};
use crate::domain::example::Example;

// ─── Batch Configuration ──────────────────────────────────────────────────────
// Everything the generator needs to know about batch shape and epoch
// scheduling. Serialisable so a run's resolved configuration can be
// written next to its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of examples per full batch
    pub batch_size: usize,

    /// Number of full passes over the example list
    pub num_epochs: usize,

    /// Per-class sample weights: index 0 = negative, 1 = positive
    pub loss_weights: [f32; 2],

    /// Word positions per sequence; longer inputs were truncated at load
    pub max_seq_len: usize,

    /// Character positions per word in the character grids
    pub max_word_len: usize,

    /// Re-shuffle the example list at each epoch start
    pub shuffle: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size:   64,
            num_epochs:   10,
            loss_weights: [1.0, 1.0],
            max_seq_len:  50,
            max_word_len: 18,
            shuffle:      true,
        }
    }
}

// ─── Batch ────────────────────────────────────────────────────────────────────

/// One assembled mini-batch: fourteen row-aligned columns, one row per
/// example in the slice. All sequence columns are padded to
/// max_seq_len; character columns to max_seq_len × max_word_len.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Question word-index matrix (rows × max_seq_len)
    pub question: Vec<Vec<u32>>,
    /// Answer word-index matrix (rows × max_seq_len)
    pub answer: Vec<Vec<u32>>,
    /// Pre-padding question token counts
    pub question_len: Vec<usize>,
    /// Pre-padding answer token counts
    pub answer_len: Vec<usize>,
    /// Labels, 0.0 or 1.0
    pub targets: Vec<f32>,
    /// Per-row sample weight, selected from the per-class loss weights
    pub target_weights: Vec<f32>,
    /// (question_id, answer_id, label) triples for bookkeeping
    pub id_pairs: Vec<(String, String, i32)>,
    /// [raw overlap ratio, IDF-weighted overlap ratio] per row
    pub overlap_features: Vec<[f32; 2]>,
    /// Question positional TF-IDF features (rows × max_seq_len × 2)
    pub question_word_features: Vec<Vec<[f32; 2]>>,
    /// Answer positional TF-IDF features (rows × max_seq_len × 2)
    pub answer_word_features: Vec<Vec<[f32; 2]>>,
    /// Question character grids (rows × max_seq_len × max_word_len)
    pub question_chars: Vec<Vec<Vec<u32>>>,
    /// Question per-token character counts (rows × max_seq_len)
    pub question_char_len: Vec<Vec<u32>>,
    /// Answer character grids (rows × max_seq_len × max_word_len)
    pub answer_chars: Vec<Vec<Vec<u32>>>,
    /// Answer per-token character counts (rows × max_seq_len)
    pub answer_char_len: Vec<Vec<u32>>,
}

impl Batch {
    pub fn row_count(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

// ─── BatchGenerator ───────────────────────────────────────────────────────────

/// Epoch-driving batch producer over an owned example list.
///
/// Vocabularies are shared read-only, so several generators can run
/// over the same tables concurrently.
pub struct BatchGenerator {
    examples: Vec<Example>,
    vocab:    Arc<Vocabulary>,
    chars:    Arc<CharVocabulary>,
    config:   BatchConfig,
    epoch:    usize,
    batch:    usize,
    rng:      rand::rngs::ThreadRng,
}

impl BatchGenerator {
    /// # Panics
    /// Panics if batch_size or num_epochs is zero.
    pub fn new(
        examples: ExampleSet,
        vocab:    Arc<Vocabulary>,
        chars:    Arc<CharVocabulary>,
        config:   BatchConfig,
    ) -> Self {
        assert!(config.batch_size > 0, "batch_size must be positive");
        assert!(config.num_epochs > 0, "num_epochs must be positive");
        Self {
            examples: examples.into_examples(),
            vocab,
            chars,
            config,
            epoch: 0,
            batch: 0,
            rng: rand::thread_rng(),
        }
    }

    /// Batches yielded per epoch. The trailing slot covers the
    /// remainder; with an exact multiple of batch_size it holds an
    /// empty batch.
    pub fn batches_per_epoch(&self) -> usize {
        self.examples.len() / self.config.batch_size + 1
    }

    /// Total batches this generator will yield before ending.
    pub fn total_batches(&self) -> usize {
        self.config.num_epochs * self.batches_per_epoch()
    }

    /// Assemble the fourteen columns for one slice of examples.
    fn assemble(&self, rows: &[Example]) -> Batch {
        let cfg = &self.config;
        let mut batch = Batch::default();

        for example in rows {
            let weight = if example.is_positive() {
                cfg.loss_weights[1]
            } else {
                cfg.loss_weights[0]
            };

            let (raw, weighted) = lexical_overlap(
                &example.question_ids,
                &example.answer_ids,
                example.question_len,
                example.answer_len,
                &self.vocab,
            );
            let common = common_terms(
                &example.question_ids,
                &example.answer_ids,
                example.question_len,
                example.answer_len,
            );
            let tfidf = term_frequency_idf(&example.question_ids, &common, &self.vocab);

            let question = pad_to(&example.question_ids, cfg.max_seq_len);
            let answer   = pad_to(&example.answer_ids, cfg.max_seq_len);

            // features over the padded vectors: id 0 never enters the
            // common set, so padding positions read as absent
            let question_features = positional_features(&question, &tfidf);
            let answer_features   = positional_features(&answer, &tfidf);

            let (question_chars, question_char_len) = encode_chars(
                &example.question_tokens,
                &self.chars,
                cfg.max_seq_len,
                cfg.max_word_len,
            );
            let (answer_chars, answer_char_len) = encode_chars(
                &example.answer_tokens,
                &self.chars,
                cfg.max_seq_len,
                cfg.max_word_len,
            );

            batch.question.push(question);
            batch.answer.push(answer);
            batch.question_len.push(example.question_len);
            batch.answer_len.push(example.answer_len);
            batch.targets.push(example.label);
            batch.target_weights.push(weight);
            batch.id_pairs.push((
                example.question_id.clone(),
                example.answer_id.clone(),
                example.label as i32,
            ));
            batch.overlap_features.push([raw, weighted]);
            batch.question_word_features.push(question_features);
            batch.answer_word_features.push(answer_features);
            batch.question_chars.push(question_chars);
            batch.question_char_len.push(question_char_len);
            batch.answer_chars.push(answer_chars);
            batch.answer_char_len.push(answer_char_len);
        }

        batch
    }
}

impl Iterator for BatchGenerator {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.epoch >= self.config.num_epochs {
            return None;
        }

        if self.batch == 0 && self.config.shuffle {
            self.examples.shuffle(&mut self.rng);
        }

        let start = self.batch * self.config.batch_size;
        let end   = ((self.batch + 1) * self.config.batch_size).min(self.examples.len());
        let batch = self.assemble(&self.examples[start..end]);

        self.batch += 1;
        if self.batch >= self.batches_per_epoch() {
            self.batch = 0;
            self.epoch += 1;
        }

        Some(batch)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// UNKNOWN=0, cat=101 (idf 0.7), dog=102 (idf 0.9), runs=50
    /// (reserved range, no idf entry).
    fn test_vocab() -> Arc<Vocabulary> {
        let terms: HashMap<String, u32> = [
            ("UNKNOWN".to_string(), 0),
            ("cat".to_string(), 101),
            ("dog".to_string(), 102),
            ("runs".to_string(), 50),
        ]
        .into_iter()
        .collect();
        let idf: HashMap<u32, f32> = [(101, 0.7), (102, 0.9)].into_iter().collect();
        Arc::new(Vocabulary::from_parts(terms, idf).unwrap())
    }

    fn test_chars() -> Arc<CharVocabulary> {
        Arc::new(CharVocabulary::from_pairs(&[
            ('c', 1),
            ('a', 2),
            ('t', 3),
            ('d', 4),
            ('o', 5),
            ('g', 6),
        ]))
    }

    fn example(question_id: &str, label: f32) -> Example {
        Example {
            question_id:     question_id.to_string(),
            question_len:    3,
            question_ids:    vec![0, 102, 50],
            answer_id:       "A1".to_string(),
            answer_len:      3,
            answer_ids:      vec![0, 101, 50],
            label,
            question_tokens: vec!["the".to_string(), "dog".to_string(), "runs".to_string()],
            answer_tokens:   vec!["the".to_string(), "cat".to_string(), "runs".to_string()],
        }
    }

    fn config(batch_size: usize, num_epochs: usize, shuffle: bool) -> BatchConfig {
        BatchConfig {
            batch_size,
            num_epochs,
            loss_weights: [0.5, 2.0],
            max_seq_len: 5,
            max_word_len: 4,
            shuffle,
        }
    }

    fn generator(n: usize, batch_size: usize, num_epochs: usize, shuffle: bool) -> BatchGenerator {
        let examples: Vec<Example> = (0..n)
            .map(|i| example(&format!("Q{i}"), (i % 2) as f32))
            .collect();
        BatchGenerator::new(
            ExampleSet::new(examples),
            test_vocab(),
            test_chars(),
            config(batch_size, num_epochs, shuffle),
        )
    }

    #[test]
    fn test_epoch_yields_remainder_batch() {
        let sizes: Vec<usize> = generator(10, 4, 1, true).map(|b| b.row_count()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_exact_multiple_yields_trailing_empty_batch() {
        let batches: Vec<Batch> = generator(8, 4, 1, true).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].row_count(), 0);

        // the empty batch is structurally valid — every column present
        let empty = &batches[2];
        assert!(empty.question.is_empty());
        assert!(empty.id_pairs.is_empty());
        assert!(empty.question_chars.is_empty());
    }

    #[test]
    fn test_total_batch_count_across_epochs() {
        let generator = generator(10, 4, 3, true);
        assert_eq!(generator.batches_per_epoch(), 3);
        assert_eq!(generator.total_batches(), 9);
        assert_eq!(generator.count(), 9);
    }

    #[test]
    fn test_unshuffled_order_is_preserved() {
        let ids: Vec<String> = generator(5, 2, 1, false)
            .flat_map(|b| b.id_pairs.into_iter().map(|(q, _, _)| q))
            .collect();
        assert_eq!(ids, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn test_shuffled_epoch_is_full_permutation() {
        let mut ids: Vec<String> = generator(7, 3, 1, true)
            .flat_map(|b| b.id_pairs.into_iter().map(|(q, _, _)| q))
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["Q0", "Q1", "Q2", "Q3", "Q4", "Q5", "Q6"]);
    }

    #[test]
    fn test_row_shapes_and_weights() {
        let batch = generator(2, 2, 1, false).next().unwrap();

        assert_eq!(batch.row_count(), 2);
        assert!(batch.question.iter().all(|row| row.len() == 5));
        assert!(batch.answer.iter().all(|row| row.len() == 5));
        assert!(batch.question_word_features.iter().all(|rows| rows.len() == 5));
        assert!(batch.question_chars.iter().all(|grid| {
            grid.len() == 5 && grid.iter().all(|row| row.len() == 4)
        }));
        assert!(batch.question_char_len.iter().all(|lens| lens.len() == 5));

        // Q0 negative → weight 0.5, Q1 positive → weight 2.0
        assert_eq!(batch.targets, vec![0.0, 1.0]);
        assert_eq!(batch.target_weights, vec![0.5, 2.0]);
        assert_eq!(batch.id_pairs[0].2, 0);
        assert_eq!(batch.id_pairs[1].2, 1);
    }

    #[test]
    fn test_disjoint_pair_scores_zero_overlap() {
        // question informative set {102}, answer informative set {101}
        let batch = generator(1, 1, 1, false).next().unwrap();
        assert_eq!(batch.overlap_features[0], [0.0, 0.0]);
        // no common terms → every positional feature row reads absent
        assert!(batch.question_word_features[0]
            .iter()
            .all(|row| *row == [0.0, 0.0]));
    }

    #[test]
    fn test_shared_term_flows_into_positional_features() {
        let mut shared = example("Q0", 1.0);
        shared.answer_ids = vec![0, 102, 50];
        shared.answer_tokens =
            vec!["the".to_string(), "dog".to_string(), "runs".to_string()];

        let mut generator = BatchGenerator::new(
            ExampleSet::new(vec![shared]),
            test_vocab(),
            test_chars(),
            config(1, 1, false),
        );
        let batch = generator.next().unwrap();

        // intersection {102}: raw 1/1, weighted 0.9/1
        let [raw, weighted] = batch.overlap_features[0];
        assert!((raw - 1.0).abs() < 1e-6);
        assert!((weighted - 0.9).abs() < 1e-6);

        // position 1 holds id 102 with tf-idf 1 × 0.9 on both sides
        assert_eq!(batch.question_word_features[0][1], [1.0, 0.9]);
        assert_eq!(batch.answer_word_features[0][1], [1.0, 0.9]);
        // padding positions stay absent
        assert_eq!(batch.question_word_features[0][4], [0.0, 0.0]);
    }

    #[test]
    fn test_character_grids_follow_tokens() {
        let batch = generator(1, 1, 1, false).next().unwrap();
        // question token 1 is "dog"
        assert_eq!(batch.question_chars[0][1], vec![4, 5, 6, 0]);
        assert_eq!(batch.question_char_len[0][1], 3);
        // answer token 1 is "cat"
        assert_eq!(batch.answer_chars[0][1], vec![1, 2, 3, 0]);
        // rows past the token count default to length 1
        assert_eq!(batch.question_char_len[0][4], 1);
    }
}
