// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads the full corpus, reports its statistics, then assembles the
// first batch (unshuffled, single epoch) and logs every column's
// shape. Cheap way to validate a corpus and a batch configuration
// before committing to a full prepare run.

use anyhow::{Context, Result};
use std::sync::Arc;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;

use crate::data::{
    batcher::{BatchConfig, BatchGenerator},
    loader::{load_examples, AnswerPool},
    tensor::TensorBatcher,
    vocab::{CharVocabulary, Vocabulary},
};

/// Corpus paths plus the batch shape to probe with.
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub vocab_path:      String,
    pub char_vocab_path: String,
    pub answers_path:    String,
    pub pairs_path:      String,
    pub batch:           BatchConfig,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        let vocab = Arc::new(
            Vocabulary::load(&cfg.vocab_path)
                .with_context(|| format!("Cannot load vocabulary '{}'", cfg.vocab_path))?,
        );
        let chars = Arc::new(
            CharVocabulary::load(&cfg.char_vocab_path).with_context(|| {
                format!("Cannot load character vocabulary '{}'", cfg.char_vocab_path)
            })?,
        );
        let pool = AnswerPool::load(&cfg.answers_path, &vocab, cfg.batch.max_seq_len)
            .with_context(|| format!("Cannot load answer pool '{}'", cfg.answers_path))?;
        let examples = load_examples(&cfg.pairs_path, &vocab, cfg.batch.max_seq_len, &pool)
            .with_context(|| format!("Cannot load pair file '{}'", cfg.pairs_path))?;

        if vocab.is_empty() || chars.is_empty() || pool.is_empty() {
            tracing::warn!("Empty vocabulary or answer pool — check the corpus paths");
        }

        tracing::info!("Term vocabulary:      {} terms", vocab.len());
        tracing::info!("Character vocabulary: {} characters", chars.len());
        tracing::info!("Answer pool:          {} answers", pool.len());
        tracing::info!(
            "Examples:             {} ({} positive, {} negative)",
            examples.example_count(),
            examples.positive_count(),
            examples.negative_count(),
        );

        // first batch only: unshuffled single epoch, so the report is
        // deterministic for a given corpus
        let mut probe = cfg.batch.clone();
        probe.shuffle = false;
        probe.num_epochs = 1;

        let mut generator = BatchGenerator::new(examples, vocab, chars, probe);
        tracing::info!("Batches per epoch:    {}", generator.batches_per_epoch());

        let Some(batch) = generator.next() else {
            return Ok(());
        };

        let batcher = TensorBatcher::<NdArray>::new(
            NdArrayDevice::default(),
            cfg.batch.max_seq_len,
            cfg.batch.max_word_len,
        );
        let tensors = batcher.batch(&batch);

        tracing::info!("First batch: {} rows, {} id pairs", batch.row_count(), tensors.id_pairs.len());
        tracing::info!("  question ids          {:?}", tensors.question.dims());
        tracing::info!("  answer ids            {:?}", tensors.answer.dims());
        tracing::info!("  question lengths      {:?}", tensors.question_len.dims());
        tracing::info!("  answer lengths        {:?}", tensors.answer_len.dims());
        tracing::info!("  targets               {:?}", tensors.targets.dims());
        tracing::info!("  target weights        {:?}", tensors.target_weights.dims());
        tracing::info!("  overlap features      {:?}", tensors.overlap_features.dims());
        tracing::info!("  question word feats   {:?}", tensors.question_word_features.dims());
        tracing::info!("  answer word feats     {:?}", tensors.answer_word_features.dims());
        tracing::info!("  question char grid    {:?}", tensors.question_chars.dims());
        tracing::info!("  question char lengths {:?}", tensors.question_char_len.dims());
        tracing::info!("  answer char grid      {:?}", tensors.answer_chars.dims());
        tracing::info!("  answer char lengths   {:?}", tensors.answer_char_len.dims());

        Ok(())
    }
}
