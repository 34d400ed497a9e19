// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates the full batch-preparation pipeline in order:
//
//   Step 1: Load term vocabulary + IDF   (Layer 4 - data)
//   Step 2: Load character vocabulary    (Layer 4 - data)
//   Step 3: Load + pre-encode answers    (Layer 4 - data)
//   Step 4: Expand labeled pairs         (Layer 4 - data)
//   Step 5: Save resolved config         (Layer 6 - infra)
//   Step 6: Drive the batch generator    (Layer 4 - data)
//           across epochs, logging per-epoch stats (Layer 6)
//
// Every batch is also run through the tensor conversion on the CPU
// backend, so a completed prepare run certifies the exact numeric
// path the training job will take.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::NdArray;

use crate::data::{
    batcher::{BatchConfig, BatchGenerator},
    loader::{load_examples, AnswerPool},
    tensor::TensorBatcher,
    vocab::{CharVocabulary, Vocabulary},
};
use crate::infra::metrics::{EpochStats, MetricsLogger};

// ─── Prepare Configuration ────────────────────────────────────────────────────
// Input corpora paths, the output directory, and the batch shape.
// Serialisable so the resolved values of a run are recorded on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub vocab_path:      String,
    pub char_vocab_path: String,
    pub answers_path:    String,
    pub pairs_path:      String,
    pub out_dir:         String,
    pub batch:           BatchConfig,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            vocab_path:      "data/vocab.txt".to_string(),
            char_vocab_path: "data/char_vocab.txt".to_string(),
            answers_path:    "data/answers.txt".to_string(),
            pairs_path:      "data/train_pairs.txt".to_string(),
            out_dir:         "prepared".to_string(),
            batch:           BatchConfig::default(),
        }
    }
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the full preparation pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Term vocabulary + IDF table ──────────────────────────────
        tracing::info!("Loading term vocabulary from '{}'", cfg.vocab_path);
        let vocab = Arc::new(
            Vocabulary::load(&cfg.vocab_path)
                .with_context(|| format!("Cannot load vocabulary '{}'", cfg.vocab_path))?,
        );
        tracing::info!("Vocabulary holds {} terms", vocab.len());

        // ── Step 2: Character vocabulary ─────────────────────────────────────
        let chars = Arc::new(
            CharVocabulary::load(&cfg.char_vocab_path).with_context(|| {
                format!("Cannot load character vocabulary '{}'", cfg.char_vocab_path)
            })?,
        );

        // ── Step 3: Answer pool, pre-encoded once ────────────────────────────
        let pool = AnswerPool::load(&cfg.answers_path, &vocab, cfg.batch.max_seq_len)
            .with_context(|| format!("Cannot load answer pool '{}'", cfg.answers_path))?;

        // ── Step 4: Labeled examples ─────────────────────────────────────────
        let examples = load_examples(&cfg.pairs_path, &vocab, cfg.batch.max_seq_len, &pool)
            .with_context(|| format!("Cannot load pair file '{}'", cfg.pairs_path))?;
        tracing::info!(
            "Dataset: {} examples ({} positive, {} negative)",
            examples.example_count(),
            examples.positive_count(),
            examples.negative_count(),
        );

        // ── Step 5: Record the resolved configuration ────────────────────────
        let logger = MetricsLogger::new(&cfg.out_dir)?;
        let config_path = logger.save_config(&self.config)?;
        tracing::info!("Wrote run configuration to '{}'", config_path.display());

        // ── Step 6: Drive the generator across epochs ────────────────────────
        let generator = BatchGenerator::new(
            examples,
            Arc::clone(&vocab),
            Arc::clone(&chars),
            cfg.batch.clone(),
        );
        let batches_per_epoch = generator.batches_per_epoch();
        let total_batches     = generator.total_batches();
        tracing::info!(
            "Producing {} batches ({} per epoch × {} epochs)",
            total_batches,
            batches_per_epoch,
            cfg.batch.num_epochs,
        );

        let tensor_batcher = TensorBatcher::<NdArray>::new(
            NdArrayDevice::default(),
            cfg.batch.max_seq_len,
            cfg.batch.max_word_len,
        );

        let mut rows         = 0usize;
        let mut positives    = 0usize;
        let mut raw_sum      = 0.0f64;
        let mut weighted_sum = 0.0f64;

        for (index, batch) in generator.enumerate() {
            rows += batch.row_count();
            positives += batch.targets.iter().filter(|&&t| t > 0.0).count();
            for [raw, weighted] in &batch.overlap_features {
                raw_sum += *raw as f64;
                weighted_sum += *weighted as f64;
            }

            if !batch.is_empty() {
                let tensors = tensor_batcher.batch(&batch);
                tracing::debug!(
                    "Batch {}/{}: question {:?}, chars {:?}",
                    index + 1,
                    total_batches,
                    tensors.question.dims(),
                    tensors.question_chars.dims(),
                );
            }

            // epoch boundary: flush statistics and reset accumulators
            if (index + 1) % batches_per_epoch == 0 {
                let epoch = (index + 1) / batches_per_epoch;
                let stats = EpochStats {
                    epoch,
                    batches: batches_per_epoch,
                    rows,
                    positives,
                    negatives: rows - positives,
                    mean_raw_overlap: raw_sum / rows.max(1) as f64,
                    mean_weighted_overlap: weighted_sum / rows.max(1) as f64,
                };
                logger.log(&stats)?;
                tracing::info!(
                    "Epoch {}/{}: {} rows, {:.1}% positive, mean overlap {:.4}",
                    epoch,
                    cfg.batch.num_epochs,
                    stats.rows,
                    stats.positive_fraction() * 100.0,
                    stats.mean_raw_overlap,
                );

                rows = 0;
                positives = 0;
                raw_sum = 0.0;
                weighted_sum = 0.0;
            }
        }

        tracing::info!(
            "Preparation complete — statistics in '{}'",
            logger.csv_path().display()
        );
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir() -> PathBuf {
        let dir = std::env::temp_dir().join("answer-select-prepare-tests");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &PathBuf, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_end_to_end_prepare_run() {
        let dir = fixture_dir();

        let config = PrepareConfig {
            vocab_path: write(
                &dir,
                "vocab.txt",
                "0\tUNKNOWN\t_\t100\t100\n101\tcat\t_\t2\t100\n102\tdog\t_\t1\t100\n50\truns\t_\t90\t100\n",
            ),
            char_vocab_path: write(
                &dir,
                "chars.txt",
                "1\tc\n2\ta\n3\tt\n4\td\n5\to\n6\tg\n7\tr\n",
            ),
            answers_path: write(&dir, "answers.txt", "A1\tthe cat runs\nA2\tthe dog runs\n"),
            pairs_path: write(
                &dir,
                "pairs.txt",
                "Q1\tthe dog runs\tA2\tA1\nQ2\tthe cat runs\tA1\tA2\n",
            ),
            out_dir: dir.join("out").to_string_lossy().to_string(),
            batch: BatchConfig {
                batch_size:   2,
                num_epochs:   2,
                loss_weights: [1.0, 3.0],
                max_seq_len:  5,
                max_word_len: 4,
                shuffle:      false,
            },
        };

        PrepareUseCase::new(config.clone()).execute().unwrap();

        // one stats row per epoch, after the header
        let csv = fs::read_to_string(dir.join("out").join("stats.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        // 4 examples → 2 full batches + 1 empty per epoch, 2+2 labels
        assert!(lines[1].starts_with("1,3,4,2,2,"));
        assert!(lines[2].starts_with("2,3,4,2,2,"));

        // resolved configuration written next to the stats
        let json = fs::read_to_string(dir.join("out").join("prepare_config.json")).unwrap();
        let parsed: PrepareConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.batch.batch_size, 2);
        assert_eq!(parsed.batch.loss_weights, [1.0, 3.0]);
    }
}
