// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `prepare` and `inspect` subcommands and their flags.
// The From impls at the bottom are the boundary between Layer 1 and
// Layer 2 — the application layer never sees clap types.

use clap::{Args, Subcommand};

use crate::application::inspect_use_case::InspectConfig;
use crate::application::prepare_use_case::PrepareConfig;
use crate::data::batcher::BatchConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the batching pipeline for all epochs and write statistics
    Prepare(PrepareArgs),

    /// Report corpus statistics and first-batch shapes
    Inspect(InspectArgs),
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Term vocabulary file (id, term, _, doc_freq, total_docs)
    #[arg(long, default_value = "data/vocab.txt")]
    pub vocab: String,

    /// Character vocabulary file (id, character)
    #[arg(long, default_value = "data/char_vocab.txt")]
    pub char_vocab: String,

    /// Answer pool file (answer_id, answer_text)
    #[arg(long, default_value = "data/answers.txt")]
    pub answers: String,

    /// Labeled pair file (question_id, text, pos_ids|NA, neg_ids|NA)
    #[arg(long, default_value = "data/train_pairs.txt")]
    pub pairs: String,

    /// Directory for the statistics CSV and resolved config JSON
    #[arg(long, default_value = "prepared")]
    pub out_dir: String,

    /// Number of examples per full batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Number of full passes over the example list
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Sample weight for negative (label 0.0) examples
    #[arg(long, default_value_t = 1.0)]
    pub neg_weight: f32,

    /// Sample weight for positive (label 1.0) examples
    #[arg(long, default_value_t = 1.0)]
    pub pos_weight: f32,

    /// Word positions per sequence; longer inputs are truncated
    #[arg(long, default_value_t = 50)]
    pub max_seq_len: usize,

    /// Character positions per word in the character grids
    #[arg(long, default_value_t = 18)]
    pub max_word_len: usize,

    /// Keep the example order fixed instead of shuffling each epoch
    #[arg(long)]
    pub no_shuffle: bool,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            vocab_path:      a.vocab,
            char_vocab_path: a.char_vocab,
            answers_path:    a.answers,
            pairs_path:      a.pairs,
            out_dir:         a.out_dir,
            batch: BatchConfig {
                batch_size:   a.batch_size,
                num_epochs:   a.epochs,
                loss_weights: [a.neg_weight, a.pos_weight],
                max_seq_len:  a.max_seq_len,
                max_word_len: a.max_word_len,
                shuffle:      !a.no_shuffle,
            },
        }
    }
}

/// All arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Term vocabulary file (id, term, _, doc_freq, total_docs)
    #[arg(long, default_value = "data/vocab.txt")]
    pub vocab: String,

    /// Character vocabulary file (id, character)
    #[arg(long, default_value = "data/char_vocab.txt")]
    pub char_vocab: String,

    /// Answer pool file (answer_id, answer_text)
    #[arg(long, default_value = "data/answers.txt")]
    pub answers: String,

    /// Labeled pair file (question_id, text, pos_ids|NA, neg_ids|NA)
    #[arg(long, default_value = "data/train_pairs.txt")]
    pub pairs: String,

    /// Number of examples per full batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Word positions per sequence
    #[arg(long, default_value_t = 50)]
    pub max_seq_len: usize,

    /// Character positions per word
    #[arg(long, default_value_t = 18)]
    pub max_word_len: usize,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            vocab_path:      a.vocab,
            char_vocab_path: a.char_vocab,
            answers_path:    a.answers,
            pairs_path:      a.pairs,
            batch: BatchConfig {
                batch_size:   a.batch_size,
                max_seq_len:  a.max_seq_len,
                max_word_len: a.max_word_len,
                ..BatchConfig::default()
            },
        }
    }
}
