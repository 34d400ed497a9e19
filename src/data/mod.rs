// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw tab-separated corpora to model-ready batches.
//
// The pipeline flows in this order:
//
//   vocabulary files
//       │
//       ▼
//   Vocabulary /       → term → id, per-id IDF, char → id
//   CharVocabulary
//       │
//       ▼
//   AnswerPool         → pre-encodes every candidate answer
//       │
//       ▼
//   load_examples      → expands pair lines into labeled Examples
//       │
//       ▼
//   BatchGenerator     → shuffles epochs, slices, computes overlap
//                        and TF-IDF features, assembles columns
//       │
//       ▼
//   TensorBatcher      → stacks columns into backend tensors
//
// Each module is responsible for exactly one step.

/// Term and character vocabulary tables with IDF weights
pub mod vocab;

/// Word-index, padding and character-grid encoding
pub mod encoder;

/// Answer pool and question/answer pair loading
pub mod loader;

/// Lexical-overlap and TF-IDF feature computation
pub mod features;

/// The example list behind Burn's Dataset trait
pub mod dataset;

/// Epoch-driving batch assembly
pub mod batcher;

/// Batch → backend tensor conversion
pub mod tensor;

/// The data-layer error taxonomy
pub mod error;
