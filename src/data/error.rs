// ============================================================
// Layer 4 — Data Errors
// ============================================================
// The error taxonomy for corpus loading.
//
// Two failure classes are deliberately kept apart:
//   - Structural failures (bad vocabulary line, dangling answer
//     reference) are fatal: a corrupted mapping would silently
//     corrupt every feature computed downstream.
//   - Bad answer *text* is tolerated: the record survives with
//     placeholder text (see loader.rs), logged but never raised.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A vocabulary, character-vocabulary or pair-file line does not
    /// have the expected structure. Aborts the load.
    #[error("malformed line {line_no} in '{path}': {reason}")]
    MalformedLine {
        path:    String,
        line_no: usize,
        reason:  String,
    },

    /// A pair file referenced an answer id that was never loaded into
    /// the answer pool. Broken referential integrity — never tolerated.
    #[error("question '{question_id}' references answer id '{answer_id}' absent from the answer pool")]
    MissingAnswer {
        question_id: String,
        answer_id:   String,
    },

    /// The term vocabulary defines no UNKNOWN entry. Every encode of an
    /// out-of-vocabulary token depends on it, so loading stops here.
    #[error("vocabulary '{path}' defines no UNKNOWN entry")]
    NoUnknownToken { path: String },
}
