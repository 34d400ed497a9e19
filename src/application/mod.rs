// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per CLI subcommand. Each owns its configuration,
// orchestrates the Layer 4 pipeline, and reports through Layer 6.
// No parsing, no feature math — only sequencing.

/// Runs the full batch-preparation pipeline across epochs
pub mod prepare_use_case;

/// Loads the corpus and reports statistics and first-batch shapes
pub mod inspect_use_case;
