// ============================================================
// Layer 6 — Infrastructure
// ============================================================
// Run reporting: per-epoch dataset statistics as CSV, plus the
// resolved run configuration as JSON, both written into the
// run's output directory.

/// Per-epoch statistics records and the CSV/JSON writers
pub mod metrics;
