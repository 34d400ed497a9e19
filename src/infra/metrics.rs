// ============================================================
// Layer 6 — Run Metrics
// ============================================================
// Records per-epoch dataset statistics to a CSV file so a run can be
// audited after the fact: how many batches and rows each epoch
// produced, the label balance, and the mean overlap ratios (a quick
// sanity signal — positives should overlap their questions more than
// negatives on healthy data).
//
// Example CSV output:
//   epoch,batches,rows,positives,negatives,mean_raw_overlap,mean_weighted_overlap
//   1,157,10000,2480,7520,0.231400,0.412700
//   2,157,10000,2480,7520,0.231400,0.412700
//
// The resolved run configuration is written next to it as JSON so the
// exact batch shapes of a run stay reproducible.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of statistics for a single epoch of batch production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Batches yielded this epoch, trailing empty batch included
    pub batches: usize,

    /// Total example rows across the epoch's batches
    pub rows: usize,

    /// Rows labeled positive / negative
    pub positives: usize,
    pub negatives: usize,

    /// Mean raw and IDF-weighted overlap ratio over the epoch's rows
    pub mean_raw_overlap:      f64,
    pub mean_weighted_overlap: f64,
}

impl EpochStats {
    /// Fraction of this epoch's rows labeled positive.
    pub fn positive_fraction(&self) -> f64 {
        self.positives as f64 / (self.rows.max(1)) as f64
    }
}

/// Writes epoch statistics to `stats.csv` in the output directory.
pub struct MetricsLogger {
    dir:      PathBuf,
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the output directory and the CSV header if needed.
    /// The header is only written for a new file, so reruns append.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let csv_path = dir.join("stats.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(
                f,
                "epoch,batches,rows,positives,negatives,mean_raw_overlap,mean_weighted_overlap"
            )?;
            tracing::debug!("Created stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { dir, csv_path })
    }

    /// Append one epoch's statistics as a new CSV row.
    pub fn log(&self, s: &EpochStats) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{:.6},{:.6}",
            s.epoch,
            s.batches,
            s.rows,
            s.positives,
            s.negatives,
            s.mean_raw_overlap,
            s.mean_weighted_overlap,
        )?;

        tracing::debug!(
            "Logged epoch {} stats: {} rows, {:.1}% positive",
            s.epoch,
            s.rows,
            s.positive_fraction() * 100.0,
        );

        Ok(())
    }

    /// Write the resolved run configuration as pretty-printed JSON.
    pub fn save_config<T: Serialize>(&self, config: &T) -> Result<PathBuf> {
        let path = self.dir.join("prepare_config.json");
        fs::write(&path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        Ok(path)
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> EpochStats {
        EpochStats {
            epoch:                 1,
            batches:               3,
            rows:                  10,
            positives:             4,
            negatives:             6,
            mean_raw_overlap:      0.25,
            mean_weighted_overlap: 0.5,
        }
    }

    #[test]
    fn test_positive_fraction() {
        assert!((stats().positive_fraction() - 0.4).abs() < 1e-9);

        let empty = EpochStats { rows: 0, positives: 0, ..stats() };
        assert_eq!(empty.positive_fraction(), 0.0);
    }

    #[test]
    fn test_logger_writes_header_and_rows() {
        let dir = std::env::temp_dir().join("answer-select-metrics-tests");
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_string_lossy().to_string()).unwrap();
        logger.log(&stats()).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("epoch,batches,rows"));
        assert!(lines[1].starts_with("1,3,10,4,6,"));
    }
}
