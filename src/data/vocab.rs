// ============================================================
// Layer 4 — Vocabulary Store
// ============================================================
// Loads the two immutable lookup tables every later stage depends on:
//
//   - Vocabulary:     term → id, plus a per-id IDF weight derived from
//                     the document-frequency columns of the same file
//   - CharVocabulary: single character → id
//
// File formats (tab-separated, one record per line):
//   term vocabulary:  id \t term \t (unused) \t doc_freq \t total_docs
//   char vocabulary:  id \t character
//
// The IDF weight per term is ln((0.5 + total_docs) / (0.5 + doc_freq)),
// so rare terms score high and ubiquitous terms near zero. The 0.5
// smoothing keeps the formula well-defined for zero frequencies.
//
// Both tables are pure functions of file contents and never change
// after load — share them across pipeline instances via Arc.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::data::error::DataError;

/// The reserved term substituted for every out-of-vocabulary token.
pub const UNKNOWN_TOKEN: &str = "UNKNOWN";

// ─── Vocabulary ───────────────────────────────────────────────────────────────

/// Term → id mapping with per-id IDF weights. Immutable after load.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms:      HashMap<String, u32>,
    idf:        HashMap<u32, f32>,
    unknown_id: u32,
}

impl Vocabulary {
    /// Parse a term vocabulary file.
    ///
    /// Each line must carry at least the five expected fields with
    /// integer id / doc_freq / total_docs; anything else aborts the
    /// load with a `MalformedLine` error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path     = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let mut terms = HashMap::new();
        let mut idf   = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split('\t').collect();

            if fields.len() < 5 {
                return Err(malformed(
                    path,
                    line_no,
                    format!("expected 5 tab-separated fields, got {}", fields.len()),
                ));
            }

            let term_id    = parse_int::<u32>(path, line_no, "term id", fields[0])?;
            let doc_freq   = parse_int::<u64>(path, line_no, "doc_freq", fields[3])?;
            let total_docs = parse_int::<u64>(path, line_no, "total_docs", fields[4])?;

            terms.insert(fields[1].to_string(), term_id);
            idf.insert(
                term_id,
                (((0.5 + total_docs as f64) / (0.5 + doc_freq as f64)).ln()) as f32,
            );
        }

        tracing::debug!("Loaded {} terms from '{}'", terms.len(), path.display());
        Self::from_parts(terms, idf).map_err(|_| DataError::NoUnknownToken {
            path: path.display().to_string(),
        })
    }

    /// Build a vocabulary from already-constructed tables.
    /// Fails if the term table lacks the reserved UNKNOWN entry.
    pub fn from_parts(
        terms: HashMap<String, u32>,
        idf:   HashMap<u32, f32>,
    ) -> Result<Self, DataError> {
        let unknown_id = *terms.get(UNKNOWN_TOKEN).ok_or_else(|| DataError::NoUnknownToken {
            path: "(in-memory)".to_string(),
        })?;
        Ok(Self { terms, idf, unknown_id })
    }

    /// The id of a known term, or None for out-of-vocabulary tokens.
    pub fn id_of(&self, token: &str) -> Option<u32> {
        self.terms.get(token).copied()
    }

    /// The id every out-of-vocabulary token maps to.
    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }

    /// The IDF weight for a term id, if the source file carried
    /// frequency columns for it.
    pub fn idf(&self, id: u32) -> Option<f32> {
        self.idf.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

// ─── CharVocabulary ───────────────────────────────────────────────────────────

/// Character → id mapping for the character-grid encoder.
#[derive(Debug, Clone)]
pub struct CharVocabulary {
    chars: HashMap<char, u32>,
}

impl CharVocabulary {
    /// Parse a character vocabulary file (`id \t character` per line).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path     = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let mut chars = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            let fields: Vec<&str> = line.split('\t').collect();

            if fields.len() < 2 {
                return Err(malformed(
                    path,
                    line_no,
                    format!("expected 2 tab-separated fields, got {}", fields.len()),
                ));
            }

            let char_id = parse_int::<u32>(path, line_no, "char id", fields[0])?;
            let ch = fields[1]
                .chars()
                .next()
                .ok_or_else(|| malformed(path, line_no, "empty character field".to_string()))?;

            chars.insert(ch, char_id);
        }

        tracing::debug!("Loaded {} characters from '{}'", chars.len(), path.display());
        Ok(Self { chars })
    }

    pub fn id_of(&self, ch: char) -> Option<u32> {
        self.chars.get(&ch).copied()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[cfg(test)]
impl CharVocabulary {
    /// Test constructor from (character, id) pairs.
    pub fn from_pairs(pairs: &[(char, u32)]) -> Self {
        Self { chars: pairs.iter().copied().collect() }
    }
}

// ─── Shared parse helpers ─────────────────────────────────────────────────────

fn malformed(path: &Path, line_no: usize, reason: String) -> DataError {
    DataError::MalformedLine {
        path: path.display().to_string(),
        line_no,
        reason,
    }
}

fn parse_int<T: std::str::FromStr>(
    path:    &Path,
    line_no: usize,
    name:    &str,
    field:   &str,
) -> Result<T, DataError> {
    field
        .parse::<T>()
        .map_err(|_| malformed(path, line_no, format!("non-integer {} '{}'", name, field)))
}
