// ============================================================
// Layer 4 — Lexical Feature Extractor
// ============================================================
// Per (question, answer) pair this module computes:
//
//   lexical_overlap     — how much of the question's informative
//                         vocabulary the answer shares, as a raw ratio
//                         and an IDF-weighted ratio
//   common_terms        — the shared informative id set itself
//   term_frequency_idf  — per shared term, its in-question count
//                         scaled by its IDF weight
//   positional_features — a 2-wide feature row per sequence position
//                         marking shared terms and their TF-IDF value
//
// Ids at or below 100 are reserved for structural tokens and are
// excluded from all overlap scoring. Both ratios are normalized by the
// question side, with the denominator floored at 1 so a question with
// no informative terms scores (0.0, 0.0) instead of dividing by zero.
//
// Everything here is a pure function over borrowed slices — no hidden
// accumulation state, so each piece is independently testable.
//
// Reference: Salton & Buckley (1988), term-weighting approaches

use std::collections::{HashMap, HashSet};

use crate::data::vocab::Vocabulary;

/// Ids at or below this value are reserved/structural and never count
/// as informative terms.
const RESERVED_ID_MAX: u32 = 100;

/// The distinct informative ids in the first `len` positions.
fn informative_ids(ids: &[u32], len: usize) -> HashSet<u32> {
    ids.iter()
        .take(len)
        .copied()
        .filter(|&id| id > RESERVED_ID_MAX)
        .collect()
}

/// Raw and IDF-weighted overlap ratios between question and answer.
///
/// Both are normalized by the size of the question's informative id
/// set (floored at 1). Shared terms without an IDF entry contribute
/// nothing to the weighted ratio.
pub fn lexical_overlap(
    question_ids: &[u32],
    answer_ids:   &[u32],
    question_len: usize,
    answer_len:   usize,
    vocab:        &Vocabulary,
) -> (f32, f32) {
    let question_set = informative_ids(question_ids, question_len);
    let answer_set   = informative_ids(answer_ids, answer_len);
    let denominator  = question_set.len().max(1) as f32;

    let mut shared   = 0.0f32;
    let mut weighted = 0.0f32;
    for id in &question_set {
        if answer_set.contains(id) {
            shared += 1.0;
            weighted += vocab.idf(*id).unwrap_or(0.0);
        }
    }

    (shared / denominator, weighted / denominator)
}

/// The informative ids present on both sides, as a reusable set.
pub fn common_terms(
    question_ids: &[u32],
    answer_ids:   &[u32],
    question_len: usize,
    answer_len:   usize,
) -> HashSet<u32> {
    let question_set = informative_ids(question_ids, question_len);
    let answer_set   = informative_ids(answer_ids, answer_len);
    question_set.intersection(&answer_set).copied().collect()
}

/// Per common term: its occurrence count in `id_list`, scaled by the
/// term's IDF weight when one exists, else the raw count. Common ids
/// absent from the list count as 0 occurrences.
pub fn term_frequency_idf(
    id_list: &[u32],
    common:  &HashSet<u32>,
    vocab:   &Vocabulary,
) -> HashMap<u32, f32> {
    let mut occurrences: HashMap<u32, u32> = HashMap::new();
    for id in id_list {
        if common.contains(id) {
            *occurrences.entry(*id).or_insert(0) += 1;
        }
    }

    let mut tfidf = HashMap::new();
    for &id in common {
        let count = occurrences.get(&id).copied().unwrap_or(0) as f32;
        let value = match vocab.idf(id) {
            Some(weight) => count * weight,
            None         => count,
        };
        tfidf.insert(id, value);
    }
    tfidf
}

/// One `[present, tfidf]` feature row per position of `id_list`:
/// `[1.0, value]` when the id has a TF-IDF entry, `[0.0, 0.0]` when it
/// does not. Output length equals input length — padding positions of
/// a padded vector fall through to the absent row, since id 0 is
/// reserved and never enters a common-term set.
pub fn positional_features(id_list: &[u32], tfidf: &HashMap<u32, f32>) -> Vec<[f32; 2]> {
    id_list
        .iter()
        .map(|id| match tfidf.get(id) {
            Some(&value) => [1.0, value],
            None         => [0.0, 0.0],
        })
        .collect()
}
