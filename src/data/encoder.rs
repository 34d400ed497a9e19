// ============================================================
// Layer 4 — Token Encoder
// ============================================================
// Turns token sequences into the fixed-shape index forms the batch
// assembler needs:
//
//   encode_words  — one vocabulary id per token (UNKNOWN for misses);
//                   output length always equals input token count
//   pad_to        — left-aligned zero padding up to max_len
//   encode_chars  — a max_len × max_word_len grid of character ids
//                   plus per-token character counts
//
// Truncation is the caller's job: both corpus loaders cut token lists
// to max_seq_len *before* encoding, so the recorded length and the
// encoded vector never diverge. pad_to pads only — it never shortens.

use crate::data::vocab::{CharVocabulary, Vocabulary};

/// Encode tokens as vocabulary ids, substituting the UNKNOWN id for
/// out-of-vocabulary tokens. Returns (token count, ids) — no padding.
pub fn encode_words(tokens: &[String], vocab: &Vocabulary) -> (usize, Vec<u32>) {
    let ids: Vec<u32> = tokens
        .iter()
        .map(|t| vocab.id_of(t).unwrap_or_else(|| vocab.unknown_id()))
        .collect();
    (ids.len(), ids)
}

/// Zero-pad an id vector to exactly `max_len` entries, left-aligned.
/// Already-full vectors come back unchanged.
pub fn pad_to(ids: &[u32], max_len: usize) -> Vec<u32> {
    if ids.len() == max_len {
        return ids.to_vec();
    }
    debug_assert!(
        ids.len() <= max_len,
        "pad_to expects a pre-truncated vector ({} > {})",
        ids.len(),
        max_len
    );

    let mut padded = vec![0u32; max_len];
    for (i, &id) in ids.iter().take(max_len).enumerate() {
        padded[i] = id;
    }
    padded
}

/// Encode tokens as a `max_len × max_word_len` grid of character ids.
///
/// Row i holds the ids of token i's first `max_word_len` characters;
/// characters absent from the vocabulary stay 0, as do all cells past
/// the token's own length and all rows past the token count. The
/// returned word lengths record each token's surviving character count,
/// defaulting to 1 for positions past the token count. Tokens beyond
/// `max_len` are ignored.
pub fn encode_chars(
    tokens:       &[String],
    chars:        &CharVocabulary,
    max_len:      usize,
    max_word_len: usize,
) -> (Vec<Vec<u32>>, Vec<u32>) {
    let n = tokens.len().min(max_len);

    let mut grid         = vec![vec![0u32; max_word_len]; max_len];
    let mut word_lengths = vec![1u32; max_len];

    for i in 0..n {
        let truncated: Vec<char> = tokens[i].chars().take(max_word_len).collect();
        word_lengths[i] = truncated.len() as u32;

        for (idx, ch) in truncated.iter().enumerate() {
            if let Some(id) = chars.id_of(*ch) {
                grid[i][idx] = id;
            }
        }
    }

    (grid, word_lengths)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn test_vocab() -> Vocabulary {
        let terms: HashMap<String, u32> = [
            ("UNKNOWN".to_string(), 0),
            ("cat".to_string(), 101),
            ("dog".to_string(), 102),
            ("runs".to_string(), 50),
        ]
        .into_iter()
        .collect();
        Vocabulary::from_parts(terms, HashMap::new()).unwrap()
    }

    #[test]
    fn test_encode_words_substitutes_unknown() {
        let vocab = test_vocab();
        let (len, ids) = encode_words(&toks(&["the", "dog", "runs"]), &vocab);
        assert_eq!(len, 3);
        assert_eq!(ids, vec![0, 102, 50]);
    }

    #[test]
    fn test_encode_words_length_matches_input() {
        let vocab = test_vocab();
        let (len, ids) = encode_words(&toks(&[]), &vocab);
        assert_eq!(len, 0);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_pad_to_is_idempotent() {
        let once  = pad_to(&[101, 102, 50], 5);
        let twice = pad_to(&once, 5);
        assert_eq!(once, vec![101, 102, 50, 0, 0]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pad_to_leaves_full_vector_unchanged() {
        let full = vec![1, 2, 3];
        assert_eq!(pad_to(&full, 3), full);
    }

    #[test]
    fn test_encode_chars_shapes_and_truncation() {
        let chars = CharVocabulary::from_pairs(&[('c', 1), ('a', 2), ('t', 3), ('s', 4)]);
        let (grid, lengths) = encode_chars(&toks(&["cats", "catsss"]), &chars, 4, 3);

        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|row| row.len() == 3));

        // "cats" truncated to "cat"
        assert_eq!(grid[0], vec![1, 2, 3]);
        assert_eq!(lengths[0], 3);
        // overlong token also capped at max_word_len
        assert_eq!(lengths[1], 3);
        // unused rows: all-zero grid, length defaults to 1
        assert_eq!(grid[2], vec![0, 0, 0]);
        assert_eq!(lengths[2], 1);
        assert_eq!(lengths[3], 1);
    }

    #[test]
    fn test_encode_chars_unknown_characters_stay_zero() {
        let chars = CharVocabulary::from_pairs(&[('a', 2)]);
        let (grid, lengths) = encode_chars(&toks(&["ax"]), &chars, 2, 4);
        assert_eq!(grid[0], vec![2, 0, 0, 0]);
        assert_eq!(lengths[0], 2);
    }

    #[test]
    fn test_encode_chars_ignores_tokens_beyond_max_len() {
        let chars = CharVocabulary::from_pairs(&[('a', 2)]);
        let (grid, lengths) = encode_chars(&toks(&["a", "a", "a"]), &chars, 2, 2);
        assert_eq!(grid.len(), 2);
        assert_eq!(lengths.len(), 2);
    }

    #[test]
    fn test_encode_chars_empty_token_records_zero_length() {
        // split on single spaces can produce empty tokens
        let chars = CharVocabulary::from_pairs(&[('a', 2)]);
        let (_, lengths) = encode_chars(&toks(&["", "a"]), &chars, 3, 2);
        assert_eq!(lengths[0], 0);
        assert_eq!(lengths[1], 1);
        assert_eq!(lengths[2], 1);
    }
}
