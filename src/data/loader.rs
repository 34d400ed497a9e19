// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the two training corpora:
//
//   AnswerPool    — `answer_id \t answer_text` lines, each answer
//                   space-tokenized, truncated to max_seq_len and
//                   pre-encoded once at load time
//   load_examples — `question_id \t question_text \t pos|ids|or|NA
//                   \t neg|ids|or|NA` lines, expanded into one labeled
//                   Example per referenced answer id
//
// Error handling is deliberately asymmetric. An answer line without
// exactly two fields keeps its record with placeholder UNKNOWN text
// (logged, never raised) — bad text content is tolerable. A pair line
// referencing an id missing from the pool aborts the load — broken
// referential integrity never is.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::data::dataset::ExampleSet;
use crate::data::encoder::encode_words;
use crate::data::error::DataError;
use crate::data::vocab::{Vocabulary, UNKNOWN_TOKEN};
use crate::domain::example::{AnswerRecord, Example};

/// Marks a question with no positive (or no negative) answer ids.
const NO_IDS: &str = "NA";

// ─── AnswerPool ───────────────────────────────────────────────────────────────

/// The candidate answer pool, keyed by answer id.
#[derive(Debug, Clone)]
pub struct AnswerPool {
    records: HashMap<String, AnswerRecord>,
}

impl AnswerPool {
    /// Load and pre-encode the answer pool file.
    ///
    /// Lines without exactly 2 tab-separated fields are recovered with
    /// placeholder UNKNOWN text rather than rejected.
    pub fn load(
        path:        impl AsRef<Path>,
        vocab:       &Vocabulary,
        max_seq_len: usize,
    ) -> Result<Self, DataError> {
        let path     = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let mut records = HashMap::new();

        for line in contents.lines() {
            let fields: Vec<&str> = line.split('\t').collect();

            // split always yields at least one field, so the id is
            // available even on a malformed line
            let (answer_id, text) = if fields.len() == 2 {
                (fields[0], fields[1])
            } else {
                tracing::warn!("Malformed answer line '{}' — substituting UNKNOWN text", line);
                (fields[0], UNKNOWN_TOKEN)
            };

            let tokens: Vec<String> = text
                .split(' ')
                .take(max_seq_len)
                .map(str::to_string)
                .collect();
            let (length, ids) = encode_words(&tokens, vocab);

            records.insert(answer_id.to_string(), AnswerRecord { length, ids, tokens });
        }

        tracing::info!("Loaded {} answers from '{}'", records.len(), path.display());
        Ok(Self { records })
    }

    pub fn get(&self, answer_id: &str) -> Option<&AnswerRecord> {
        self.records.get(answer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ─── Example loading ──────────────────────────────────────────────────────────

/// Load the labeled question/answer pair file against an already-loaded
/// answer pool.
///
/// Positive/negative id lists are pipe-delimited, with the literal
/// `NA` meaning "none of this polarity". Per line, negative examples
/// (label 0.0) are appended before positive ones (label 1.0), all
/// sharing the same pre-encoded question. A referenced id missing from
/// the pool is fatal.
pub fn load_examples(
    path:        impl AsRef<Path>,
    vocab:       &Vocabulary,
    max_seq_len: usize,
    pool:        &AnswerPool,
) -> Result<ExampleSet, DataError> {
    let path     = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut examples = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(DataError::MalformedLine {
                path:    path.display().to_string(),
                line_no: idx + 1,
                reason:  format!("expected 4 tab-separated fields, got {}", fields.len()),
            });
        }

        let question_id = fields[0];
        let question_tokens: Vec<String> = fields[1]
            .split(' ')
            .take(max_seq_len)
            .map(str::to_string)
            .collect();
        let (question_len, question_ids) = encode_words(&question_tokens, vocab);

        let push_pairs = |id_list: &str,
                          label:   f32,
                          out:     &mut Vec<Example>|
         -> Result<(), DataError> {
            if id_list == NO_IDS {
                return Ok(());
            }
            for answer_id in id_list.split('|') {
                let record = pool.get(answer_id).ok_or_else(|| DataError::MissingAnswer {
                    question_id: question_id.to_string(),
                    answer_id:   answer_id.to_string(),
                })?;
                out.push(Example {
                    question_id:     question_id.to_string(),
                    question_len,
                    question_ids:    question_ids.clone(),
                    answer_id:       answer_id.to_string(),
                    answer_len:      record.length,
                    answer_ids:      record.ids.clone(),
                    label,
                    question_tokens: question_tokens.clone(),
                    answer_tokens:   record.tokens.clone(),
                });
            }
            Ok(())
        };

        push_pairs(fields[3], 0.0, &mut examples)?;
        push_pairs(fields[2], 1.0, &mut examples)?;
    }

    tracing::info!(
        "Loaded {} examples from '{}'",
        examples.len(),
        path.display()
    );
    Ok(ExampleSet::new(examples))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("answer-select-loader-tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
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
    fn test_answers_are_encoded_and_truncated() {
        let vocab = test_vocab();
        let path  = write_fixture("answers_ok.txt", "A1\tthe cat runs\nA2\tdog dog dog dog\n");
        let pool  = AnswerPool::load(&path, &vocab, 3).unwrap();

        let a1 = pool.get("A1").unwrap();
        assert_eq!(a1.length, 3);
        assert_eq!(a1.ids, vec![0, 101, 50]);
        assert_eq!(a1.tokens, vec!["the", "cat", "runs"]);

        // 4 tokens cut to max_seq_len = 3 before encoding
        let a2 = pool.get("A2").unwrap();
        assert_eq!(a2.length, 3);
        assert_eq!(a2.ids, vec![102, 102, 102]);
    }

    #[test]
    fn test_malformed_answer_line_substitutes_unknown_text() {
        let vocab = test_vocab();
        let path  = write_fixture("answers_bad.txt", "A1\tcat\nA2\n");
        let pool  = AnswerPool::load(&path, &vocab, 5).unwrap();

        // the record survives with placeholder text
        let a2 = pool.get("A2").unwrap();
        assert_eq!(a2.tokens, vec![UNKNOWN_TOKEN]);
        assert_eq!(a2.ids, vec![0]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_na_polarity_yields_no_examples_of_that_label() {
        let vocab = test_vocab();
        let answers = write_fixture("pool_na.txt", "a1\tcat\na2\tdog\n");
        let pairs   = write_fixture("pairs_na.txt", "Q1\tthe dog runs\tNA\ta1|a2\n");
        let pool    = AnswerPool::load(&answers, &vocab, 5).unwrap();
        let set     = load_examples(&pairs, &vocab, 5, &pool).unwrap();

        let examples = set.into_examples();
        assert_eq!(examples.len(), 2);
        assert!(examples.iter().all(|e| e.label == 0.0));
        // both share identical question fields
        assert_eq!(examples[0].question_ids, examples[1].question_ids);
        assert_eq!(examples[0].question_len, 3);
    }

    #[test]
    fn test_negatives_precede_positives_within_a_line() {
        let vocab = test_vocab();
        let answers = write_fixture("pool_order.txt", "p1\tcat\nn1\tdog\n");
        let pairs   = write_fixture("pairs_order.txt", "Q1\tcat runs\tp1\tn1\n");
        let pool    = AnswerPool::load(&answers, &vocab, 5).unwrap();
        let set     = load_examples(&pairs, &vocab, 5, &pool).unwrap();

        let examples = set.into_examples();
        assert_eq!(examples.len(), 2);
        assert_eq!((examples[0].answer_id.as_str(), examples[0].label), ("n1", 0.0));
        assert_eq!((examples[1].answer_id.as_str(), examples[1].label), ("p1", 1.0));
    }

    #[test]
    fn test_missing_answer_id_is_fatal() {
        let vocab = test_vocab();
        let answers = write_fixture("pool_missing.txt", "a1\tcat\n");
        let pairs   = write_fixture("pairs_missing.txt", "Q1\tcat\ta1\tghost\n");
        let pool    = AnswerPool::load(&answers, &vocab, 5).unwrap();
        let err     = load_examples(&pairs, &vocab, 5, &pool).unwrap_err();

        match err {
            DataError::MissingAnswer { question_id, answer_id } => {
                assert_eq!(question_id, "Q1");
                assert_eq!(answer_id, "ghost");
            }
            other => panic!("expected MissingAnswer, got {other:?}"),
        }
    }

    #[test]
    fn test_short_pair_line_is_fatal() {
        let vocab = test_vocab();
        let answers = write_fixture("pool_short.txt", "a1\tcat\n");
        let pairs   = write_fixture("pairs_short.txt", "Q1\tcat\ta1\n");
        let pool    = AnswerPool::load(&answers, &vocab, 5).unwrap();
        let err     = load_examples(&pairs, &vocab, 5, &pool).unwrap_err();
        assert!(matches!(err, DataError::MalformedLine { line_no: 1, .. }));
    }
}
