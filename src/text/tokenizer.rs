use super::Vocabulary;

/// Integer form of an unknown token, for callers that want a flat `i64` id list.
pub const UNKNOWN_TOKEN_ID: i64 = -1;

/// A sentence split into words, with each word's vocabulary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedSentence {
    /// Lowercased words, in order. Used as plot labels.
    pub words: Vec<String>,
    /// Vocabulary index per word; `None` for out-of-vocabulary words.
    pub ids: Vec<Option<usize>>,
}

impl TokenizedSentence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of words that were not found in the vocabulary.
    pub fn unknown_count(&self) -> usize {
        self.ids.iter().filter(|id| id.is_none()).count()
    }

    /// Ids with unknown words replaced by [`UNKNOWN_TOKEN_ID`].
    pub fn ids_with_sentinel(&self) -> Vec<i64> {
        self.ids
            .iter()
            .map(|id| id.map_or(UNKNOWN_TOKEN_ID, |i| i as i64))
            .collect()
    }
}

/// Lowercasing whitespace tokenizer.
///
/// No punctuation handling: `"chat."` and `"chat"` are different words, the same as in
/// the word-vector files this crate reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Splits `sentence` into lowercase words and looks each one up in `vocab`.
    pub fn tokenize(&self, sentence: &str, vocab: &Vocabulary) -> TokenizedSentence {
        let words: Vec<String> = sentence.split_whitespace().map(str::to_lowercase).collect();
        let ids = words.iter().map(|w| vocab.get(w)).collect();
        TokenizedSentence { words, ids }
    }
}
