use std::collections::HashMap;

/// Bidirectional word <-> index mapping.
///
/// Indices are dense: the `i`-th inserted word gets index `i`, which is also its row in
/// the embedding table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `word` and returns its index. Returns `None` if the word is already present.
    pub fn insert(&mut self, word: impl Into<String>) -> Option<usize> {
        let word = word.into();
        if self.index.contains_key(&word) {
            return None;
        }
        let id = self.words.len();
        self.index.insert(word.clone(), id);
        self.words.push(word);
        Some(id)
    }

    /// Looks up a word. A miss is a normal outcome, not an error.
    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    /// Returns the word stored at `id`.
    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    /// Builds a vocabulary, skipping repeated words.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for word in iter {
            vocab.insert(word);
        }
        vocab
    }
}
