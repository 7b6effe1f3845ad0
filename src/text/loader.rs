//! Word-vector file loader.
//!
//! Reads the plain-text format used by word2vec and fastText (`.vec` files):
//!
//! ```text
//! 3 4                      <- optional header: <word count> <dimension>
//! le 0.1 -0.2 0.3 0.05
//! chat 0.7 0.1 -0.4 0.2
//! noir -0.3 0.0 0.9 0.1
//! ```
//!
//! Each remaining line is a word followed by its vector components. Blank lines are
//! skipped. If a word repeats, the first vector wins.

use super::{LoadError, LoadResult, TokenizedSentence, Tokenizer, Vocabulary};
use crate::nn::Embedding;
use crate::tensor::{Result, Tensor, TensorElem};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// A vocabulary together with its embedding matrix (row `i` is the vector of word `i`).
#[derive(Debug, Clone)]
pub struct EmbeddingTable<T: TensorElem> {
    pub vocab: Vocabulary,
    pub embedding: Embedding<T>,
}

impl<T: TensorElem> EmbeddingTable<T> {
    /// Loads a table from a word-vector text file.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            words = table.vocab.len(),
            dim = table.dim(),
            "loaded embedding table"
        );
        Ok(table)
    }

    /// Parses a table from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> LoadResult<Self> {
        let mut vocab = Vocabulary::new();
        let mut data: Vec<T> = Vec::new();
        let mut dim: Option<usize> = None;
        let mut declared_count: Option<usize> = None;

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_idx + 1;
            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next() else {
                continue;
            };
            let rest: Vec<&str> = tokens.collect();

            if line_no == 1 {
                if let Some((count, header_dim)) = parse_header(word, &rest) {
                    declared_count = Some(count);
                    dim = Some(header_dim);
                    data.reserve(count.saturating_mul(header_dim));
                    continue;
                }
            }

            let expected = *dim.get_or_insert(rest.len());
            if expected == 0 || rest.len() != expected {
                return Err(LoadError::Dimension {
                    line: line_no,
                    expected,
                    got: rest.len(),
                });
            }

            if vocab.get(word).is_some() {
                warn!(word, line = line_no, "duplicate word in embedding file, keeping first");
                continue;
            }

            for token in &rest {
                data.push(parse_value(token, line_no)?);
            }
            vocab.insert(word);
        }

        let Some(dim) = dim.filter(|_| !vocab.is_empty()) else {
            return Err(LoadError::Empty);
        };

        if let Some(count) = declared_count {
            if count != vocab.len() {
                warn!(declared = count, found = vocab.len(), "header word count does not match");
            }
        }

        let weight = Tensor::new(data, [vocab.len(), dim])?;
        Ok(Self {
            vocab,
            embedding: Embedding::new(weight),
        })
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.embedding.dim()
    }

    /// Tokenizes `sentence` against this table's vocabulary and embeds it.
    ///
    /// Returns the tokenized sentence (for labels) and a `[words, dim]` matrix in which
    /// unknown words are zero rows.
    pub fn embed_sentence(&self, sentence: &str) -> Result<(TokenizedSentence, Tensor<T, 2>)> {
        let tokens = Tokenizer.tokenize(sentence, &self.vocab);
        if tokens.unknown_count() > 0 {
            debug!(
                unknown = tokens.unknown_count(),
                total = tokens.len(),
                "sentence has out-of-vocabulary words"
            );
        }
        let matrix = self.embedding.forward(&tokens.ids)?;
        Ok((tokens, matrix))
    }
}

/// Recognizes a `<count> <dim>` header line.
fn parse_header(first: &str, rest: &[&str]) -> Option<(usize, usize)> {
    match rest {
        [dim] => Some((first.parse().ok()?, dim.parse().ok()?)),
        _ => None,
    }
}

fn parse_value<T: TensorElem>(token: &str, line: usize) -> LoadResult<T> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .and_then(T::from_f64)
        .ok_or_else(|| LoadError::Parse {
            line,
            token: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const SAMPLE: &str = "3 2\nle 1.0 0.0\nchat 0.0 1.0\nnoir 0.5 0.5\n";

    #[test]
    fn test_from_reader_with_header() {
        let table = EmbeddingTable::<f64>::from_reader(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(table.vocab.len(), 3);
        assert_eq!(table.dim(), 2);
        assert_eq!(table.vocab.get("chat"), Some(1));
        assert_eq!(table.embedding.weight.row(2), &[0.5, 0.5]);
    }

    #[test]
    fn test_from_reader_without_header() {
        let input = "a 1 2 3\n\nb 4 5 6\n";
        let table = EmbeddingTable::<f32>::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(table.vocab.len(), 2);
        assert_eq!(table.embedding.weight.shape(), &[2, 3]);
    }

    #[test]
    fn test_single_value_first_line_is_a_word() {
        // "7 2" would be a header, but "x 2" is a one-dimensional vector.
        let input = "x 2\ny 3\n";
        let table = EmbeddingTable::<f64>::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(table.dim(), 1);
        assert_eq!(table.vocab.get("y"), Some(1));
    }

    #[test]
    fn test_duplicate_word_keeps_first() {
        let input = "a 1 1\na 2 2\nb 3 3\n";
        let table = EmbeddingTable::<f64>::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(table.vocab.len(), 2);
        assert_eq!(table.embedding.weight.row(0), &[1.0, 1.0]);
        assert_eq!(table.embedding.weight.row(1), &[3.0, 3.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let input = "a 1 2\nb 3\n";
        let err = EmbeddingTable::<f64>::from_reader(Cursor::new(input));
        assert!(matches!(
            err,
            Err(LoadError::Dimension {
                line: 2,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_header_dimension_enforced() {
        let input = "1 3\na 1 2\n";
        let err = EmbeddingTable::<f64>::from_reader(Cursor::new(input));
        assert!(matches!(err, Err(LoadError::Dimension { line: 2, .. })));
    }

    #[test]
    fn test_parse_error() {
        let input = "a 1.0 abc\n";
        let err = EmbeddingTable::<f64>::from_reader(Cursor::new(input));
        assert!(matches!(err, Err(LoadError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_empty_input() {
        let err = EmbeddingTable::<f64>::from_reader(Cursor::new("\n\n"));
        assert!(matches!(err, Err(LoadError::Empty)));

        let err = EmbeddingTable::<f64>::from_reader(Cursor::new("5 300\n"));
        assert!(matches!(err, Err(LoadError::Empty)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = EmbeddingTable::<f32>::load(file.path()).unwrap();
        assert_eq!(table.vocab.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EmbeddingTable::<f32>::load("no_such_embeddings.vec");
        assert!(matches!(err, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_embed_sentence() {
        let table = EmbeddingTable::<f64>::from_reader(Cursor::new(SAMPLE)).unwrap();
        let (tokens, matrix) = table.embed_sentence("Le chat blanc").unwrap();

        assert_eq!(tokens.words, vec!["le", "chat", "blanc"]);
        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix.row(0), &[1.0, 0.0]);
        assert_eq!(matrix.row(2), &[0.0, 0.0]);
    }
}
