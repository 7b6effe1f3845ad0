//! Text side of the alignment pipeline: vocabularies, tokenization and word vectors.
//!
//! None of this is part of attention itself. It exists to turn two sentences into the
//! query, key and value matrices that [`crate::nn::attention`] consumes.

use crate::tensor::TensorError;
use thiserror::Error;

pub mod loader;
pub mod tokenizer;
pub mod vocab;

pub use loader::EmbeddingTable;
pub use tokenizer::{TokenizedSentence, Tokenizer, UNKNOWN_TOKEN_ID};
pub use vocab::Vocabulary;

/// Error type for loading word-vector files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A vector component is not a finite number.
    #[error("line {line}: invalid number {token:?}")]
    Parse { line: usize, token: String },
    /// A line has a different number of components than the rest of the file.
    #[error("line {line}: expected {expected} values, got {got}")]
    Dimension {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("no word vectors found")]
    Empty,
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
