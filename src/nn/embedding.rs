use crate::tensor::{Result, Tensor, TensorElem, TensorError};

/// Lookup table from token index to a dense vector.
///
/// Unknown tokens (`None`) map to the all-zero vector. A zero key has zero similarity
/// with every query, and a zero value contributes nothing to the output.
#[derive(Debug, Clone)]
pub struct Embedding<T: TensorElem> {
    pub weight: Tensor<T, 2>,
}

impl<T: TensorElem> Embedding<T> {
    pub fn new(weight: Tensor<T, 2>) -> Self {
        Self { weight }
    }

    /// Number of rows in the table.
    pub fn vocab_size(&self) -> usize {
        self.weight.rows()
    }

    /// Length of each embedding vector.
    pub fn dim(&self) -> usize {
        self.weight.cols()
    }

    /// Embeds a token sequence into a `[seq_len, dim]` matrix.
    pub fn forward(&self, tokens: &[Option<usize>]) -> Result<Tensor<T, 2>> {
        let [vocab_size, hidden_dim] = *self.weight.shape();
        let mut out = Tensor::zeros([tokens.len(), hidden_dim]);
        if hidden_dim == 0 {
            return Ok(out);
        }

        for (row, token) in out.data_mut().chunks_mut(hidden_dim).zip(tokens) {
            let Some(token_id) = *token else {
                continue;
            };
            if token_id >= vocab_size {
                return Err(TensorError::IndexOutOfBounds {
                    index: vec![token_id],
                    shape: vec![vocab_size, hidden_dim],
                });
            }
            row.copy_from_slice(self.weight.row(token_id));
        }

        Ok(out)
    }
}
