//! Tensor operations.
//!
//! # Overview
//!
//! This module is the bridge between [`Tensor`] and the slice kernels in
//! `qkv-attention-kernels`. It handles:
//! - **Element-wise Maps**: [`Tensor::map`], used for scaling scores.
//! - **Matrix Multiplication**: `A · B` and `A · Bᵀ` for matrices.
//! - **Transpose**: swapping rows and columns.
//!
//! # Parallelism
//!
//! > [!TIP]
//! > Operations are parallelized with `rayon`, one task per output row. For the tiny
//! > matrices in unit tests the thread overhead dominates; for a `[14, 300]` sentence
//! > embedding it is a wash; it starts paying off at a few hundred rows.
//!
//! # Examples
//!
//! ```rust
//! use qkv_attention::tensor::Tensor;
//!
//! let a = Tensor::<f32, 2>::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
//! let b = Tensor::<f32, 2>::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
//!
//! let c = a.matmul_transposed(&b).unwrap();
//! assert_eq!(c.data(), &[1.0, 2.0, 3.0, 4.0]);
//! ```

use super::{Result, Tensor, TensorElem};

use qkv_attention_kernels::{cpu_matmul, cpu_matmul_nt, cpu_transpose};
use rayon::prelude::*;

impl<T, const RANK: usize> Tensor<T, RANK>
where
    T: TensorElem,
{
    /// Applies a function element-wise to the tensor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qkv_attention::tensor::Tensor;
    /// let t = Tensor::<f32, 1>::new(vec![1.0, 2.0, 3.0], [3]).unwrap();
    /// let squared = t.map(|x| x * x);
    /// assert_eq!(squared.data(), &[1.0, 4.0, 9.0]);
    /// ```
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T + Sync + Send,
    {
        let data = self.data.par_iter().map(|&x| f(x)).collect();
        Tensor::from_parts(data, self.shape)
    }
}

impl<T> Tensor<T, 2>
where
    T: TensorElem,
{
    /// Matrix Multiplication: `[M, K] x [K, N] -> [M, N]`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the inner dimensions differ.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        let [m, _] = self.shape;
        let [_, n] = rhs.shape;

        let out = cpu_matmul(&self.data, &rhs.data, &self.shape, &rhs.shape)?;
        Ok(Tensor::from_parts(out, [m, n]))
    }

    /// Multiplies by the transpose of `rhs`: `[M, K] x [N, K]^T -> [M, N]`.
    ///
    /// Equivalent to `self.matmul(&rhs.transpose())` without building the transposed copy.
    /// Entry `(i, j)` is the dot product of row `i` of `self` with row `j` of `rhs`.
    pub fn matmul_transposed(&self, rhs: &Self) -> Result<Self> {
        let [m, _] = self.shape;
        let [n, _] = rhs.shape;

        let out = cpu_matmul_nt(&self.data, &rhs.data, &self.shape, &rhs.shape)?;
        Ok(Tensor::from_parts(out, [m, n]))
    }

    /// Swaps rows and columns: `[M, N] -> [N, M]`.
    pub fn transpose(&self) -> Result<Self> {
        let [m, n] = self.shape;
        let out = cpu_transpose(&self.data, &self.shape)?;
        Ok(Tensor::from_parts(out, [n, m]))
    }
}
