//! Softmax.
//!
//! # What is Softmax?
//!
//! Softmax turns a vector of arbitrary real scores into a probability distribution:
//!
//! $$ \text{softmax}(x)_i = \frac{e^{x_i}}{\sum_j e^{x_j}} $$
//!
//! Every output is in $[0, 1]$ and the outputs sum to one. Larger scores get
//! exponentially more mass, which is why attention weights look "peaky".
//!
//! # Numerical Stability
//!
//! Computing $e^{1000}$ overflows even in `f64`. Softmax is invariant to adding a constant
//! to every input, so we subtract the maximum first:
//!
//! $$ \text{softmax}(x)_i = \frac{e^{x_i - m}}{\sum_j e^{x_j - m}}, \quad m = \max_j x_j $$
//!
//! The largest exponent is now $e^0 = 1$ and nothing can overflow.

use crate::tensor::{Result, Tensor, TensorElem, TensorError};
use num_traits::Float;
use qkv_attention_kernels::{cpu_softmax_rows, cpu_transpose};

/// Direction along which softmax normalizes a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Axis 0: normalize down each column, so every column sums to one.
    Columns = 0,
    /// Axis 1: normalize across each row, so every row sums to one.
    #[default]
    Rows = 1,
}

impl TryFrom<usize> for Axis {
    type Error = TensorError;

    fn try_from(axis: usize) -> Result<Self> {
        match axis {
            0 => Ok(Axis::Columns),
            1 => Ok(Axis::Rows),
            other => Err(TensorError::InvalidShape(format!(
                "softmax axis must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// Applies a numerically stable softmax to a matrix along `axis`.
///
/// The output has the same shape as `x`; every vector along `axis` is non-negative and
/// sums to one. A vector of equal values becomes the uniform distribution.
///
/// # Errors
///
/// Returns `TensorError::InvalidShape` if `x` is not 2-dimensional.
///
/// # Examples
///
/// ```rust
/// use qkv_attention::nn::activation::{Axis, softmax};
/// use qkv_attention::tensor::Tensor;
///
/// let x = Tensor::<f64, 2>::from_rows(&[[1.0, 1.0], [0.0, 1e4]]).unwrap();
/// let w = softmax(&x, Axis::Rows).unwrap();
/// assert_eq!(w.row(0), &[0.5, 0.5]);
/// assert_eq!(w.row(1), &[0.0, 1.0]);
/// ```
pub fn softmax<T, const RANK: usize>(x: &Tensor<T, RANK>, axis: Axis) -> Result<Tensor<T, RANK>>
where
    T: TensorElem + Float,
{
    if RANK != 2 {
        return Err(TensorError::InvalidShape(format!(
            "softmax expects a 2-dimensional input, got shape {:?}",
            x.shape()
        )));
    }

    let dims: &[usize] = x.shape();
    let shape = [dims[0], dims[1]];

    let data = match axis {
        Axis::Rows => cpu_softmax_rows(x.data(), &shape)?,
        Axis::Columns => {
            // The kernel normalizes contiguous rows, so columns go through a transpose.
            let transposed_shape = [shape[1], shape[0]];
            let transposed = cpu_transpose(x.data(), &shape)?;
            let normalized = cpu_softmax_rows(&transposed, &transposed_shape)?;
            cpu_transpose(&normalized, &transposed_shape)?
        }
    };

    Ok(Tensor::from_parts(data, *x.shape()))
}
