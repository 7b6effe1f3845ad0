//! Dense Tensor implementation.
//!
//! # What is a Tensor here?
//!
//! Attention only ever needs matrices: queries, keys, values, scores and weights are
//! all 2D. The `Tensor` type is still rank-generic (`const RANK: usize`) so that shape
//! errors such as "softmax needs a 2D input" can be reported as values rather than
//! being impossible to express.
//!
//! A `Tensor` is defined by:
//! 1. **Data**: A flat vector of elements (usually `f32` or `f64`).
//! 2. **Shape**: An array of dimensions (e.g., `[2, 3]`).
//! 3. **Strides**: How to step through the flat data to traverse dimensions.
//!
//! ## Example: Creating and Inspecting a Tensor
//!
//! ```rust
//! use qkv_attention::tensor::Tensor;
//!
//! // Create a 2x3 matrix (Rank 2 Tensor)
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let tensor = Tensor::<f32, 2>::new(data, [2, 3]).unwrap();
//!
//! assert_eq!(tensor.shape(), &[2, 3]);
//! assert_eq!(tensor.row(1), &[4.0, 5.0, 6.0]);
//! ```
//!
//! > [!TIP]
//! > Tensors use **Row-Major** (C-style) layout: the last dimension changes the fastest
//! > in memory. Every row of a matrix is therefore one contiguous slice, which is what
//! > the row-parallel kernels in `qkv-attention-kernels` rely on.

use num_traits::{FromPrimitive, Num, NumAssign, ToPrimitive};
use std::fmt::Debug;
use thiserror::Error;

pub mod ops;


/// Error type for Tensor operations.
#[derive(Error, Debug)]
pub enum TensorError {
    /// Two shapes that must agree do not.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// The input does not have the shape an operation requires (wrong rank, bad axis, ragged rows).
    #[error("Invalid shape: {0}")]
    InvalidShape(String),
    /// An index is out of bounds for the given shape.
    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },
}

impl From<qkv_attention_kernels::KernelError> for TensorError {
    fn from(err: qkv_attention_kernels::KernelError) -> Self {
        match err {
            qkv_attention_kernels::KernelError::ShapeMismatch { expected, got } => {
                TensorError::ShapeMismatch { expected, got }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;

/// Trait bound for elements that can be stored in a Tensor.
///
/// # Requirements
/// - `Copy + Clone`: Elements live in one contiguous `Vec<T>` and are read by value.
/// - `Num + ...`: Provides the numeric operations used by the kernels.
/// - `Send + Sync`: Required for parallel execution via `rayon`.
pub trait TensorElem:
    Num + NumAssign + Copy + Clone + Debug + Send + Sync + FromPrimitive + ToPrimitive + PartialOrd
{
}

impl<T> TensorElem for T where
    T: Num
        + NumAssign
        + Copy
        + Clone
        + Debug
        + Send
        + Sync
        + FromPrimitive
        + ToPrimitive
        + PartialOrd
{
}

/// The core Tensor struct.
///
/// # Generics
///
/// - `T`: The element type (must implement `TensorElem`).
/// - `RANK`: The number of dimensions (const generic).
///
/// Shapes are runtime values, so a `[3, 4]` matrix and a `[14, 300]` matrix share one
/// type. Mismatches between queries, keys and values are caught when an operation runs
/// and are returned as [`TensorError`]s.
#[derive(Clone, PartialEq)]
pub struct Tensor<T, const RANK: usize>
where
    T: TensorElem,
{
    shape: [usize; RANK],
    strides: [usize; RANK],
    data: Vec<T>,
}

impl<T, const RANK: usize> Tensor<T, RANK>
where
    T: TensorElem,
{
    /// Creates a new Tensor from a vector of data and a shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the length of `data` does not match the product of `shape`.
    pub fn new(data: Vec<T>, shape: [usize; RANK]) -> Result<Self> {
        let size: usize = shape.iter().product();
        if data.len() != size {
            return Err(TensorError::ShapeMismatch {
                expected: vec![size],
                got: vec![data.len()],
            });
        }

        Ok(Self::from_parts(data, shape))
    }

    /// Builds a tensor whose data length is already known to match `shape`.
    pub(crate) fn from_parts(data: Vec<T>, shape: [usize; RANK]) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Self {
            shape,
            strides: compute_strides(&shape),
            data,
        }
    }

    /// Creates a new Tensor filled with zeros.
    pub fn zeros(shape: [usize; RANK]) -> Self {
        let size: usize = shape.iter().product();
        Self::from_parts(vec![T::zero(); size], shape)
    }

    /// Creates a new Tensor filled with ones.
    pub fn ones(shape: [usize; RANK]) -> Self {
        let size: usize = shape.iter().product();
        Self::from_parts(vec![T::one(); size], shape)
    }

    /// Returns the shape of the tensor.
    pub fn shape(&self) -> &[usize; RANK] {
        &self.shape
    }

    /// Returns a reference to the underlying data as a slice.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable reference to the underlying data as a slice.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the element at a multi-dimensional index.
    pub fn get(&self, index: [usize; RANK]) -> Result<T> {
        let mut offset = 0;
        for (axis, (&i, &dim)) in index.iter().zip(self.shape.iter()).enumerate() {
            if i >= dim {
                return Err(TensorError::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.to_vec(),
                });
            }
            offset += i * self.strides[axis];
        }
        Ok(self.data[offset])
    }
}

impl<T> Tensor<T, 2>
where
    T: TensorElem,
{
    /// Builds a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidShape` if the rows do not all have the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(TensorError::InvalidShape(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self::from_parts(data, [rows.len(), cols]))
    }

    /// Number of rows (`shape[0]`).
    pub fn rows(&self) -> usize {
        self.shape[0]
    }

    /// Number of columns (`shape[1]`).
    pub fn cols(&self) -> usize {
        self.shape[1]
    }

    /// Returns row `i` as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        let cols = self.cols();
        &self.data[i * cols..(i + 1) * cols]
    }

    /// Iterates over the rows of the matrix.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows()).map(move |i| self.row(i))
    }
}

/// Computes the strides for a given shape.
///
/// Strides represent the number of elements to skip in memory to move to the next element
/// along a specific dimension. This implementation assumes a row-major (C-style) memory layout.
fn compute_strides<const RANK: usize>(shape: &[usize; RANK]) -> [usize; RANK] {
    let mut strides = [0; RANK];
    let mut stride = 1;
    for i in (0..RANK).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

impl<T, const RANK: usize> Debug for Tensor<T, RANK>
where
    T: TensorElem,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data_len", &self.data.len())
            .finish()
    }
}
