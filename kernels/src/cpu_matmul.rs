use crate::{KernelElem, KernelError, Result, check_len};
use rayon::prelude::*;

/// CPU Implementation of Matrix Multiplication: `[M, K] x [K, N] -> [M, N]`.
///
/// The right-hand side is transposed first so that the inner loop of
/// [`cpu_matmul_nt`] walks both operands sequentially.
///
/// # SOTA Integration Guide
///
/// To integrate a library like `matrixmultiply` or `cblas`, replace the body with a
/// call to `sgemm`/`dgemm`. `qkv-attention` uses Row-Major layout, so pass the
/// row strides accordingly.
pub fn cpu_matmul<T>(
    lhs_data: &[T],
    rhs_data: &[T],
    lhs_shape: &[usize; 2],
    rhs_shape: &[usize; 2],
) -> Result<Vec<T>>
where
    T: KernelElem,
{
    let [_, k] = *lhs_shape;
    let [k2, n] = *rhs_shape;

    if k != k2 {
        return Err(KernelError::ShapeMismatch {
            expected: vec![k],
            got: vec![k2],
        });
    }
    check_len(rhs_data, k2, n)?;

    let rhs_t_data = crate::cpu_transpose(rhs_data, rhs_shape)?;
    cpu_matmul_nt(lhs_data, &rhs_t_data, lhs_shape, &[n, k])
}

/// Multiplies `lhs` by the transpose of `rhs`: `[M, K] x [N, K]^T -> [M, N]`.
///
/// Every output element is the dot product of one row of `lhs` with one row of `rhs`,
/// which is exactly the query/key similarity in attention. No transposed copy is made.
pub fn cpu_matmul_nt<T>(
    lhs_data: &[T],
    rhs_data: &[T],
    lhs_shape: &[usize; 2],
    rhs_shape: &[usize; 2],
) -> Result<Vec<T>>
where
    T: KernelElem,
{
    let [m, k] = *lhs_shape;
    let [n, k2] = *rhs_shape;

    if k != k2 {
        return Err(KernelError::ShapeMismatch {
            expected: vec![k],
            got: vec![k2],
        });
    }
    check_len(lhs_data, m, k)?;
    check_len(rhs_data, n, k)?;

    let mut out_data = vec![T::zero(); m * n];
    if n == 0 {
        return Ok(out_data);
    }

    // One task per output row; each task owns a disjoint chunk.
    out_data
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(row, out_row)| {
            let a_slice = &lhs_data[row * k..(row + 1) * k];

            for (col, out_elem) in out_row.iter_mut().enumerate() {
                let b_slice = &rhs_data[col * k..(col + 1) * k];

                let mut sum = T::zero();
                for (&val_a, &val_b) in a_slice.iter().zip(b_slice.iter()) {
                    sum += val_a * val_b;
                }
                *out_elem = sum;
            }
        });

    Ok(out_data)
}
