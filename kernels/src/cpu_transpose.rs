use crate::{KernelElem, Result, check_len};
use rayon::prelude::*;

/// CPU Implementation of Transpose: `[M, N] -> [N, M]`.
///
/// # SOTA Integration Guide
///
/// Optimized transpose operations often use tiling (blocking) to improve cache usage.
/// Libraries like `hptt` (High Performance Tensor Transpose) can be used here.
pub fn cpu_transpose<T>(data: &[T], shape: &[usize; 2]) -> Result<Vec<T>>
where
    T: KernelElem,
{
    let [m, n] = *shape;
    check_len(data, m, n)?;

    let mut out_data = vec![T::zero(); m * n];
    if m == 0 {
        return Ok(out_data);
    }

    // Output row `c` is input column `c`.
    out_data
        .par_chunks_mut(m)
        .enumerate()
        .for_each(|(c, out_row)| {
            for (r, out_elem) in out_row.iter_mut().enumerate() {
                *out_elem = data[r * n + c];
            }
        });

    Ok(out_data)
}
