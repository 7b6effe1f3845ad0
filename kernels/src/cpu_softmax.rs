use crate::{KernelElem, Result, check_len};
use num_traits::Float;
use rayon::prelude::*;

/// Numerically stable softmax over each row of a `[rows, cols]` matrix.
///
/// For every row the maximum is subtracted before exponentiating, so the largest
/// exponent is `exp(0) = 1` and nothing overflows no matter how large the scores are.
/// Each row of the result is non-negative and sums to one.
///
/// Column-wise softmax is left to the caller (transpose, apply, transpose back).
pub fn cpu_softmax_rows<T>(data: &[T], shape: &[usize; 2]) -> Result<Vec<T>>
where
    T: KernelElem + Float,
{
    let [rows, cols] = *shape;
    check_len(data, rows, cols)?;

    let mut out_data = data.to_vec();
    if cols == 0 {
        return Ok(out_data);
    }

    out_data.par_chunks_mut(cols).for_each(softmax_in_place);

    Ok(out_data)
}

fn softmax_in_place<T: KernelElem + Float>(row: &mut [T]) {
    let max_val = row.iter().copied().fold(T::neg_infinity(), T::max);

    let mut sum_exp = T::zero();
    for v in row.iter_mut() {
        *v = (*v - max_val).exp();
        sum_exp += *v;
    }

    let inv_sum = T::one() / sum_exp;
    for v in row.iter_mut() {
        *v *= inv_sum;
    }
}
