//! Scaled dot-product attention.
//!
//! # The Formula
//!
//! $$ \text{Attention}(Q, K, V) = \text{softmax}\left(\frac{Q K^T}{\sqrt{d}}\right) V $$
//!
//! - **Queries** $Q$ `[n_q, d]`: what each position is looking for.
//! - **Keys** $K$ `[n_k, d]`: what each position offers to be matched against.
//! - **Values** $V$ `[n_k, d_v]`: what each position contributes once matched.
//!
//! The computation has three steps:
//! 1. **Similarity**: $S = Q K^T$, one dot product per (query, key) pair.
//! 2. **Weighting**: scale by $1/\sqrt{d}$ and apply a row-wise softmax, giving weights
//!    $W$ `[n_q, n_k]` whose rows are probability distributions.
//! 3. **Aggregation**: $W V$ `[n_q, d_v]`, a convex combination of value rows per query.
//!
//! # Why $\sqrt{d}$?
//!
//! For random vectors with unit-variance components, the dot product has variance $d$.
//! Dividing by $\sqrt{d}$ keeps the scores at unit scale, so the softmax does not collapse
//! to one-hot as the embedding dimension grows.
//!
//! There is no masking here: every query sees every key.

use crate::nn::activation::{Axis, softmax};
use crate::tensor::{Result, Tensor, TensorElem, TensorError};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How raw similarity scores are scaled before the softmax.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scaling {
    /// Divide by `sqrt(d)`, where `d` is the shared query/key dimension.
    #[default]
    InverseSqrtDim,
    /// Use raw dot products.
    None,
    /// Multiply by a fixed factor.
    Factor(f64),
}

impl Scaling {
    /// Returns the multiplier applied to scores for query/key dimension `dim`.
    ///
    /// `None` means scores are used unchanged, which only happens for [`Scaling::None`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidShape` for `d = 0` under `InverseSqrtDim`, and for a
    /// factor that is not finite either as given or once converted to `T`.
    fn factor<T: TensorElem + Float>(&self, dim: usize) -> Result<Option<T>> {
        match *self {
            Scaling::None => Ok(None),
            Scaling::InverseSqrtDim => {
                if dim == 0 {
                    return Err(TensorError::InvalidShape(
                        "cannot scale by 1/sqrt(d) with d = 0".into(),
                    ));
                }
                let d = T::from_usize(dim).ok_or_else(|| {
                    TensorError::InvalidShape(format!("dimension {} is not representable", dim))
                })?;
                Ok(Some(T::one() / d.sqrt()))
            }
            Scaling::Factor(f) => {
                let scale = T::from_f64(f).filter(|s| f.is_finite() && s.is_finite());
                scale.map(Some).ok_or_else(|| {
                    TensorError::InvalidShape(format!("scaling factor {} is not finite", f))
                })
            }
        }
    }
}

/// Configuration for [`ScaledDotProductAttention`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttentionConfig {
    #[serde(default)]
    pub scaling: Scaling,
}

/// The result of one attention call.
#[derive(Debug, Clone)]
pub struct AttentionOutput<T: TensorElem> {
    /// Row-stochastic weights, `[n_q, n_k]`.
    pub weights: Tensor<T, 2>,
    /// Aggregated values, `[n_q, d_v]`.
    pub output: Tensor<T, 2>,
}

/// Scaled dot-product attention over one set of queries, keys and values.
///
/// The struct only carries configuration; each call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledDotProductAttention {
    pub config: AttentionConfig,
}

impl ScaledDotProductAttention {
    pub fn new(config: AttentionConfig) -> Self {
        Self { config }
    }

    /// Computes the attention weights `softmax(scale * Q K^T)` of shape `[n_q, n_k]`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `queries` and `keys` differ in their
    /// second dimension, and `TensorError::InvalidShape` if there are no keys or the
    /// scaling factor is unusable.
    pub fn weights<T>(&self, queries: &Tensor<T, 2>, keys: &Tensor<T, 2>) -> Result<Tensor<T, 2>>
    where
        T: TensorElem + Float,
    {
        let [n_q, d] = *queries.shape();
        let [n_k, d_k] = *keys.shape();

        if d != d_k {
            return Err(TensorError::ShapeMismatch {
                expected: vec![n_k, d],
                got: vec![n_k, d_k],
            });
        }
        if n_k == 0 {
            return Err(TensorError::InvalidShape(
                "attention needs at least one key".into(),
            ));
        }

        // Step 1: similarity, [n_q, n_k]
        let scores = queries.matmul_transposed(keys)?;

        // Step 2: scaling
        let scores = match self.config.scaling.factor::<T>(d)? {
            Some(scale) => scores.map(|s| s * scale),
            None => scores,
        };
        trace!(n_q, n_k, d, scaling = ?self.config.scaling, "scaled similarity scores");

        // Step 3: normalize each query's scores into a distribution over keys
        softmax(&scores, Axis::Rows)
    }

    /// Runs the full attention computation and returns both the weights and the output.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `keys.rows != values.rows` or
    /// `queries.cols != keys.cols`.
    pub fn forward<T>(
        &self,
        queries: &Tensor<T, 2>,
        keys: &Tensor<T, 2>,
        values: &Tensor<T, 2>,
    ) -> Result<AttentionOutput<T>>
    where
        T: TensorElem + Float,
    {
        debug!(
            queries = ?queries.shape(),
            keys = ?keys.shape(),
            values = ?values.shape(),
            "attention forward"
        );

        let [n_k, _] = *keys.shape();
        let [n_v, d_v] = *values.shape();
        if n_k != n_v {
            return Err(TensorError::ShapeMismatch {
                expected: vec![n_k, d_v],
                got: vec![n_v, d_v],
            });
        }

        let weights = self.weights(queries, keys)?;

        // Step 4: aggregate, [n_q, n_k] x [n_k, d_v] -> [n_q, d_v]
        let output = weights.matmul(values)?;

        Ok(AttentionOutput { weights, output })
    }
}

/// Computes attention weights with the default `1/sqrt(d)` scaling.
///
/// Shorthand for `ScaledDotProductAttention::default().weights(queries, keys)`.
pub fn attention_weights<T>(queries: &Tensor<T, 2>, keys: &Tensor<T, 2>) -> Result<Tensor<T, 2>>
where
    T: TensorElem + Float,
{
    ScaledDotProductAttention::default().weights(queries, keys)
}

/// Computes `softmax(Q K^T / sqrt(d)) V`.
///
/// # Examples
///
/// ```rust
/// use qkv_attention::attention;
/// use qkv_attention::tensor::Tensor;
///
/// let q = Tensor::<f64, 2>::from_rows(&[[1.0, 0.0, 0.0]]).unwrap();
/// let k = Tensor::<f64, 2>::from_rows(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
/// let v = Tensor::<f64, 2>::from_rows(&[[1.0], [2.0]]).unwrap();
///
/// let out = attention(&q, &k, &v).unwrap();
/// assert_eq!(out.shape(), &[1, 1]);
/// ```
pub fn attention<T>(
    queries: &Tensor<T, 2>,
    keys: &Tensor<T, 2>,
    values: &Tensor<T, 2>,
) -> Result<Tensor<T, 2>>
where
    T: TensorElem + Float,
{
    ScaledDotProductAttention::default()
        .forward(queries, keys, values)
        .map(|out| out.output)
}
