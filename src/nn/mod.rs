//! Neural network building blocks for attention.
//!
//! - [`activation`]: numerically stable softmax.
//! - [`attention`]: scaled dot-product attention.
//! - [`embedding`]: token index to vector lookup.

pub mod activation;
pub mod attention;
pub mod embedding;

pub use activation::{Axis, softmax};
pub use attention::{AttentionConfig, AttentionOutput, Scaling, ScaledDotProductAttention};
pub use embedding::Embedding;
