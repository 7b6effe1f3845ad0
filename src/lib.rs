//! # qkv-attention
//!
//! `qkv-attention` is a pure Rust implementation of scaled dot-product (QKV) attention,
//! the core mechanism of Transformer models, designed for learning how it works.
//!
//! The running example is cross-lingual word alignment: embed a French sentence and an
//! English sentence with aligned word vectors, let every French word attend over the
//! English words, and look at the resulting weights matrix.
//!
//! ## Modules
//!
//! - [`mod@tensor`]: Dense row-major tensors backed by the `qkv-attention-kernels` crate.
//! - [`nn`]: Softmax, attention and the embedding lookup.
//! - [`text`]: Vocabulary, tokenizer and the word-vector file loader.
//! - [`viz`]: Rendering a weights matrix as a text heat-map or a grayscale image.
//!
//! ## Example
//!
//! ```rust
//! use qkv_attention::nn::attention::attention;
//! use qkv_attention::tensor::Tensor;
//!
//! let q = Tensor::<f64, 2>::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
//! let v = Tensor::<f64, 2>::from_rows(&[[10.0, 0.0], [0.0, 10.0]]).unwrap();
//!
//! let out = attention(&q, &q, &v).unwrap();
//! assert_eq!(out.shape(), &[2, 2]);
//! assert!(out.row(0)[0] > out.row(0)[1]);
//! ```

pub mod nn;
pub mod tensor;
pub mod text;
pub mod viz;

pub use nn::activation::{Axis, softmax};
pub use nn::attention::{AttentionConfig, Scaling, attention, attention_weights};
pub use tensor::{Tensor, TensorElem, TensorError};
