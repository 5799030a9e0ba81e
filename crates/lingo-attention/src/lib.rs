//! # lingo-attention
//!
//! Scaled dot-product attention for lingo.
//!
//! Provides:
//! - `scaled_dot_product_attention`, returning both the output and the
//!   attention-weight tensor
//! - Boolean and numeric keep-masks, broadcast against the score tensor
//! - Causal, sliding window, and padding mask builders

pub mod config;
pub mod mask;
pub mod scaled_dot;

pub use config::{AttentionConfig, MASK_FILL};
pub use mask::Mask;
pub use scaled_dot::{scaled_dot_product_attention, Attention, ScaledDotProductAttention};
