//! # lingo-core
//!
//! Core tensor types for the lingo toolkit.
//!
//! Provides:
//! - `Shape` with trailing-aligned broadcasting
//! - A row-major f32 `Tensor`
//! - Batched matmul over the last two axes, stable last-axis softmax
//! - `LingoError` and the crate-wide `Result` alias

pub mod error;
pub mod ops;
pub mod shape;
pub mod tensor;

pub use error::LingoError;
pub use shape::Shape;
pub use tensor::Tensor;

pub type Result<T> = std::result::Result<T, LingoError>;
