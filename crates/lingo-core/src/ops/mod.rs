//! Tensor operations: scalar arithmetic, matmul, last-axis reductions.
//!
//! All operations return new tensors (functional style).

pub mod arithmetic;
pub mod matmul;
pub mod reduction;
