//! Matrix products over the trailing two axes.

use crate::error::LingoError;
use crate::shape::Shape;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Matrix multiplication over the last two axes: self @ other.
    ///
    /// `[..., M, K] @ [..., K, N] → [..., M, N]`. Leading batch dims follow
    /// the usual broadcasting rules, so `[B, M, K] @ [K, N]` and
    /// `[B, 1, M, K] @ [H, K, N]` are both valid. Both operands must be at
    /// least 2-D.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor> {
        let (a_batch, m, k1) = matrix_parts(self)?;
        let (b_batch, k2, n) = matrix_parts(other)?;

        if k1 != k2 {
            return Err(LingoError::ShapeMismatch {
                expected: a_batch.with_matrix(k1, n).dims().to_vec(),
                got: other.shape().dims().to_vec(),
            });
        }

        let batch = a_batch.broadcast_with(&b_batch).ok_or_else(|| LingoError::ShapeMismatch {
            expected: a_batch.dims().to_vec(),
            got: b_batch.dims().to_vec(),
        })?;

        let a_data = self.as_f32_slice();
        let b_data = other.as_f32_slice();
        let mut c_data = vec![0.0f32; batch.numel() * m * n];

        for bi in 0..batch.numel() {
            let a_off = a_batch.broadcast_source_index(bi, &batch) * m * k1;
            let b_off = b_batch.broadcast_source_index(bi, &batch) * k1 * n;
            let c_off = bi * m * n;
            for i in 0..m {
                for j in 0..n {
                    let mut sum = 0.0f32;
                    for p in 0..k1 {
                        sum += a_data[a_off + i * k1 + p] * b_data[b_off + p * n + j];
                    }
                    c_data[c_off + i * n + j] = sum;
                }
            }
        }

        Tensor::new(c_data, batch.with_matrix(m, n))
    }

    /// Swap the last two axes, materializing the result.
    pub fn transpose(&self) -> Result<Tensor> {
        let (batch, rows, cols) = self.shape().split_matrix().ok_or(LingoError::InvalidAxis {
            axis: 1,
            ndim: self.ndim(),
        })?;

        let src = self.as_f32_slice();
        let mut data = vec![0.0f32; src.len()];
        let plane = rows * cols;
        for b in 0..batch.numel() {
            let off = b * plane;
            for r in 0..rows {
                for c in 0..cols {
                    data[off + c * rows + r] = src[off + r * cols + c];
                }
            }
        }

        Tensor::new(data, batch.with_matrix(cols, rows))
    }
}

fn matrix_parts(t: &Tensor) -> Result<(Shape, usize, usize)> {
    t.shape().split_matrix().ok_or_else(|| LingoError::ShapeMismatch {
        expected: vec![0, 0],
        got: t.shape().dims().to_vec(),
    })
}
