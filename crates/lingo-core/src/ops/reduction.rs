//! Reductions and normalization along the last axis.

use crate::error::LingoError;
use crate::tensor::Tensor;
use crate::Result;

impl Tensor {
    /// Numerically stable softmax over the last axis.
    ///
    /// Each row has its maximum subtracted before exponentiation, then is
    /// divided by the row sum. Exponentials and the sum are kept in f64, so
    /// long rows still sum to 1 within f32 rounding. A row of identical values (including a row
    /// of identical sentinels) comes out exactly uniform.
    pub fn softmax_last_axis(&self) -> Result<Tensor> {
        let width = self.last_axis()?;
        let mut data = self.as_f32_slice().to_vec();

        for row in data.chunks_mut(width.max(1)) {
            let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let exps: Vec<f64> = row.iter().map(|&v| ((v - max_val) as f64).exp()).collect();
            let sum: f64 = exps.iter().sum();
            for (v, e) in row.iter_mut().zip(&exps) {
                *v = (e / sum) as f32;
            }
        }

        Tensor::new(data, self.shape().clone())
    }

    /// Sum over the last axis, dropping it.
    pub fn sum_last_axis(&self) -> Result<Tensor> {
        self.reduce_last_axis(0.0, |acc, v| acc + v)
    }

    /// Maximum over the last axis, dropping it.
    pub fn max_last_axis(&self) -> Result<Tensor> {
        self.reduce_last_axis(f32::NEG_INFINITY, f32::max)
    }

    fn reduce_last_axis(&self, init: f32, op: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
        let width = self.last_axis()?;
        let dims = self.shape().dims();
        let out_dims = &dims[..dims.len() - 1];
        let out_numel: usize = out_dims.iter().product();

        let src = self.as_f32_slice();
        let result: Vec<f32> = (0..out_numel)
            .map(|r| src[r * width..(r + 1) * width].iter().fold(init, |acc, &v| op(acc, v)))
            .collect();

        Tensor::new(result, out_dims.to_vec())
    }

    fn last_axis(&self) -> Result<usize> {
        self.shape().last().ok_or(LingoError::InvalidAxis { axis: 0, ndim: 0 })
    }
}
