//! Element-wise scalar arithmetic.

use crate::tensor::Tensor;

impl Tensor {
    /// Scalar multiplication: self * scalar.
    pub fn mul_scalar(&self, scalar: f32) -> Tensor {
        self.map(|a| a * scalar)
    }

    /// Scalar division: self / scalar.
    pub fn div_scalar(&self, scalar: f32) -> Tensor {
        self.map(|a| a / scalar)
    }

    /// Apply `op` to every element.
    pub fn map(&self, op: impl Fn(f32) -> f32) -> Tensor {
        let data: Vec<f32> = self.as_f32_slice().iter().map(|&v| op(v)).collect();
        Tensor::from_f32(&data, self.shape().dims())
    }
}
