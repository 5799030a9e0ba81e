use std::fmt;

use rand::Rng;

use crate::error::LingoError;
use crate::shape::Shape;
use crate::Result;

/// A dense, row-major f32 array.
///
/// Every op returns a fresh tensor; nothing is mutated behind the caller's back.
///
/// # Examples
///
/// ```
/// use lingo_core::Tensor;
///
/// let t = Tensor::from_f32(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
/// assert_eq!(t.shape().dims(), &[2, 2]);
/// assert_eq!(t.numel(), 4);
/// assert_eq!(t.get(&[1, 0]), Some(3.0));
/// ```
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Shape,
}

impl Tensor {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a tensor from f32 data with the given shape.
    ///
    /// # Panics
    /// Panics if `data.len()` does not match the shape. Use [`Tensor::new`]
    /// for a fallible variant.
    pub fn from_f32(data: &[f32], shape: &[usize]) -> Self {
        let s = Shape::new(shape);
        assert_eq!(
            s.numel(),
            data.len(),
            "Shape {:?} requires {} elements, got {}",
            shape,
            s.numel(),
            data.len()
        );
        Self {
            data: data.to_vec(),
            shape: s,
        }
    }

    /// Create a tensor from owned data, checking the element count.
    pub fn new(data: Vec<f32>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if shape.numel() != data.len() {
            return Err(LingoError::ElementCount {
                shape: shape.dims().to_vec(),
                numel: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Create a tensor filled with a constant.
    pub fn full(shape: &[usize], value: f32) -> Self {
        let s = Shape::new(shape);
        Self {
            data: vec![value; s.numel()],
            shape: s,
        }
    }

    /// Create a tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, 0.0)
    }

    /// Create a tensor of ones.
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, 1.0)
    }

    /// Create a tensor with values uniformly distributed in [low, high).
    ///
    /// # Panics
    /// Panics on a non-empty shape if `low >= high` or either bound is not finite.
    pub fn rand_uniform<R: Rng + ?Sized>(shape: &[usize], low: f32, high: f32, rng: &mut R) -> Self {
        let s = Shape::new(shape);
        let data: Vec<f32> = (0..s.numel()).map(|_| rng.gen_range(low..high)).collect();
        Self { data, shape: s }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Shape of the tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// Row-major element data.
    pub fn as_f32_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_f32_slice_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get a single element by multi-dimensional index.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.ndim() {
            return None;
        }
        let strides = self.shape.contiguous_strides();
        let mut flat = 0;
        for ((&i, &d), &s) in index.iter().zip(self.shape.dims()).zip(strides.iter()) {
            if i >= d {
                return None;
            }
            flat += i * s;
        }
        self.data.get(flat).copied()
    }

    /// Iterate over contiguous rows of the last axis.
    ///
    /// A scalar yields one single-element row.
    pub fn rows(&self) -> std::slice::Chunks<'_, f32> {
        self.data.chunks(self.shape.last().unwrap_or(1).max(1))
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(shape={}, dtype=f32)", self.shape)
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.numel() <= 20 {
            write!(f, "tensor({:?}, shape={})", self.data, self.shape)
        } else {
            write!(
                f,
                "tensor([{:.4}, {:.4}, ..., {:.4}], shape={})",
                self.data[0],
                self.data[1],
                self.data[self.numel() - 1],
                self.shape
            )
        }
    }
}
