use smallvec::SmallVec;
use std::fmt;

/// Tensor shape with stack-allocated storage for ≤4 dimensions.
///
/// Attention inputs are almost always 2D-4D (`[seq, d]`, `[batch, seq, d]`,
/// `[batch, heads, seq, d]`), so the common case never touches the heap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create a new shape from dimensions.
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        if self.dims.is_empty() {
            1 // scalar
        } else {
            self.dims.iter().product()
        }
    }

    /// Get dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Size of the last dimension, if any.
    pub fn last(&self) -> Option<usize> {
        self.dims.last().copied()
    }

    /// Compute default strides for a contiguous row-major layout.
    pub fn contiguous_strides(&self) -> SmallVec<[usize; 4]> {
        let ndim = self.dims.len();
        if ndim == 0 {
            return SmallVec::new();
        }
        let mut strides = SmallVec::from_elem(0usize, ndim);
        strides[ndim - 1] = 1;
        for i in (0..ndim - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Attempt to broadcast this shape with another.
    /// Returns the broadcasted shape or None if incompatible.
    pub fn broadcast_with(&self, other: &Shape) -> Option<Shape> {
        let max_ndim = self.ndim().max(other.ndim());
        let mut result = SmallVec::with_capacity(max_ndim);

        for i in 0..max_ndim {
            let a = if i < self.ndim() {
                self.dims[self.ndim() - 1 - i]
            } else {
                1
            };
            let b = if i < other.ndim() {
                other.dims[other.ndim() - 1 - i]
            } else {
                1
            };

            if a == b {
                result.push(a);
            } else if a == 1 {
                result.push(b);
            } else if b == 1 {
                result.push(a);
            } else {
                return None;
            }
        }

        result.reverse();
        Some(Shape { dims: result })
    }

    /// Whether this shape broadcasts to exactly `target` (without growing it).
    pub fn broadcasts_to(&self, target: &Shape) -> bool {
        self.ndim() <= target.ndim()
            && self.broadcast_with(target).as_ref() == Some(target)
    }

    /// Map a flat index in `out` (a broadcast of `self`) to the flat index in `self`.
    ///
    /// Size-1 axes of `self` pin their coordinate to 0; missing leading axes are ignored.
    pub fn broadcast_source_index(&self, flat_idx: usize, out: &Shape) -> usize {
        let out_dims = out.dims();
        let out_ndim = out_dims.len();
        let src_ndim = self.ndim();
        let out_strides = out.contiguous_strides();
        let src_strides = self.contiguous_strides();

        let mut remaining = flat_idx;
        let mut src_idx = 0;
        for i in 0..out_ndim {
            let coord = remaining / out_strides[i];
            remaining %= out_strides[i];

            if let Some(si) = (i + src_ndim).checked_sub(out_ndim) {
                if self.dims[si] > 1 {
                    src_idx += coord * src_strides[si];
                }
            }
        }
        src_idx
    }

    /// Split into `(batch dims, rows, cols)` for matrix ops over the last two axes.
    pub fn split_matrix(&self) -> Option<(Shape, usize, usize)> {
        let n = self.ndim();
        if n < 2 {
            return None;
        }
        Some((Shape::new(&self.dims[..n - 2]), self.dims[n - 2], self.dims[n - 1]))
    }

    /// Append trailing matrix dims to a batch shape.
    pub fn with_matrix(&self, rows: usize, cols: usize) -> Shape {
        let mut dims = self.dims.clone();
        dims.push(rows);
        dims.push(cols);
        Shape { dims }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape {
            dims: SmallVec::from_vec(dims),
        }
    }
}
