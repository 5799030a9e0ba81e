//! Error type shared by every lingo crate.

use thiserror::Error;

/// Errors raised by tensor and attention operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LingoError {
    /// Two shapes that must agree (or broadcast) do not.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// A dimension that must be non-empty has size zero.
    #[error("{what} must be non-zero (shape {shape:?})")]
    EmptyDimension { what: &'static str, shape: Vec<usize> },

    /// Tensor data length does not fill the requested shape.
    #[error("shape {shape:?} requires {} elements, got {numel}", .shape.iter().product::<usize>())]
    ElementCount { shape: Vec<usize>, numel: usize },

    #[error("axis {axis} out of range for tensor of rank {ndim}")]
    InvalidAxis { axis: usize, ndim: usize },
}

impl LingoError {
    /// Whether this error describes incompatible or invalid tensor shapes.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            LingoError::ShapeMismatch { .. }
                | LingoError::EmptyDimension { .. }
                | LingoError::ElementCount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LingoError::ShapeMismatch { expected: vec![2, 3], got: vec![2, 4] };
        assert_eq!(err.to_string(), "shape mismatch: expected [2, 3], got [2, 4]");

        let err = LingoError::ElementCount { shape: vec![2, 2], numel: 3 };
        assert_eq!(err.to_string(), "shape [2, 2] requires 4 elements, got 3");
    }

    #[test]
    fn test_shape_error_grouping() {
        assert!(LingoError::EmptyDimension { what: "d_k", shape: vec![1, 0] }.is_shape_error());
        assert!(!LingoError::InvalidAxis { axis: 3, ndim: 2 }.is_shape_error());
    }
}
