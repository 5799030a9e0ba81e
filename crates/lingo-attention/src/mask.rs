//! Attention masks: boolean and numeric keep-masks, plus causal, sliding
//! window, and padding builders.
//!
//! A mask must broadcast to the score shape `(..., seq_q, seq_k)` without
//! enlarging it. Kept positions pass their score through; masked positions
//! are overwritten with the configured fill value.

use lingo_core::{LingoError, Result, Shape, Tensor};

/// Keep-mask in one of the two accepted encodings.
#[derive(Clone, Debug, PartialEq)]
pub enum Mask {
    /// `true` keeps a position, `false` masks it out.
    Bool { keep: Vec<bool>, shape: Shape },
    /// Exactly `1.0` keeps a position; every other value (NaN included) masks it.
    Numeric(Tensor),
}

impl Mask {
    /// Boolean mask from row-major flags.
    pub fn from_bool(keep: &[bool], shape: &[usize]) -> Result<Self> {
        let shape = Shape::new(shape);
        if shape.numel() != keep.len() {
            return Err(LingoError::ElementCount {
                shape: shape.dims().to_vec(),
                numel: keep.len(),
            });
        }
        Ok(Mask::Bool {
            keep: keep.to_vec(),
            shape,
        })
    }

    /// Numeric mask: 1 = keep, anything else = mask.
    pub fn numeric(values: Tensor) -> Self {
        Mask::Numeric(values)
    }

    pub fn shape(&self) -> &Shape {
        match self {
            Mask::Bool { shape, .. } => shape,
            Mask::Numeric(t) => t.shape(),
        }
    }

    /// Normalize either encoding to boolean keep flags.
    pub fn keep_flags(&self) -> Vec<bool> {
        match self {
            Mask::Bool { keep, .. } => keep.clone(),
            Mask::Numeric(t) => t.as_f32_slice().iter().map(|&v| v == 1.0).collect(),
        }
    }

    /// Overwrite every masked-out score with `fill`.
    ///
    /// Fails with `ShapeMismatch` when the mask does not broadcast to `scores`.
    pub fn fill_masked(&self, scores: &Tensor, fill: f32) -> Result<Tensor> {
        let mask_shape = self.shape();
        let out_shape = scores.shape();
        if !mask_shape.broadcasts_to(out_shape) {
            return Err(LingoError::ShapeMismatch {
                expected: out_shape.dims().to_vec(),
                got: mask_shape.dims().to_vec(),
            });
        }

        let keep = self.keep_flags();
        let mut filled = scores.clone();
        for (i, v) in filled.as_f32_slice_mut().iter_mut().enumerate() {
            if !keep[mask_shape.broadcast_source_index(i, out_shape)] {
                *v = fill;
            }
        }
        Ok(filled)
    }
}

impl From<Tensor> for Mask {
    fn from(values: Tensor) -> Self {
        Mask::Numeric(values)
    }
}

/// Causal (lower-triangular) mask for autoregressive attention.
///
/// `[seq_len, seq_len]`; query `i` keeps keys `0..=i`.
pub fn causal_mask(seq_len: usize) -> Mask {
    sliding_window_mask(seq_len, seq_len)
}

/// Sliding window causal mask.
///
/// Each position keeps at most `window_size` positions ending at itself.
pub fn sliding_window_mask(seq_len: usize, window_size: usize) -> Mask {
    let mut keep = vec![false; seq_len * seq_len];
    for i in 0..seq_len {
        let start = (i + 1).saturating_sub(window_size);
        for j in start..=i {
            keep[i * seq_len + j] = true;
        }
    }
    Mask::Bool {
        keep,
        shape: Shape::new(&[seq_len, seq_len]),
    }
}

/// Padding mask from sequence lengths.
///
/// Returns `[batch, 1, max_len]` so it broadcasts over every query position;
/// keys at or beyond a sequence's length are masked.
pub fn padding_mask(lengths: &[usize], max_len: usize) -> Mask {
    let batch = lengths.len();
    let mut keep = vec![false; batch * max_len];
    for (b, &len) in lengths.iter().enumerate() {
        for j in 0..len.min(max_len) {
            keep[b * max_len + j] = true;
        }
    }
    Mask::Bool {
        keep,
        shape: Shape::new(&[batch, 1, max_len]),
    }
}
