//! Standard scaled dot-product attention.
//!
//! Attention(Q, K, V) = softmax(mask(Q @ K^T / sqrt(d_k))) @ V
//!
//! Leading batch dims broadcast like a batched matmul. Masked scores are
//! replaced (not offset) by a finite fill value, so a fully masked row
//! yields uniform weights rather than NaN.

use lingo_core::{LingoError, Result, Tensor};

use crate::config::AttentionConfig;
use crate::mask::Mask;

/// Result of an attention call.
#[derive(Clone, Debug, PartialEq)]
pub struct Attention {
    /// `[..., seq_q, d_v]`
    pub output: Tensor,
    /// `[..., seq_q, seq_k]`, each row sums to 1.
    pub weights: Tensor,
}

impl Attention {
    /// Split into `(output, weights)`.
    pub fn into_parts(self) -> (Tensor, Tensor) {
        (self.output, self.weights)
    }
}

/// Scaled dot-product attention with a fixed configuration.
///
/// Holds no state between calls; `forward` is a pure function of its inputs.
#[derive(Clone, Debug, Default)]
pub struct ScaledDotProductAttention {
    config: AttentionConfig,
}

impl ScaledDotProductAttention {
    pub fn new(config: AttentionConfig) -> Self {
        Self { config }
    }

    /// Attend `query` over `key`/`value`.
    ///
    /// # Arguments
    /// * `query` - `[..., seq_q, d_k]`
    /// * `key`   - `[..., seq_k, d_k]`
    /// * `value` - `[..., seq_k, d_v]`
    /// * `mask`  - Optional keep-mask broadcastable to `[..., seq_q, seq_k]`
    ///
    /// # Errors
    /// `ShapeMismatch` when d_k or seq_k disagree, an input is below rank 2,
    /// batch dims do not broadcast, or the mask does not fit the scores.
    /// `EmptyDimension` when d_k or seq_k is zero.
    pub fn forward(
        &self,
        query: &Tensor,
        key: &Tensor,
        value: &Tensor,
        mask: Option<&Mask>,
    ) -> Result<Attention> {
        let d_k = check_inputs(query, key, value)?;

        tracing::debug!(
            query = %query.shape(),
            key = %key.shape(),
            value = %value.shape(),
            masked = mask.is_some(),
            "scaled dot-product attention"
        );

        let scores = query.matmul(&key.transpose()?)?;
        let scores = match self.config.scale {
            Some(scale) => scores.mul_scalar(scale),
            None => scores.div_scalar((d_k as f32).sqrt()),
        };
        let scores = match mask {
            Some(m) => m.fill_masked(&scores, self.config.mask_fill)?,
            None => scores,
        };

        let weights = scores.softmax_last_axis()?;
        let output = weights.matmul(value)?;

        Ok(Attention { output, weights })
    }
}

/// Scaled dot-product attention with the default configuration.
///
/// Scores are divided by `sqrt(d_k)`; masked positions are filled with `-1e9`.
pub fn scaled_dot_product_attention(
    query: &Tensor,
    key: &Tensor,
    value: &Tensor,
    mask: Option<&Mask>,
) -> Result<Attention> {
    ScaledDotProductAttention::default().forward(query, key, value, mask)
}

/// Validate the per-matrix dims and return d_k. Batch dims are left to matmul.
fn check_inputs(query: &Tensor, key: &Tensor, value: &Tensor) -> Result<usize> {
    for t in [query, key, value] {
        if t.ndim() < 2 {
            return Err(LingoError::ShapeMismatch {
                expected: vec![0, 0],
                got: t.shape().dims().to_vec(),
            });
        }
    }

    let q_dims = query.shape().dims();
    let k_dims = key.shape().dims();
    let v_dims = value.shape().dims();

    let d_k = q_dims[q_dims.len() - 1];
    let seq_k = k_dims[k_dims.len() - 2];

    if k_dims[k_dims.len() - 1] != d_k {
        let mut expected = k_dims.to_vec();
        let n = expected.len();
        expected[n - 1] = d_k;
        return Err(LingoError::ShapeMismatch {
            expected,
            got: k_dims.to_vec(),
        });
    }
    if v_dims[v_dims.len() - 2] != seq_k {
        let mut expected = v_dims.to_vec();
        let n = expected.len();
        expected[n - 2] = seq_k;
        return Err(LingoError::ShapeMismatch {
            expected,
            got: v_dims.to_vec(),
        });
    }
    if d_k == 0 {
        return Err(LingoError::EmptyDimension {
            what: "d_k",
            shape: q_dims.to_vec(),
        });
    }
    if seq_k == 0 {
        return Err(LingoError::EmptyDimension {
            what: "seq_len_k",
            shape: k_dims.to_vec(),
        });
    }

    Ok(d_k)
}
