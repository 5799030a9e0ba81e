use serde::Deserialize;

/// Score written into masked-out positions before the softmax.
///
/// Finite so that a fully masked row still normalizes (to a uniform row)
/// instead of producing NaN.
pub const MASK_FILL: f32 = -1e9;

/// Configuration for [`ScaledDotProductAttention`](crate::ScaledDotProductAttention).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Multiplier applied to the raw scores. `None` divides by `sqrt(d_k)`.
    pub scale: Option<f32>,
    /// Value substituted for masked-out scores.
    pub mask_fill: f32,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            scale: None,
            mask_fill: MASK_FILL,
        }
    }
}

impl AttentionConfig {
    /// Use a fixed score multiplier instead of `1/sqrt(d_k)`.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }
}
