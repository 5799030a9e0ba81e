use serde::Deserialize;

/// Configuration for [`TrigramModel::generate_with_config`](crate::TrigramModel::generate_with_config).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Maximum number of tokens to emit.
    pub max_length: usize,
    /// Seed for the random source. `None` draws from OS entropy, so repeated
    /// calls produce different text.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 50,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Reproducible generation with the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}
