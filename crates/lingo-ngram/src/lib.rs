//! # lingo-ngram
//!
//! Trigram statistical language model for lingo.
//!
//! Provides:
//! - Text preprocessing into period-delimited, whitespace-tokenized sentences
//! - A conditional frequency table keyed by two-token contexts
//! - Pluggable token samplers (seeded, entropy-seeded, greedy)
//! - `TrigramModel` with additive `fit` and bounded `generate`

pub mod config;
pub mod model;
pub mod preprocess;
pub mod sampler;
pub mod table;

pub use config::GenerationConfig;
pub use model::TrigramModel;
pub use preprocess::TextPreprocessor;
pub use sampler::{GreedySampler, RandomSampler, TokenSampler};
pub use table::{Context, Continuations, FrequencyTable, END_TOKEN, START_TOKEN};
