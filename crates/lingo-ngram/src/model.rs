//! Trigram language model: additive training and sampled generation.

use crate::config::GenerationConfig;
use crate::preprocess::TextPreprocessor;
use crate::sampler::{RandomSampler, TokenSampler};
use crate::table::{Context, FrequencyTable, END_TOKEN, START_TOKEN};

/// Predicts each token from the two before it.
///
/// Owns its frequency table exclusively. `fit` needs `&mut self`; generation
/// only reads, so a trained model can be shared freely.
#[derive(Clone, Debug, Default)]
pub struct TrigramModel {
    table: FrequencyTable,
    preprocessor: TextPreprocessor,
}

impl TrigramModel {
    /// Untrained model with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model over an existing (for example deserialized) table.
    pub fn from_table(table: FrequencyTable) -> Self {
        Self {
            table,
            preprocessor: TextPreprocessor::new(),
        }
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Count every trigram of `text` into the table.
    ///
    /// Each sentence is padded as `<START> <START> tokens... <END>`, giving
    /// `n + 1` trigrams for an `n`-token sentence. Counts accumulate across
    /// calls. Text with no tokens leaves the table untouched.
    pub fn fit(&mut self, text: &str) {
        let sentences = self.preprocessor.sentences(text);
        let mut trigrams = 0usize;

        for tokens in &sentences {
            let padded: Vec<&str> = [START_TOKEN, START_TOKEN]
                .into_iter()
                .chain(tokens.iter().map(String::as_str))
                .chain([END_TOKEN])
                .collect();

            for window in padded.windows(3) {
                self.table.observe(Context::new(window[0], window[1]), window[2]);
                trigrams += 1;
            }
        }

        tracing::debug!(
            sentences = sentences.len(),
            trigrams,
            contexts = self.table.len(),
            "fit trigram model"
        );
    }

    /// Generate up to `max_length` tokens with an entropy-seeded random source.
    ///
    /// Repeated calls are expected to differ; use [`generate_with`](Self::generate_with)
    /// or a seeded [`GenerationConfig`] for reproducible output.
    pub fn generate(&self, max_length: usize) -> String {
        self.generate_with(max_length, &mut RandomSampler::from_entropy())
    }

    /// Generate using `config.max_length` and, if set, `config.seed`.
    pub fn generate_with_config(&self, config: &GenerationConfig) -> String {
        match config.seed {
            Some(seed) => self.generate_with(config.max_length, &mut RandomSampler::seeded(seed)),
            None => self.generate(config.max_length),
        }
    }

    /// Generate up to `max_length` tokens, drawing each from `sampler`.
    ///
    /// Starts at `(<START>, <START>)` and stops when `<END>` is sampled (it is
    /// never emitted), when the current context has no recorded
    /// continuations, or after `max_length` tokens. Returns the tokens joined
    /// by single spaces.
    pub fn generate_with<S: TokenSampler + ?Sized>(&self, max_length: usize, sampler: &mut S) -> String {
        let mut context = Context::start();
        let mut words: Vec<&str> = Vec::new();

        while words.len() < max_length {
            let Some(next) = self.table.get(&context).filter(|c| !c.is_empty()) else {
                tracing::debug!(%context, emitted = words.len(), "no continuation, stopping");
                break;
            };

            let (tokens, weights): (Vec<&str>, Vec<f64>) = next.distribution().into_iter().unzip();
            let Some(&token) = tokens.get(sampler.choose(&weights)) else {
                tracing::debug!(%context, "sampler returned an out-of-range index, stopping");
                break;
            };

            if token == END_TOKEN {
                tracing::debug!(emitted = words.len(), "end of sentence");
                break;
            }

            tracing::trace!(%context, token, "sampled");
            words.push(token);
            context = context.advance(token);
        }

        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::GreedySampler;

    #[test]
    fn test_fit_counts_padded_trigrams() {
        let mut model = TrigramModel::new();
        model.fit("the cat sat.");

        let table = model.table();
        assert_eq!(table.total_observations(), 4);
        assert_eq!(table.count(&Context::start(), "the"), 1);
        assert_eq!(table.count(&Context::new(START_TOKEN, "the"), "cat"), 1);
        assert_eq!(table.count(&Context::new("the", "cat"), "sat"), 1);
        assert_eq!(table.count(&Context::new("cat", "sat"), END_TOKEN), 1);
    }

    #[test]
    fn test_fit_empty_is_noop() {
        let mut model = TrigramModel::new();
        model.fit("");
        model.fit(" ... !!! ");
        assert!(model.table().is_empty());

        model.fit("a b.");
        let before = model.table().clone();
        model.fit("...");
        assert_eq!(model.table(), &before);
    }

    #[test]
    fn test_round_trip_single_sentence() {
        let mut model = TrigramModel::new();
        model.fit("the cat sat.");
        assert_eq!(model.generate_with(50, &mut GreedySampler), "the cat sat");
    }

    #[test]
    fn test_max_length_truncates() {
        let mut model = TrigramModel::new();
        model.fit("the cat sat on the mat.");
        assert_eq!(model.generate_with(2, &mut GreedySampler), "the cat");
        assert_eq!(model.generate_with(0, &mut GreedySampler), "");
        assert_eq!(model.generate(0), "");
    }

    #[test]
    fn test_untrained_generates_nothing() {
        let model = TrigramModel::new();
        assert_eq!(model.generate(10), "");
    }

    #[test]
    fn test_unseen_context_stops() {
        // Only the start context is known; its continuation leads nowhere
        let mut table = FrequencyTable::new();
        table.observe(Context::start(), "hello");
        let model = TrigramModel::from_table(table);
        assert_eq!(model.generate_with(10, &mut GreedySampler), "hello");
    }

    #[test]
    fn test_seeded_config_reproducible() {
        let mut model = TrigramModel::new();
        model.fit("the cat sat. the dog sat. the cat ran. a dog ran home.");
        let config = GenerationConfig::seeded(17).with_max_length(20);
        let first = model.generate_with_config(&config);
        assert_eq!(first, model.generate_with_config(&config));
        assert!(!first.is_empty());
    }

    #[test]
    fn test_bad_sampler_index_stops() {
        struct OutOfRange;
        impl TokenSampler for OutOfRange {
            fn choose(&mut self, weights: &[f64]) -> usize {
                weights.len()
            }
        }

        let mut model = TrigramModel::new();
        model.fit("the cat sat.");
        assert_eq!(model.generate_with(10, &mut OutOfRange), "");
    }
}
