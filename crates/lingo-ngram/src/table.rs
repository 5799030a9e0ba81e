//! Conditional frequency table: two-token context → following token → count.
//!
//! Each context tracks its own total, which always equals the sum of its
//! continuation counts. Counts only ever grow; training twice on the same
//! text doubles every count and leaves every ratio unchanged.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel padding the start of every sentence (twice, for a trigram context).
pub const START_TOKEN: &str = "<START>";
/// Sentinel closing every sentence; sampling it ends generation.
pub const END_TOKEN: &str = "<END>";

/// The two most recent tokens, used as the lookup key for the next one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context {
    pub prev: String,
    pub last: String,
}

impl Context {
    pub fn new(prev: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            prev: prev.into(),
            last: last.into(),
        }
    }

    /// Context at the beginning of a sentence: `(<START>, <START>)`.
    pub fn start() -> Self {
        Self::new(START_TOKEN, START_TOKEN)
    }

    /// Shift in `next`: `(a, b)` becomes `(b, next)`.
    pub fn advance(&self, next: &str) -> Self {
        Self::new(self.last.clone(), next)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prev, self.last)
    }
}

/// Observed continuations of one context.
///
/// Tokens are kept sorted so iteration (and therefore seeded sampling) is
/// reproducible across processes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Continuations {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl Continuations {
    fn record(&mut self, token: &str, n: u64) {
        match self.counts.get_mut(token) {
            Some(c) => *c += n,
            None => {
                self.counts.insert(token.to_owned(), n);
            }
        }
        self.total += n;
    }

    /// Occurrences of `token` after this context.
    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Sum of all continuation counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct following tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, &c)| (t.as_str(), c))
    }

    /// `count / total`, or 0 for an unseen token.
    pub fn probability(&self, token: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(token) as f64 / self.total as f64
    }

    /// Every following token with its probability `count / total`.
    pub fn distribution(&self) -> Vec<(&str, f64)> {
        let total = self.total as f64;
        self.iter().map(|(t, c)| (t, c as f64 / total)).collect()
    }
}

/// Sparse trigram counts keyed by [`Context`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TableRepr", try_from = "TableRepr")]
pub struct FrequencyTable {
    entries: HashMap<Context, Continuations>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `token` following `context`.
    pub fn observe(&mut self, context: Context, token: &str) {
        self.entries.entry(context).or_default().record(token, 1);
    }

    pub fn get(&self, context: &Context) -> Option<&Continuations> {
        self.entries.get(context)
    }

    pub fn count(&self, context: &Context, token: &str) -> u64 {
        self.get(context).map_or(0, |c| c.count(token))
    }

    pub fn total(&self, context: &Context) -> u64 {
        self.get(context).map_or(0, Continuations::total)
    }

    /// P(token | context), or 0 when either is unseen.
    pub fn probability(&self, context: &Context, token: &str) -> f64 {
        self.get(context).map_or(0.0, |c| c.probability(token))
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Context, &Continuations)> {
        self.entries.iter()
    }

    /// Number of trigrams counted across all contexts.
    pub fn total_observations(&self) -> u64 {
        self.entries.values().map(Continuations::total).sum()
    }

    /// Distinct tokens that can be generated (the end sentinel excluded).
    pub fn vocabulary_size(&self) -> usize {
        let mut vocab: Vec<&str> = self
            .entries
            .values()
            .flat_map(|c| c.counts.keys().map(String::as_str))
            .filter(|&t| t != END_TOKEN)
            .collect();
        vocab.sort_unstable();
        vocab.dedup();
        vocab.len()
    }
}

/// Serialized form: `"prev last"` → token → count. Totals are re-derived.
type TableRepr = BTreeMap<String, BTreeMap<String, u64>>;

/// A serialized table that violates the table's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("context key {0:?} is not two space-separated tokens")]
    MalformedContext(String),
    #[error("continuation {token:?} of context {context:?} has a zero count")]
    ZeroCount { context: String, token: String },
}

impl From<FrequencyTable> for TableRepr {
    fn from(table: FrequencyTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(ctx, cont)| (ctx.to_string(), cont.counts))
            .collect()
    }
}

impl TryFrom<TableRepr> for FrequencyTable {
    type Error = TableError;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        let mut entries = HashMap::with_capacity(repr.len());
        for (key, counts) in repr {
            let context = match key.split_once(' ') {
                Some((prev, last)) if !prev.is_empty() && !last.is_empty() && !last.contains(' ') => {
                    Context::new(prev, last)
                }
                _ => return Err(TableError::MalformedContext(key)),
            };
            if counts.is_empty() {
                continue;
            }
            if let Some((token, _)) = counts.iter().find(|(_, &c)| c == 0) {
                return Err(TableError::ZeroCount {
                    context: key.clone(),
                    token: token.clone(),
                });
            }
            let total = counts.values().sum();
            entries.insert(context, Continuations { counts, total });
        }
        Ok(Self { entries })
    }
}
