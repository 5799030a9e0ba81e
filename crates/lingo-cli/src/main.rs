use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use lingo_attention::{Attention, Mask, ScaledDotProductAttention};
use lingo_core::Tensor;
use lingo_ngram::{RandomSampler, TrigramModel};

const DEFAULT_CORPUS: &str = "data/alice.txt";
const FALLBACK_CORPUS: &str = "data/example_corpus.txt";

#[derive(Parser)]
#[command(
    name = "lingo",
    about = "Attention and trigram language model demos",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run scaled dot-product attention on seeded random inputs
    Attention {
        /// Leading batch dimension (0 for unbatched matrices)
        #[arg(long, default_value = "2")]
        batch: usize,
        /// Number of query positions
        #[arg(long, default_value = "3")]
        seq_q: usize,
        /// Number of key/value positions
        #[arg(long, default_value = "4")]
        seq_k: usize,
        /// Query/key feature width
        #[arg(long, default_value = "8")]
        d_k: usize,
        /// Value feature width
        #[arg(long, default_value = "8")]
        d_v: usize,
        /// RNG seed for Q, K and V
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Also run with the last key masked out for every query
        #[arg(long)]
        mask_last: bool,
    },
    /// Fit a trigram model on a text corpus and generate from it
    Generate {
        /// Corpus file (defaults to data/alice.txt, then data/example_corpus.txt)
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Maximum number of generated tokens per sample
        #[arg(long, default_value = "100")]
        max_length: usize,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Number of samples to generate
        #[arg(long, default_value = "1")]
        samples: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Attention { batch, seq_q, seq_k, d_k, d_v, seed, mask_last } => {
            cmd_attention(batch, seq_q, seq_k, d_k, d_v, seed, mask_last)
        }
        Commands::Generate { corpus, max_length, seed, samples } => {
            cmd_generate(corpus.as_deref(), max_length, seed, samples)
        }
    }
}

fn cmd_attention(
    batch: usize,
    seq_q: usize,
    seq_k: usize,
    d_k: usize,
    d_v: usize,
    seed: u64,
    mask_last: bool,
) -> Result<()> {
    let dims = |rows: usize, cols: usize| -> Vec<usize> {
        if batch == 0 { vec![rows, cols] } else { vec![batch, rows, cols] }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let q = Tensor::rand_uniform(&dims(seq_q, d_k), 0.0, 1.0, &mut rng);
    let k = Tensor::rand_uniform(&dims(seq_k, d_k), 0.0, 1.0, &mut rng);
    let v = Tensor::rand_uniform(&dims(seq_k, d_v), 0.0, 1.0, &mut rng);

    println!("=== Scaled Dot-Product Attention ===");
    println!("Q: {}  K: {}  V: {}  seed: {}", q.shape(), k.shape(), v.shape(), seed);

    let attention = ScaledDotProductAttention::default();

    let unmasked = attention.forward(&q, &k, &v, None)?;
    print_attention("No mask", &unmasked, seq_q, seq_k);

    if mask_last {
        let mut keep = Tensor::ones(&[seq_q, seq_k]);
        for row in keep.as_f32_slice_mut().chunks_mut(seq_k.max(1)) {
            if let Some(last) = row.last_mut() {
                *last = 0.0;
            }
        }
        let masked = attention.forward(&q, &k, &v, Some(&Mask::numeric(keep)))?;
        print_attention("Last key masked", &masked, seq_q, seq_k);
    }

    Ok(())
}

fn print_attention(title: &str, attention: &Attention, seq_q: usize, seq_k: usize) {
    println!("\n--- {} ---", title);
    println!("Output shape:  {}", attention.output.shape());
    println!("Weights shape: {}", attention.weights.shape());

    println!("\nOutput (first batch):");
    for row in attention.output.rows().take(seq_q) {
        println!("  {}", format_row(row));
    }

    println!("\nWeights (first batch):");
    for row in attention.weights.rows().take(seq_q) {
        println!("  {}", format_row(row));
    }

    let sums: Vec<f32> = attention
        .weights
        .rows()
        .take(seq_q)
        .map(|row| row.iter().sum())
        .collect();
    println!("\nRow sums: {}", format_row(&sums));
    tracing::debug!(seq_q, seq_k, "printed attention");
}

fn format_row(row: &[f32]) -> String {
    let cells: Vec<String> = row.iter().map(|x| format!("{:>8.4}", x)).collect();
    format!("[{}]", cells.join(" "))
}

fn cmd_generate(
    corpus: Option<&Path>,
    max_length: usize,
    seed: Option<u64>,
    samples: usize,
) -> Result<()> {
    let (path, text) = read_corpus(corpus)?;

    let mut model = TrigramModel::new();
    model.fit(&text);

    let table = model.table();
    println!("=== Trigram Language Model ===");
    println!("Corpus:       {} ({} bytes)", path.display(), text.len());
    println!("Contexts:     {}", table.len());
    println!("Trigrams:     {}", table.total_observations());
    println!("Vocabulary:   {}", table.vocabulary_size());
    match seed {
        Some(s) => println!("Seed:         {}", s),
        None => println!("Seed:         (entropy)"),
    }

    let mut sampler = match seed {
        Some(s) => RandomSampler::seeded(s),
        None => RandomSampler::from_entropy(),
    };

    for i in 0..samples {
        let generated = model.generate_with(max_length, &mut sampler);
        println!("\n[{}] {}", i + 1, generated);
    }

    Ok(())
}

/// Read an explicit corpus, or the default with a bundled fallback.
fn read_corpus(corpus: Option<&Path>) -> Result<(PathBuf, String)> {
    if let Some(path) = corpus {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read corpus {}", path.display()))?;
        return Ok((path.to_path_buf(), text));
    }

    for candidate in [DEFAULT_CORPUS, FALLBACK_CORPUS] {
        match std::fs::read_to_string(candidate) {
            Ok(text) => return Ok((PathBuf::from(candidate), text)),
            Err(e) => tracing::debug!(path = candidate, error = %e, "corpus unavailable"),
        }
    }

    anyhow::bail!("no corpus found at {} or {}", DEFAULT_CORPUS, FALLBACK_CORPUS)
}
