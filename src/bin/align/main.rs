//! `align`: cross-lingual word alignment with scaled dot-product attention.
//!
//! Loads two word-vector files, embeds one sentence from each language, lets every
//! query word attend over the key words, and renders the weights.

use anyhow::{Context, Result};
use clap::Parser;
use qkv_attention::nn::ScaledDotProductAttention;
use qkv_attention::text::EmbeddingTable;
use qkv_attention::viz;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{AlignConfig, parse_scaling};

#[derive(Parser)]
#[command(name = "align")]
#[command(version)]
#[command(about = "Align the words of two sentences with QKV attention", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sentence whose words act as queries
    #[arg(long)]
    query_sentence: Option<String>,

    /// Sentence whose words act as keys and values
    #[arg(long)]
    key_sentence: Option<String>,

    /// Word-vector file for the query language
    #[arg(long)]
    query_embeddings: Option<PathBuf>,

    /// Word-vector file for the key language
    #[arg(long)]
    key_embeddings: Option<PathBuf>,

    /// Score scaling: "inverse-sqrt-dim", "none", or a number
    #[arg(long)]
    scaling: Option<String>,

    /// Write the weights as a grayscale PGM image
    #[arg(long)]
    pgm: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn apply(&self, config: &mut AlignConfig) -> Result<()> {
        if let Some(s) = &self.query_sentence {
            config.query.sentence = s.clone();
        }
        if let Some(s) = &self.key_sentence {
            config.key.sentence = s.clone();
        }
        if let Some(p) = &self.query_embeddings {
            config.query.embeddings = p.clone();
        }
        if let Some(p) = &self.key_embeddings {
            config.key.embeddings = p.clone();
        }
        if let Some(s) = &self.scaling {
            config.attention.scaling = parse_scaling(s)?;
        }
        if let Some(p) = &self.pgm {
            config.output.pgm = Some(p.clone());
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = AlignConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    run(&config)
}

fn run(config: &AlignConfig) -> Result<()> {
    let query_table = EmbeddingTable::<f64>::load(&config.query.embeddings).with_context(|| {
        format!(
            "Failed to load query embeddings from {}",
            config.query.embeddings.display()
        )
    })?;
    let key_table = EmbeddingTable::<f64>::load(&config.key.embeddings).with_context(|| {
        format!(
            "Failed to load key embeddings from {}",
            config.key.embeddings.display()
        )
    })?;
    info!(
        query_words = query_table.vocab.len(),
        key_words = key_table.vocab.len(),
        dim = query_table.dim(),
        "embeddings loaded"
    );

    let (query_tokens, queries) = query_table
        .embed_sentence(&config.query.sentence)
        .context("Failed to embed query sentence")?;
    let (key_tokens, keys) = key_table
        .embed_sentence(&config.key.sentence)
        .context("Failed to embed key sentence")?;

    let attn = ScaledDotProductAttention::new(config.attention);
    let result = attn
        .forward(&queries, &keys, &keys)
        .context("Attention failed")?;

    info!(
        weights = ?result.weights.shape(),
        output = ?result.output.shape(),
        "attention computed"
    );

    if config.output.heatmap {
        println!(
            "{}",
            viz::render_heatmap(&result.weights, &query_tokens.words, &key_tokens.words)
        );
    }

    for (word, row) in query_tokens.words.iter().zip(result.weights.iter_rows()) {
        let best = row
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .and_then(|(j, _)| key_tokens.words.get(j));
        if let Some(best) = best {
            println!("{:>12} -> {}", word, best);
        }
    }

    if let Some(path) = &config.output.pgm {
        viz::save_pgm(&result.weights, config.output.cell_size, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote weights image");
    }

    Ok(())
}
