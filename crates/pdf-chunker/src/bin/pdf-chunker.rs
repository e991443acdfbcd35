//! pdf-chunker command line
//!
//! Run with: cargo run -p pdf-chunker -- chunks <path-to-pdf>

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use pdf_chunker::{
    ChunkRecord, IngestPipeline, PageRecord, PdfLoader, PipelineConfig, PreviewConfig,
    TextChunker,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdf-chunker", version, about = "Extract and chunk PDF text for indexing")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print every record as JSON Lines instead of a preview
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract page text and preview the first pages
    Pages {
        /// Path to the PDF
        pdf: PathBuf,
    },
    /// Extract and chunk page text, then preview the first chunks
    Chunks {
        /// Path to the PDF
        pdf: PathBuf,
        /// Target chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Overlap between chunks in characters
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chunker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Pages { pdf } => {
            let pages = PdfLoader::new(config.extractor.clone())
                .load(&pdf)
                .with_context(|| format!("extracting {}", pdf.display()))?;

            if cli.json {
                print_json_lines(&pages)?;
            } else {
                print_pages(&pages, &config.preview);
            }
        }
        Command::Chunks {
            pdf,
            chunk_size,
            chunk_overlap,
        } => {
            if let Some(size) = chunk_size {
                config.chunking.chunk_size = size;
            }
            if let Some(overlap) = chunk_overlap {
                config.chunking.chunk_overlap = overlap;
            }

            let json = cli.json;
            let chunker = TextChunker::from_config(&config.chunking)?.with_observer(move |summary| {
                if !json {
                    println!(
                        "{}",
                        style(format!(
                            "Created {} chunks from {} pages",
                            summary.chunks, summary.pages
                        ))
                        .green()
                    );
                }
            });
            let pipeline =
                IngestPipeline::with_chunker(PdfLoader::new(config.extractor.clone()), chunker);

            let output = pipeline
                .ingest(&pdf)
                .with_context(|| format!("chunking {}", pdf.display()))?;

            if cli.json {
                print_json_lines(&output.chunks)?;
            } else {
                print_chunks(&output.chunks, &config.preview);
            }
        }
    }

    Ok(())
}

fn print_pages(pages: &[PageRecord], preview: &PreviewConfig) {
    for page in pages.iter().take(preview.pages) {
        println!("\n{}", style(format!("--- Page {} ---", page.page_number)).bold());
        println!("{}", head(&page.text, preview.page_chars));
        println!("...");
    }
}

fn print_chunks(chunks: &[ChunkRecord], preview: &PreviewConfig) {
    for chunk in chunks.iter().take(preview.chunks) {
        println!(
            "\n{}",
            style(format!(
                "--- Chunk {} (Page {}) ---",
                chunk.chunk_index, chunk.page_number
            ))
            .bold()
        );
        println!("Length: {} chars", chunk.text.chars().count());
        println!("{}", head(&chunk.text, preview.chunk_chars));
        println!("...");
    }
}

fn print_json_lines<T: Serialize>(records: &[T]) -> Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// First `n` characters of `text`
fn head(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
