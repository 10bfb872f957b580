use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use watson_core::persist::{save_index, IndexPaths};
use watson_core::{Normalizer, NormalizerConfig};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the inverted index for clue answering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a title-delimited corpus file or directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Only index files whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Worker threads; each file is handled by exactly one worker
        #[arg(long, default_value_t = 1)]
        jobs: usize,
        /// Disable Porter stemming of document text
        #[arg(long, default_value_t = false)]
        no_stem: bool,
        /// Disable lemmatization of document text
        #[arg(long, default_value_t = false)]
        no_lemmatize: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, prefix, jobs, no_stem, no_lemmatize } => {
            let config = NormalizerConfig { stem: !no_stem, lemmatize: !no_lemmatize };
            let normalizer = Normalizer::new().document_config(config);
            let (index, stats) = indexer::build_from_dir(Path::new(&input), prefix.as_deref(), &normalizer, jobs)?;
            save_index(&IndexPaths::new(&output), &index, &stats, config)?;
            tracing::info!(output, "index build complete");
            Ok(())
        }
    }
}
