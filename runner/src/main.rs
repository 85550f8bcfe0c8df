use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use engine::build::DEFAULT_BATCH_SIZE;
use engine::search::DEFAULT_TOP_K;
use engine::tokenizer::{self, Separators, TermMap, DEFAULT_SEPARATORS};
use runner::run::{self, RunConfig, WeightingKind};
use runner::stopwords;
use runner::trec::{TrecSource, BASE_TAG_BLACKLIST};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "runner")]
#[command(about = "Batch vector-space retrieval over TREC collections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a collection and rank every topic into a run file
    Run {
        /// Topic file with <top> entries
        #[arg(short, long)]
        queries: PathBuf,
        /// Collection directory, or a list file of collection paths
        #[arg(short, long)]
        documents: PathBuf,
        /// Identifier written in the last column of the run file
        #[arg(short, long)]
        run_id: String,
        /// Output run file
        #[arg(short, long)]
        output: PathBuf,
        /// Term weighting scheme
        #[arg(long, value_enum, default_value_t = WeightingArg::Natural)]
        weighting: WeightingArg,
        /// Stopword file, one term per line
        #[arg(long)]
        stopwords: Option<PathBuf>,
        /// Lowercase terms before counting
        #[arg(long, default_value_t = false)]
        lowercase: bool,
        /// Results kept per topic
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Collection files handed to one worker at a time
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Extra tags (beyond DOCNO/DOCID) excluded from document text
        #[arg(long, value_delimiter = ',')]
        tag_blacklist: Vec<String>,
        /// Separator character class override (regex class body)
        #[arg(long)]
        separators: Option<String>,
        /// Suppress the indexing progress bar
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Generate a stopword list from corpus term frequencies
    GenStopwords {
        /// Collection directory, or a list file of collection paths
        #[arg(short, long)]
        documents: PathBuf,
        /// Output stopword file
        #[arg(short, long)]
        output: PathBuf,
        /// Mean occurrences per document above which a term is a stopword
        #[arg(long)]
        threshold: f64,
        /// Separator character class override (regex class body)
        #[arg(long)]
        separators: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WeightingArg {
    Natural,
    TfIdf,
}

fn separators_from(arg: Option<String>) -> Result<Separators> {
    match arg {
        Some(class) => Separators::new(&class),
        None => Ok(DEFAULT_SEPARATORS.clone()),
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            queries,
            documents,
            run_id,
            output,
            weighting,
            stopwords,
            lowercase,
            top_k,
            batch_size,
            tag_blacklist,
            separators,
            quiet,
        } => {
            let mut blacklist: Vec<String> = BASE_TAG_BLACKLIST
                .iter()
                .map(|tag| tag.to_string())
                .collect();
            blacklist.extend(tag_blacklist);
            let term_map: Option<TermMap> = if lowercase {
                Some(tokenizer::lowercase)
            } else {
                None
            };
            let config = RunConfig {
                run_id,
                weighting: match weighting {
                    WeightingArg::Natural => WeightingKind::Natural,
                    WeightingArg::TfIdf => WeightingKind::TfIdf,
                },
                top_k,
                batch_size,
                stopwords,
                tag_blacklist: blacklist,
                separators: separators_from(separators)?,
                term_map,
                quiet,
            };
            run::execute(&documents, &queries, &output, &config)
        }
        Commands::GenStopwords {
            documents,
            output,
            threshold,
            separators,
        } => {
            let separators = separators_from(separators)?;
            let paths = run::resolve_document_paths(&documents)?;
            stopwords::generate(&paths, &TrecSource::default(), &separators, threshold, &output)
        }
    }
}
