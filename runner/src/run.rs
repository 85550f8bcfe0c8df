use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use engine::build::{build_index, BuildOptions, DEFAULT_BATCH_SIZE};
use engine::search::{rank, ScoredDoc, DEFAULT_TOP_K};
use engine::tokenizer::{self, Separators, TermMap};
use engine::weight::Weighting;
use walkdir::WalkDir;

use crate::trec::{self, TrecSource, BASE_TAG_BLACKLIST};

/// Which weighting scheme a run uses; tf-idf binds the collection document
/// total from the built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingKind {
    Natural,
    TfIdf,
}

pub struct RunConfig {
    pub run_id: String,
    pub weighting: WeightingKind,
    pub top_k: usize,
    pub batch_size: usize,
    pub stopwords: Option<PathBuf>,
    pub tag_blacklist: Vec<String>,
    pub separators: Separators,
    pub term_map: Option<TermMap>,
    pub quiet: bool,
}

impl RunConfig {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            weighting: WeightingKind::Natural,
            top_k: DEFAULT_TOP_K,
            batch_size: DEFAULT_BATCH_SIZE,
            stopwords: None,
            tag_blacklist: BASE_TAG_BLACKLIST.iter().map(|tag| tag.to_string()).collect(),
            separators: tokenizer::DEFAULT_SEPARATORS.clone(),
            term_map: None,
            quiet: false,
        }
    }
}

/// Runs one retrieval experiment: build the index over the collection, rank
/// every topic, write the run file. Configuration problems surface before
/// any indexing work starts.
pub fn execute(
    documents: &Path,
    topics_path: &Path,
    output: &Path,
    config: &RunConfig,
) -> Result<()> {
    let paths = resolve_document_paths(documents)?;
    if paths.is_empty() {
        bail!("no collection files found under {}", documents.display());
    }
    let stopwords = match &config.stopwords {
        Some(path) => Some(
            tokenizer::load_stopwords(path)
                .with_context(|| format!("loading stopwords from {}", path.display()))?,
        ),
        None => None,
    };
    let topics = trec::read_topics(topics_path)?;

    let source = TrecSource::new(&config.tag_blacklist);
    let mut options = BuildOptions::new(&config.separators);
    options.batch_size = config.batch_size;
    options.stopwords = stopwords.as_ref();
    options.term_map = config.term_map;
    options.show_progress = !config.quiet;

    let index = build_index(&paths, &source, &options)?;
    let weighting = match config.weighting {
        WeightingKind::Natural => Weighting::Natural,
        WeightingKind::TfIdf => Weighting::TfIdf {
            total_docs: index.doc_count(),
        },
    };

    let file = fs::File::create(output)
        .with_context(|| format!("creating output file {}", output.display()))?;
    let mut out = BufWriter::new(file);
    for topic in &topics {
        let query = tokenizer::extract(
            &topic.title,
            &config.separators,
            stopwords.as_ref(),
            config.term_map,
        );
        let ranked = rank(&index, &query, weighting, config.top_k);
        write_run_lines(&mut out, &topic.id, &ranked, &config.run_id)?;
        tracing::debug!(topic = %topic.id, results = ranked.len(), "ranked topic");
    }
    out.flush()?;
    tracing::info!(
        topics = topics.len(),
        output = %output.display(),
        "run complete"
    );
    Ok(())
}

/// Collection files for a run: either a directory to walk, or a list file
/// whose lines name files inside a sibling directory named after the list
/// file minus its extension.
pub fn resolve_document_paths(documents: &Path) -> Result<Vec<PathBuf>> {
    if documents.is_dir() {
        let mut paths = Vec::new();
        for entry in WalkDir::new(documents) {
            let entry = entry?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        return Ok(paths);
    }

    let base = documents.with_extension("");
    let listing = fs::read_to_string(documents)
        .with_context(|| format!("reading document list {}", documents.display()))?;
    Ok(listing
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| base.join(line))
        .collect())
}

/// One line per result: query id, the literal "0", document id, 0-based
/// rank, score, run id, tab separated.
pub fn write_run_lines<W: Write>(
    out: &mut W,
    query_id: &str,
    ranked: &[ScoredDoc],
    run_id: &str,
) -> Result<()> {
    for (position, result) in ranked.iter().enumerate() {
        writeln!(
            out,
            "{}\t0\t{}\t{}\t{}\t{}",
            query_id, result.doc_id, position, result.score, run_id
        )?;
    }
    Ok(())
}
