use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine::build::DocumentSource;
use engine::tokenizer::{self, Separators};
use rayon::prelude::*;

/// Corpus statistics for threshold filtering: total occurrences per term
/// and the number of documents scanned.
#[derive(Default)]
struct CorpusCounts {
    occurrences: HashMap<String, u64>,
    documents: u64,
}

impl CorpusCounts {
    fn absorb(mut self, other: CorpusCounts) -> CorpusCounts {
        for (term, count) in other.occurrences {
            *self.occurrences.entry(term).or_insert(0) += count;
        }
        self.documents += other.documents;
        self
    }
}

/// Writes every term whose mean occurrences per document exceed
/// `threshold`, one per line, sorted. A corpus-statistics utility for
/// producing stopword lists, not part of the scoring core.
pub fn generate<S: DocumentSource>(
    paths: &[PathBuf],
    source: &S,
    separators: &Separators,
    threshold: f64,
    output: &Path,
) -> Result<()> {
    let counts = paths
        .par_iter()
        .map(|path| -> Result<CorpusCounts> {
            let mut counts = CorpusCounts::default();
            for document in source.documents(path)? {
                counts.documents += 1;
                for (term, count) in tokenizer::extract(&document.text, separators, None, None) {
                    *counts.occurrences.entry(term).or_insert(0) += u64::from(count);
                }
            }
            Ok(counts)
        })
        .try_reduce(CorpusCounts::default, |left, right| Ok(left.absorb(right)))?;

    tracing::info!(
        documents = counts.documents,
        terms = counts.occurrences.len(),
        "corpus statistics collected"
    );

    let file = fs::File::create(output)
        .with_context(|| format!("creating stopword file {}", output.display()))?;
    let mut out = BufWriter::new(file);
    let document_total = counts.documents.max(1);
    let mut terms: Vec<(String, u64)> = counts.occurrences.into_iter().collect();
    terms.sort();
    for (term, count) in terms {
        if count as f64 / document_total as f64 > threshold {
            writeln!(out, "{term}")?;
        }
    }
    out.flush()?;
    Ok(())
}
