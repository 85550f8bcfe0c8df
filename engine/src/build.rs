use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::index::InvertedIndex;
use crate::tokenizer::{self, Separators, TermMap};

/// Collection files handed to one worker at a time.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// One parsed document from a collection file.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// External document source: yields the documents contained in one
/// collection file. Implementations are shared read-only across workers.
pub trait DocumentSource: Sync {
    fn documents(&self, path: &Path) -> Result<Vec<Document>>;
}

/// Read-only indexing configuration shared by every worker.
pub struct BuildOptions<'a> {
    pub batch_size: usize,
    pub separators: &'a Separators,
    pub stopwords: Option<&'a HashSet<String>>,
    pub term_map: Option<TermMap>,
    pub show_progress: bool,
}

impl<'a> BuildOptions<'a> {
    pub fn new(separators: &'a Separators) -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            separators,
            stopwords: None,
            term_map: None,
            show_progress: true,
        }
    }
}

/// Builds one merged index over `paths`.
///
/// Path batches fan out over the rayon pool; each worker builds a store over
/// its batch alone and completed stores stream back over a bounded channel
/// to this thread, which performs every merge in completion order. The final
/// content does not depend on that order.
///
/// Any worker failure aborts the build: a silently missing shard would leave
/// document and frequency totals wrong.
pub fn build_index<S: DocumentSource>(
    paths: &[PathBuf],
    source: &S,
    options: &BuildOptions<'_>,
) -> Result<InvertedIndex> {
    let batch_size = options.batch_size.max(1);
    let batches: Vec<&[PathBuf]> = paths.chunks(batch_size).collect();
    let progress = if options.show_progress {
        ProgressBar::new(batches.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    tracing::info!(
        files = paths.len(),
        batches = batches.len(),
        "indexing started"
    );

    let (sender, receiver) = crossbeam_channel::bounded(rayon::current_num_threads());
    let index = std::thread::scope(|scope| {
        scope.spawn(move || {
            batches
                .into_par_iter()
                .for_each_with(sender, |sender, batch| {
                    let _ = sender.send(index_batch(batch, source, options));
                });
        });

        let mut merged = InvertedIndex::new();
        for shard in receiver {
            merged.merge(shard?);
            progress.inc(1);
        }
        Ok::<_, anyhow::Error>(merged)
    })?;

    progress.finish_and_clear();
    tracing::info!(
        docs = index.doc_count(),
        terms = index.term_count(),
        postings = index.posting_count(),
        "indexing complete"
    );
    Ok(index)
}

fn index_batch<S: DocumentSource>(
    batch: &[PathBuf],
    source: &S,
    options: &BuildOptions<'_>,
) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    for path in batch {
        for document in source.documents(path)? {
            let counts = tokenizer::extract(
                &document.text,
                options.separators,
                options.stopwords,
                options.term_map,
            );
            index.index_document(&document.id, &counts);
        }
    }
    Ok(index)
}
