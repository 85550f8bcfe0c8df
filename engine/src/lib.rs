//! In-memory vector-space retrieval: concurrent inverted-index construction
//! over document collections and cosine-similarity ranking of queries.

pub mod build;
pub mod index;
pub mod search;
pub mod tokenizer;
pub mod weight;

pub use build::{build_index, BuildOptions, Document, DocumentSource, DEFAULT_BATCH_SIZE};
pub use index::{InvertedIndex, Posting};
pub use search::{rank, ScoredDoc, DEFAULT_TOP_K};
pub use tokenizer::{extract, Separators, TermCounts, TermMap};
pub use weight::Weighting;
