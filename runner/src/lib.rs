//! Batch retrieval driver: TREC SGML collections in, ranked run files out.

pub mod run;
pub mod stopwords;
pub mod trec;
