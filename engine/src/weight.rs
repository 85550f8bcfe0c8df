/// Term-weighting scheme applied to both query and document term counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weighting {
    /// Raw term count.
    Natural,
    /// Log-scaled term frequency times log-scaled inverse document
    /// frequency. `total_docs` is bound once per retrieval run since it is
    /// invariant for the whole collection.
    TfIdf { total_docs: u32 },
}

impl Weighting {
    /// Weight for a term occurring `count` times in one document or query,
    /// where `doc_freq` documents of the collection contain the term.
    ///
    /// `count` must be at least 1; a zero `doc_freq` falls back to an
    /// inverse document frequency of 1.
    pub fn weight(&self, count: u32, doc_freq: u32) -> f64 {
        match *self {
            Weighting::Natural => f64::from(count),
            Weighting::TfIdf { total_docs } => {
                let log_tf = 1.0 + f64::from(count).log10();
                let idf = if doc_freq > 0 {
                    f64::from(total_docs) / f64::from(doc_freq)
                } else {
                    1.0
                };
                let log_idf = 1.0 + idf.log10();
                log_tf * log_idf
            }
        }
    }
}
