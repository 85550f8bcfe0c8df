use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::index::InvertedIndex;
use crate::tokenizer::TermCounts;
use crate::weight::Weighting;

/// Default number of results kept per query.
pub const DEFAULT_TOP_K: usize = 1000;

/// One ranked result. The total ordering is over the composite
/// `(score, doc_id)` key, which also breaks ties during top-K selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub score: f64,
    pub doc_id: String,
}

impl Eq for ScoredDoc {}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns the `top_k` documents most cosine-similar to `query`, ordered by
/// descending `(score, doc_id)`.
///
/// Document norms accumulate only over the terms shared with the query;
/// documents are never normalized across their full vocabulary. An empty or
/// zero-weight query matches nothing.
pub fn rank(
    index: &InvertedIndex,
    query: &TermCounts,
    weighting: Weighting,
    top_k: usize,
) -> Vec<ScoredDoc> {
    let mut query_norm = 0.0;
    let mut weighted: Vec<(&str, f64)> = Vec::with_capacity(query.len());
    for (term, count) in query {
        let weight = weighting.weight(*count, index.doc_freq(term));
        query_norm += weight * weight;
        weighted.push((term.as_str(), weight));
    }
    let query_norm = query_norm.sqrt();
    if query_norm == 0.0 {
        return Vec::new();
    }

    // Running dot product and squared norm per candidate document.
    let mut accumulators: HashMap<&str, (f64, f64)> = HashMap::new();
    for (term, weight) in weighted {
        let query_weight = weight / query_norm;
        if query_weight == 0.0 {
            continue;
        }
        let doc_freq = index.doc_freq(term);
        for posting in index.postings(term) {
            let doc_weight = weighting.weight(posting.count, doc_freq);
            let entry = accumulators
                .entry(posting.doc_id.as_str())
                .or_insert((0.0, 0.0));
            entry.0 += query_weight * doc_weight;
            entry.1 += doc_weight * doc_weight;
        }
    }

    // Bounded min-heap: the minimum is replaced only when strictly
    // outscored, so equal-scoring late arrivals never displace residents.
    let mut heap: BinaryHeap<Reverse<ScoredDoc>> = BinaryHeap::with_capacity(top_k + 1);
    for (doc_id, (dot, norm)) in accumulators {
        let score = dot / norm.sqrt();
        if heap.len() < top_k {
            heap.push(Reverse(ScoredDoc {
                score,
                doc_id: doc_id.to_string(),
            }));
        } else if let Some(Reverse(minimum)) = heap.peek() {
            if score > minimum.score {
                heap.push(Reverse(ScoredDoc {
                    score,
                    doc_id: doc_id.to_string(),
                }));
                heap.pop();
            }
        }
    }

    let mut ranked: Vec<ScoredDoc> = heap.into_iter().map(|Reverse(doc)| doc).collect();
    ranked.sort_by(|a, b| b.cmp(a));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[(&str, &str)]) -> InvertedIndex {
        use crate::tokenizer::{extract, DEFAULT_SEPARATORS};
        let mut index = InvertedIndex::new();
        for (doc_id, text) in docs {
            let counts = extract(text, &DEFAULT_SEPARATORS, None, None);
            index.index_document(doc_id, &counts);
        }
        index
    }

    fn query(text: &str) -> TermCounts {
        crate::tokenizer::extract(text, &crate::tokenizer::DEFAULT_SEPARATORS, None, None)
    }

    #[test]
    fn natural_round_trip_matches_hand_scores() {
        let index = index_of(&[("1", "cat dog cat"), ("2", "dog dog fish")]);
        let ranked = rank(&index, &query("cat dog"), Weighting::Natural, 10);

        assert_eq!(ranked.len(), 2);
        // Query vector {cat: 1, dog: 1}, norm sqrt(2).
        // Doc 1: dot = (2 + 1) / sqrt(2), norm sqrt(5) -> 3 / sqrt(10).
        assert_eq!(ranked[0].doc_id, "1");
        assert!((ranked[0].score - 3.0 / 10f64.sqrt()).abs() < 1e-12);
        // Doc 2: dot = 2 / sqrt(2), norm 2 -> 1 / sqrt(2).
        assert_eq!(ranked[1].doc_id, "2");
        assert!((ranked[1].score - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let index = index_of(&[("1", "cat dog")]);
        assert!(rank(&index, &TermCounts::new(), Weighting::Natural, 10).is_empty());
    }

    #[test]
    fn empty_collection_yields_empty_results() {
        let index = InvertedIndex::new();
        let ranked = rank(&index, &query("cat dog"), Weighting::Natural, 10);
        assert!(ranked.is_empty());

        let tf_idf = Weighting::TfIdf { total_docs: 0 };
        assert!(rank(&index, &query("cat"), tf_idf, 10).is_empty());
    }

    #[test]
    fn terms_absent_from_the_collection_are_skipped() {
        let index = index_of(&[("1", "cat")]);
        let ranked = rank(&index, &query("cat unicorn"), Weighting::Natural, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc_id, "1");
    }

    #[test]
    fn results_are_bounded_by_top_k() {
        let index = index_of(&[("1", "cat"), ("2", "cat cat"), ("3", "cat dog")]);
        let ranked = rank(&index, &query("cat"), Weighting::Natural, 2);
        assert_eq!(ranked.len(), 2);

        let all = rank(&index, &query("cat"), Weighting::Natural, 10);
        let kept: Vec<&str> = ranked.iter().map(|doc| doc.doc_id.as_str()).collect();
        for dropped in all.iter().filter(|doc| !kept.contains(&doc.doc_id.as_str())) {
            assert!(ranked.iter().all(|survivor| survivor.score >= dropped.score));
        }

        assert!(rank(&index, &query("cat"), Weighting::Natural, 0).is_empty());
    }

    #[test]
    fn equal_scores_never_displace_residents() {
        // Three identical documents, capacity two: whichever arrives once
        // the heap is full only ties the minimum and is discarded.
        let index = index_of(&[("a", "x y"), ("b", "x y"), ("c", "x y")]);
        let ranked = rank(&index, &query("x"), Weighting::Natural, 2);
        assert_eq!(ranked.len(), 2);
        assert!((ranked[0].score - ranked[1].score).abs() < 1e-12);
        // Descending composite order: the higher id of the survivors first.
        assert_eq!(ranked[0].doc_id.cmp(&ranked[1].doc_id), Ordering::Greater);
    }

    #[test]
    fn strictly_higher_score_evicts_the_composite_minimum() {
        // Docs a and b tie below c. With capacity two, c always survives;
        // exactly one of the tied pair is kept beside it.
        let index = index_of(&[("a", "x z"), ("b", "x z"), ("c", "x y")]);
        let ranked = rank(&index, &query("x y"), Weighting::Natural, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].doc_id, "c");
        assert!(ranked[1].doc_id == "a" || ranked[1].doc_id == "b");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn tf_idf_prefers_rarer_terms() {
        let index = index_of(&[
            ("1", "common rare"),
            ("2", "common common"),
            ("3", "common"),
        ]);
        let weighting = Weighting::TfIdf {
            total_docs: index.doc_count(),
        };
        let ranked = rank(&index, &query("rare"), weighting, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].doc_id, "1");
    }
}
