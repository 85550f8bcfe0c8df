use anyhow::{bail, Result};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::tokenizer::TermCounts;

/// One document's occurrence count for one term. Chains are singly linked
/// through arena handles, newest posting first.
#[derive(Debug, Clone)]
pub struct Posting {
    pub doc_id: String,
    pub count: u32,
    next: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
struct TermEntry {
    head: u32,
    tail: u32,
    doc_freq: u32,
}

/// In-memory inverted index: term to posting chain, plus per-term document
/// frequencies and the number of documents indexed. Postings live in an
/// arena and link to the next-older node by handle, so merging splices
/// chains by rewriting one handle instead of walking them.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    arena: Vec<Posting>,
    terms: HashMap<String, TermEntry>,
    doc_count: u32,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links a new posting as the head of `term`'s chain. O(1).
    ///
    /// Adding the same `(term, doc_id)` pair twice into one store corrupts
    /// the one-posting-per-document invariant; only [`Self::consistency_check`]
    /// detects that.
    pub fn add_posting(&mut self, term: &str, doc_id: &str, count: u32) {
        let handle = self.arena.len() as u32;
        match self.terms.get_mut(term) {
            Some(entry) => {
                self.arena.push(Posting {
                    doc_id: doc_id.to_string(),
                    count,
                    next: Some(entry.head),
                });
                entry.head = handle;
                entry.doc_freq += 1;
            }
            None => {
                self.arena.push(Posting {
                    doc_id: doc_id.to_string(),
                    count,
                    next: None,
                });
                self.terms.insert(
                    term.to_string(),
                    TermEntry {
                        head: handle,
                        tail: handle,
                        doc_freq: 1,
                    },
                );
            }
        }
    }

    /// Adds one posting per term and counts the document.
    pub fn index_document(&mut self, doc_id: &str, terms: &TermCounts) {
        for (term, count) in terms {
            self.add_posting(term, doc_id, *count);
        }
        self.doc_count += 1;
    }

    /// Absorbs `other`. New terms adopt `other`'s chain; existing terms are
    /// spliced: `other`'s tail links to this store's current head and
    /// `other`'s head becomes the new head, so absorbed postings sit at the
    /// front. Existing chains are never walked. Document frequencies and
    /// document counts are summed.
    ///
    /// Both stores must have been built over disjoint document sets;
    /// merging overlapping sets violates the per-document invariant.
    pub fn merge(&mut self, other: InvertedIndex) {
        let InvertedIndex {
            arena,
            terms,
            doc_count,
        } = other;

        let base = self.arena.len() as u32;
        self.arena.extend(arena.into_iter().map(|mut posting| {
            if let Some(next) = posting.next.as_mut() {
                *next += base;
            }
            posting
        }));

        for (term, entry) in terms {
            let head = entry.head + base;
            let tail = entry.tail + base;
            match self.terms.entry(term) {
                Entry::Vacant(slot) => {
                    slot.insert(TermEntry {
                        head,
                        tail,
                        doc_freq: entry.doc_freq,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    self.arena[tail as usize].next = Some(existing.head);
                    existing.head = head;
                    existing.doc_freq += entry.doc_freq;
                }
            }
        }

        self.doc_count += doc_count;
    }

    /// Walks every chain and verifies no document appears twice for a term.
    /// Returns the total posting count. Diagnostic only, never on the hot
    /// path.
    pub fn consistency_check(&self) -> Result<usize> {
        let mut total = 0;
        for (term, entry) in &self.terms {
            let mut seen = HashSet::new();
            let mut cursor = Some(entry.head);
            while let Some(handle) = cursor {
                let posting = &self.arena[handle as usize];
                if !seen.insert(posting.doc_id.as_str()) {
                    bail!(
                        "duplicate posting for term {term:?}, document {:?}",
                        posting.doc_id
                    );
                }
                cursor = posting.next;
            }
            total += seen.len();
        }
        Ok(total)
    }

    /// Number of distinct documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> u32 {
        self.terms.get(term).map_or(0, |entry| entry.doc_freq)
    }

    /// Number of documents indexed into this store, summed across merges.
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn posting_count(&self) -> usize {
        self.arena.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Iterates `term`'s chain newest-first; empty for unknown terms.
    pub fn postings(&self, term: &str) -> PostingsIter<'_> {
        PostingsIter {
            arena: &self.arena,
            cursor: self.terms.get(term).map(|entry| entry.head),
        }
    }
}

pub struct PostingsIter<'a> {
    arena: &'a [Posting],
    cursor: Option<u32>,
}

impl<'a> Iterator for PostingsIter<'a> {
    type Item = &'a Posting;

    fn next(&mut self) -> Option<Self::Item> {
        let posting = &self.arena[self.cursor? as usize];
        self.cursor = posting.next;
        Some(posting)
    }
}
