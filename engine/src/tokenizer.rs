use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Term occurrence counts within one document or query.
pub type TermCounts = HashMap<String, u32>;

/// Normalization applied to each surviving token before counting.
pub type TermMap = fn(&str) -> String;

/// Whitespace separator class.
pub const WHSP_SEPS: &str = r" \t\n";
/// Sentence punctuation separator class.
pub const PUNCT_SEPS: &str = r",.:;?!";
/// Extended punctuation separator class.
pub const PUNCT_EXT_SEPS: &str = r#"\-_"'/"#;
/// Bracket separator class.
pub const PAR_SEPS: &str = r"\[\]\(\)";
/// Quote separator class.
pub const QUOT_SEPS: &str = r#""'"#;

lazy_static! {
    /// Separator class used by the batch runs: whitespace, punctuation,
    /// quotes and brackets.
    pub static ref DEFAULT_SEPARATORS: Separators =
        Separators::from_classes(&[WHSP_SEPS, PUNCT_SEPS, QUOT_SEPS, PAR_SEPS])
            .expect("valid separator classes");
}

/// Compiled separator character class. Splitting is purely class based, not
/// locale-aware word segmentation.
#[derive(Debug, Clone)]
pub struct Separators {
    class: Regex,
}

impl Separators {
    /// Compiles a splitter from the body of a regex character class.
    pub fn new(class: &str) -> Result<Self> {
        let class = Regex::new(&format!("[{class}]"))?;
        Ok(Self { class })
    }

    pub fn from_classes(classes: &[&str]) -> Result<Self> {
        Self::new(&classes.concat())
    }
}

/// Splits `text` at any separator character and counts surviving terms.
///
/// Empty tokens from consecutive separators are always dropped, stopwords
/// are matched against the raw token, and `term_map` (identity when absent)
/// is applied before counting.
pub fn extract(
    text: &str,
    separators: &Separators,
    stopwords: Option<&HashSet<String>>,
    term_map: Option<TermMap>,
) -> TermCounts {
    let mut counts = TermCounts::new();
    for token in separators.class.split(text) {
        if token.is_empty() {
            continue;
        }
        if stopwords.map_or(false, |set| set.contains(token)) {
            continue;
        }
        let term = match term_map {
            Some(map) => map(token),
            None => token.to_string(),
        };
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Lowercases terms.
pub fn lowercase(term: &str) -> String {
    term.to_lowercase()
}

/// NFKC-normalizes, then lowercases terms.
pub fn nfkc_lowercase(term: &str) -> String {
    term.nfkc().collect::<String>().to_lowercase()
}

/// Loads a stopword set, one term per line.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}
