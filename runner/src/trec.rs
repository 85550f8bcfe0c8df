use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use engine::build::{Document, DocumentSource};
use scraper::{ElementRef, Html, Selector};

/// Tags whose text never counts as document content.
pub const BASE_TAG_BLACKLIST: &[&str] = &["docno", "docid"];

/// Metadata tags excluded from English newswire collections.
pub const EN_TAG_BLACKLIST: &[&str] = &[
    "docno", "docid", "sn", "pd", "pn", "pg", "pp", "wd", "sm", "sl", "cb", "in", "fn",
];

/// Document source for TREC SGML collection files.
///
/// A collection file holds many `<DOC>` elements; the document id is the
/// `<DOCNO>` text and the document text is every text node whose direct
/// parent element is not blacklisted. Which tags are excluded varies per
/// collection, so the blacklist is configuration, not a subtype.
#[derive(Debug, Clone)]
pub struct TrecSource {
    tag_blacklist: HashSet<String>,
}

impl TrecSource {
    pub fn new<I, S>(tag_blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tag_blacklist = tag_blacklist
            .into_iter()
            .map(|tag| tag.as_ref().to_ascii_lowercase())
            .collect();
        Self { tag_blacklist }
    }

    /// Concatenates every text node whose direct parent element is not
    /// blacklisted.
    fn collect_text(&self, element: ElementRef<'_>) -> String {
        let mut text = String::new();
        for node in element.descendants() {
            if let Some(fragment) = node.value().as_text() {
                let excluded = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map_or(false, |parent| {
                        self.tag_blacklist.contains(parent.value().name())
                    });
                if !excluded {
                    text.push_str(fragment);
                }
            }
        }
        text
    }
}

impl Default for TrecSource {
    fn default() -> Self {
        Self::new(BASE_TAG_BLACKLIST.iter().copied())
    }
}

impl DocumentSource for TrecSource {
    fn documents(&self, path: &Path) -> Result<Vec<Document>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading collection file {}", path.display()))?;
        let html = Html::parse_document(&contents);
        let doc_selector = Selector::parse("doc").expect("valid selector");
        let docno_selector = Selector::parse("docno").expect("valid selector");

        let mut documents = Vec::new();
        for element in html.select(&doc_selector) {
            let id = match element.select(&docno_selector).next() {
                Some(docno) => docno.text().collect::<String>().trim().to_string(),
                None => bail!("document without DOCNO in {}", path.display()),
            };
            if id.is_empty() {
                bail!("document with empty DOCNO in {}", path.display());
            }
            documents.push(Document {
                id,
                text: self.collect_text(element),
            });
        }
        Ok(documents)
    }
}

/// One retrieval topic: an id and the title used as query text.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: String,
    pub title: String,
}

/// Reads `<top>` topics. A topic missing its number or title is reported
/// and skipped so one malformed entry cannot sink the batch.
pub fn read_topics(path: &Path) -> Result<Vec<Topic>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading topic file {}", path.display()))?;
    let html = Html::parse_document(&contents);
    let top_selector = Selector::parse("top").expect("valid selector");
    let num_selector = Selector::parse("num").expect("valid selector");
    let title_selector = Selector::parse("title").expect("valid selector");

    let mut topics = Vec::new();
    for element in html.select(&top_selector) {
        let id = element
            .select(&num_selector)
            .next()
            .map(|num| num.text().collect::<String>().trim().to_string());
        let title = element
            .select(&title_selector)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string());
        match (id, title) {
            (Some(id), Some(title)) if !id.is_empty() && !title.is_empty() => {
                topics.push(Topic { id, title });
            }
            _ => tracing::warn!(
                path = %path.display(),
                "skipping topic without number or title"
            ),
        }
    }
    Ok(topics)
}
