use std::fs;
use std::path::PathBuf;

use runner::run::{execute, RunConfig, WeightingKind};

fn write_corpus(dir: &std::path::Path) -> (PathBuf, PathBuf, PathBuf) {
    let collection = dir.join("collection");
    fs::create_dir_all(&collection).unwrap();
    fs::write(
        collection.join("part0.sgml"),
        "<DOC><DOCNO>1</DOCNO><TEXT>cat dog cat</TEXT></DOC>\n\
         <DOC><DOCNO>2</DOCNO><TEXT>dog dog fish</TEXT></DOC>\n",
    )
    .unwrap();

    let topics = dir.join("topics.sgml");
    fs::write(
        &topics,
        "<top><num>10</num><title>cat dog</title></top>\n\
         <top><num>11</num><title>the</title></top>\n\
         <top><num>12</num><title>fish</title></top>\n",
    )
    .unwrap();

    let stopword_file = dir.join("stop.txt");
    fs::write(&stopword_file, "the\n").unwrap();

    (collection, topics, stopword_file)
}

#[test]
fn natural_run_produces_exact_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (collection, topics, stopword_file) = write_corpus(dir.path());
    let output = dir.path().join("run.txt");

    let mut config = RunConfig::new("base");
    config.stopwords = Some(stopword_file);
    config.quiet = true;
    execute(&collection, &topics, &output, &config).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    // Topic 10 ranks both documents, topic 11 is all stopwords and yields
    // nothing, topic 12 matches one document.
    assert_eq!(lines.len(), 3);

    // Query {cat: 1, dog: 1}, norm sqrt(2): doc 1 scores 3/sqrt(10),
    // doc 2 scores 1/sqrt(2). Expected values follow the accumulation
    // shape of the scorer so the printed digits match exactly.
    let query_weight = 1.0 / 2f64.sqrt();
    let first = (query_weight * 2.0 + query_weight * 1.0) / 5f64.sqrt();
    let second = (query_weight * 2.0) / 4f64.sqrt();
    assert_eq!(lines[0], format!("10\t0\t1\t0\t{first}\tbase"));
    assert_eq!(lines[1], format!("10\t0\t2\t1\t{second}\tbase"));
    assert_eq!(lines[2], "12\t0\t2\t0\t1\tbase");
}

#[test]
fn tf_idf_run_ranks_the_two_term_document_first() {
    let dir = tempfile::tempdir().unwrap();
    let (collection, topics, _) = write_corpus(dir.path());
    let output = dir.path().join("run.txt");

    let mut config = RunConfig::new("tfidf-run");
    config.weighting = WeightingKind::TfIdf;
    config.quiet = true;
    execute(&collection, &topics, &output, &config).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let topic_10: Vec<Vec<&str>> = written
        .lines()
        .filter(|line| line.starts_with("10\t"))
        .map(|line| line.split('\t').collect())
        .collect();
    assert_eq!(topic_10.len(), 2);
    assert_eq!(topic_10[0][2], "1");
    assert_eq!(topic_10[1][2], "2");
    let first: f64 = topic_10[0][4].parse().unwrap();
    let second: f64 = topic_10[1][4].parse().unwrap();
    assert!(first > second);
    assert!(topic_10.iter().all(|fields| fields[5] == "tfidf-run"));
}

#[test]
fn empty_collections_produce_empty_runs() {
    let dir = tempfile::tempdir().unwrap();
    let collection = dir.path().join("collection");
    fs::create_dir_all(&collection).unwrap();
    fs::write(collection.join("empty.sgml"), "\n").unwrap();
    let topics = dir.path().join("topics.sgml");
    fs::write(&topics, "<top><num>10</num><title>cat</title></top>\n").unwrap();
    let output = dir.path().join("run.txt");

    let mut config = RunConfig::new("empty");
    config.quiet = true;
    execute(&collection, &topics, &output, &config).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn missing_topic_files_fail_before_indexing() {
    let dir = tempfile::tempdir().unwrap();
    let (collection, _, _) = write_corpus(dir.path());
    let output = dir.path().join("run.txt");

    let mut config = RunConfig::new("broken");
    config.quiet = true;
    let missing = dir.path().join("nonexistent-topics.sgml");
    assert!(execute(&collection, &missing, &output, &config).is_err());
    assert!(!output.exists());
}
