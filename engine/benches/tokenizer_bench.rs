use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::{extract, DEFAULT_SEPARATORS};

fn bench_extract(c: &mut Criterion) {
    let text =
        "The quick brown fox jumps over the lazy dog; again (and again), twice!\n".repeat(256);
    c.bench_function("extract_paragraphs", |b| {
        b.iter(|| extract(&text, &DEFAULT_SEPARATORS, None, None))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
