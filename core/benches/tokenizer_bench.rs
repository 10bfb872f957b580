use criterion::{criterion_group, criterion_main, Criterion};
use watson_core::Normalizer;

const TEXT: &str = "The Seine river flows through Paris, the capital of France. \
Its banks were declared a World Heritage Site in 1991, and the city's bridges \
number thirty-seven within the limits of the commune.";

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new();
    c.bench_function("normalize_document", |b| b.iter(|| normalizer.normalize_document(TEXT)));
    c.bench_function("normalize_query", |b| b.iter(|| normalizer.normalize_query("City of light CAPITALS")));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
