use criterion::{criterion_group, criterion_main, Criterion};
use newsdex_core::postings::intersect;
use newsdex_core::tokenizer::tokenize;
use newsdex_core::{IndexBuilder, IndexConfig, NewsIndex, NewsRecord};

const WORDS: [&str; 12] =
    ["gato", "perro", "arbol", "sube", "baja", "casa", "rio", "sol", "luna", "mar", "tierra", "viento"];

fn synthetic_index() -> NewsIndex {
    let records: Vec<NewsRecord> = (0..5_000)
        .map(|i| {
            let article = (0..40).map(|j| WORDS[(i * 7 + j * j) % WORDS.len()]).collect::<Vec<_>>().join(" ");
            NewsRecord { article, ..NewsRecord::default() }
        })
        .collect();
    let cfg = IndexConfig { positional: true, permuterm: true, stemming: true, ..IndexConfig::default() };
    let mut builder = IndexBuilder::new(cfg);
    builder.add_document("synthetic.json", &records);
    builder.finish()
}

fn bench_tokenize(c: &mut Criterion) {
    let text = WORDS.join(", ").repeat(50);
    c.bench_function("tokenize_article", |b| b.iter(|| tokenize(&text)));
}

fn bench_intersect(c: &mut Criterion) {
    let long: Vec<u32> = (0..100_000).collect();
    let short: Vec<u32> = (0..100_000).step_by(997).collect();
    c.bench_function("intersect_skewed", |b| b.iter(|| intersect(&long, &short)));
}

fn bench_queries(c: &mut Criterion) {
    let idx = synthetic_index();
    c.bench_function("boolean_query", |b| b.iter(|| idx.search("(gato OR perro) AND NOT luna").unwrap()));
    c.bench_function("phrase_query", |b| b.iter(|| idx.search("\"sube al arbol\"").unwrap()));
    c.bench_function("wildcard_query", |b| b.iter(|| idx.search("*a AND s?l").unwrap()));
}

criterion_group!(benches, bench_tokenize, bench_intersect, bench_queries);
criterion_main!(benches);
