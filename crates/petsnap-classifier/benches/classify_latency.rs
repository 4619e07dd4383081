//! Latency benchmarks for the classification pipeline
//!
//! Measures the service overhead (guard, lifecycle check, size query bridge)
//! around the random backend, and the size query bridge on its own.
//!
//! Run with: cargo bench -p petsnap-classifier

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

use petsnap_classifier::{query_size, PetClassifier, RandomBackend, StaticImageSizeProvider};

fn provider() -> StaticImageSizeProvider {
    StaticImageSizeProvider::new()
        .with_image("small.jpg", 64, 64)
        .with_image("photo.jpg", 4032, 3024)
}

/// Full classify call on a warm service
fn benchmark_classify(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let classifier = PetClassifier::new(Arc::new(RandomBackend::new()), Arc::new(provider()));
    assert!(rt.block_on(classifier.load_model()));

    let mut group = c.benchmark_group("PetClassifier");
    group.sample_size(100);

    for image in ["small.jpg", "photo.jpg"] {
        group.bench_with_input(BenchmarkId::new("classify", image), &image, |b, image| {
            b.iter(|| {
                rt.block_on(async { classifier.classify(black_box(image)).await.unwrap() })
            });
        });
    }

    group.finish();
}

/// Callback-to-future bridge alone
fn benchmark_size_query(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let provider = provider();

    c.bench_function("query_size", |b| {
        b.iter(|| rt.block_on(async { query_size(&provider, black_box("photo.jpg")).await.unwrap() }));
    });
}

criterion_group!(benches, benchmark_classify, benchmark_size_query);
criterion_main!(benches);
