use criterion::{criterion_group, criterion_main, Criterion};
use tacit_core::knowledge::{KnowledgeUnit, StoredEmbedding};
use tacit_core::traits::IKnowledgeStorage;
use tacit_storage::StorageEngine;

fn bench_storage(c: &mut Criterion) {
    let storage = StorageEngine::open_in_memory().unwrap();
    for i in 0..500 {
        let u = KnowledgeUnit::new_candidate(format!("u{i}"), "bench", format!("unit {i}"), "p", "s");
        storage.create(&u).unwrap();
        storage
            .store_embedding(&StoredEmbedding::new(
                u.id.clone(),
                u.content_hash.clone(),
                "tfidf",
                vec![0.1; 384],
            ))
            .unwrap();
    }

    c.bench_function("list_by_domain_500", |b| {
        b.iter(|| storage.list_by_domain("bench").unwrap())
    });
    c.bench_function("embeddings_for_domain_500", |b| {
        b.iter(|| storage.embeddings_for_domain("bench").unwrap())
    });
}

criterion_group!(benches, bench_storage);
criterion_main!(benches);
