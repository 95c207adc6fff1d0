//! Ranking and search benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use libris_core::{search, top_by_genre, top_overall, BookDraft, CatalogStore};

fn synthetic_catalog(size: usize) -> CatalogStore {
    let genres = ["Fantasy", "Romance", "Science Fiction", "Mystery"];
    let mut catalog = CatalogStore::new();
    for i in 0..size {
        let draft = BookDraft::new(
            format!("Book {}", i),
            format!("Author {}", i % 97),
            genres[i % genres.len()],
            "2001",
        )
        .with_text("...");
        let Ok(id) = catalog.add(&draft) else { continue };
        for _ in 0..(i * 7919 % 13) {
            let _ = catalog.start_reading(id);
            let _ = catalog.finish_reading(id);
        }
    }
    catalog
}

fn ranking_benchmark(c: &mut Criterion) {
    let books = synthetic_catalog(5_000).snapshot();

    c.bench_function("top_overall", |b| {
        b.iter(|| std::hint::black_box(top_overall(&books, 10).len()))
    });
    c.bench_function("top_by_genre", |b| {
        b.iter(|| std::hint::black_box(top_by_genre(&books, "fiction", 10).len()))
    });
    c.bench_function("search", |b| {
        b.iter(|| std::hint::black_box(search(&books, "author 4").len()))
    });
}

criterion_group!(benches, ranking_benchmark);
criterion_main!(benches);
