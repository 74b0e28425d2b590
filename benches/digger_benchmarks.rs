//! # Digger Performance Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench text
//! cargo bench dig
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use digger::dig::{DigOptions, Digger};
use digger::expand::derive_initial_predicates;
use digger::song::Song;
use digger::store::MemoryStore;
use digger::text;
use std::hint::black_box;

const ARTISTS: [&str; 8] = [
    "Kay",
    "Dee & Ell",
    "Em feat. Enn",
    "Oh x Pea",
    "Queue (Arr, Ess)",
    "Tee / You",
    "Vee・Double",
    "Ex from Why",
];

const GENRES: [&str; 4] = ["House", "House / Garage", "Techno (Minimal)", "Jungle"];

/// Synthetic library with overlapping credits.
fn create_benchmark_library(size: u64) -> MemoryStore {
    let songs = (0..size)
        .map(|id| {
            let i = usize::try_from(id).unwrap_or(0);
            let artist = ARTISTS[i % ARTISTS.len()];
            let remixer = ARTISTS[(i / 3) % ARTISTS.len()];
            Song {
                id,
                title: Some(format!("Track {id} ({remixer} Remix)")),
                artist: Some(artist.to_string()),
                composer: Some(ARTISTS[(i + 1) % ARTISTS.len()].to_string()),
                album_title: Some(format!("Album {}", id / 12)),
                album_artist: Some(artist.to_string()),
                album_id: Some(id / 12),
                genre: Some(GENRES[i % GENRES.len()].to_string()),
                user_grouping: Some(format!("Group {}", id % 5)),
                ..Song::default()
            }
        })
        .collect();
    MemoryStore::from_songs(songs)
}

fn bench_text_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    group.bench_function("split_into_sub_artists", |b| {
        b.iter(|| text::split_into_sub_artists(black_box("a (b), c (d) from x feat. y & z")));
    });
    group.bench_function("split_into_sub_genres", |b| {
        b.iter(|| text::split_into_sub_genres(black_box("hoge (fuga / piyo) / moge")));
    });
    group.bench_function("extract_remixers_credit", |b| {
        b.iter(|| text::extract_remixers_credit(black_box("Night Drive (DJ Nantoka Remix) [Foo Rework]")));
    });
    group.bench_function("extract_featured_artists", |b| {
        b.iter(|| text::extract_featured_artists(black_box("Night Drive feat. Foo & Bar (Baz Remix)")));
    });

    group.finish();
}

fn bench_expansion(c: &mut Criterion) {
    let store = create_benchmark_library(16);
    let seed = store.library().songs[10].clone();

    c.bench_function("derive_initial_predicates", |b| {
        b.iter(|| derive_initial_predicates(black_box(&seed), true));
    });
}

fn bench_dig(c: &mut Criterion) {
    let mut group = c.benchmark_group("dig");
    group.sample_size(20);

    for size in [500u64, 2_000] {
        let store = create_benchmark_library(size);
        let seed = store.library().songs[7].clone();

        for depth in [1usize, 2] {
            let options = DigOptions {
                include_genre_and_grouping: true,
                depth,
                limit: None,
            };
            group.bench_with_input(
                BenchmarkId::new(format!("depth_{depth}"), size),
                &options,
                |b, options| {
                    b.iter(|| Digger::new(&store).dig(black_box(&seed), options));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_text_heuristics, bench_expansion, bench_dig);
criterion_main!(benches);
