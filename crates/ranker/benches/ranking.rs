//! Benchmarks for the ranking routine
//!
//! Run with: cargo bench --package ranker
//!
//! Pools of a few hundred movies are the expected size (several pages of
//! popular movies); ranking should stay far below a frame budget.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use data_loader::{GenreSelection, Movie};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ranker::{ExclusionSet, Ranker};

fn synthetic_pool(size: u32) -> Vec<Movie> {
    const GENRES: [u32; 8] = [28, 12, 16, 35, 80, 18, 27, 878];
    (0..size)
        .map(|id| {
            let genres = (0..(id % 4))
                .map(|k| GENRES[((id + k) % GENRES.len() as u32) as usize])
                .collect();
            Movie::new(
                id,
                format!("Movie {}", id),
                genres,
                (id % 500) as f64,
                (id % 100) as f64 / 10.0,
            )
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let ranker = Ranker::default();
    let selected: GenreSelection = [28, 878].into_iter().collect();
    let mut group = c.benchmark_group("rank");

    for size in [100u32, 400, 2000] {
        let pool = synthetic_pool(size);
        let exclude: ExclusionSet = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(1);

        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| {
                let batch = ranker.rank(black_box(pool), &selected, &exclude, &mut rng);
                black_box(batch)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
