use cellar_engine::{
    core::{Language, SearchCandidate, WineGuess},
    drink::{classify, DrinkWindow},
    ranking::{rank, Ranker, SignalRanker},
    text::normalize,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_test_candidates(count: usize) -> Vec<SearchCandidate> {
    (0..count)
        .map(|i| {
            let language = if i % 2 == 0 { Language::En } else { Language::Fr };
            SearchCandidate::new(
                language,
                format!("Domaine Test {}", i),
                format!(
                    "Domaine Test {} is a wine estate in Bourgogne producing pinot noir since {}",
                    i,
                    1950 + (i % 70)
                ),
            )
        })
        .collect()
}

fn bench_signal_ranking(c: &mut Criterion) {
    let ranker = SignalRanker::new();
    let guess = WineGuess::new("Domaine Test", "Pinot Noir", "2015");

    let candidates_12 = create_test_candidates(12);
    let candidates_24 = create_test_candidates(24);
    let candidates_100 = create_test_candidates(100);

    c.bench_function("signal_rank_12", |b| {
        b.iter(|| black_box(ranker.rank(&guess, &candidates_12)));
    });

    c.bench_function("signal_rank_24", |b| {
        b.iter(|| black_box(ranker.rank(&guess, &candidates_24)));
    });

    c.bench_function("signal_rank_100", |b| {
        b.iter(|| black_box(ranker.rank(&guess, &candidates_100)));
    });

    c.bench_function("rank_to_matches_24", |b| {
        b.iter(|| black_box(rank("Domaine Test", "Pinot Noir", "2015", &candidates_24)));
    });
}

fn bench_helpers(c: &mut Criterion) {
    c.bench_function("normalize_snippet", |b| {
        b.iter(|| {
            black_box(normalize(
                "Château Margaux &amp; Pavillon Rouge — premier grand cru classé (1855), Médoc",
            ))
        });
    });

    c.bench_function("classify_window", |b| {
        let window = DrinkWindow::new(Some(2020), Some(2030));
        b.iter(|| black_box(classify(black_box(window), black_box(2024))));
    });
}

criterion_group!(benches, bench_signal_ranking, bench_helpers);
criterion_main!(benches);
