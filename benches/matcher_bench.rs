use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use plagscan::{
    tokenize_candidate, tokenize_reference, CandidateDocument, DisplayColor, Engine, EngineConfig,
    IndexConfig, MatchConfig, MatchStrategy, Matcher, NormalizeConfig, ReferenceIndex, Stopwords,
};

/// Pseudo-prose over a small vocabulary so windows partially overlap.
fn prose(words: usize, seed: u64) -> String {
    const VOCAB: [&str; 24] = [
        "river", "stone", "bright", "morning", "village", "market", "silver", "quiet", "harbor",
        "lantern", "winter", "garden", "copper", "letter", "window", "forest", "thunder", "meadow",
        "candle", "bridge", "autumn", "shadow", "orchard", "canyon",
    ];
    let mut state = seed;
    (0..words)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            VOCAB[((state >> 33) % VOCAB.len() as u64) as usize]
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn seafoam() -> DisplayColor {
    DisplayColor::new("Seafoam", "#71EEB8AA")
}

fn reference_index(words: usize, cfg: &IndexConfig) -> Arc<ReferenceIndex> {
    let normalize = NormalizeConfig::default();
    let tokens = tokenize_reference(&prose(words, 7), &normalize).expect("reference");
    Arc::new(
        ReferenceIndex::build(&tokens, &Stopwords::from_config(&normalize), cfg)
            .expect("index build"),
    )
}

/// Reference index construction, sequential vs Rayon windows.
fn bench_reference_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_build");
    let normalize = NormalizeConfig::default();
    let stopwords = Stopwords::from_config(&normalize);
    let tokens = tokenize_reference(&prose(20_000, 7), &normalize).expect("reference");

    for parallel in [false, true] {
        let cfg = IndexConfig::new().with_parallel(parallel);
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_function(if parallel { "parallel" } else { "sequential" }, |b| {
            b.iter(|| ReferenceIndex::build(black_box(&tokens), &stopwords, &cfg).expect("build"));
        });
    }
    group.finish();
}

/// One candidate against references of increasing size, per strategy.
fn bench_match_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_strategies");
    let index_cfg = IndexConfig::default();
    let candidate = prose(800, 11);

    for &size in &[500usize, 2_000, 5_000] {
        let reference = reference_index(size, &index_cfg);
        for strategy in [MatchStrategy::Windowed, MatchStrategy::Trigram, MatchStrategy::Hybrid] {
            let matcher = Matcher::new(
                Arc::clone(&reference),
                NormalizeConfig::default(),
                index_cfg.clone(),
                MatchConfig::new().with_strategy(strategy),
            )
            .expect("matcher");
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), size),
                &candidate,
                |b, text| {
                    b.iter(|| {
                        matcher
                            .match_text("bench", 0, seafoam(), black_box(text))
                            .expect("match")
                    });
                },
            );
        }
    }
    group.finish();
}

/// Sampled vs exhaustive windows for a large candidate.
fn bench_large_candidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_candidate");
    group.sample_size(10);
    let text = prose(12_000, 23);
    let normalize = NormalizeConfig::default();
    let tokens = tokenize_candidate(&text, &normalize).expect("candidate");

    for threshold in [10_000usize, 20_000] {
        let index_cfg = IndexConfig::new().with_large_doc_threshold(threshold);
        let reference = reference_index(2_000, &index_cfg);
        let matcher = Matcher::new(reference, normalize.clone(), index_cfg, MatchConfig::default())
            .expect("matcher");
        let label = if threshold < tokens.len() { "sampled" } else { "exhaustive" };
        group.bench_function(label, |b| {
            b.iter(|| {
                matcher
                    .match_tokens("large", 0, seafoam(), black_box(&tokens))
                    .expect("match")
            });
        });
    }
    group.finish();
}

/// Whole engine run across pool sizes.
fn bench_engine_pool(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("engine_pool");
    group.sample_size(10);
    let reference = prose(3_000, 7);
    let candidates: Vec<CandidateDocument> = (0..16)
        .map(|i| CandidateDocument::new(format!("c{i}"), prose(600, 100 + i as u64)))
        .collect();

    for pool_size in [1usize, 2, 4, 8] {
        let mut cfg = EngineConfig::default();
        cfg.scheduler.pool_size = pool_size;
        let engine = Engine::new(cfg).expect("engine");
        group.bench_function(BenchmarkId::from_parameter(pool_size), |b| {
            b.iter(|| {
                runtime
                    .block_on(engine.run(&reference, candidates.clone(), None))
                    .expect("run")
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_reference_build,
    bench_match_strategies,
    bench_large_candidate,
    bench_engine_pool
);
criterion_main!(benches);
