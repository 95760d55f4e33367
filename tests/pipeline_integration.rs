use std::collections::BTreeSet;

use plagscan::{
    from_tokens, CandidateDocument, DistinctConfig, Engine, EngineConfig, NormalizeConfig,
    PlagiarismLevel, SchedulerConfig,
};

const REFERENCE: &str =
    "Copper kettles whistle softly beneath amber lanterns, while sleepy merchants count silver.";

fn numbered(prefix: &str, range: std::ops::Range<usize>) -> String {
    range
        .map(|i| format!("{prefix}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).expect("default config is valid")
}

#[tokio::test]
async fn close_copy_flags_whole_reference() {
    let candidates = vec![
        CandidateDocument::new(
            "a",
            "Yesterday copper kettles whistle softly beneath amber lanterns while sleepy travelers argue.",
        ),
        CandidateDocument::new(
            "b",
            "Copper kettles whistle softly beneath purple dragons dance around frozen castles tonight.",
        ),
    ];

    let report = engine().run(REFERENCE, candidates, None).await.unwrap();
    let summary = &report.summary;

    assert_eq!(summary.reference_tokens, 12);
    assert_eq!(summary.candidates.len(), 2);
    assert_eq!(summary.candidates[0].candidate_id, "a");
    assert_eq!(summary.candidates[0].matched_ids.len(), 12);
    assert_eq!(summary.candidates[0].percentage, 100.0);
    assert_eq!(summary.candidates[0].display_color.name, "Seafoam");
    assert!(summary.candidates[1].matched_ids.is_empty());
    assert_eq!(summary.candidates[1].display_color.name, "Powder Blue");
    assert_eq!(summary.overall_percentage, 100.0);
    assert_eq!(summary.level, PlagiarismLevel::High);
    assert!(report.failures.is_empty());
    assert!(report.distinct.is_none());
}

#[tokio::test]
async fn percentages_and_attribution() {
    let reference = numbered("r", 0..100);
    let candidates = vec![
        CandidateDocument::new("early", numbered("r", 0..30)),
        CandidateDocument::new("late", numbered("r", 50..70)),
    ];

    let report = engine().run(&reference, candidates, None).await.unwrap();
    let summary = &report.summary;

    // Windows flag every reference window within 4 offsets of a copied one,
    // so matches spill 4 tokens past each copied span.
    let early = &summary.candidates[0];
    assert_eq!(early.matched_ids, (0..34).collect::<BTreeSet<u32>>());
    assert_eq!(early.percentage, 34.0);

    let late = &summary.candidates[1];
    assert_eq!(late.matched_ids, (46..74).collect::<BTreeSet<u32>>());
    assert_eq!(late.percentage, 28.0);

    assert_eq!(summary.matched_tokens, 62);
    assert_eq!(summary.overall_percentage, 62.0);

    let owners = report.attribution();
    assert_eq!(owners[&0], 0);
    assert_eq!(owners[&50], 1);
    assert!(!owners.contains_key(&40));
}

#[tokio::test]
async fn results_do_not_depend_on_pool_shape() {
    let reference = numbered("r", 0..80);
    let candidates: Vec<CandidateDocument> = (0..7)
        .map(|i| CandidateDocument::new(format!("c{i}"), numbered("r", i * 10..i * 10 + 15)))
        .collect();

    let baseline = engine()
        .run(&reference, candidates.clone(), None)
        .await
        .unwrap();

    for (pool_size, batch_size) in [(1, 1), (2, 3), (8, 1), (3, 7)] {
        let cfg = EngineConfig {
            scheduler: SchedulerConfig::new()
                .with_pool_size(pool_size)
                .with_batch_size(batch_size),
            ..Default::default()
        };
        let report = Engine::new(cfg)
            .unwrap()
            .run(&reference, candidates.clone(), None)
            .await
            .unwrap();
        assert_eq!(report.summary, baseline.summary, "pool={pool_size} batch={batch_size}");
    }
}

fn scale_candidates(count: usize) -> Vec<CandidateDocument> {
    // Each candidate shares exactly one reference trigram and nothing else.
    (0..count)
        .map(|i| {
            let start = i * 10;
            let text = format!(
                "c{i}x c{i}y r{} r{} r{} c{i}z",
                start,
                start + 1,
                start + 2
            );
            CandidateDocument::new(format!("cand-{i}"), text)
        })
        .collect()
}

#[tokio::test]
async fn distinctiveness_switches_on_above_fifteen_candidates() {
    let reference = numbered("r", 0..200);

    let small = engine()
        .run(&reference, scale_candidates(15), None)
        .await
        .unwrap();
    assert!(small.distinct.is_none());
    assert_eq!(small.summary.overall_percentage, 0.0);
    assert_eq!(small.summary.level, PlagiarismLevel::Low);

    let large = engine()
        .run(&reference, scale_candidates(16), None)
        .await
        .unwrap();
    let distinct = large.distinct.as_ref().expect("pass runs for 16 candidates");
    assert_eq!(distinct.distinctive_trigrams, 16);
    assert_eq!(distinct.ids_added, 48);
    for (i, candidate) in large.summary.candidates.iter().enumerate() {
        let start = (i * 10) as u32;
        assert_eq!(
            candidate.matched_ids,
            BTreeSet::from([start, start + 1, start + 2])
        );
        assert_eq!(candidate.percentage, 1.5);
    }
    assert_eq!(large.summary.overall_percentage, 24.0);
    assert_eq!(large.summary.level, PlagiarismLevel::Moderate);
}

#[tokio::test]
async fn distinctiveness_can_be_disabled() {
    let cfg = EngineConfig {
        distinct: DistinctConfig::new().with_enabled(false),
        ..Default::default()
    };
    let report = Engine::new(cfg)
        .unwrap()
        .run(&numbered("r", 0..200), scale_candidates(20), None)
        .await
        .unwrap();
    assert!(report.distinct.is_none());
    assert_eq!(report.summary.matched_tokens, 0);
}

#[tokio::test]
async fn shared_trigram_across_candidates_is_not_distinctive() {
    let reference = numbered("r", 0..200);
    let mut candidates = scale_candidates(16);
    // A second owner for candidate 0's trigram.
    candidates.push(CandidateDocument::new("echo", "e1 e2 r0 r1 r2 e3"));

    let report = engine().run(&reference, candidates, None).await.unwrap();
    assert!(report.summary.candidates[0].matched_ids.is_empty());
    assert!(report.summary.candidates[16].matched_ids.is_empty());
    assert_eq!(report.summary.candidates[1].matched_ids.len(), 3);
}

#[tokio::test]
async fn prepared_reference_is_reusable() {
    let engine = engine();
    let reference = engine.prepare_reference(&numbered("r", 0..60)).unwrap();
    let candidates = vec![CandidateDocument::new("x", numbered("r", 10..40))];

    let first = engine
        .run_prepared(reference.clone(), candidates.clone(), None)
        .await
        .unwrap();
    let second = engine
        .run_prepared(reference, candidates, None)
        .await
        .unwrap();
    assert_eq!(first.summary, second.summary);
    assert!(first.summary.overall_percentage > 0.0);
}

#[tokio::test]
async fn pre_tokenized_reference_keeps_external_ids() {
    let engine = engine();
    let raw: Vec<(u32, String)> = (0..30).map(|i| (i * 2, format!("Word{i}"))).collect();
    let tokens = from_tokens(raw, &NormalizeConfig::default()).unwrap();
    let reference = engine.prepare_reference_tokens(&tokens).unwrap();

    let report = engine
        .run_prepared(
            reference,
            vec![CandidateDocument::new("copy", numbered("word", 0..30))],
            None,
        )
        .await
        .unwrap();
    let ids = &report.summary.candidates[0].matched_ids;
    assert_eq!(ids.len(), 30);
    assert!(ids.iter().all(|id| id % 2 == 0));
    assert_eq!(report.summary.overall_percentage, 100.0);
}
