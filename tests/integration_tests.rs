use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;

use viral_niche_scanner::clustering::{RuleBasedClusterer, StatisticalClusterer};
use viral_niche_scanner::config::AnalysisConfig;
use viral_niche_scanner::keywords::{LinguisticExtractor, RuleBasedExtractor};
use viral_niche_scanner::{
    Channel, ConfigBuilder, ContentClusterer, Item, ItemMetrics, KeywordExtractor, MetricsEngine,
    NicheAggregate, NicheAggregator, NichePipeline, NicheRanker, NicheTaxonomy, RankingProfile,
    ScoredItem,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

const TITLES: &[&str] = &[
    "black hole facts that break physics",
    "what is inside a black hole",
    "galaxy collision explained in space",
    "crypto trading mistakes to avoid",
    "how bitcoin made me money",
    "passive income with crypto",
    "easy pasta recipe in 5 minutes",
    "chef reveals kitchen secret",
    "ai robot does your homework",
    "new ai tech you missed",
    "morning workout for busy people",
    "zzz",
];

fn corpus() -> Vec<ScoredItem> {
    let engine = MetricsEngine::new();
    TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let item = Item::new(format!("v{}", i), *title)
                .with_channel(format!("c{}", i % 4))
                .with_published_at(now() - Duration::days(i as i64))
                .with_stats(100_000 * (i as u64 + 1), 5_000 * i as u64, 300);
            engine.score(item, None, now())
        })
        .collect()
}

fn assert_partition(clusterer: &dyn ContentClusterer, items: &[ScoredItem]) {
    let niches = clusterer.cluster(items);
    let ids: Vec<&str> = niches.iter().flat_map(|n| n.item_ids()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    let expected: HashSet<&str> = items.iter().map(|s| s.id()).collect();

    assert_eq!(ids.len(), items.len(), "an item was dropped or duplicated");
    assert_eq!(unique, expected);
    assert!(niches.iter().all(|n| !n.is_empty()));
}

#[test]
fn test_metrics_invariants_hold_for_all_items() {
    let engine = MetricsEngine::new();
    let channel = Channel::new("c", "C")
        .with_created_at(now() - Duration::days(3))
        .with_stats(10, 1, 50_000_000);

    for days in [-5i64, 0, 1, 7, 400] {
        for views in [0u64, 1, 10_000_000] {
            let item = Item::new("v", "t")
                .with_published_at(now() - Duration::days(days))
                .with_stats(views, views, views);
            let metrics = engine.compute_at(&item, Some(&channel), now());
            assert!(metrics.days_since_published >= 1);
            assert!((0.0..=100.0).contains(&metrics.viral_score));
        }
    }
}

#[test]
fn test_ninety_point_scenario() {
    let item = Item::new("v", "t")
        .with_published_at(now() - Duration::days(1))
        .with_stats(1_000_000, 50_000, 5_000);
    let channel = Channel::new("c", "C")
        .with_created_at(now() - Duration::days(10))
        .with_stats(0, 5, 600_000);

    let metrics = MetricsEngine::new().compute_at(&item, Some(&channel), now());
    assert_eq!(metrics.views_per_day, 1_000_000.0);
    assert!((metrics.engagement_ratio - 0.055).abs() < 1e-12);
    assert_eq!(metrics.viral_score, 90.0);
}

#[test]
fn test_statistical_clusterer_partitions() {
    let items = corpus();
    let clusterer =
        StatisticalClusterer::new(AnalysisConfig::default(), Box::new(RuleBasedExtractor::new()));
    assert_partition(&clusterer, &items);
    assert_partition(&clusterer, &items[..5]);
    assert_partition(&clusterer, &items[..2]);
}

#[test]
fn test_rule_based_clusterer_partitions() {
    let items = corpus();
    let clusterer = RuleBasedClusterer::new(NicheTaxonomy::default());
    assert_partition(&clusterer, &items);
    assert_partition(&clusterer, &items[..5]);
    assert_partition(&clusterer, &items[..1]);
}

#[test]
fn test_clusterers_are_deterministic() {
    let items = corpus();
    let statistical =
        StatisticalClusterer::new(AnalysisConfig::default(), Box::new(LinguisticExtractor::new()));
    assert_eq!(statistical.cluster(&items), statistical.cluster(&items));

    let rule_based = RuleBasedClusterer::new(NicheTaxonomy::default());
    assert_eq!(rule_based.cluster(&items), rule_based.cluster(&items));
}

#[test]
fn test_empty_inputs() {
    let statistical =
        StatisticalClusterer::new(AnalysisConfig::default(), Box::new(RuleBasedExtractor::new()));
    assert!(statistical.cluster(&[]).is_empty());
    assert!(RuleBasedClusterer::new(NicheTaxonomy::default()).cluster(&[]).is_empty());

    let aggregate = NicheAggregator::new(Box::new(RuleBasedExtractor::new())).aggregate(&[]);
    assert_eq!(aggregate, NicheAggregate::default());
}

#[test]
fn test_extractors_never_fail() {
    let extractors: Vec<Box<dyn KeywordExtractor>> = vec![
        Box::new(LinguisticExtractor::new()),
        Box::new(RuleBasedExtractor::new()),
    ];
    for extractor in &extractors {
        assert!(extractor.extract("").is_empty());
        assert!(!extractor.extract("Amazing ocean creatures!!").is_empty());
        let _ = extractor.extract("🔥🔥 #shorts ...");
    }
}

#[test]
fn test_rank_sorted_and_skips_empty_niches() {
    let items = corpus();
    let clusterer = RuleBasedClusterer::new(NicheTaxonomy::default());
    let aggregator = NicheAggregator::new(Box::new(RuleBasedExtractor::new()));

    let mut aggregates: Vec<(String, NicheAggregate)> = clusterer
        .cluster(&items)
        .iter()
        .map(|n| (n.name.clone(), aggregator.aggregate(&n.items)))
        .collect();
    aggregates.push(("Nothing".to_string(), NicheAggregate::default()));

    for profile in [RankingProfile::Statistical, RankingProfile::RuleBased] {
        let ranked = NicheRanker::new(profile).rank(&aggregates);
        assert_eq!(ranked.len(), aggregates.len() - 1);
        assert!(ranked.iter().all(|r| r.niche_name != "Nothing"));
        assert!(ranked.windows(2).all(|w| w[0].ranking_score >= w[1].ranking_score));
        assert!(ranked.iter().all(|r| (0.0..=100.0).contains(&r.ranking_score)));
    }
}

#[test]
fn test_pipeline_analyze_both_strategies() {
    let items = corpus();
    for strategy in [
        viral_niche_scanner::ClusterStrategy::Statistical,
        viral_niche_scanner::ClusterStrategy::RuleBased,
    ] {
        let config = ConfigBuilder::new().with_strategy(strategy).build();
        let pipeline = NichePipeline::new(config).unwrap();
        let ranked = pipeline.analyze(&items);

        let total: usize = ranked.iter().map(|r| r.analysis.total_videos).sum();
        assert_eq!(total, items.len());
    }
}

#[test]
fn test_default_metrics_for_missing_data() {
    let mut item = Item::new("v", "t").with_stats(10, 1, 1);
    item.published_at = None;
    let metrics = MetricsEngine::new().compute_at(&item, None, now());
    assert_eq!(metrics, ItemMetrics::default());
}
