use niche_core::ScoredItem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::keywords::{rank_by_frequency, KeywordExtractor};

/// Number of top items kept per niche
pub const TOP_ITEMS: usize = 3;

/// Number of keywords kept per niche
pub const TOP_KEYWORDS: usize = 10;

/// Performance summary of one niche
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NicheAggregate {
    pub total_videos: usize,
    pub unique_channels: usize,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_views_per_day: f64,

    /// (total likes + total comments) / max(total views, 1)
    pub avg_engagement_ratio: f64,
    pub avg_viral_score: f64,
    pub total_views: u64,

    /// Total likes plus total comments
    pub total_engagement: u64,

    /// Highest viral scores first; equal scores keep input order
    pub top_videos: Vec<ScoredItem>,
    pub top_keywords: Vec<String>,
}

impl NicheAggregate {
    pub fn is_empty(&self) -> bool {
        self.total_videos == 0
    }
}

/// Builds [`NicheAggregate`]s
pub struct NicheAggregator {
    extractor: Box<dyn KeywordExtractor>,
}

impl NicheAggregator {
    pub fn new(extractor: Box<dyn KeywordExtractor>) -> Self {
        Self { extractor }
    }

    /// Summarise a niche's items. Empty input gives the zero aggregate.
    pub fn aggregate(&self, items: &[ScoredItem]) -> NicheAggregate {
        if items.is_empty() {
            return NicheAggregate::default();
        }

        let count = items.len() as f64;
        let total_views = saturating_total(items, ScoredItem::views);
        let total_likes = saturating_total(items, ScoredItem::likes);
        let total_comments = saturating_total(items, ScoredItem::comments);
        let total_engagement = total_likes.saturating_add(total_comments);

        let unique_channels = items
            .iter()
            .map(|s| s.item.channel_id.as_str())
            .filter(|id| !id.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let mut top_videos = items.to_vec();
        top_videos.sort_by(|a, b| {
            b.viral_score()
                .partial_cmp(&a.viral_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        top_videos.truncate(TOP_ITEMS);

        let titles: Vec<&str> = items.iter().map(|s| s.item.title.as_str()).collect();
        let top_keywords = rank_by_frequency(self.extractor.extract(&titles.join(" ")))
            .into_iter()
            .take(TOP_KEYWORDS)
            .map(|(keyword, _)| keyword)
            .collect();

        let aggregate = NicheAggregate {
            total_videos: items.len(),
            unique_channels,
            avg_views: mean(items, ScoredItem::views),
            avg_likes: mean(items, ScoredItem::likes),
            avg_comments: mean(items, ScoredItem::comments),
            avg_views_per_day: items.iter().map(|s| s.metrics.views_per_day).sum::<f64>() / count,
            avg_engagement_ratio: total_engagement as f64 / total_views.max(1) as f64,
            avg_viral_score: items.iter().map(ScoredItem::viral_score).sum::<f64>() / count,
            total_views,
            total_engagement,
            top_videos,
            top_keywords,
        };

        debug!(
            "Aggregated {} items: avg_vpd={:.1}, engagement={:.4}",
            aggregate.total_videos, aggregate.avg_views_per_day, aggregate.avg_engagement_ratio
        );
        aggregate
    }
}

/// Totals clamp at `u64::MAX` instead of wrapping
fn saturating_total(items: &[ScoredItem], count: fn(&ScoredItem) -> u64) -> u64 {
    items.iter().map(count).fold(0u64, u64::saturating_add)
}

fn mean(items: &[ScoredItem], count: fn(&ScoredItem) -> u64) -> f64 {
    items.iter().map(|s| count(s) as f64).sum::<f64>() / items.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::RuleBasedExtractor;
    use niche_core::{Item, ItemMetrics};

    fn scored(id: &str, title: &str, channel: &str, views: u64, score: f64) -> ScoredItem {
        let item = Item::new(id, title)
            .with_channel(channel)
            .with_stats(views, views / 20, views / 100);
        let metrics = ItemMetrics {
            viral_score: score,
            views_per_day: views as f64 / 2.0,
            ..ItemMetrics::default()
        };
        ScoredItem::new(item, metrics)
    }

    fn aggregator() -> NicheAggregator {
        NicheAggregator::new(Box::new(RuleBasedExtractor::new()))
    }

    fn items() -> Vec<ScoredItem> {
        vec![
            scored("a", "deep ocean creatures", "c1", 1_000, 40.0),
            scored("b", "ocean mysteries", "c2", 3_000, 70.0),
            scored("c", "ocean facts", "c1", 2_000, 70.0),
            scored("d", "sharks", "", 4_000, 10.0),
        ]
    }

    #[test]
    fn test_aggregate_values() {
        let aggregate = aggregator().aggregate(&items());

        assert_eq!(aggregate.total_videos, 4);
        assert_eq!(aggregate.unique_channels, 2);
        assert_eq!(aggregate.total_views, 10_000);
        assert_eq!(aggregate.total_engagement, 500 + 100);
        assert!((aggregate.avg_views - 2_500.0).abs() < 1e-9);
        assert!((aggregate.avg_views_per_day - 1_250.0).abs() < 1e-9);
        assert!((aggregate.avg_engagement_ratio - 0.06).abs() < 1e-9);
        assert!((aggregate.avg_viral_score - 47.5).abs() < 1e-9);
        assert_eq!(aggregate.top_keywords[0], "ocean");
    }

    #[test]
    fn test_top_videos_stable_on_ties() {
        let aggregate = aggregator().aggregate(&items());
        let ids: Vec<&str> = aggregate.top_videos.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_empty_input_gives_zero_aggregate() {
        let aggregate = aggregator().aggregate(&[]);
        assert!(aggregate.is_empty());
        assert_eq!(aggregate, NicheAggregate::default());
    }

    #[test]
    fn test_aggregate_is_pure() {
        let items = items();
        let a = aggregator();
        assert_eq!(a.aggregate(&items), a.aggregate(&items));
    }

    #[test]
    fn test_huge_counts_saturate() {
        let huge = i64::MAX as u64;
        let items: Vec<ScoredItem> = (0..3)
            .map(|i| {
                let item = Item::new(format!("v{}", i), "huge")
                    .with_stats(huge, huge, huge);
                ScoredItem::new(item, ItemMetrics::default())
            })
            .collect();

        let aggregate = aggregator().aggregate(&items);
        assert_eq!(aggregate.total_views, u64::MAX);
        assert_eq!(aggregate.total_engagement, u64::MAX);
        assert!((aggregate.avg_views - huge as f64).abs() / (huge as f64) < 1e-9);
    }
}
