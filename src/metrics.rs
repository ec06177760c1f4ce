//! Per-item viral metrics
//!
//! Every score here is a sum of independently banded components, capped at 100.
//! Missing or malformed inputs never raise: the item receives the default
//! [`ItemMetrics`] instead and processing continues.

use chrono::{DateTime, Utc};
use niche_core::{Channel, Item, ItemMetrics, ScoredItem};
use tracing::{debug, warn};

pub use niche_core::parse_iso8601_duration;

/// Channel age assumed when the creation time is unknown
pub const DEFAULT_CHANNEL_AGE_DAYS: i64 = 365;

/// Maximum composite score
pub const MAX_SCORE: f64 = 100.0;

/// `(lower bound, points)` bands, checked top-down; first match wins
const VIEWS_PER_DAY_BANDS: [(f64, f64); 4] = [
    (100_000.0, 40.0),
    (50_000.0, 30.0),
    (10_000.0, 20.0),
    (1_000.0, 10.0),
];

const ENGAGEMENT_BANDS: [(f64, f64); 4] = [(0.10, 30.0), (0.05, 20.0), (0.02, 15.0), (0.01, 10.0)];

/// `(upper bound in days, points)`: newer channels score higher
const CHANNEL_AGE_BANDS: [(i64, f64); 4] = [(30, 20.0), (90, 15.0), (180, 10.0), (365, 5.0)];

const AVG_VIEWS_PER_VIDEO_BANDS: [(f64, f64); 3] =
    [(100_000.0, 10.0), (50_000.0, 7.0), (10_000.0, 5.0)];

/// Points for the first band whose lower bound `value` reaches
pub(crate) fn band_at_least(value: f64, bands: &[(f64, f64)]) -> f64 {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

fn band_at_most(value: i64, bands: &[(i64, f64)]) -> f64 {
    bands
        .iter()
        .find(|(limit, _)| value <= *limit)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

/// Viral metrics calculator
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute metrics relative to the current time
    pub fn compute(&self, item: &Item, channel: Option<&Channel>) -> ItemMetrics {
        self.compute_at(item, channel, Utc::now())
    }

    /// Compute metrics relative to `now`
    ///
    /// A missing channel record is treated as a channel of unknown age with
    /// no upload statistics.
    pub fn compute_at(
        &self,
        item: &Item,
        channel: Option<&Channel>,
        now: DateTime<Utc>,
    ) -> ItemMetrics {
        let (published_at, views, likes, comments) = match (
            item.published_at,
            item.view_count,
            item.like_count,
            item.comment_count,
        ) {
            (Some(p), Some(v), Some(l), Some(c)) => (p, v, l, c),
            _ => {
                warn!(
                    "Item '{}' is missing publish time or statistics, using default metrics",
                    item.id
                );
                return ItemMetrics::default();
            }
        };

        let days_since_published = whole_days_between(published_at, now).max(1);
        let views_per_day = views as f64 / days_since_published as f64;
        let engagement_ratio = likes.saturating_add(comments) as f64 / views.max(1) as f64;

        let channel_age_days = channel
            .and_then(|c| c.created_at)
            .map(|created| whole_days_between(created, now).max(0))
            .unwrap_or(DEFAULT_CHANNEL_AGE_DAYS);

        let avg_views_per_video = channel.and_then(Channel::avg_views_per_video);

        let viral_score = viral_score(
            views_per_day,
            engagement_ratio,
            channel_age_days,
            avg_views_per_video,
        );

        debug!(
            "Item '{}': vpd={:.1}, engagement={:.4}, channel_age={}d, score={}",
            item.id, views_per_day, engagement_ratio, channel_age_days, viral_score
        );

        ItemMetrics {
            viral_score,
            views_per_day,
            engagement_ratio,
            channel_age_days,
            days_since_published,
        }
    }

    /// Score an item and bundle it with its metrics
    pub fn score(&self, item: Item, channel: Option<&Channel>, now: DateTime<Utc>) -> ScoredItem {
        let metrics = self.compute_at(&item, channel, now);
        ScoredItem::new(item, metrics)
    }
}

/// Compute metrics for one item against the current time
pub fn compute_metrics(item: &Item, channel: Option<&Channel>) -> ItemMetrics {
    MetricsEngine::new().compute(item, channel)
}

/// Composite 0-100 viral score
pub fn viral_score(
    views_per_day: f64,
    engagement_ratio: f64,
    channel_age_days: i64,
    avg_views_per_video: Option<f64>,
) -> f64 {
    let mut score = band_at_least(views_per_day, &VIEWS_PER_DAY_BANDS);
    score += band_at_least(engagement_ratio, &ENGAGEMENT_BANDS);
    score += band_at_most(channel_age_days, &CHANNEL_AGE_BANDS);
    if let Some(avg) = avg_views_per_video {
        score += band_at_least(avg, &AVG_VIEWS_PER_VIDEO_BANDS);
    }
    score.clamp(0.0, MAX_SCORE)
}

/// Whole days elapsed from `from` to `to` (negative when `from` is in the future)
fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_breakout_item_scores_ninety() {
        let item = Item::new("v1", "breakout")
            .with_published_at(now() - Duration::days(1))
            .with_stats(1_000_000, 50_000, 5_000);
        let channel = Channel::new("c1", "new channel")
            .with_created_at(now() - Duration::days(10))
            .with_stats(1_000, 5, 600_000);

        let metrics = MetricsEngine::new().compute_at(&item, Some(&channel), now());

        assert_eq!(metrics.days_since_published, 1);
        assert_eq!(metrics.views_per_day, 1_000_000.0);
        assert!((metrics.engagement_ratio - 0.055).abs() < 1e-12);
        assert_eq!(metrics.channel_age_days, 10);
        assert_eq!(metrics.viral_score, 90.0);
    }

    #[test]
    fn test_same_day_publish_clamps_to_one_day() {
        let item = Item::new("v1", "fresh")
            .with_published_at(now() - Duration::hours(3))
            .with_stats(500, 0, 0);

        let metrics = MetricsEngine::new().compute_at(&item, None, now());
        assert_eq!(metrics.days_since_published, 1);
        assert_eq!(metrics.views_per_day, 500.0);
    }

    #[test]
    fn test_future_publish_time_clamps_to_one_day() {
        let item = Item::new("v1", "clock skew")
            .with_published_at(now() + Duration::days(3))
            .with_stats(100, 0, 0);

        let metrics = MetricsEngine::new().compute_at(&item, None, now());
        assert_eq!(metrics.days_since_published, 1);
    }

    #[test]
    fn test_unknown_channel_defaults_age() {
        let item = Item::new("v1", "t")
            .with_published_at(now() - Duration::days(2))
            .with_stats(2_000, 10, 10);

        let metrics = MetricsEngine::new().compute_at(&item, None, now());
        assert_eq!(metrics.channel_age_days, DEFAULT_CHANNEL_AGE_DAYS);
        // 1000 vpd -> 10, engagement 0.01 -> 10, age 365 -> 5
        assert_eq!(metrics.viral_score, 25.0);
    }

    #[test]
    fn test_missing_inputs_yield_default_metrics() {
        let mut item = Item::new("v1", "no date").with_stats(1_000_000, 1, 1);
        assert_eq!(
            MetricsEngine::new().compute_at(&item, None, now()),
            ItemMetrics::default()
        );

        item.published_at = Some(now());
        item.view_count = None;
        assert_eq!(
            MetricsEngine::new().compute_at(&item, None, now()),
            ItemMetrics::default()
        );
    }

    #[test]
    fn test_zero_views_engagement_uses_floor_of_one() {
        let item = Item::new("v1", "t")
            .with_published_at(now() - Duration::days(5))
            .with_stats(0, 3, 1);

        let metrics = MetricsEngine::new().compute_at(&item, None, now());
        assert_eq!(metrics.engagement_ratio, 4.0);
        assert_eq!(metrics.views_per_day, 0.0);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(viral_score(100_000.0, 0.10, 30, Some(100_000.0)), 100.0);
        assert_eq!(viral_score(50_000.0, 0.05, 90, Some(50_000.0)), 72.0);
        assert_eq!(viral_score(10_000.0, 0.02, 180, Some(10_000.0)), 50.0);
        assert_eq!(viral_score(999.0, 0.009, 366, Some(9_999.0)), 0.0);
        assert_eq!(viral_score(0.0, 0.0, 400, None), 0.0);
    }

    #[test]
    fn test_huge_engagement_counts_saturate() {
        use niche_core::item::{RawCount, RawItem};

        let raw = RawItem {
            video_id: Some("v1".to_string()),
            published_at: Some((now() - Duration::days(2)).to_rfc3339()),
            view_count: Some(RawCount::Integer(1_000)),
            like_count: Some(RawCount::Float(1e19)),
            comment_count: Some(RawCount::Float(1e19)),
            ..RawItem::default()
        };
        let item = Item::from_raw(&raw, now()).unwrap();

        let metrics = MetricsEngine::new().compute_at(&item, None, now());
        assert_eq!(metrics.engagement_ratio, u64::MAX as f64 / 1_000.0);
        assert!((0.0..=100.0).contains(&metrics.viral_score));
    }
}

