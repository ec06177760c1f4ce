//! Eligibility filter applied to scored items before clustering

use niche_core::{Channel, ScoredItem};
use tracing::{debug, info};

use crate::config::FilterConfig;

/// Days in the projection window of the monthly views check
const DAYS_PER_MONTH: f64 = 30.0;

/// Why an item was rejected
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("no channel record for channel '{0}'")]
    UnknownChannel(String),

    #[error("no views")]
    NoViews,

    #[error("duration {actual}s exceeds {limit}s")]
    TooLong { actual: u32, limit: u32 },

    #[error("{actual:.0} views/day below {minimum:.0}")]
    LowViewsPerDay { actual: f64, minimum: f64 },

    #[error("projected {actual:.0} monthly views below {minimum}")]
    LowMonthlyViews { actual: f64, minimum: u64 },

    #[error("channel has {actual} videos, more than {limit}")]
    TooManyChannelVideos { actual: u64, limit: u64 },

    #[error("channel is {actual} days old, older than {limit}")]
    ChannelTooOld { actual: i64, limit: i64 },

    #[error("face detected with confidence {confidence:.2}")]
    FaceDetected { confidence: f64 },
}

/// Applies the configured thresholds to scored items
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    config: FilterConfig,
}

impl EligibilityFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Check one item against every threshold, reporting the first failure.
    ///
    /// A duration of 0 means unknown and is accepted.
    pub fn check(&self, scored: &ScoredItem, channel: Option<&Channel>) -> Result<(), Rejection> {
        let config = &self.config;
        let item = &scored.item;
        let metrics = &scored.metrics;

        let channel = channel.ok_or_else(|| Rejection::UnknownChannel(item.channel_id.clone()))?;

        if scored.views() == 0 {
            return Err(Rejection::NoViews);
        }

        if item.duration_seconds > config.max_duration_seconds {
            return Err(Rejection::TooLong {
                actual: item.duration_seconds,
                limit: config.max_duration_seconds,
            });
        }

        if metrics.views_per_day < config.min_views_per_day {
            return Err(Rejection::LowViewsPerDay {
                actual: metrics.views_per_day,
                minimum: config.min_views_per_day,
            });
        }

        let monthly = metrics.views_per_day * DAYS_PER_MONTH;
        if config.min_monthly_views > 0 && monthly < config.min_monthly_views as f64 {
            return Err(Rejection::LowMonthlyViews {
                actual: monthly,
                minimum: config.min_monthly_views,
            });
        }

        if channel.video_count > config.max_channel_videos {
            return Err(Rejection::TooManyChannelVideos {
                actual: channel.video_count,
                limit: config.max_channel_videos,
            });
        }

        if metrics.channel_age_days > config.max_channel_age_days {
            return Err(Rejection::ChannelTooOld {
                actual: metrics.channel_age_days,
                limit: config.max_channel_age_days,
            });
        }

        if config.faceless_only
            && item.has_face
            && item.face_confidence > config.face_detection_threshold
        {
            return Err(Rejection::FaceDetected {
                confidence: item.face_confidence,
            });
        }

        Ok(())
    }

    pub fn is_eligible(&self, scored: &ScoredItem, channel: Option<&Channel>) -> bool {
        match self.check(scored, channel) {
            Ok(()) => true,
            Err(reason) => {
                debug!("Item '{}' rejected: {}", scored.id(), reason);
                false
            }
        }
    }

    /// Keep the eligible items, in order. `lookup` resolves an item's channel.
    pub fn apply<'a, F>(&self, items: Vec<ScoredItem>, lookup: F) -> Vec<ScoredItem>
    where
        F: Fn(&str) -> Option<&'a Channel>,
    {
        let total = items.len();
        let kept: Vec<ScoredItem> = items
            .into_iter()
            .filter(|scored| self.is_eligible(scored, lookup(scored.item.channel_id.as_str())))
            .collect();

        info!("🔎 {} of {} items passed the eligibility filter", kept.len(), total);
        kept
    }
}
