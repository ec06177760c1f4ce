use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::aggregate::NicheAggregate;
use crate::clustering::ClusterStrategy;
use crate::metrics::{band_at_least, MAX_SCORE};

const VIEWS_PER_DAY_BANDS: [(f64, f64); 4] =
    [(100_000.0, 40.0), (50_000.0, 30.0), (20_000.0, 20.0), (5_000.0, 10.0)];

const ENGAGEMENT_BANDS: [(f64, f64); 4] = [(0.05, 25.0), (0.03, 20.0), (0.02, 15.0), (0.01, 10.0)];

/// Weight of the average viral score (scaled from 0-100)
const VIRAL_SCORE_WEIGHT: f64 = 20.0;

/// Volume and channel-diversity thresholds.
///
/// The two clustering strategies were tuned with slightly different bands;
/// each keeps its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RankingProfile {
    Statistical,
    RuleBased,
}

impl RankingProfile {
    fn video_count_bands(&self) -> &'static [(f64, f64)] {
        match self {
            RankingProfile::Statistical => &[(10.0, 10.0), (5.0, 7.0), (3.0, 5.0)],
            RankingProfile::RuleBased => &[(10.0, 10.0), (5.0, 5.0)],
        }
    }

    fn channel_count_bands(&self) -> &'static [(f64, f64)] {
        match self {
            RankingProfile::Statistical => &[(5.0, 5.0), (3.0, 3.0), (2.0, 2.0)],
            RankingProfile::RuleBased => &[(5.0, 5.0), (3.0, 2.0)],
        }
    }
}

impl From<ClusterStrategy> for RankingProfile {
    fn from(strategy: ClusterStrategy) -> Self {
        match strategy {
            ClusterStrategy::Statistical => RankingProfile::Statistical,
            ClusterStrategy::RuleBased => RankingProfile::RuleBased,
        }
    }
}

/// A niche with its composite ranking score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNiche {
    pub niche_name: String,
    pub ranking_score: f64,
    pub analysis: NicheAggregate,
}

/// Scores and orders niche aggregates
#[derive(Debug, Clone)]
pub struct NicheRanker {
    profile: RankingProfile,
}

impl NicheRanker {
    pub fn new(profile: RankingProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> RankingProfile {
        self.profile
    }

    /// Composite score in [0, 100]
    pub fn score(&self, aggregate: &NicheAggregate) -> f64 {
        let score = band_at_least(aggregate.avg_views_per_day, &VIEWS_PER_DAY_BANDS)
            + band_at_least(aggregate.avg_engagement_ratio, &ENGAGEMENT_BANDS)
            + (aggregate.avg_viral_score / 100.0) * VIRAL_SCORE_WEIGHT
            + band_at_least(aggregate.total_videos as f64, self.profile.video_count_bands())
            + band_at_least(aggregate.unique_channels as f64, self.profile.channel_count_bands());

        score.clamp(0.0, MAX_SCORE)
    }

    /// Rank niches by score, highest first. Empty aggregates are skipped and
    /// equal scores keep input order.
    pub fn rank(&self, aggregates: &[(String, NicheAggregate)]) -> Vec<RankedNiche> {
        let mut ranked: Vec<RankedNiche> = aggregates
            .iter()
            .filter(|(name, aggregate)| {
                if aggregate.is_empty() {
                    debug!("Skipping empty niche '{}'", name);
                    return false;
                }
                true
            })
            .map(|(name, aggregate)| RankedNiche {
                niche_name: name.clone(),
                ranking_score: self.score(aggregate),
                analysis: aggregate.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.ranking_score
                .partial_cmp(&a.ranking_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!("🏆 Ranked {} niches ({:?} profile)", ranked.len(), self.profile);
        ranked
    }
}
