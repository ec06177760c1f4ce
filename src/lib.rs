/// Viral Niche Scanner
///
/// Scores short-form video records for viral potential, groups qualifying
/// items into topical niches and ranks those niches by performance.
/// Clustering and keyword extraction each come in two interchangeable
/// strategies selected by configuration.

pub mod config;
pub mod metrics;
pub mod keywords;
pub mod clustering;
pub mod niche;
pub mod filter;
pub mod pipeline;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::metrics::{compute_metrics, parse_iso8601_duration, MetricsEngine};
pub use crate::keywords::{
    create_extractor, create_extractor_with_model, ExtractorKind, KeywordExtractor, LanguageModel,
};
pub use crate::clustering::{create_clusterer, ClusterStrategy, ContentClusterer, NicheTaxonomy};
pub use crate::niche::{NicheAggregate, NicheAggregator, NicheRanker, RankedNiche, RankingProfile};
pub use crate::filter::EligibilityFilter;
pub use crate::pipeline::{AnalysisInput, AnalysisProgress, AnalysisReport, AnalysisStage, NichePipeline};

pub use niche_core::{Channel, Item, ItemMetrics, Niche, NicheCoreError, ScoredItem};
