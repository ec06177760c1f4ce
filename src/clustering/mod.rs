/// Content clustering module
///
/// Partitions scored items into named niches. Two interchangeable strategies
/// implement [`ContentClusterer`]: statistical TF-IDF + k-means clustering and
/// rule-based taxonomy matching. Every input item ends up in exactly one niche.

pub mod tfidf;
pub mod kmeans;
pub mod statistical;
pub mod taxonomy;
pub mod rule_based;

pub use kmeans::{KMeans, KMeansResult};
pub use rule_based::RuleBasedClusterer;
pub use statistical::StatisticalClusterer;
pub use taxonomy::{NicheCategory, NicheTaxonomy, TaxonomyStats};
pub use tfidf::{TfIdfMatrix, TfIdfVectorizer};

use niche_core::{Niche, ScoredItem};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::keywords::{create_extractor, KeywordExtractor};

/// Catch-all bucket of the statistical strategy
pub const GENERAL_NICHE: &str = "general";

/// Catch-all bucket of the rule-based strategy
pub const GENERAL_CONTENT_NICHE: &str = "General Content";

/// Clustering strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClusterStrategy {
    Statistical,
    RuleBased,
}

/// Trait for content clusterers
pub trait ContentClusterer: Send + Sync {
    /// Partition `items` into named niches.
    ///
    /// Deterministic for the same configuration and input order.
    fn cluster(&self, items: &[ScoredItem]) -> Vec<Niche>;

    fn strategy(&self) -> ClusterStrategy;
}

/// Create a clusterer based on configuration.
///
/// `taxonomy` is only used by the rule-based strategy; the built-in taxonomy
/// applies when it is `None`.
pub fn create_clusterer(
    config: &Config,
    taxonomy: Option<NicheTaxonomy>,
) -> Box<dyn ContentClusterer> {
    create_clusterer_with_extractor(config, taxonomy, create_extractor(&config.keywords))
}

/// Like [`create_clusterer`] with a caller-built extractor for cluster naming
pub fn create_clusterer_with_extractor(
    config: &Config,
    taxonomy: Option<NicheTaxonomy>,
    extractor: Box<dyn KeywordExtractor>,
) -> Box<dyn ContentClusterer> {
    match config.analysis.strategy {
        ClusterStrategy::Statistical => {
            Box::new(StatisticalClusterer::new(config.analysis.clone(), extractor))
        }
        ClusterStrategy::RuleBased => Box::new(RuleBasedClusterer::new(
            taxonomy.unwrap_or_default(),
        )),
    }
}

/// Append `item` to the niche called `name`, creating it at the end if needed
pub(crate) fn push_into(niches: &mut Vec<Niche>, name: &str, item: ScoredItem) {
    match niches.iter_mut().find(|n| n.name == name) {
        Some(niche) => niche.items.push(item),
        None => niches.push(Niche::with_items(name, vec![item])),
    }
}

/// Merge `items` into the niche called `name`, creating it at the end if needed
pub(crate) fn extend_into(niches: &mut Vec<Niche>, name: &str, items: Vec<ScoredItem>) {
    match niches.iter_mut().find(|n| n.name == name) {
        Some(niche) => niche.items.extend(items),
        None => niches.push(Niche::with_items(name, items)),
    }
}
