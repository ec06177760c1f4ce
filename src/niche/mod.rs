/// Niche performance module
///
/// [`NicheAggregator`] summarises the items of one niche into a
/// [`NicheAggregate`]; [`NicheRanker`] turns aggregates into a sorted list of
/// [`RankedNiche`]s under the [`RankingProfile`] matching the clusterer.

pub mod aggregate;
pub mod ranking;

pub use aggregate::{NicheAggregate, NicheAggregator, TOP_ITEMS, TOP_KEYWORDS};
pub use ranking::{NicheRanker, RankedNiche, RankingProfile};
