use niche_core::{Niche, ScoredItem};
use tracing::{debug, info};

use super::taxonomy::NicheTaxonomy;
use super::{extend_into, push_into, ClusterStrategy, ContentClusterer, GENERAL_CONTENT_NICHE};

/// Size of the sequential groups used when no niche is large enough
const GENERIC_GROUP_SIZE: usize = 5;

/// Pattern rules for text that matches no taxonomy keyword, in priority order
const FALLBACK_PATTERNS: &[(&[&str], &str)] = &[
    (&["fact", "know", "amazing", "secret"], "Facts & Knowledge"),
    (&["how", "tutorial", "guide", "learn"], "Educational Content"),
    (&["quick", "fast", "easy", "simple"], "Quick Tips"),
    (&["new", "latest", "update", "news"], "Trending Topics"),
];

/// Keyword-matching clusterer over a fixed niche taxonomy
#[derive(Debug, Clone)]
pub struct RuleBasedClusterer {
    taxonomy: NicheTaxonomy,
}

impl RuleBasedClusterer {
    pub fn new(taxonomy: NicheTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &NicheTaxonomy {
        &self.taxonomy
    }

    /// Score lower-cased `text` against a keyword list.
    ///
    /// Single-word keywords add 2 per occurrence, multi-word keywords add 1
    /// when every component word is present anywhere in the text.
    pub fn score_text(text: &str, keywords: &[String]) -> usize {
        keywords
            .iter()
            .map(|keyword| {
                let words: Vec<&str> = keyword.split_whitespace().collect();
                match words.len() {
                    0 => 0,
                    1 => text.matches(words[0]).count() * 2,
                    _ => usize::from(words.iter().all(|w| text.contains(w))),
                }
            })
            .sum()
    }

    /// Name of the niche `text` belongs to
    pub fn categorize(&self, text: &str) -> String {
        let text = text.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for category in self.taxonomy.categories() {
            let score = Self::score_text(&text, &category.keywords);
            // Strictly greater keeps the first declared niche on ties
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((&category.name, score));
            }
        }

        match best {
            Some((name, score)) => {
                debug!("Categorized as '{}' (score {})", name, score);
                name.to_string()
            }
            None => Self::fallback_category(&text).to_string(),
        }
    }

    fn fallback_category(text: &str) -> &'static str {
        FALLBACK_PATTERNS
            .iter()
            .find(|(words, _)| words.iter().any(|w| text.contains(w)))
            .map(|(_, name)| *name)
            .unwrap_or(GENERAL_CONTENT_NICHE)
    }

    fn generic_groups(items: &[ScoredItem]) -> Vec<Niche> {
        items
            .chunks(GENERIC_GROUP_SIZE)
            .enumerate()
            .map(|(i, chunk)| Niche::with_items(format!("Content Group {}", i + 1), chunk.to_vec()))
            .collect()
    }
}

impl ContentClusterer for RuleBasedClusterer {
    fn cluster(&self, items: &[ScoredItem]) -> Vec<Niche> {
        if items.is_empty() {
            return Vec::new();
        }

        let mut assigned = Vec::new();
        for item in items {
            let niche = self.categorize(&item.item.text());
            push_into(&mut assigned, &niche, item.clone());
        }

        let min_size = (items.len() / 10).max(2);
        let (kept, dropped): (Vec<Niche>, Vec<Niche>) =
            assigned.into_iter().partition(|n| n.len() >= min_size);

        if kept.is_empty() {
            info!(
                "No niche reached {} items, grouping {} items sequentially",
                min_size,
                items.len()
            );
            return Self::generic_groups(items);
        }

        let mut niches = kept;
        let leftovers: Vec<ScoredItem> = dropped.into_iter().flat_map(|n| n.items).collect();
        if !leftovers.is_empty() {
            debug!(
                "Moving {} items from undersized niches to '{}'",
                leftovers.len(),
                GENERAL_CONTENT_NICHE
            );
            extend_into(&mut niches, GENERAL_CONTENT_NICHE, leftovers);
        }

        info!("🏷️ Categorized {} items into {} niches", items.len(), niches.len());
        niches
    }

    fn strategy(&self) -> ClusterStrategy {
        ClusterStrategy::RuleBased
    }
}
