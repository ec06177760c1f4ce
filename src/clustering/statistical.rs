use niche_core::{Niche, ScoredItem};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::kmeans::KMeans;
use super::tfidf::TfIdfVectorizer;
use super::{extend_into, ClusterStrategy, ContentClusterer, GENERAL_NICHE};
use crate::config::AnalysisConfig;
use crate::keywords::{rank_by_frequency, KeywordExtractor};

/// Number of centroid terms offered to the cluster namer
const CENTROID_TERMS: usize = 10;

static PLATFORM_WORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(shorts?|video|youtube)\b").unwrap());

static TITLE_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{3,}\b").unwrap());

/// TF-IDF + k-means clusterer with generated niche names
pub struct StatisticalClusterer {
    config: AnalysisConfig,
    extractor: Box<dyn KeywordExtractor>,
}

impl StatisticalClusterer {
    pub fn new(config: AnalysisConfig, extractor: Box<dyn KeywordExtractor>) -> Self {
        Self { config, extractor }
    }

    fn vectorizer(&self) -> TfIdfVectorizer {
        TfIdfVectorizer::new(
            self.config.max_features,
            self.config.min_document_frequency,
            self.config.max_document_ratio,
        )
    }

    /// Cluster count for `n` items, never more than `n`
    fn cluster_count(&self, n: usize) -> usize {
        let min_size = self.config.min_cluster_size.max(1);
        self.config
            .max_clusters
            .min((n / min_size).max(2))
            .min(n)
    }

    /// Build a display name for a cluster from its titles and centroid terms
    pub fn generate_cluster_name(&self, items: &[ScoredItem], centroid_terms: &[String]) -> String {
        let titles: Vec<&str> = items.iter().map(|s| s.item.title.as_str()).collect();
        let title_keywords = self.extractor.extract(&titles.join(" "));

        let candidates: Vec<String> = rank_by_frequency(
            title_keywords.into_iter().chain(centroid_terms.iter().cloned()),
        )
        .into_iter()
        .take(5)
        .map(|(term, _)| term)
        .filter(|term| term.chars().count() > 2 && term.chars().all(char::is_alphabetic))
        .take(3)
        .collect();

        if !candidates.is_empty() {
            let name = strip_platform_words(&title_case(&candidates.join(" ")));
            if !name.is_empty() {
                return name;
            }
        }

        match most_common_title_word(&titles) {
            Some(word) => format!("{} Content", title_case(&word)),
            None => "Unknown Niche".to_string(),
        }
    }
}

impl ContentClusterer for StatisticalClusterer {
    fn cluster(&self, items: &[ScoredItem]) -> Vec<Niche> {
        if items.is_empty() {
            return Vec::new();
        }

        if items.len() < self.config.min_cluster_size {
            warn!(
                "Not enough items ({}) for clustering, using a single '{}' niche",
                items.len(),
                GENERAL_NICHE
            );
            return vec![Niche::with_items(GENERAL_NICHE, items.to_vec())];
        }

        let texts: Vec<String> = items.iter().map(|s| s.item.text()).collect();
        let matrix = match self.vectorizer().fit_transform(&texts) {
            Ok(matrix) => matrix,
            Err(e) => {
                warn!("TF-IDF vectorization failed: {}", e);
                return vec![Niche::with_items(GENERAL_NICHE, items.to_vec())];
            }
        };

        let k = self.cluster_count(items.len());
        let fit = KMeans::new(k, self.config.random_seed)
            .with_n_init(self.config.n_init)
            .with_max_iterations(self.config.max_iterations)
            .fit(&matrix.rows);
        debug!("k-means: k={}, inertia={:.6}", k, fit.inertia);

        // Group by label in order of first appearance
        let mut groups: Vec<(usize, Vec<ScoredItem>)> = Vec::new();
        for (item, &label) in items.iter().zip(&fit.labels) {
            match groups.iter_mut().find(|(l, _)| *l == label) {
                Some((_, members)) => members.push(item.clone()),
                None => groups.push((label, vec![item.clone()])),
            }
        }

        let mut niches = Vec::new();
        for (label, members) in groups {
            if members.len() < self.config.min_cluster_size {
                extend_into(&mut niches, GENERAL_NICHE, members);
                continue;
            }

            let terms = fit
                .centroids
                .get(label)
                .map(|centroid| matrix.top_terms(centroid, CENTROID_TERMS))
                .unwrap_or_default();
            let name = self.generate_cluster_name(&members, &terms);
            debug!("Cluster {} named '{}' ({} items)", label, name, members.len());
            extend_into(&mut niches, &name, members);
        }

        info!("🧩 Created {} content clusters", niches.len());
        niches
    }

    fn strategy(&self) -> ClusterStrategy {
        ClusterStrategy::Statistical
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            result.push(c);
            previous_alpha = false;
        }
    }
    result
}

fn strip_platform_words(name: &str) -> String {
    let stripped = PLATFORM_WORDS_RE.replace_all(name, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn most_common_title_word(titles: &[&str]) -> Option<String> {
    let words: Vec<String> = titles
        .iter()
        .flat_map(|title| {
            let lower = title.to_lowercase();
            TITLE_WORD_RE
                .find_iter(&lower)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    rank_by_frequency(words).into_iter().next().map(|(word, _)| word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::RuleBasedExtractor;
    use niche_core::{Item, ItemMetrics};
    use std::collections::HashSet;

    fn clusterer() -> StatisticalClusterer {
        StatisticalClusterer::new(AnalysisConfig::default(), Box::new(RuleBasedExtractor::new()))
    }

    fn scored(id: &str, title: &str) -> ScoredItem {
        ScoredItem::new(Item::new(id, title), ItemMetrics::default())
    }

    fn corpus() -> Vec<ScoredItem> {
        vec![
            scored("1", "black hole space mystery"),
            scored("2", "black hole galaxy space"),
            scored("3", "space galaxy black hole"),
            scored("4", "crypto money trading tips"),
            scored("5", "crypto money bitcoin tips"),
            scored("6", "crypto money tips trading"),
        ]
    }

    #[test]
    fn test_two_items_go_to_general() {
        let niches = clusterer().cluster(&[scored("a", "one"), scored("b", "two")]);
        assert_eq!(niches.len(), 1);
        assert_eq!(niches[0].name, GENERAL_NICHE);
        assert_eq!(niches[0].item_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(clusterer().cluster(&[]).is_empty());
    }

    #[test]
    fn test_vectorization_failure_falls_back_to_general() {
        let items = vec![scored("a", "alpha"), scored("b", "beta"), scored("c", "gamma")];
        let niches = clusterer().cluster(&items);
        assert_eq!(niches.len(), 1);
        assert_eq!(niches[0].name, GENERAL_NICHE);
        assert_eq!(niches[0].len(), 3);
    }

    #[test]
    fn test_partitions_every_item_once() {
        let items = corpus();
        let niches = clusterer().cluster(&items);

        let ids: Vec<&str> = niches.iter().flat_map(|n| n.item_ids()).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), items.len());
        assert_eq!(unique.len(), items.len());
    }

    #[test]
    fn test_separates_topics() {
        let niches = clusterer().cluster(&corpus());
        assert_eq!(niches.len(), 2);

        let space = niches.iter().find(|n| n.item_ids().contains(&"1")).unwrap();
        assert_eq!(space.item_ids(), vec!["1", "2", "3"]);
        assert!(space.name.contains("Black") || space.name.contains("Space"));
    }

    #[test]
    fn test_deterministic() {
        let items = corpus();
        let a = clusterer().cluster(&items);
        let b = clusterer().cluster(&items);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cluster_name_strips_platform_words() {
        let items = vec![
            scored("1", "shorts cats"),
            scored("2", "shorts cats"),
            scored("3", "video cats"),
        ];
        let terms = vec!["shorts".to_string(), "video".to_string()];
        let name = clusterer().generate_cluster_name(&items, &terms);
        assert_eq!(name, "Cats");
    }

    #[test]
    fn test_cluster_name_fallbacks() {
        let c = clusterer();
        let items = vec![scored("1", "the 42 video"), scored("2", "the video")];
        assert_eq!(c.generate_cluster_name(&items, &[]), "The Content");

        let untitled = vec![scored("1", ""), scored("2", "")];
        assert_eq!(c.generate_cluster_name(&untitled, &[]), "Unknown Niche");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("deep sea creatures"), "Deep Sea Creatures");
        assert_eq!(title_case("AI tools"), "Ai Tools");
    }

    fn mixed_corpus() -> Vec<ScoredItem> {
        let titles = std::iter::repeat("black hole space")
            .take(4)
            .chain(std::iter::repeat("crypto money tips").take(4))
            .chain(std::iter::repeat("pasta recipe").take(2));
        titles
            .enumerate()
            .map(|(i, title)| scored(&i.to_string(), title))
            .collect()
    }

    #[test]
    fn test_small_cluster_merges_into_general() {
        let niches = clusterer().cluster(&mixed_corpus());

        let summary: Vec<(&str, Vec<&str>)> =
            niches.iter().map(|n| (n.name.as_str(), n.item_ids())).collect();
        assert_eq!(
            summary,
            vec![
                ("Black Hole Space", vec!["0", "1", "2", "3"]),
                ("Crypto Money Tips", vec!["4", "5", "6", "7"]),
                (GENERAL_NICHE, vec!["8", "9"]),
            ]
        );
    }

    /// Names every cluster the same regardless of its titles
    struct FixedNames;

    impl KeywordExtractor for FixedNames {
        fn extract(&self, _text: &str) -> Vec<String> {
            ["niche", "niche", "niche", "niche", "group", "group", "group", "label", "label"]
                .iter()
                .map(|w| w.to_string())
                .collect()
        }

        fn kind(&self) -> crate::keywords::ExtractorKind {
            crate::keywords::ExtractorKind::RuleBased
        }
    }

    #[test]
    fn test_colliding_names_merge_into_one_niche() {
        let clusterer = StatisticalClusterer::new(AnalysisConfig::default(), Box::new(FixedNames));
        let niches = clusterer.cluster(&mixed_corpus());

        assert_eq!(niches.len(), 2);
        assert_eq!(niches[0].name, "Niche Group Label");
        assert_eq!(niches[0].item_ids(), vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(niches[1].name, GENERAL_NICHE);
        assert_eq!(niches[1].item_ids(), vec!["8", "9"]);
    }
}

