/// Keyword extraction module
///
/// Two interchangeable extractors share the [`KeywordExtractor`] contract:
/// a linguistic one driven by a pluggable language model, and a rule-based one
/// working from stop-word lists and adjacent-word phrases. Neither ever fails;
/// both fall back to [`simple_keywords`] when their richer path is unavailable.

pub mod stopwords;
pub mod linguistic;
pub mod rule_based;

pub use linguistic::{
    Annotation, Entity, EntityLabel, LanguageModel, LinguisticExtractor, PartOfSpeech, Token,
};
pub use rule_based::RuleBasedExtractor;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::KeywordConfig;

/// Keyword extractor variants
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExtractorKind {
    Linguistic,
    RuleBased,
}

/// Trait for keyword extractors
pub trait KeywordExtractor: Send + Sync {
    /// Extract keyword tokens from free text
    fn extract(&self, text: &str) -> Vec<String>;

    fn kind(&self) -> ExtractorKind;
}

/// Create a keyword extractor based on configuration
pub fn create_extractor(config: &KeywordConfig) -> Box<dyn KeywordExtractor> {
    create_extractor_with_model(config, None)
}

/// Like [`create_extractor`], attaching `model` to the linguistic variant.
/// The rule-based variant ignores it.
pub fn create_extractor_with_model(
    config: &KeywordConfig,
    model: Option<Arc<dyn LanguageModel>>,
) -> Box<dyn KeywordExtractor> {
    match config.extractor {
        ExtractorKind::Linguistic => match model {
            Some(model) => Box::new(LinguisticExtractor::with_model(model)),
            None => Box::new(LinguisticExtractor::new()),
        },
        ExtractorKind::RuleBased => {
            Box::new(RuleBasedExtractor::new().with_max_keywords(config.max_keywords))
        }
    }
}

/// Lower-case `text` and replace everything that is not a word character or
/// whitespace with a space, then split on whitespace.
pub fn normalize_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().map(String::from).collect()
}

/// Deterministic fallback tokenizer: distinct words longer than two
/// characters that are not on the simple stop list, in first-seen order.
pub fn simple_keywords(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    normalize_words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 2 && !stopwords::is_simple_stop_word(w))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Count occurrences and order by frequency, most frequent first.
/// Ties keep first-seen order.
pub fn rank_by_frequency<I, S>(terms: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, term) in terms.into_iter().enumerate() {
        let entry = counts.entry(term.into()).or_insert((0, position));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked.into_iter().map(|(term, count, _)| (term, count)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_words_strips_punctuation() {
        assert_eq!(
            normalize_words("AI-powered robots!! Who knew?"),
            vec!["ai", "powered", "robots", "who", "knew"]
        );
    }

    #[test]
    fn test_simple_keywords_dedup_and_filter() {
        let keywords = simple_keywords("The ocean, the OCEAN and deep sea #shorts video");
        assert_eq!(keywords, vec!["ocean", "deep", "sea"]);
    }

    #[test]
    fn test_simple_keywords_empty_text() {
        assert!(simple_keywords("").is_empty());
    }

    #[test]
    fn test_rank_by_frequency_is_stable() {
        let ranked = rank_by_frequency(vec!["b", "a", "b", "c", "a", "d"]);
        let terms: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(terms, vec!["b", "a", "c", "d"]);
        assert_eq!(ranked[0].1, 2);
    }

    #[test]
    fn test_create_extractor_by_kind() {
        let mut config = KeywordConfig::default();
        config.extractor = ExtractorKind::RuleBased;
        assert_eq!(create_extractor(&config).kind(), ExtractorKind::RuleBased);

        config.extractor = ExtractorKind::Linguistic;
        assert_eq!(create_extractor(&config).kind(), ExtractorKind::Linguistic);
    }
}
