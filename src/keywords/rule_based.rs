use super::stopwords::is_rule_stop_word;
use super::{normalize_words, rank_by_frequency, ExtractorKind, KeywordExtractor};

/// Default number of keywords returned
pub const DEFAULT_MAX_KEYWORDS: usize = 20;

/// Frequency-ranked keyword extractor built on stop-word filtering and
/// adjacent-word phrases
#[derive(Debug, Clone)]
pub struct RuleBasedExtractor {
    max_keywords: usize,
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
        }
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// A phrase is kept when at least one of its words is not a stop word
    fn is_meaningful_phrase(words: &[String]) -> bool {
        words.iter().any(|w| !is_rule_stop_word(w))
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let words = normalize_words(text);
        if words.is_empty() {
            return Vec::new();
        }

        let keywords = words
            .iter()
            .filter(|w| !is_rule_stop_word(w) && w.chars().count() > 2)
            .cloned();

        let phrases = words
            .windows(2)
            .filter(|pair| Self::is_meaningful_phrase(pair))
            .map(|pair| pair.join(" "));

        rank_by_frequency(keywords.chain(phrases))
            .into_iter()
            .take(self.max_keywords)
            .map(|(term, _)| term)
            .collect()
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::RuleBased
    }
}
