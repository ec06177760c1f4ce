use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{simple_keywords, ExtractorKind, KeywordExtractor};

/// Coarse part-of-speech tags the extractor cares about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Other,
}

/// Named-entity labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Place,
    Product,
    Event,
    Other,
}

/// One analysed token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
}

impl Token {
    fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }
}

/// A recognised named entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Output of a language model run over a text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

/// Trait for language model backends (tagger, lemmatizer, entity recognizer)
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    /// Annotate lower-cased text
    fn annotate(&self, text: &str) -> Result<Annotation>;
}

/// Keyword extractor keeping nouns, adjectives, proper nouns and named entities
pub struct LinguisticExtractor {
    model: Option<Arc<dyn LanguageModel>>,
}

impl LinguisticExtractor {
    /// Extractor without a model backend; always uses the fallback tokenizer
    pub fn new() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Arc<dyn LanguageModel>) -> Self {
        debug!("Linguistic extractor using model '{}'", model.name());
        Self { model: Some(model) }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    fn keywords_from(annotation: &Annotation) -> Vec<String> {
        let token_keywords = annotation
            .tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.pos,
                    PartOfSpeech::Noun | PartOfSpeech::Adjective | PartOfSpeech::ProperNoun
                ) && t.text.chars().count() > 2
                    && !t.is_stop
                    && t.is_alpha()
            })
            .map(|t| t.lemma.to_lowercase());

        let entity_keywords = annotation
            .entities
            .iter()
            .filter(|e| e.label != EntityLabel::Other)
            .map(|e| e.text.to_lowercase());

        let mut seen = HashSet::new();
        token_keywords
            .chain(entity_keywords)
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }
}

impl Default for LinguisticExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor for LinguisticExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let model = match &self.model {
            Some(model) => model,
            None => return simple_keywords(text),
        };

        match model.annotate(&text.to_lowercase()) {
            Ok(annotation) => Self::keywords_from(&annotation),
            Err(e) => {
                warn!("Language model '{}' failed: {}, using fallback tokenizer", model.name(), e);
                simple_keywords(text)
            }
        }
    }

    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Linguistic
    }
}
