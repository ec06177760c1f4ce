use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// A named niche and the keywords that identify it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NicheCategory {
    pub name: String,

    /// Lower-case keywords; entries with a space are multi-word phrases
    pub keywords: Vec<String>,
}

impl NicheCategory {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Ordered niche taxonomy for rule-based categorization.
///
/// Declaration order matters: it breaks scoring ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicheTaxonomy {
    categories: Vec<NicheCategory>,
}

impl NicheTaxonomy {
    /// Create the built-in taxonomy
    pub fn new() -> Self {
        let mut taxonomy = Self {
            categories: Vec::new(),
        };
        taxonomy.load_default_categories();
        taxonomy
    }

    /// Taxonomy with exactly the given categories
    pub fn from_categories(categories: Vec<NicheCategory>) -> Self {
        Self { categories }
    }

    /// Load the built-in taxonomy extended with a taxonomy file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let mut taxonomy = Self::new();
        taxonomy.parse_str(&content);
        info!("📚 Loaded niche taxonomy from: {}", path.as_ref().display());
        Ok(taxonomy)
    }

    /// Merge taxonomy text into this taxonomy.
    ///
    /// `[Niche Name]` opens a niche (new names are appended), every following
    /// non-empty line is a keyword. `#` starts a comment line.
    pub fn parse_str(&mut self, content: &str) {
        let mut current: Option<String> = None;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                if name.is_empty() {
                    warn!("Empty niche header on taxonomy line {}", number + 1);
                    current = None;
                } else {
                    self.ensure_category(name);
                    current = Some(name.to_string());
                }
                continue;
            }

            match &current {
                Some(name) => self.add_keyword(name, line),
                None => warn!(
                    "Keyword '{}' on taxonomy line {} has no niche header, ignoring",
                    line,
                    number + 1
                ),
            }
        }
    }

    pub fn categories(&self) -> &[NicheCategory] {
        &self.categories
    }

    pub fn get_keywords(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.keywords.as_slice())
    }

    /// Add a keyword to a niche, creating the niche at the end if needed
    pub fn add_keyword(&mut self, name: &str, keyword: &str) {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return;
        }

        let index = self.ensure_category(name);
        let keywords = &mut self.categories[index].keywords;
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    fn ensure_category(&mut self, name: &str) -> usize {
        match self.categories.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.categories.push(NicheCategory {
                    name: name.to_string(),
                    keywords: Vec::new(),
                });
                self.categories.len() - 1
            }
        }
    }

    fn load_default_categories(&mut self) {
        self.categories = vec![
            NicheCategory::new("AI & Technology", &[
                "ai", "artificial intelligence", "tech", "technology", "robot", "automation",
                "machine learning", "coding", "programming", "software", "app", "digital",
            ]),
            NicheCategory::new("Psychology & Mind", &[
                "psychology", "mind", "brain", "mental", "mindset", "behavior", "cognitive",
                "emotional", "memory", "learning", "habit", "personality", "psychology facts",
            ]),
            NicheCategory::new("Science & Facts", &[
                "science", "facts", "did you know", "amazing facts", "scientific", "discovery",
                "research", "study", "experiment", "physics", "chemistry", "biology",
            ]),
            NicheCategory::new("Money & Finance", &[
                "money", "finance", "investment", "crypto", "bitcoin", "trading", "business",
                "entrepreneur", "wealth", "rich", "millionaire", "passive income", "stocks",
            ]),
            NicheCategory::new("Life Hacks & Tips", &[
                "life hack", "tips", "tricks", "how to", "productivity", "efficiency",
                "time management", "organization", "useful", "helpful", "secret",
            ]),
            NicheCategory::new("Motivation & Success", &[
                "motivation", "success", "inspiration", "mindset", "goals", "achievement",
                "self improvement", "personal development", "confidence", "discipline",
            ]),
            NicheCategory::new("History & Education", &[
                "history", "historical", "ancient", "war", "civilization", "education",
                "learning", "knowledge", "facts about", "timeline", "culture",
            ]),
            NicheCategory::new("Health & Fitness", &[
                "health", "fitness", "workout", "exercise", "diet", "nutrition", "wellness",
                "medical", "doctor", "symptoms", "cure", "treatment", "body",
            ]),
            NicheCategory::new("Space & Universe", &[
                "space", "universe", "galaxy", "planet", "star", "nasa", "astronomy",
                "cosmos", "solar system", "astronaut", "alien", "black hole",
            ]),
            NicheCategory::new("Animals & Nature", &[
                "animal", "nature", "wildlife", "pets", "dogs", "cats", "ocean",
                "forest", "environment", "species", "evolution", "biology",
            ]),
            NicheCategory::new("Food & Cooking", &[
                "food", "cooking", "recipe", "kitchen", "chef", "restaurant", "meal",
                "ingredients", "taste", "cuisine", "nutrition", "eating",
            ]),
            NicheCategory::new("Travel & Places", &[
                "travel", "country", "city", "destination", "culture", "geography",
                "adventure", "vacation", "explore", "world", "places", "tourism",
            ]),
        ];
    }

    /// Get statistics about the taxonomy
    pub fn get_stats(&self) -> TaxonomyStats {
        let keyword_counts = self
            .categories
            .iter()
            .map(|c| (c.name.clone(), c.keywords.len()))
            .collect::<Vec<_>>();

        TaxonomyStats {
            total_categories: self.categories.len(),
            total_keywords: keyword_counts.iter().map(|(_, n)| n).sum(),
            phrase_keywords: self
                .categories
                .iter()
                .flat_map(|c| &c.keywords)
                .filter(|k| k.contains(' '))
                .count(),
            keyword_counts,
        }
    }
}

impl Default for NicheTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a niche taxonomy
#[derive(Debug, Clone)]
pub struct TaxonomyStats {
    pub total_categories: usize,
    pub total_keywords: usize,
    pub phrase_keywords: usize,
    pub keyword_counts: Vec<(String, usize)>,
}

impl TaxonomyStats {
    /// Generate a summary string
    pub fn summary(&self) -> String {
        format!(
            "Niche Taxonomy Stats:\n\
            - Categories: {}\n\
            - Total keywords: {}\n\
            - Multi-word keywords: {}",
            self.total_categories, self.total_keywords, self.phrase_keywords
        )
    }
}
