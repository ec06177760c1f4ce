use anyhow::{anyhow, Result};
use niche_core::NicheCoreError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::clustering::ClusterStrategy;
use crate::keywords::ExtractorKind;

/// Configuration for the Viral Niche Scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Clustering and ranking settings
    pub analysis: AnalysisConfig,

    /// Keyword extraction settings
    pub keywords: KeywordConfig,

    /// Eligibility thresholds applied before clustering
    pub filter: FilterConfig,

    /// Rule-based taxonomy settings
    pub taxonomy: TaxonomyConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Clustering strategy (also selects the matching ranking profile)
    pub strategy: ClusterStrategy,

    /// Seed for k-means initialization
    pub random_seed: u64,

    /// Number of k-means restarts; the lowest-inertia run wins
    pub n_init: usize,

    /// Maximum k-means iterations per restart
    pub max_iterations: usize,

    /// Smallest cluster kept as its own niche
    pub min_cluster_size: usize,

    /// Upper bound on the number of k-means clusters
    pub max_clusters: usize,

    /// TF-IDF vocabulary cap
    pub max_features: usize,

    /// Minimum number of documents a term must appear in
    pub min_document_frequency: usize,

    /// Maximum share of documents a term may appear in
    pub max_document_ratio: f64,

    /// Number of ranked niches kept in the report
    pub top_niches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Extractor used for niche keywords and cluster naming
    pub extractor: ExtractorKind,

    /// Number of keywords returned by the rule-based extractor
    pub max_keywords: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Longest item accepted, in seconds
    pub max_duration_seconds: u32,

    /// Minimum views per day
    pub min_views_per_day: f64,

    /// Minimum views per day projected over 30 days; 0 disables the check
    pub min_monthly_views: u64,

    /// Largest channel upload count accepted
    pub max_channel_videos: u64,

    /// Oldest channel accepted, in days
    pub max_channel_age_days: i64,

    /// Face confidence above which an item counts as showing a face
    pub face_detection_threshold: f64,

    /// Reject items showing a face
    pub faceless_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Path to a custom taxonomy file; built-in taxonomy when absent
    pub taxonomy_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the JSON report is written to
    pub base_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Pretty-print the JSON report
    pub pretty_json: bool,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        // Try to load from various locations
        let config_paths = [
            "viral-niche-scanner.toml",
            "config/viral-niche-scanner.toml",
            "/etc/viral-niche-scanner/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        // Fall back to environment variables
        Self::from_env()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config {}: {}", path.display(), e))?;
        let config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(strategy) = std::env::var("NICHE_SCANNER_STRATEGY") {
            config.analysis.strategy = match strategy.to_lowercase().as_str() {
                "statistical" => ClusterStrategy::Statistical,
                "rule_based" | "rule-based" | "rules" => ClusterStrategy::RuleBased,
                other => return Err(anyhow!("Unknown clustering strategy: {}", other)),
            };
        }

        if let Ok(seed) = std::env::var("NICHE_SCANNER_SEED") {
            config.analysis.random_seed = seed.parse().unwrap_or(42);
        }

        if let Ok(min_vpd) = std::env::var("NICHE_SCANNER_MIN_VIEWS_PER_DAY") {
            config.filter.min_views_per_day = min_vpd.parse().unwrap_or(50_000.0);
        }

        if let Ok(taxonomy) = std::env::var("NICHE_SCANNER_TAXONOMY_FILE") {
            config.taxonomy.taxonomy_file = Some(PathBuf::from(taxonomy));
        }

        if let Ok(output_dir) = std::env::var("NICHE_SCANNER_OUTPUT_DIR") {
            config.output.base_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("NICHE_SCANNER_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| anyhow!(NicheCoreError::InvalidConfig(msg.to_string()));

        if self.analysis.min_cluster_size == 0 {
            return Err(invalid("min_cluster_size must be greater than 0"));
        }

        if self.analysis.max_clusters < 2 {
            return Err(invalid("max_clusters must be at least 2"));
        }

        if self.analysis.n_init == 0 || self.analysis.max_iterations == 0 {
            return Err(invalid("n_init and max_iterations must be greater than 0"));
        }

        if self.analysis.max_features == 0 {
            return Err(invalid("max_features must be greater than 0"));
        }

        let ratio = self.analysis.max_document_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(invalid("max_document_ratio must be in (0, 1]"));
        }

        if self.analysis.top_niches == 0 {
            return Err(invalid("top_niches must be greater than 0"));
        }

        if self.keywords.max_keywords == 0 {
            return Err(invalid("max_keywords must be greater than 0"));
        }

        let threshold = self.filter.face_detection_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(invalid("face_detection_threshold must be in [0, 1]"));
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Viral Niche Scanner Configuration:\n\
            - Strategy: {:?}\n\
            - Keyword Extractor: {:?}\n\
            - Random Seed: {}\n\
            - Min Cluster Size: {}\n\
            - Max Clusters: {}\n\
            - Min Views/Day: {}\n\
            - Faceless Only: {}\n\
            - Output Directory: {}",
            self.analysis.strategy,
            self.keywords.extractor,
            self.analysis.random_seed,
            self.analysis.min_cluster_size,
            self.analysis.max_clusters,
            self.filter.min_views_per_day,
            self.filter.faceless_only,
            self.output.base_dir.display()
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            keywords: KeywordConfig::default(),
            filter: FilterConfig::default(),
            taxonomy: TaxonomyConfig { taxonomy_file: None },
            output: OutputConfig {
                base_dir: PathBuf::from("./results"),
                log_level: "info".to_string(),
                pretty_json: true,
            },
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: ClusterStrategy::Statistical,
            random_seed: 42,
            n_init: 10,
            max_iterations: 300,
            min_cluster_size: 3,
            max_clusters: 10,
            max_features: 1000,
            min_document_frequency: 2,
            max_document_ratio: 0.8,
            top_niches: 10,
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::Linguistic,
            max_keywords: 20,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: 60,
            min_views_per_day: 50_000.0,
            min_monthly_views: 0,
            max_channel_videos: 20,
            max_channel_age_days: 30,
            face_detection_threshold: 0.7,
            faceless_only: true,
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.config.analysis.strategy = strategy;
        self
    }

    pub fn with_extractor(mut self, extractor: ExtractorKind) -> Self {
        self.config.keywords.extractor = extractor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.analysis.random_seed = seed;
        self
    }

    pub fn with_min_views_per_day(mut self, min_views_per_day: f64) -> Self {
        self.config.filter.min_views_per_day = min_views_per_day;
        self
    }

    pub fn with_taxonomy_file(mut self, path: PathBuf) -> Self {
        self.config.taxonomy.taxonomy_file = Some(path);
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn faceless_only(mut self, enable: bool) -> Self {
        self.config.filter.faceless_only = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.min_cluster_size, 3);
        assert_eq!(config.analysis.max_clusters, 10);
        assert_eq!(config.analysis.random_seed, 42);
        assert_eq!(config.filter.max_duration_seconds, 60);
        assert!(config.filter.faceless_only);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_strategy(ClusterStrategy::RuleBased)
            .with_extractor(ExtractorKind::RuleBased)
            .with_seed(7)
            .faceless_only(false)
            .build();

        assert_eq!(config.analysis.strategy, ClusterStrategy::RuleBased);
        assert_eq!(config.keywords.extractor, ExtractorKind::RuleBased);
        assert_eq!(config.analysis.random_seed, 7);
        assert!(!config.filter.faceless_only);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_contract_violations() {
        let mut config = Config::default();
        config.analysis.min_cluster_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.filter.face_detection_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.max_document_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = ConfigBuilder::new()
            .with_strategy(ClusterStrategy::RuleBased)
            .build();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.analysis.strategy, ClusterStrategy::RuleBased);
        assert_eq!(parsed.filter.max_channel_videos, 20);
    }
}
