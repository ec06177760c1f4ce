use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use niche_core::{Channel, Item, Niche, RawChannel, RawItem, ScoredItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::clustering::{create_clusterer_with_extractor, ClusterStrategy, ContentClusterer, NicheTaxonomy};
use crate::config::Config;
use crate::filter::EligibilityFilter;
use crate::keywords::{create_extractor_with_model, LanguageModel};
use crate::metrics::MetricsEngine;
use crate::niche::{NicheAggregate, NicheAggregator, NicheRanker, RankedNiche};

/// File name of the JSON report written by [`write_report`]
pub const REPORT_FILE_NAME: &str = "niche_analysis.json";

/// Raw records handed over by the upstream data provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInput {
    pub items: Vec<RawItem>,
    pub channels: Vec<RawChannel>,
}

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalysisStage {
    Ingestion,
    Scoring,
    Filtering,
    Clustering,
    Aggregation,
    Ranking,
    Completed,
}

impl AnalysisStage {
    /// Progress percentage reported when this stage starts
    pub fn progress_percentage(&self) -> u8 {
        match self {
            AnalysisStage::Ingestion => 10,
            AnalysisStage::Scoring => 30,
            AnalysisStage::Filtering => 45,
            AnalysisStage::Clustering => 60,
            AnalysisStage::Aggregation => 80,
            AnalysisStage::Ranking => 90,
            AnalysisStage::Completed => 100,
        }
    }

    /// Get human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self {
            AnalysisStage::Ingestion => "Reading item and channel records...",
            AnalysisStage::Scoring => "Analyzing video performance...",
            AnalysisStage::Filtering => "Filtering viral content...",
            AnalysisStage::Clustering => "Identifying niches...",
            AnalysisStage::Aggregation => "Analyzing niche performance...",
            AnalysisStage::Ranking => "Ranking niches...",
            AnalysisStage::Completed => "Analysis completed!",
        }
    }
}

/// Progress notification passed to the caller's callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    pub percentage: u8,
    pub message: String,
}

impl AnalysisProgress {
    fn at(stage: AnalysisStage) -> Self {
        Self {
            stage,
            percentage: stage.progress_percentage(),
            message: stage.status_string().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalysisStatus {
    Completed,
    /// Nothing passed the eligibility filter
    NoQualifiedItems,
}

/// Outcome of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: AnalysisStatus,
    pub strategy: ClusterStrategy,
    pub generated_at: DateTime<Utc>,
    pub total_items: usize,
    pub qualified_items: usize,
    pub niches_found: usize,
    pub processing_time: Duration,

    /// Best niches first, truncated to the configured top N
    pub ranked_niches: Vec<RankedNiche>,

    /// Items that passed the eligibility filter
    pub items: Vec<ScoredItem>,
}

/// End-to-end niche analysis: scoring, filtering, clustering, aggregation
/// and ranking
pub struct NichePipeline {
    config: Config,
    metrics: MetricsEngine,
    filter: EligibilityFilter,
    clusterer: Box<dyn ContentClusterer>,
    aggregator: NicheAggregator,
    ranker: NicheRanker,
}

impl NichePipeline {
    /// Build a pipeline with the built-in taxonomy
    pub fn new(config: Config) -> Result<Self> {
        Self::with_taxonomy(config, None)
    }

    pub fn with_taxonomy(config: Config, taxonomy: Option<NicheTaxonomy>) -> Result<Self> {
        Self::with_language_model(config, taxonomy, None)
    }

    /// Build a pipeline whose linguistic extractor runs on `model`.
    /// Without a model the extractor uses its fallback tokenizer.
    pub fn with_language_model(
        config: Config,
        taxonomy: Option<NicheTaxonomy>,
        model: Option<Arc<dyn LanguageModel>>,
    ) -> Result<Self> {
        config.validate()?;

        let naming = create_extractor_with_model(&config.keywords, model.clone());
        let summary = create_extractor_with_model(&config.keywords, model);
        Ok(Self {
            metrics: MetricsEngine::new(),
            filter: EligibilityFilter::new(config.filter.clone()),
            clusterer: create_clusterer_with_extractor(&config, taxonomy, naming),
            aggregator: NicheAggregator::new(summary),
            ranker: NicheRanker::new(config.analysis.strategy.into()),
            config,
        })
    }

    /// Build a pipeline, loading the taxonomy file named in the configuration
    pub async fn from_config(config: Config) -> Result<Self> {
        let taxonomy = match &config.taxonomy.taxonomy_file {
            Some(path) if path.exists() => Some(NicheTaxonomy::from_file(path).await?),
            Some(path) => {
                warn!("Taxonomy file not found: {}, using built-in taxonomy", path.display());
                None
            }
            None => None,
        };

        if let Some(taxonomy) = &taxonomy {
            info!("📚 {}", taxonomy.get_stats().summary().replace('\n', " "));
        }

        Self::with_taxonomy(config, taxonomy)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage over `input`, reporting progress through `progress`.
    ///
    /// Data faults are absorbed; a negative count in a raw record is a
    /// contract violation and aborts the run.
    pub fn run<F>(&self, input: &AnalysisInput, now: DateTime<Utc>, mut progress: F) -> Result<AnalysisReport>
    where
        F: FnMut(&AnalysisProgress),
    {
        let start_time = Instant::now();
        info!(
            "🚀 Starting niche analysis: {} items, {} channels",
            input.items.len(),
            input.channels.len()
        );

        progress(&AnalysisProgress::at(AnalysisStage::Ingestion));
        let items = input
            .items
            .iter()
            .map(|raw| Item::from_raw(raw, now))
            .collect::<niche_core::Result<Vec<_>>>()
            .context("Invalid item record")?;
        let channels = input
            .channels
            .iter()
            .map(|raw| Channel::from_raw(raw, now).map(|c| (c.id.clone(), c)))
            .collect::<niche_core::Result<HashMap<_, _>>>()
            .context("Invalid channel record")?;

        progress(&AnalysisProgress::at(AnalysisStage::Scoring));
        let scored: Vec<ScoredItem> = items
            .into_iter()
            .map(|item| {
                let channel = channels.get(&item.channel_id);
                self.metrics.score(item, channel, now)
            })
            .collect();

        progress(&AnalysisProgress::at(AnalysisStage::Filtering));
        let qualified = self.filter.apply(scored, |id| channels.get(id));

        let ranked_niches = if qualified.is_empty() {
            warn!("No items passed the eligibility filter");
            Vec::new()
        } else {
            self.analyze_with_progress(&qualified, &mut progress)
        };

        let niches_found = ranked_niches.len();
        let mut ranked_niches = ranked_niches;
        ranked_niches.truncate(self.config.analysis.top_niches);

        progress(&AnalysisProgress::at(AnalysisStage::Completed));

        let status = if qualified.is_empty() {
            AnalysisStatus::NoQualifiedItems
        } else {
            AnalysisStatus::Completed
        };

        let report = AnalysisReport {
            status,
            strategy: self.config.analysis.strategy,
            generated_at: now,
            total_items: input.items.len(),
            qualified_items: qualified.len(),
            niches_found,
            processing_time: start_time.elapsed(),
            ranked_niches,
            items: qualified,
        };

        info!(
            "✅ Analysis completed: {} qualified items, {} niches in {:.2}s",
            report.qualified_items,
            report.niches_found,
            report.processing_time.as_secs_f64()
        );
        Ok(report)
    }

    /// Cluster, aggregate and rank already-scored items
    pub fn analyze(&self, items: &[ScoredItem]) -> Vec<RankedNiche> {
        self.analyze_with_progress(items, &mut |_: &AnalysisProgress| {})
    }

    fn analyze_with_progress<F>(&self, items: &[ScoredItem], progress: &mut F) -> Vec<RankedNiche>
    where
        F: FnMut(&AnalysisProgress),
    {
        progress(&AnalysisProgress::at(AnalysisStage::Clustering));
        let niches: Vec<Niche> = self.clusterer.cluster(items);

        progress(&AnalysisProgress::at(AnalysisStage::Aggregation));
        let aggregates: Vec<(String, NicheAggregate)> = niches
            .iter()
            .map(|niche| (niche.name.clone(), self.aggregator.aggregate(&niche.items)))
            .collect();

        progress(&AnalysisProgress::at(AnalysisStage::Ranking));
        self.ranker.rank(&aggregates)
    }
}

/// Read an [`AnalysisInput`] JSON document
pub async fn load_input(path: &Path) -> Result<AnalysisInput> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Cannot read input {}", path.display()))?;
    let input: AnalysisInput = serde_json::from_str(&content)
        .with_context(|| format!("Invalid input JSON in {}", path.display()))?;
    info!("📥 Loaded {} items and {} channels from {}", input.items.len(), input.channels.len(), path.display());
    Ok(input)
}

/// Write `report` as JSON into `output_dir`, returning the file path
pub async fn write_report(report: &AnalysisReport, output_dir: &Path, pretty: bool) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(REPORT_FILE_NAME);

    let json_data = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    tokio::fs::write(&path, json_data).await?;

    info!("💾 Results saved to: {}", path.display());
    Ok(path)
}
