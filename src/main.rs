use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};

use viral_niche_scanner::clustering::{ClusterStrategy, NicheTaxonomy};
use viral_niche_scanner::keywords::ExtractorKind;
use viral_niche_scanner::pipeline::{load_input, write_report, NichePipeline};
use viral_niche_scanner::Config;

#[derive(Parser)]
#[command(name = "niche-scanner")]
#[command(version, about = "Find and rank viral short-form video niches")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the standard search paths)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON file of item and channel records
    Analyze {
        /// Input JSON with `items` and `channels`
        input: PathBuf,

        /// Output directory for the report
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Clustering strategy
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Keyword extractor
        #[arg(short, long, value_enum)]
        extractor: Option<ExtractorArg>,

        /// Random seed for clustering
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write the default configuration to a file
    InitConfig {
        #[arg(default_value = "viral-niche-scanner.toml")]
        path: PathBuf,
    },
    /// Show taxonomy statistics
    Taxonomy {
        /// Taxonomy file merged into the built-in taxonomy
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Statistical,
    RuleBased,
}

impl From<StrategyArg> for ClusterStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Statistical => ClusterStrategy::Statistical,
            StrategyArg::RuleBased => ClusterStrategy::RuleBased,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractorArg {
    Linguistic,
    RuleBased,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Linguistic => ExtractorKind::Linguistic,
            ExtractorArg::RuleBased => ExtractorKind::RuleBased,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "viral_niche_scanner=debug,niche_core=debug,info"
    } else {
        "viral_niche_scanner=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            strategy,
            extractor,
            seed,
        } => {
            let mut config = config;
            if let Some(strategy) = strategy {
                config.analysis.strategy = strategy.into();
            }
            if let Some(extractor) = extractor {
                config.keywords.extractor = extractor.into();
            }
            if let Some(seed) = seed {
                config.analysis.random_seed = seed;
            }
            if let Some(dir) = output_dir {
                config.output.base_dir = dir;
            }
            analyze(config, input).await
        }
        Commands::InitConfig { path } => {
            let path = path
                .to_str()
                .ok_or_else(|| anyhow!("Config path is not valid UTF-8"))?;
            Config::default().save(path)
        }
        Commands::Taxonomy { file } => {
            let taxonomy = match file {
                Some(path) => NicheTaxonomy::from_file(&path).await?,
                None => NicheTaxonomy::default(),
            };
            println!("{}", taxonomy.get_stats().summary());
            for category in taxonomy.categories() {
                println!("  {} ({} keywords)", category.name, category.keywords.len());
            }
            Ok(())
        }
    }
}

async fn analyze(config: Config, input: PathBuf) -> Result<()> {
    info!("🚀 Viral Niche Scanner starting...");
    info!("📁 Input file: {}", input.display());
    info!("📂 Output directory: {}", config.output.base_dir.display());
    for line in config.summary().lines() {
        info!("{}", line);
    }

    if !input.exists() {
        error!("Input file does not exist: {}", input.display());
        return Err(anyhow!("Input file not found"));
    }

    let records = load_input(&input).await?;
    let output_dir = config.output.base_dir.clone();
    let pretty = config.output.pretty_json;
    let pipeline = NichePipeline::from_config(config).await?;

    let report = pipeline.run(&records, Utc::now(), |progress| {
        info!("[{:>3}%] {}", progress.percentage, progress.message);
    })?;

    let path = write_report(&report, &output_dir, pretty).await?;

    info!("🎉 Analysis completed in {:.2}s", report.processing_time.as_secs_f64());
    info!("✅ Qualified items: {}/{}", report.qualified_items, report.total_items);
    for (rank, niche) in report.ranked_niches.iter().enumerate() {
        info!(
            "{:>2}. {} (score {:.1}, {} videos)",
            rank + 1,
            niche.niche_name,
            niche.ranking_score,
            niche.analysis.total_videos
        );
    }
    info!("💾 Report: {}", path.display());

    Ok(())
}
