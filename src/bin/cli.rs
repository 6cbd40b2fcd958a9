//! Coastwatch CLI
//!
//! Local execution entry point. For the HTTP API, use `coastwatch-server`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coastwatch::{
    error::Result,
    models::{CategoryKey, Config, SearchResults, VideoRecord},
    pipeline,
    services::{Classifier, QueryPlanner},
    storage::ResultExporter,
};

/// Coastwatch - Coastal Hazard Emergency Video Scraper
#[derive(Parser, Debug)]
#[command(
    name = "coastwatch",
    version,
    about = "Finds emergency coastal-hazard videos in English and Hindi"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search every hazard category and export CSV/JSON results
    Scrape {
        /// Per-category result cap (default: scraper.max_results_per_category)
        #[arg(long)]
        max_results: Option<usize>,

        /// Output directory (default: output.dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print every category key with its search queries
    Plan,

    /// Classify a single title without fetching anything
    Classify {
        title: String,

        #[arg(long, default_value = "")]
        channel: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scrape {
            max_results,
            output,
        } => {
            if let Some(cap) = max_results {
                config.scraper.max_results_per_category = cap;
            }

            log::info!(
                "Starting emergency video search (cap {} per category)",
                config.scraper.max_results_per_category
            );
            let results = pipeline::run_scraper(&config).await?;

            let exporter = match output {
                Some(dir) => ResultExporter::new(dir, &config.output.file_prefix),
                None => ResultExporter::from_config(&config.output),
            };
            let summary = exporter.export(&results).await?;

            print_summary(&results);
            println!("CSV:  {}", summary.csv_path.display());
            println!("JSON: {}", summary.json_path.display());
        }

        Command::Plan => {
            let planner = QueryPlanner::from_config(&config);
            for plan in planner.plan() {
                println!("{}", plan.key);
                for query in &plan.queries {
                    println!("  {}", query);
                }
            }
        }

        Command::Classify {
            title,
            channel,
            description,
        } => {
            let record = VideoRecord {
                title,
                channel,
                description,
                ..VideoRecord::default()
            };
            let classifier = Classifier::new(&config.keywords);
            println!("relevant:  {}", classifier.relevant(&record));
            println!("emergency: {}", classifier.emergency(&record));
            println!("verdict:   {:?}", classifier.verdict(&record));
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} hazards, {} locality keywords, {} emergency keywords)",
                config.hazards.len(),
                config.keywords.locality.len(),
                config.keywords.emergency.len()
            );
        }
    }

    Ok(())
}

fn print_summary(results: &SearchResults) {
    println!();
    println!("EMERGENCY VIDEO SEARCH SUMMARY");
    println!("Total emergency videos found: {}", results.total_videos());
    println!("Categories searched: {}", results.category_count());

    if results.total_videos() == 0 {
        println!();
        println!("No emergency videos found. Try again later, raise --max-results,");
        println!("or widen the keyword lists in the configuration file.");
        return;
    }

    println!();
    for (key, videos) in results.iter() {
        if videos.is_empty() {
            continue;
        }
        let (language, hazard) = CategoryKey::describe(&key);
        println!("{} - {}: {} videos", language, hazard, videos.len());
    }
}
