//! Repository engagement scoring
//!
//! Mines every repository listed in the input file, caches per-repo commits,
//! and writes one engagement score per project and month.

use chrono::Utc;
use miner::GitCliMiner;
use processor::PipelineError;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cli=info".parse()?)
                .add_directive("processor=info".parse()?)
                .add_directive("store=info".parse()?)
                .add_directive("miner=info".parse()?),
        )
        .init();

    let config = common::Config::from_env();
    info!(
        "Scoring repositories from {} over the last {} months",
        config.input_path.display(),
        config.cutoff_months
    );

    let miner = GitCliMiner::new();
    let summary = match processor::run(&config, &miner, Utc::now().naive_utc()).await {
        Ok(summary) => summary,
        Err(PipelineError::NoData { dir }) => {
            warn!(
                "No repository produced any commits; nothing cached in {}",
                dir.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for failure in &summary.mining.failed {
        warn!("Failed: {} ({})", failure.url, failure.reason);
    }

    info!(
        "Done: {} repos, {} commits, {} monthly rows, component explains {:.1}% of variance",
        summary.total_repos,
        summary.total_commits,
        summary.aggregate_rows,
        summary.pca.explained_variance_ratio * 100.0
    );
    info!("Scores written to {}", config.output_path.display());

    Ok(())
}
