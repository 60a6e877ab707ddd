//! Polarity Service - HTTP sentiment analysis.

use anyhow::Result;
use polarity_common::config::Config;
use polarity_common::logging::init_logging_with_exclusions;
use polarity_service::PolarityService;

#[tokio::main]
async fn main() -> Result<()> {
    // Start timing immediately for cold-start measurement
    let startup_start = std::time::Instant::now();

    // Load configuration (file, .env, environment) and validate it
    let config = Config::load_and_validate()?;

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Polarity Service v{}", env!("CARGO_PKG_VERSION"));

    let service = PolarityService::new(config);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
