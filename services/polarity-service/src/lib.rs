//! Polarity Service - HTTP sentiment analysis.
//!
//! This crate provides:
//! - A pluggable polarity scorer with a built-in lexicon implementation
//! - An append-only record store (SQLite)
//! - `POST /analyze`, `GET /history` and `GET /health` over HTTP

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analysis;
pub mod error;
pub mod record;
pub mod routes;
pub mod scorer;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use polarity_common::config::Config;

pub use analysis::{AnalysisService, DEFAULT_HISTORY_LIMIT};
pub use error::{RequestError, ServiceError};
pub use record::{Sentiment, SentimentRecord};
pub use routes::build_router;
pub use scorer::{LexiconScorer, ScorerError, SentimentScorer};
pub use store::{RecordStore, SqliteRecordStore, StoreError};

// ============================================================================
// Polarity Service
// ============================================================================

/// Runs the HTTP server on top of an [`AnalysisService`].
pub struct PolarityService {
    config: Config,
}

impl PolarityService {
    /// Create a new polarity service.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Assemble the scorer and store described by the configuration.
    ///
    /// The store is not contacted here.
    pub fn build_analysis(&self) -> Arc<AnalysisService> {
        let scorer = LexiconScorer::new();
        tracing::info!(words = scorer.len(), "Lexicon scorer loaded");

        let store = store::connect_lazy(&self.config.store.uri);

        Arc::new(AnalysisService::new(Arc::new(scorer), store))
    }

    /// Start the HTTP server.
    ///
    /// An unreachable store is logged and tolerated; failing to bind is fatal.
    pub async fn start(&self) -> anyhow::Result<()> {
        tracing::info!("Starting Polarity service");

        let analysis = self.build_analysis();

        if !analysis.check_store().await {
            tracing::warn!(
                uri = %self.config.store.uri,
                "Continuing without store; analyze and history will fail until it is reachable"
            );
        }

        let router = build_router(analysis);
        let addr = self.config.listen_address();

        tracing::info!("Starting Polarity HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Polarity service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
