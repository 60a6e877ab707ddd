//! Analysis service: score text, persist the result, read back history.

use std::sync::Arc;

use crate::error::{RequestError, ServiceError};
use crate::record::SentimentRecord;
use crate::scorer::{checked_score, SentimentScorer};
use crate::store::RecordStore;

/// Records returned by [`AnalysisService::history`].
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Wires a scorer and a store into the two service operations.
///
/// Holds no mutable state of its own; every call is independent.
pub struct AnalysisService {
    scorer: Arc<dyn SentimentScorer>,
    store: Arc<dyn RecordStore>,
}

impl AnalysisService {
    pub fn new(scorer: Arc<dyn SentimentScorer>, store: Arc<dyn RecordStore>) -> Self {
        Self { scorer, store }
    }

    /// Score `text`, store the record, and return it.
    ///
    /// Whitespace-only input is rejected before the scorer or store is touched.
    pub async fn analyze(&self, text: &str) -> Result<SentimentRecord, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::TextRequired.into());
        }

        let polarity = checked_score(self.scorer.as_ref(), text)?;
        let record = SentimentRecord::new(text, polarity);

        self.store.append(&record).await?;

        tracing::info!(
            scorer = self.scorer.name(),
            sentiment = %record.sentiment,
            polarity = record.polarity,
            chars = text.chars().count(),
            "Text analyzed"
        );

        Ok(record)
    }

    /// The [`DEFAULT_HISTORY_LIMIT`] most recent records, newest first.
    pub async fn history(&self) -> Result<Vec<SentimentRecord>, ServiceError> {
        let records = self.store.latest(DEFAULT_HISTORY_LIMIT).await?;
        tracing::debug!(count = records.len(), "History loaded");
        Ok(records)
    }

    /// Quiet store probe for health checks.
    pub async fn store_reachable(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Store probe failed");
                false
            }
        }
    }

    /// Probe the store, logging the outcome. Never fails.
    pub async fn check_store(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => {
                tracing::info!(store = self.store.name(), "Record store reachable");
                true
            }
            Err(e) => {
                tracing::error!(store = self.store.name(), error = %e, "Record store unreachable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Sentiment;
    use crate::scorer::{LexiconScorer, ScorerError};
    use crate::store::SqliteRecordStore;

    struct Exploding;

    impl SentimentScorer for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn score(&self, _text: &str) -> Result<f64, ScorerError> {
            Err(ScorerError::Failed("scorer exploded".into()))
        }
    }

    async fn service() -> (AnalysisService, Arc<SqliteRecordStore>) {
        let store = Arc::new(SqliteRecordStore::in_memory().await.unwrap());
        let svc = AnalysisService::new(Arc::new(LexiconScorer::new()), store.clone());
        (svc, store)
    }

    #[tokio::test]
    async fn test_analyze_trims_and_stores() {
        let (svc, store) = service().await;

        let record = svc.analyze("   I love this!  \n").await.unwrap();
        assert_eq!(record.text, "I love this!");
        assert_eq!(record.sentiment, Sentiment::Positive);
        assert!(record.polarity > 0.0);

        let stored = store.latest(10).await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn test_blank_text_writes_nothing() {
        let (svc, store) = service().await;

        for blank in ["", " ", "\t\n"] {
            let err = svc.analyze(blank).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(RequestError::TextRequired)));
        }

        assert!(store.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scorer_failure_writes_nothing() {
        let store = Arc::new(SqliteRecordStore::in_memory().await.unwrap());
        let svc = AnalysisService::new(Arc::new(Exploding), store.clone());

        let err = svc.analyze("anything").await.unwrap_err();
        assert_eq!(err.to_string(), "scorer exploded");
        assert!(store.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_calls_are_not_deduplicated() {
        let (svc, _) = service().await;
        svc.analyze("same text").await.unwrap();
        svc.analyze("same text").await.unwrap();
        assert_eq!(svc.history().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_is_capped_at_default_limit() {
        let (svc, store) = service().await;
        for i in 0..(DEFAULT_HISTORY_LIMIT + 10) {
            svc.analyze(&format!("entry {i}")).await.unwrap();
        }

        let history = svc.history().await.unwrap();
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history[0].text, format!("entry {}", DEFAULT_HISTORY_LIMIT + 9));
        assert_eq!(store.latest(100).await.unwrap().len(), DEFAULT_HISTORY_LIMIT + 10);
    }

    #[tokio::test]
    async fn test_check_store_reports_unreachable() {
        let store = Arc::new(SqliteRecordStore::lazy("postgres://nowhere"));
        let svc = AnalysisService::new(Arc::new(LexiconScorer::new()), store);
        assert!(!svc.check_store().await);
        assert!(!svc.store_reachable().await);
    }

    #[tokio::test]
    async fn test_store_reachable() {
        let (svc, _) = service().await;
        assert!(svc.store_reachable().await);
    }
}
