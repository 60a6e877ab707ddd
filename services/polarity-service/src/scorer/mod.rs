//! Sentiment scoring.
//!
//! The service only needs "text in, polarity out". Anything that can do that
//! implements [`SentimentScorer`]; the bundled implementation is a
//! lexicon-based scorer.

mod lexicon;

pub use lexicon::LexiconScorer;

use thiserror::Error;

/// Scorer failure.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The scorer produced a value outside [-1.0, 1.0] or NaN
    #[error("Scorer returned invalid polarity: {0}")]
    InvalidPolarity(f64),

    /// Scorer-specific failure
    #[error("{0}")]
    Failed(String),
}

/// Computes a polarity score for a piece of text.
pub trait SentimentScorer: Send + Sync {
    /// Scorer name, used in logs.
    fn name(&self) -> &str;

    /// Score `text`, returning a polarity in [-1.0, 1.0].
    fn score(&self, text: &str) -> Result<f64, ScorerError>;
}

/// Run a scorer and reject out-of-range results.
pub fn checked_score(scorer: &dyn SentimentScorer, text: &str) -> Result<f64, ScorerError> {
    let polarity = scorer.score(text)?;
    if polarity.is_nan() || !(-1.0..=1.0).contains(&polarity) {
        return Err(ScorerError::InvalidPolarity(polarity));
    }
    Ok(polarity)
}
