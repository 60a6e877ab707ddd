//! Sentiment record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment label derived from the sign of a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Classify a polarity score by its sign.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Self::Positive
        } else if polarity < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Parse from database string
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored piece of text, immutable once written.
///
/// Serializes without any store identifier; `timestamp` renders as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Submitted text, trimmed
    pub text: String,
    /// Label derived from `polarity`
    pub sentiment: Sentiment,
    /// Polarity in [-1.0, 1.0]
    pub polarity: f64,
    /// Write time (UTC)
    pub timestamp: DateTime<Utc>,
}

impl SentimentRecord {
    /// Build a record stamped with the current time.
    pub fn new(text: impl Into<String>, polarity: f64) -> Self {
        Self::at(text, polarity, Utc::now())
    }

    /// Build a record with an explicit timestamp.
    pub fn at(text: impl Into<String>, polarity: f64, timestamp: DateTime<Utc>) -> Self {
        let polarity = polarity.clamp(-1.0, 1.0);
        Self {
            text: text.into(),
            sentiment: Sentiment::from_polarity(polarity),
            polarity,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sentiment_follows_sign() {
        assert_eq!(Sentiment::from_polarity(0.3), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(f64::MIN_POSITIVE), Sentiment::Positive);
        assert_eq!(Sentiment::from_polarity(-0.01), Sentiment::Negative);
        assert_eq!(Sentiment::from_polarity(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_polarity(-0.0), Sentiment::Neutral);
    }

    #[test]
    fn test_db_string_mapping() {
        for sentiment in [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral] {
            assert_eq!(Sentiment::from_db_string(sentiment.as_str()), Some(sentiment));
        }
        assert_eq!(Sentiment::from_db_string("mixed"), None);
    }

    #[test]
    fn test_record_clamps_polarity() {
        let record = SentimentRecord::new("wow", 1.7);
        assert_eq!(record.polarity, 1.0);
        assert_eq!(record.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_record_serialization_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let record = SentimentRecord::at("I hate this.", -0.8, ts);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["text"], "I hate this.");
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["polarity"], -0.8);
        assert_eq!(json["timestamp"], "2026-03-01T12:30:00Z");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
