//! Lexicon-based polarity scorer.
//!
//! Rule-based approach:
//! 1. Look up each word's polarity
//! 2. A negation directly before a hit flips and dampens it (x -0.5)
//! 3. An intensifier directly before a hit scales it
//!
//! Modifiers chain ("not very good") but are dropped at the first word that
//! is neither a modifier nor a hit.
//! 4. Trailing exclamation marks amplify the final score
//!
//! The result is the mean of all hits, clamped to [-1.0, 1.0]. Text with no
//! hits scores exactly 0.0.

use std::collections::HashMap;

use super::{ScorerError, SentimentScorer};

const NEGATION_FACTOR: f64 = -0.5;
const EXCLAMATION_BOOST: f64 = 1.25;
const MAX_EXCLAMATIONS: i32 = 3;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("like", 0.2),
    ("liked", 0.3),
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("brilliant", 0.9),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("pleased", 0.5),
    ("nice", 0.6),
    ("beautiful", 0.85),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("fun", 0.3),
    ("cool", 0.35),
    ("delightful", 1.0),
    ("impressive", 1.0),
    ("helpful", 0.5),
    ("positive", 0.23),
    ("recommend", 0.4),
    ("superb", 1.0),
    ("satisfied", 0.5),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("win", 0.8),
    ("success", 0.3),
    ("easy", 0.43),
    ("fast", 0.2),
    ("reliable", 0.4),
    ("exciting", 0.3),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("hate", -0.8),
    ("hated", -0.9),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("disgusting", -1.0),
    ("sad", -0.5),
    ("angry", -0.5),
    ("poor", -0.4),
    ("ugly", -0.7),
    ("wrong", -0.5),
    ("stupid", -0.8),
    ("annoying", -0.8),
    ("boring", -1.0),
    ("useless", -0.5),
    ("broken", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("dislike", -0.5),
    ("slow", -0.3),
    ("painful", -0.7),
    ("mess", -0.3),
    ("negative", -0.3),
    ("scary", -0.5),
    ("unhappy", -0.6),
    ("crap", -0.8),
    ("lose", -0.4),
    ("problem", -0.3),
    ("difficult", -0.5),
    ("expensive", -0.5),
    ("waste", -0.2),
    ("sorry", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nothing", "none", "cannot", "cant", "can't",
    "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "weren't", "werent", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.3),
    ("highly", 1.3),
    ("super", 1.3),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("fairly", 0.8),
    ("quite", 1.1),
];

/// Lexicon-driven [`SentimentScorer`].
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Create a scorer with the built-in English lexicon.
    pub fn new() -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();

        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(w, m)| (w.to_string(), *m))
            .collect();

        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();

        Self {
            words,
            intensifiers,
            negations,
        }
    }

    /// Add or override lexicon entries.
    pub fn with_words<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, score) in entries {
            self.words
                .insert(word.into().to_lowercase(), score.clamp(-1.0, 1.0));
        }
        self
    }

    /// Number of entries in the word lexicon.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the word lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }

    /// Polarity of `text` under this lexicon.
    pub fn polarity(&self, text: &str) -> f64 {
        let mut contributions: Vec<f64> = Vec::new();
        let mut negate_next = false;
        let mut intensity = 1.0;

        for word in tokenize(text) {
            if self.is_negation(&word) {
                negate_next = true;
                continue;
            }

            if let Some(mult) = self.intensifiers.get(&word) {
                intensity *= mult;
                continue;
            }

            if let Some(score) = self.words.get(&word) {
                let mut value = score * intensity;
                if negate_next {
                    value *= NEGATION_FACTOR;
                }
                contributions.push(value);
            }

            negate_next = false;
            intensity = 1.0;
        }

        if contributions.is_empty() {
            return 0.0;
        }

        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        let boosted = mean * EXCLAMATION_BOOST.powi(trailing_exclamations(text));

        boosted.clamp(-1.0, 1.0)
    }
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn score(&self, text: &str) -> Result<f64, ScorerError> {
        Ok(self.polarity(text))
    }
}

/// Lowercased words, split on anything that is not alphanumeric or an apostrophe.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '\u{2019}'))
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('\u{2019}', "'").to_lowercase())
}

fn trailing_exclamations(text: &str) -> i32 {
    let count = text
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| *c == '!')
        .count() as i32;
    count.min(MAX_EXCLAMATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Sentiment;

    fn sentiment_of(text: &str) -> Sentiment {
        Sentiment::from_polarity(LexiconScorer::new().polarity(text))
    }

    #[test]
    fn test_reference_examples() {
        assert_eq!(sentiment_of("I love this!"), Sentiment::Positive);
        assert_eq!(sentiment_of("I hate this."), Sentiment::Negative);
        assert_eq!(sentiment_of("It is a table."), Sentiment::Neutral);
    }

    #[test]
    fn test_no_hits_is_exactly_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.polarity("It is a table."), 0.0);
        assert_eq!(scorer.polarity(""), 0.0);
        assert_eq!(scorer.polarity("!!!"), 0.0);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let scorer = LexiconScorer::new();
        let plain = scorer.polarity("this is good");
        let negated = scorer.polarity("this is not good");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
        assert!((negated - plain * NEGATION_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_modifiers_only_reach_the_next_word() {
        let scorer = LexiconScorer::new();
        let good = scorer.polarity("good");

        assert_eq!(scorer.polarity("not a table, it is good"), good);
        assert_eq!(scorer.polarity("so I went and it was good"), good);
        assert_eq!(sentiment_of("never mind, this is great"), Sentiment::Positive);
    }

    #[test]
    fn test_modifiers_chain() {
        let scorer = LexiconScorer::new();
        let expected = 0.7 * 1.3 * NEGATION_FACTOR;
        assert!((scorer.polarity("not very good") - expected).abs() < 1e-9);
    }

    #[test]
    fn test_contractions_negate() {
        assert_eq!(sentiment_of("I don't like it"), Sentiment::Negative);
        assert_eq!(sentiment_of("I don\u{2019}t like it"), Sentiment::Negative);
    }

    #[test]
    fn test_intensifier_scales() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("very good") > scorer.polarity("good"));
        assert!(scorer.polarity("slightly good") < scorer.polarity("good"));
    }

    #[test]
    fn test_exclamations_amplify() {
        let scorer = LexiconScorer::new();
        let calm = scorer.polarity("I love this");
        let excited = scorer.polarity("I love this!");
        assert!((excited - calm * EXCLAMATION_BOOST).abs() < 1e-9);

        // Boost is capped
        let capped = scorer.polarity("I love this!!!");
        assert_eq!(scorer.polarity("I love this!!!!!!"), capped);
    }

    #[test]
    fn test_mixed_text_averages() {
        let scorer = LexiconScorer::new();
        // good (0.7) and bad (-0.7) cancel
        assert_eq!(scorer.polarity("good and bad"), 0.0);
    }

    #[test]
    fn test_polarity_is_clamped() {
        let scorer = LexiconScorer::new();
        let p = scorer.polarity("absolutely extremely perfect!!!");
        assert_eq!(p, 1.0);
        let n = scorer.polarity("absolutely extremely terrible!!!");
        assert_eq!(n, -1.0);
    }

    #[test]
    fn test_custom_words() {
        let scorer = LexiconScorer::new().with_words([("Table", 0.4)]);
        assert!(scorer.polarity("It is a table.") > 0.0);
        assert!(!scorer.is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(sentiment_of("GREAT WORK"), Sentiment::Positive);
    }
}
