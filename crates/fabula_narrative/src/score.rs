//! Score extraction from free-form critique text.
//!
//! Critic output is unstructured, so scores are read with an ordered list of
//! rules. The first rule that finds a score wins; if none does, the score is
//! [`NO_SCORE`], which ranks below every real score.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

/// Score returned when no rule matches.
pub const NO_SCORE: u8 = 0;

/// Lowest score a matched rule can produce.
pub const MIN_SCORE: u8 = 1;

/// Highest score a matched rule can produce.
pub const MAX_SCORE: u8 = 10;

static EXPLICIT_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bscore\s*[:\-]?\s*([0-9]+)(?:\s*/\s*10)?").expect("valid explicit score regex")
});

static OUT_OF_TEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/\s*10\b").expect("valid out-of-ten regex"));

static STANDALONE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(10|[1-9])\b").expect("valid standalone token regex"));

/// One way of reading a score out of critique text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ScoreRule {
    /// `score N`, `score: N`, `score - N`, optionally followed by `/10`.
    /// Case-insensitive; N is ASCII digits clamped into `1..=10`.
    Explicit,
    /// The first standalone integer token between 1 and 10, ignoring
    /// `/10` denominators.
    ///
    /// This recovers scores from loosely formatted feedback but can pick up
    /// unrelated numbers such as list indices.
    StandaloneToken,
}

impl ScoreRule {
    /// Applies the rule, returning a score if it matched.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_narrative::ScoreRule;
    ///
    /// assert_eq!(ScoreRule::Explicit.apply("Score: 7/10"), Some(7));
    /// assert_eq!(ScoreRule::Explicit.apply("score - 11"), Some(10));
    /// assert_eq!(ScoreRule::Explicit.apply("I'd give it 4"), None);
    /// assert_eq!(ScoreRule::StandaloneToken.apply("I'd give it 4"), Some(4));
    /// ```
    pub fn apply(&self, text: &str) -> Option<u8> {
        match self {
            ScoreRule::Explicit => {
                let captures = EXPLICIT_SCORE.captures(text)?;
                let digits = captures.get(1)?.as_str();
                // Digit runs too long for u64 are far above the cap anyway
                let value = digits.parse::<u64>().unwrap_or(u64::MAX);
                Some(value.clamp(MIN_SCORE as u64, MAX_SCORE as u64) as u8)
            }
            ScoreRule::StandaloneToken => {
                let numerators = OUT_OF_TEN.replace_all(text, "");
                STANDALONE_TOKEN
                    .captures(&numerators)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse::<u8>().ok())
            }
        }
    }
}

/// Ordered score-reading policy.
///
/// # Examples
///
/// ```
/// use fabula_narrative::ScoreExtractor;
///
/// let scorer = ScoreExtractor::default();
/// assert_eq!(scorer.extract("Overall SCORE: 8 / 10"), 8);
/// assert_eq!(scorer.extract("Pacing drags; 3 of the scenes repeat."), 3);
/// assert_eq!(scorer.extract("No numbers here."), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreExtractor {
    rules: Vec<ScoreRule>,
}

impl Default for ScoreExtractor {
    fn default() -> Self {
        Self::new(vec![ScoreRule::Explicit, ScoreRule::StandaloneToken])
    }
}

impl ScoreExtractor {
    /// Creates an extractor that tries `rules` in order.
    pub fn new(rules: Vec<ScoreRule>) -> Self {
        Self { rules }
    }

    /// Rules in the order they are tried.
    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    /// Reads a score in `0..=10` from critique text.
    #[instrument(skip(self, feedback), fields(feedback_chars = feedback.len()))]
    pub fn extract(&self, feedback: &str) -> u8 {
        for rule in &self.rules {
            if let Some(score) = rule.apply(feedback) {
                debug!(%rule, score, "Score extracted");
                return score;
            }
        }

        debug!("No score found in feedback");
        NO_SCORE
    }
}

/// Reads a score with the default rule order.
pub fn extract_score(feedback: &str) -> u8 {
    ScoreExtractor::default().extract(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_with_out_of_ten() {
        assert_eq!(extract_score("Score: 7/10"), 7);
    }

    #[test]
    fn test_explicit_clamps_high() {
        assert_eq!(extract_score("score - 11"), 10);
    }

    #[test]
    fn test_explicit_clamps_zero_to_one() {
        assert_eq!(extract_score("Score: 0/10"), 1);
    }

    #[test]
    fn test_explicit_huge_number_clamps() {
        assert_eq!(ScoreRule::Explicit.apply("score 123456789012345678901234567890"), Some(10));
    }

    #[test]
    fn test_explicit_is_case_insensitive() {
        assert_eq!(extract_score("FINAL SCORE 9"), 9);
    }

    #[test]
    fn test_explicit_wins_over_earlier_tokens() {
        let feedback = "1. Plot is thin.\n2. Dialogue is flat.\nScore: 5/10";
        assert_eq!(extract_score(feedback), 5);
    }

    #[test]
    fn test_standalone_fallback() {
        assert_eq!(extract_score("Solid work, I'd say 4 overall."), 4);
    }

    #[test]
    fn test_standalone_ignores_embedded_digits() {
        assert_eq!(ScoreRule::StandaloneToken.apply("chapter11 and v2x"), None);
    }

    #[test]
    fn test_standalone_ignores_out_of_range() {
        assert_eq!(ScoreRule::StandaloneToken.apply("It runs 42 pages, 0 typos."), None);
    }

    #[test]
    fn test_standalone_picks_list_index() {
        // Known imprecision: the first list index is read as the score
        assert_eq!(extract_score("1. The ending is rushed."), 1);
    }

    #[test]
    fn test_non_ascii_digits_are_not_scores() {
        assert_eq!(ScoreRule::Explicit.apply("Weak ending. Score: ３/10"), None);
        assert_eq!(extract_score("Weak ending. Score: ３/10"), NO_SCORE);
        assert_eq!(extract_score("Score: ٣/10"), NO_SCORE);
    }

    #[test]
    fn test_standalone_skips_denominator() {
        assert_eq!(ScoreRule::StandaloneToken.apply("rated ?/10"), None);
        assert_eq!(extract_score("I'd say 6/10 overall."), 6);
        assert_eq!(extract_score("A clean 10/10."), 10);
    }

    #[test]
    fn test_no_digits_is_zero() {
        assert_eq!(extract_score("A moving piece with a weak ending."), NO_SCORE);
        assert_eq!(extract_score(""), NO_SCORE);
    }

    #[test]
    fn test_custom_rule_order() {
        let strict = ScoreExtractor::new(vec![ScoreRule::Explicit]);
        assert_eq!(strict.extract("I'd give it 4"), NO_SCORE);
        assert_eq!(strict.rules(), &[ScoreRule::Explicit]);
    }
}
