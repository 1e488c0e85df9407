//! Lexicon Scorer: maps one message to a 0-100 sentiment value
//!
//! keyword_score = 50 + 10 * positive_hits - 10 * negative_hits
//! final         = 0.7 * keyword_score + 0.3 * (polarity + 1) * 50, clamped

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::predictor::{ActionPredictor, IndicatorLexicon};
use crate::core::signals::{SignalDetector, SignalLexicon};
use crate::core::trajectory::TrajectoryAnalyzer;
use crate::error::{Result, TrackerError};
use crate::{KEYWORD_BLEND_WEIGHT, KEYWORD_STEP, NEGATION_DAMPING, NEUTRAL_SCORE, POLARITY_BLEND_WEIGHT};

// =============================================================================
// DEFAULT LEXICON (English + Spanish)
// =============================================================================

const POSITIVE_WORDS: &[&str] = &[
    "love", "excellent", "amazing", "fantastic", "wonderful", "great", "good",
    "perfect", "best", "awesome", "brilliant", "outstanding", "superb", "trust",
    "confident", "happy", "thrilled", "delighted", "impressed", "satisfied",
    "encanta", "excelente", "perfecto", "increible", "genial", "bueno", "maravilloso",
    "fantastico", "sobresaliente", "impresionado", "satisfecho", "adoro",
    "me encanta", "fantástico", "fabuloso", "me gusta", "bien", "obra",
];

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "terrible", "awful", "horrible", "bad", "poor", "worst",
    "disappointed", "frustrated", "angry", "annoyed", "upset", "problem",
    "issue", "bug", "slow", "expensive", "difficult", "fail", "cancel",
    "doubt", "concern", "worried", "unsure", "alternative", "competitor",
    "odio", "malo", "peor", "problema", "bugs",
    "caro", "lento", "difícil", "fracaso", "cancelar", "competencia",
    "competidor", "preocupacion", "inquietud", "alternativa", "dudoso",
    "cambiar", "adios", "adiós", "otros developers", "más barato",
    "renunciar", "renuncia", "renuncie", "partir", "irme", "me voy",
    "dejar", "abandonar", "salir", "terminar", "fin", "otro trabajo",
    "mejor oferta", "buscar", "explorar", "mejores", "mejores roles",
];

/// Positive and negative marker terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::new(POSITIVE_WORDS.iter().copied(), NEGATIVE_WORDS.iter().copied())
    }
}

impl SentimentLexicon {
    /// Build a lexicon; terms are lower-cased, blanks and duplicates dropped
    pub fn new<P, N, S>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = S>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            positive: normalize_terms(positive),
            negative: normalize_terms(negative),
        }
    }

    /// Distinct (positive, negative) terms present in already lower-cased text
    pub fn count_hits(&self, lowered: &str) -> (usize, usize) {
        (count_present(&self.positive, lowered), count_present(&self.negative, lowered))
    }
}

/// Lower-case, trim, drop blanks and duplicates, keep first-seen order
pub(crate) fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

/// Number of distinct terms occurring as substrings
pub(crate) fn count_present(terms: &[String], lowered: &str) -> usize {
    terms.iter().filter(|t| lowered.contains(t.as_str())).count()
}

/// First term (in list order) occurring as a substring
pub(crate) fn first_present<'a>(terms: &'a [String], lowered: &str) -> Option<&'a str> {
    terms.iter().map(String::as_str).find(|t| lowered.contains(t))
}

// =============================================================================
// LEXICON FILE
// =============================================================================

/// Optional lexicon overrides loaded from JSON. Missing sections keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub sentiment: Option<SentimentLexicon>,
    #[serde(default)]
    pub signals: Option<SignalLexicon>,
    #[serde(default)]
    pub indicators: Option<IndicatorLexicon>,
}

impl LexiconConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LexiconConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Scorer over the configured (or default) sentiment lexicon
    pub fn scorer(&self) -> LexiconScorer {
        match &self.sentiment {
            Some(s) => LexiconScorer::new()
                .with_lexicon(SentimentLexicon::new(s.positive.iter(), s.negative.iter())),
            None => LexiconScorer::new(),
        }
    }

    pub fn trajectory_analyzer(&self) -> TrajectoryAnalyzer {
        TrajectoryAnalyzer::with_scorer(self.scorer())
    }

    pub fn signal_detector(&self) -> SignalDetector {
        SignalDetector::with_lexicon(self.signals.clone().unwrap_or_default())
    }

    pub fn action_predictor(&self) -> ActionPredictor {
        ActionPredictor::with_parts(
            self.trajectory_analyzer(),
            self.indicators.clone().unwrap_or_default(),
        )
    }

    /// Every supplied list must keep at least one non-blank term
    fn validate(&self) -> Result<()> {
        let mut lists: Vec<(&str, &Vec<String>)> = Vec::new();
        if let Some(s) = &self.sentiment {
            lists.push(("sentiment.positive", &s.positive));
            lists.push(("sentiment.negative", &s.negative));
        }
        if let Some(s) = &self.signals {
            lists.push(("signals.comparison", &s.comparison));
            lists.push(("signals.frustration", &s.frustration));
            lists.push(("signals.disengagement", &s.disengagement));
            lists.push(("signals.price", &s.price));
        }
        if let Some(i) = &self.indicators {
            lists.push(("indicators.churn", &i.churn));
            lists.push(("indicators.resolution", &i.resolution));
        }
        for (name, list) in lists {
            if list.iter().all(|t| t.trim().is_empty()) {
                return Err(TrackerError::InvalidLexicon(format!("{} has no terms", name)));
            }
        }
        Ok(())
    }
}

// =============================================================================
// POLARITY
// =============================================================================

/// General-purpose polarity estimate in [-1, 1]
pub trait PolarityEstimator: std::fmt::Debug + Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Contributes nothing; the keyword score alone decides
#[derive(Debug, Default, Clone, Copy)]
pub struct NeutralPolarity;

impl PolarityEstimator for NeutralPolarity {
    fn polarity(&self, _text: &str) -> f64 {
        0.0
    }
}

lazy_static! {
    static ref RE_WORD: Regex = Regex::new(r"[\p{L}']+").unwrap();

    static ref WORD_POLARITY: HashMap<&'static str, f64> = [
        // English
        ("love", 0.5), ("loved", 0.7), ("excellent", 1.0), ("amazing", 0.6),
        ("fantastic", 0.4), ("wonderful", 1.0), ("great", 0.8), ("good", 0.7),
        ("perfect", 1.0), ("best", 1.0), ("awesome", 1.0), ("brilliant", 0.9),
        ("outstanding", 0.5), ("superb", 1.0), ("happy", 0.8), ("delighted", 0.7),
        ("impressed", 0.5), ("satisfied", 0.5), ("nice", 0.6), ("helpful", 0.5),
        ("glad", 0.5), ("pleased", 0.5), ("easy", 0.4), ("reliable", 0.5),
        ("thanks", 0.2), ("fine", 0.4), ("better", 0.5),
        ("hate", -0.8), ("terrible", -1.0), ("awful", -1.0), ("horrible", -1.0),
        ("bad", -0.7), ("poor", -0.4), ("worst", -1.0), ("worse", -0.4),
        ("disappointed", -0.75), ("disappointing", -0.6), ("frustrated", -0.7),
        ("frustrating", -0.6), ("angry", -0.5), ("annoyed", -0.6), ("upset", -0.5),
        ("broken", -0.4), ("slow", -0.3), ("expensive", -0.5), ("difficult", -0.5),
        ("useless", -0.5), ("wrong", -0.5), ("sad", -0.5), ("unhappy", -0.6),
        ("unacceptable", -0.8), ("ridiculous", -0.3), ("failed", -0.5),
        // Spanish
        ("excelente", 1.0), ("bueno", 0.7), ("buena", 0.7), ("perfecto", 1.0),
        ("genial", 0.8), ("increible", 0.6), ("increíble", 0.6), ("satisfecho", 0.5),
        ("malo", -0.7), ("mala", -0.7), ("peor", -1.0), ("lento", -0.3),
        ("caro", -0.5), ("insatisfecho", -0.5), ("odio", -0.8),
    ]
    .into_iter()
    .collect();

    static ref INTENSIFIERS: HashMap<&'static str, f64> = [
        ("very", 1.3), ("really", 1.3), ("extremely", 1.5), ("so", 1.2),
        ("totally", 1.3), ("super", 1.3), ("incredibly", 1.4), ("muy", 1.3),
    ]
    .into_iter()
    .collect();

    static ref NEGATORS: Vec<&'static str> = vec![
        "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "wasn't",
        "aren't", "can't", "won't", "nunca", "nada",
    ];
}

/// Word-table polarity: sums the polarity of scored words, clamped to [-1, 1].
/// An intensifier scales the next scored word; a negator halves it.
/// A scored word never pushes the estimate against its own sign.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordPolarity;

impl PolarityEstimator for WordPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut values: Vec<f64> = Vec::new();
        let mut intensity = 1.0;
        let mut negated = false;

        for token in RE_WORD.find_iter(&lowered).map(|m| m.as_str()) {
            if NEGATORS.iter().any(|n| *n == token) {
                negated = true;
                continue;
            }
            if let Some(factor) = INTENSIFIERS.get(token) {
                intensity *= factor;
                continue;
            }
            if let Some(p) = WORD_POLARITY.get(token) {
                let mut value = p * intensity;
                if negated {
                    value *= NEGATION_DAMPING;
                }
                values.push(value.clamp(-1.0, 1.0));
            }
            intensity = 1.0;
            negated = false;
        }

        values.iter().sum::<f64>().clamp(-1.0, 1.0)
    }
}

// =============================================================================
// SCORER
// =============================================================================

/// Lexicon scorer with an injected polarity estimator
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: SentimentLexicon,
    polarity: Arc<dyn PolarityEstimator>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Default lexicon with word-table polarity
    pub fn new() -> Self {
        Self::with_parts(SentimentLexicon::default(), Arc::new(WordPolarity))
    }

    pub fn with_parts(lexicon: SentimentLexicon, polarity: Arc<dyn PolarityEstimator>) -> Self {
        Self { lexicon, polarity }
    }

    pub fn with_lexicon(mut self, lexicon: SentimentLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_polarity(mut self, polarity: Arc<dyn PolarityEstimator>) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn lexicon(&self) -> &SentimentLexicon {
        &self.lexicon
    }

    /// Sentiment 0-100. Empty text is neutral (50).
    pub fn score(&self, text: &str) -> f64 {
        if text.is_empty() {
            return NEUTRAL_SCORE;
        }

        let lowered = text.to_lowercase();
        let (positive, negative) = self.lexicon.count_hits(&lowered);
        let keyword_score =
            NEUTRAL_SCORE + positive as f64 * KEYWORD_STEP - negative as f64 * KEYWORD_STEP;

        let polarity = self.polarity.polarity(text).clamp(-1.0, 1.0);
        let polarity_score = (polarity + 1.0) * 50.0;

        let blended = keyword_score * KEYWORD_BLEND_WEIGHT + polarity_score * POLARITY_BLEND_WEIGHT;
        blended.clamp(0.0, 100.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_only() -> LexiconScorer {
        LexiconScorer::new().with_polarity(Arc::new(NeutralPolarity))
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(LexiconScorer::new().score(""), 50.0);
    }

    #[test]
    fn test_positive_message() {
        let score = LexiconScorer::new().score("I love this, excellent service");
        assert!(score >= 60.0, "Expected >= 60, got {}", score);
    }

    #[test]
    fn test_negative_message() {
        let score = LexiconScorer::new().score("I hate this, terrible and broken");
        assert!(score < 40.0, "Expected < 40, got {}", score);
    }

    #[test]
    fn test_keyword_blend_arithmetic() {
        // two positive hits, neutral polarity: 0.7 * 70 + 0.3 * 50
        let score = keyword_only().score("love and excellent");
        assert!((score - 64.0).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_repeated_term_counts_once() {
        let scorer = keyword_only();
        assert_eq!(scorer.score("great"), scorer.score("great great great"));
    }

    #[test]
    fn test_overlapping_terms_all_count() {
        // "me encanta" also contains "encanta"
        let (pos, neg) = SentimentLexicon::default().count_hits("me encanta");
        assert_eq!(pos, 2);
        assert_eq!(neg, 0);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = keyword_only();
        assert_eq!(scorer.score("TERRIBLE"), scorer.score("terrible"));
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = LexiconScorer::new();
        let very_negative = "hate terrible awful horrible bad poor worst disappointed frustrated angry";
        assert_eq!(scorer.score(very_negative), 0.0);
        let very_positive = "love excellent amazing fantastic wonderful great good perfect best awesome";
        assert_eq!(scorer.score(very_positive), 100.0);
    }

    #[test]
    fn test_substituted_lexicon() {
        let lexicon = SentimentLexicon::new(vec!["Shiny"], vec!["Rusty"]);
        assert_eq!(lexicon.positive, vec!["shiny".to_string()]);
        let scorer = keyword_only().with_lexicon(lexicon);
        assert!(scorer.score("so shiny") > 50.0);
        assert!(scorer.score("so rusty") < 50.0);
        assert_eq!(scorer.score("excellent"), 50.0);
    }

    #[test]
    fn test_word_polarity_direction() {
        let p = WordPolarity;
        assert!(p.polarity("this is great") > 0.0);
        assert!(p.polarity("this is awful") < 0.0);
        assert_eq!(p.polarity("the service exists"), 0.0);
    }

    #[test]
    fn test_word_polarity_negation_and_intensity() {
        let p = WordPolarity;
        assert!(p.polarity("not good") > 0.0);
        assert!(p.polarity("not good") < p.polarity("good"));
        assert!(p.polarity("never awful") < 0.0);
        assert!(p.polarity("never awful") > p.polarity("awful"));
        assert!(p.polarity("very good") > p.polarity("good"));
        assert!(p.polarity("extremely perfect") <= 1.0);
    }

    #[test]
    fn test_determinism() {
        let scorer = LexiconScorer::new();
        let text = "Excelente servicio, pero un poco caro";
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn test_lexicon_config_rejects_blank_list() {
        let err = LexiconConfig::from_json_str(r#"{"sentiment": {"positive": [" "], "negative": ["bad"]}}"#);
        assert!(matches!(err, Err(TrackerError::InvalidLexicon(_))));
    }

    #[test]
    fn test_lexicon_config_partial() {
        let cfg = LexiconConfig::from_json_str(r#"{"sentiment": {"positive": ["yay"], "negative": ["boo"]}}"#).unwrap();
        assert!(cfg.sentiment.is_some());
        assert!(cfg.signals.is_none());
        assert!(cfg.indicators.is_none());
    }
}
