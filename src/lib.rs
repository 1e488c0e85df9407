//! Sentiment Tracker: conversation sentiment trajectories, risk signals and
//! next-action prediction.
//!
//! Pipeline: messages → LexiconScorer → TrajectoryAnalyzer → ActionPredictor,
//! with the SignalDetector running independently over the same messages.

use lazy_static::lazy_static;

pub mod core;
pub mod error;
pub mod types;

use crate::core::{ActionPredictor, SignalDetector, TrajectoryAnalyzer};
use crate::types::{ActionPrediction, ContextType, Message, RiskAssessment, Trajectory};

// =============================================================================
// SENTIMENT BANDS
// =============================================================================

pub const STATE_THRESHOLD_EXTREMELY_POSITIVE: f64 = 80.0;
pub const STATE_THRESHOLD_POSITIVE: f64 = 60.0;
pub const STATE_THRESHOLD_NEUTRAL: f64 = 40.0;
pub const STATE_THRESHOLD_NEGATIVE: f64 = 20.0;

// =============================================================================
// LEXICON SCORER
// =============================================================================

/// Score for empty text and the keyword baseline
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Points per distinct lexicon hit
pub const KEYWORD_STEP: f64 = 10.0;

/// Keyword evidence dominates; polarity only fine-tunes
pub const KEYWORD_BLEND_WEIGHT: f64 = 0.7;
pub const POLARITY_BLEND_WEIGHT: f64 = 0.3;

/// Factor applied to a word scored after a negator
pub const NEGATION_DAMPING: f64 = 0.5;

// =============================================================================
// TRAJECTORY ANALYZER
// =============================================================================

/// Half-mean difference needed to call a trend
pub const TREND_THRESHOLD: f64 = 10.0;

/// Consecutive delta must be strictly above this
pub const TURNING_POINT_THRESHOLD: f64 = 20.0;
pub const TURNING_POINT_HIGH: f64 = 30.0;
pub const TURNING_POINT_CRITICAL: f64 = 40.0;

/// Characters kept in a timeline preview
pub const PREVIEW_CHARS: usize = 100;

pub const INTERPRETATION_CRITICAL_BELOW: f64 = 30.0;
pub const INTERPRETATION_HIGH_BELOW: f64 = 50.0;
pub const INTERPRETATION_POSITIVE_ABOVE: f64 = 70.0;

// =============================================================================
// SIGNAL DETECTOR
// =============================================================================

pub const SIGNAL_WEIGHT_COMPARISON: u32 = 25;
pub const SIGNAL_WEIGHT_FRUSTRATION: u32 = 30;
pub const SIGNAL_WEIGHT_DISENGAGEMENT: u32 = 35;
pub const SIGNAL_WEIGHT_PRICE: u32 = 20;

/// Frustration only breaks when the message risk is already above this
pub const FRUSTRATION_BREAKING_BAR: u32 = 30;

pub const RISK_THRESHOLD_CRITICAL: u32 = 70;
pub const RISK_THRESHOLD_HIGH: u32 = 50;
pub const RISK_THRESHOLD_MEDIUM: u32 = 30;

pub const MAX_RISK: u32 = 100;
pub const SIGNAL_CONFIDENCE_STEP: u32 = 15;
pub const MAX_KEY_PHRASES: usize = 5;
pub const MAX_RECOMMENDATIONS: usize = 5;

// =============================================================================
// ACTION PREDICTOR
// =============================================================================

/// Trailing messages inspected for churn/resolution intent
pub const FINAL_MESSAGE_WINDOW: usize = 3;

/// Points per distinct indicator term
pub const INDICATOR_STEP: f64 = 15.0;

pub const CONFIDENCE_BASE: f64 = 50.0;
pub const MAX_TREND_STRENGTH_BONUS: f64 = 20.0;
pub const STRONG_INDICATOR_BONUS: f64 = 15.0;

pub const MAX_INTERVENTIONS: usize = 4;

pub const SUCCESS_BASE: f64 = 60.0;
pub const SUCCESS_MIN: f64 = 20.0;
pub const SUCCESS_MAX: f64 = 95.0;

// =============================================================================
// ANALYSIS STORE
// =============================================================================

/// Confidence (0-1) above which an alert is raised
pub const ALERT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Confidence (0-1) above which the alert is HIGH severity
pub const ALERT_HIGH_SEVERITY_THRESHOLD: f64 = 0.85;

pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.75;
pub const HISTORY_LIMIT: usize = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

lazy_static! {
    static ref DEFAULT_TRAJECTORY: TrajectoryAnalyzer = TrajectoryAnalyzer::new();
    static ref DEFAULT_SIGNALS: SignalDetector = SignalDetector::new();
    static ref DEFAULT_PREDICTOR: ActionPredictor = ActionPredictor::new();
}

/// Score every message and describe how sentiment moved
pub fn analyze_sentiment_evolution(messages: &[Message]) -> Trajectory {
    DEFAULT_TRAJECTORY.analyze(messages)
}

/// Scan messages for competitor, frustration, disengagement and price signals
pub fn detect_risk_signals(messages: &[Message], context: ContextType) -> RiskAssessment {
    DEFAULT_SIGNALS.detect(messages, context)
}

/// Predict what happens next in the conversation
pub fn predict_next_action(messages: &[Message], context: ContextType) -> ActionPrediction {
    DEFAULT_PREDICTOR.predict(messages, context)
}
