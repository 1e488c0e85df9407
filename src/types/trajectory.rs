//! Trajectory structures produced by the trajectory analyzer

use serde::{Deserialize, Serialize};
use crate::types::SentimentState;

/// Overall direction of a conversation's sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "IMPROVING", alias = "RISING")]
    Improving,
    #[serde(rename = "DECLINING")]
    Declining,
    #[serde(rename = "STABLE")]
    Stable,
    /// Fewer than two scored messages
    #[serde(rename = "insufficient_data")]
    InsufficientData,
    /// No messages at all
    #[serde(rename = "unknown")]
    Unknown,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "IMPROVING",
            Trend::Declining => "DECLINING",
            Trend::Stable => "STABLE",
            Trend::InsufficientData => "insufficient_data",
            Trend::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity tier of a turning point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

/// One scored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub timestamp: String,
    /// First 100 characters, `...` appended when truncated
    pub text: String,
    pub sentiment_score: f64,
    pub sentiment_state: SentimentState,
    /// 1-based
    pub message_index: usize,
}

/// A large swing between two consecutive messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Position of the later message in the timeline
    pub index: usize,
    pub timestamp: String,
    pub from_state: SentimentState,
    pub to_state: SentimentState,
    pub change_magnitude: f64,
    pub severity: Severity,
}

/// Scored, ordered history of a conversation's sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub timeline: Vec<ScoredPoint>,
    pub current_sentiment: f64,
    pub initial_sentiment: f64,
    pub trend: Trend,
    pub turning_points: Vec<TurningPoint>,
    pub overall_change: f64,
    pub interpretation: String,
    pub message_count: usize,
}

impl Trajectory {
    /// Canonical result for an empty conversation
    pub fn empty() -> Self {
        Self {
            timeline: Vec::new(),
            current_sentiment: 0.0,
            initial_sentiment: 0.0,
            trend: Trend::Unknown,
            turning_points: Vec::new(),
            overall_change: 0.0,
            interpretation: "No data provided".to_string(),
            message_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Scores in timeline order
    pub fn scores(&self) -> Vec<f64> {
        self.timeline.iter().map(|p| p.sentiment_score).collect()
    }

    pub fn has_critical_shift(&self) -> bool {
        self.turning_points.iter().any(|p| p.severity == Severity::Critical)
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "sentiment={:.2} | initial={:.2} | trend={} | change={:+.2} | turning_points={} | messages={}",
            self.current_sentiment,
            self.initial_sentiment,
            self.trend,
            self.overall_change,
            self.turning_points.len(),
            self.message_count
        )
    }
}
