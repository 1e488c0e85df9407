//! Next-action prediction structures

use serde::{Deserialize, Serialize};
use crate::types::{RiskLevel, Trend};

/// Urgency shares the four risk tiers
pub type Urgency = RiskLevel;

/// Predicted next action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictedAction {
    LikelyChurn,
    LikelyResolution,
    LikelyStay,
    EscalationNeeded,
    MonitorClosely,
    Unknown,
}

impl PredictedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictedAction::LikelyChurn => "LIKELY_CHURN",
            PredictedAction::LikelyResolution => "LIKELY_RESOLUTION",
            PredictedAction::LikelyStay => "LIKELY_STAY",
            PredictedAction::EscalationNeeded => "ESCALATION_NEEDED",
            PredictedAction::MonitorClosely => "MONITOR_CLOSELY",
            PredictedAction::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for PredictedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When the predicted action is expected, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimelineBucket {
    #[serde(rename = "IMMEDIATE (0-24 hours)")]
    Immediate,
    #[serde(rename = "VERY_SOON (1-3 days)")]
    VerySoon,
    #[serde(rename = "SOON (3-7 days)")]
    Soon,
    #[serde(rename = "MEDIUM_TERM (1-4 weeks)")]
    MediumTerm,
    #[serde(rename = "EXTENDED (1-3 months)")]
    Extended,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl TimelineBucket {
    pub fn label(&self) -> &'static str {
        match self {
            TimelineBucket::Immediate => "IMMEDIATE (0-24 hours)",
            TimelineBucket::VerySoon => "VERY_SOON (1-3 days)",
            TimelineBucket::Soon => "SOON (3-7 days)",
            TimelineBucket::MediumTerm => "MEDIUM_TERM (1-4 weeks)",
            TimelineBucket::Extended => "EXTENDED (1-3 months)",
            TimelineBucket::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TimelineBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compact view of the trajectory a prediction was based on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub initial: f64,
    pub current: f64,
    pub trend: Trend,
    pub overall_change: f64,
}

/// Predicted next action with confidence and urgency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPrediction {
    pub action: PredictedAction,
    /// 0-100
    pub confidence: f64,
    pub timeline: TimelineBucket,
    pub urgency: Urgency,
    /// At most 4, most important first
    pub interventions: Vec<String>,
    /// 20-95 (0 only on the empty prediction)
    pub success_rate: f64,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_trajectory: Option<TrajectorySummary>,
}

impl ActionPrediction {
    /// Canonical result for an empty conversation
    pub fn empty() -> Self {
        Self {
            action: PredictedAction::Unknown,
            confidence: 0.0,
            timeline: TimelineBucket::Unknown,
            urgency: RiskLevel::Unknown,
            interventions: Vec::new(),
            success_rate: 0.0,
            explanation: "No data provided".to_string(),
            sentiment_trajectory: None,
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "action={} | confidence={:.1} | timeline={} | urgency={} | success={:.1}",
            self.action, self.confidence, self.timeline, self.urgency, self.success_rate
        )
    }
}
