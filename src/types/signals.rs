//! Risk signal structures

use serde::{Deserialize, Serialize};
use crate::{
    SIGNAL_WEIGHT_COMPARISON, SIGNAL_WEIGHT_FRUSTRATION,
    SIGNAL_WEIGHT_DISENGAGEMENT, SIGNAL_WEIGHT_PRICE,
    RISK_THRESHOLD_CRITICAL, RISK_THRESHOLD_HIGH, RISK_THRESHOLD_MEDIUM,
};

/// The four categorical risk signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    /// Mentions of competitors or alternatives (weight: 25)
    CompetitorComparison,
    /// Dissatisfaction or frustration (weight: 30)
    Frustration,
    /// Intent to leave or end the relationship (weight: 35)
    Disengagement,
    /// Cost or pricing concerns (weight: 20)
    PriceConcern,
}

impl SignalType {
    /// Scan order used by the detector
    pub const ALL: [SignalType; 4] = [
        SignalType::CompetitorComparison,
        SignalType::Frustration,
        SignalType::Disengagement,
        SignalType::PriceConcern,
    ];

    /// Risk contribution when this signal fires in a message
    pub fn weight(&self) -> u32 {
        match self {
            SignalType::CompetitorComparison => SIGNAL_WEIGHT_COMPARISON,
            SignalType::Frustration => SIGNAL_WEIGHT_FRUSTRATION,
            SignalType::Disengagement => SIGNAL_WEIGHT_DISENGAGEMENT,
            SignalType::PriceConcern => SIGNAL_WEIGHT_PRICE,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SignalType::CompetitorComparison => "Comparing with alternatives or competitors",
            SignalType::Frustration => "Expressing dissatisfaction or frustration",
            SignalType::Disengagement => "Showing intent to leave or end relationship",
            SignalType::PriceConcern => "Mentioning cost or pricing concerns",
        }
    }
}

/// A single matched signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalHit {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    /// The keyword that matched
    pub text: String,
    pub description: String,
}

impl SignalHit {
    pub fn new(signal_type: SignalType, keyword: &str) -> Self {
        Self {
            signal_type,
            text: keyword.to_string(),
            description: signal_type.description().to_string(),
        }
    }
}

/// All signals found in one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSignals {
    /// 1-based
    pub message_index: usize,
    pub timestamp: String,
    pub signals: Vec<SignalHit>,
    /// Sum of fired weights, capped at 100
    pub risk_score: u32,
}

impl MessageSignals {
    pub fn has(&self, signal_type: SignalType) -> bool {
        self.signals.iter().any(|s| s.signal_type == signal_type)
    }

    /// Did any of these messages fire this signal type?
    pub fn any_fired(messages: &[MessageSignals], signal_type: SignalType) -> bool {
        messages.iter().any(|m| m.has(signal_type))
    }
}

/// Four-tier risk level, plus UNKNOWN for empty input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl RiskLevel {
    /// Band an overall 0-100 risk score
    pub fn from_score(score: u32) -> Self {
        if score >= RISK_THRESHOLD_CRITICAL {
            RiskLevel::Critical
        } else if score >= RISK_THRESHOLD_HIGH {
            RiskLevel::High
        } else if score >= RISK_THRESHOLD_MEDIUM {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// HIGH or CRITICAL
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }

    pub fn color(&self) -> colored::Color {
        match self {
            RiskLevel::Low => colored::Color::Green,
            RiskLevel::Medium => colored::Color::Yellow,
            RiskLevel::High => colored::Color::Red,
            RiskLevel::Critical => colored::Color::BrightRed,
            RiskLevel::Unknown => colored::Color::BrightBlack,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk assessment for a whole conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Only messages with at least one signal appear here
    pub signals: Vec<MessageSignals>,
    pub risk_level: RiskLevel,
    /// 0-100
    pub confidence: u32,
    /// 1-based index of the first breaking message
    pub breaking_point: Option<usize>,
    /// Up to 5 unique matched keywords, first-seen order
    pub key_phrases: Vec<String>,
    pub recommendations: Vec<String>,
    /// Maximum per-message risk, 0-100
    pub total_risk_score: u32,
}

impl RiskAssessment {
    /// Canonical result for an empty conversation
    pub fn empty() -> Self {
        Self {
            signals: Vec::new(),
            risk_level: RiskLevel::Unknown,
            confidence: 0,
            breaking_point: None,
            key_phrases: Vec::new(),
            recommendations: Vec::new(),
            total_risk_score: 0,
        }
    }

    /// Did any message fire this signal type?
    pub fn fired(&self, signal_type: SignalType) -> bool {
        MessageSignals::any_fired(&self.signals, signal_type)
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let breaking = self
            .breaking_point
            .map(|b| b.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "risk={} | score={} | confidence={} | breaking_point={} | flagged_messages={}",
            self.risk_level,
            self.total_risk_score,
            self.confidence,
            breaking,
            self.signals.len()
        )
    }
}
