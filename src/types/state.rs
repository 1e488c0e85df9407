//! Sentiment state bands

use serde::{Deserialize, Serialize};
use crate::{
    STATE_THRESHOLD_EXTREMELY_POSITIVE, STATE_THRESHOLD_POSITIVE,
    STATE_THRESHOLD_NEUTRAL, STATE_THRESHOLD_NEGATIVE,
};

/// The five ordered sentiment bands (lowest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentState {
    /// Score below 20
    ExtremelyNegative,
    /// 20 up to 40
    Negative,
    /// 40 up to 60
    Neutral,
    /// 60 up to 80
    Positive,
    /// 80 and above
    ExtremelyPositive,
}

impl SentimentState {
    /// Band a 0-100 score. Thresholds are applied top-down, first match wins.
    pub fn from_score(score: f64) -> Self {
        if score >= STATE_THRESHOLD_EXTREMELY_POSITIVE {
            SentimentState::ExtremelyPositive
        } else if score >= STATE_THRESHOLD_POSITIVE {
            SentimentState::Positive
        } else if score >= STATE_THRESHOLD_NEUTRAL {
            SentimentState::Neutral
        } else if score >= STATE_THRESHOLD_NEGATIVE {
            SentimentState::Negative
        } else {
            SentimentState::ExtremelyNegative
        }
    }

    /// Terminal color name for this band
    pub fn color(&self) -> colored::Color {
        match self {
            SentimentState::ExtremelyNegative => colored::Color::BrightRed,
            SentimentState::Negative => colored::Color::Red,
            SentimentState::Neutral => colored::Color::BrightBlack,
            SentimentState::Positive => colored::Color::Green,
            SentimentState::ExtremelyPositive => colored::Color::BrightGreen,
        }
    }

    /// Get emoji for state
    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentState::ExtremelyNegative => "🔴",
            SentimentState::Negative => "🟠",
            SentimentState::Neutral => "⚪",
            SentimentState::Positive => "🟢",
            SentimentState::ExtremelyPositive => "💚",
        }
    }
}

impl std::fmt::Display for SentimentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentState::ExtremelyNegative => "EXTREMELY_NEGATIVE",
            SentimentState::Negative => "NEGATIVE",
            SentimentState::Neutral => "NEUTRAL",
            SentimentState::Positive => "POSITIVE",
            SentimentState::ExtremelyPositive => "EXTREMELY_POSITIVE",
        };
        write!(f, "{}", name)
    }
}
