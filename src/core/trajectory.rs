//! Trajectory Analyzer: scores every message and describes how sentiment moved
//!
//! - Trend: mean of second half vs first half (midpoint = n / 2)
//! - Turning point: consecutive delta strictly above 20
//! - Interpretation: trend sentence + critical-shift warning + risk clause

use crate::core::lexicon::LexiconScorer;
use crate::types::{
    Message, ScoredPoint, SentimentState, Severity, Trajectory, Trend, TurningPoint,
};
use crate::{
    INTERPRETATION_CRITICAL_BELOW, INTERPRETATION_HIGH_BELOW, INTERPRETATION_POSITIVE_ABOVE,
    PREVIEW_CHARS, TREND_THRESHOLD, TURNING_POINT_CRITICAL, TURNING_POINT_HIGH,
    TURNING_POINT_THRESHOLD,
};

/// Trajectory analyzer
#[derive(Debug, Clone, Default)]
pub struct TrajectoryAnalyzer {
    scorer: LexiconScorer,
}

impl TrajectoryAnalyzer {
    /// Analyzer with the default lexicon scorer
    pub fn new() -> Self {
        Self::with_scorer(LexiconScorer::new())
    }

    pub fn with_scorer(scorer: LexiconScorer) -> Self {
        Self { scorer }
    }

    /// Analyze a whole conversation. Order is preserved; empty input yields
    /// [`Trajectory::empty`].
    pub fn analyze(&self, messages: &[Message]) -> Trajectory {
        if messages.is_empty() {
            return Trajectory::empty();
        }

        let scores: Vec<f64> = messages.iter().map(|m| self.scorer.score(&m.text)).collect();

        let timeline: Vec<ScoredPoint> = messages
            .iter()
            .zip(&scores)
            .enumerate()
            .map(|(i, (msg, &score))| ScoredPoint {
                timestamp: msg.timestamp.clone(),
                text: preview(&msg.text),
                sentiment_score: round2(score),
                sentiment_state: SentimentState::from_score(score),
                message_index: i + 1,
            })
            .collect();

        let labels: Vec<&str> = messages.iter().map(|m| m.timestamp.as_str()).collect();
        let trend = classify_trend(&scores);
        let turning_points = find_turning_points(&scores, &labels);

        let initial = scores[0];
        let current = scores[scores.len() - 1];
        let interpretation = interpret(initial, current, trend, &turning_points);

        Trajectory {
            current_sentiment: round2(current),
            initial_sentiment: round2(initial),
            overall_change: round2(current - initial),
            timeline,
            trend,
            turning_points,
            interpretation,
            message_count: messages.len(),
        }
    }
}

/// Classify a score sequence. Needs at least two points.
pub fn classify_trend(scores: &[f64]) -> Trend {
    if scores.len() < 2 {
        return Trend::InsufficientData;
    }

    let mid = scores.len() / 2;
    let (first, second) = scores.split_at(mid);
    let diff = mean(second) - mean(first);

    if diff > TREND_THRESHOLD {
        Trend::Improving
    } else if diff < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Every consecutive pair whose delta is strictly above the threshold.
/// `labels[i]` is the timestamp label of message `i`.
pub fn find_turning_points(scores: &[f64], labels: &[&str]) -> Vec<TurningPoint> {
    scores
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let magnitude = (pair[1] - pair[0]).abs();
            if magnitude <= TURNING_POINT_THRESHOLD {
                return None;
            }
            let index = i + 1;
            Some(TurningPoint {
                index,
                timestamp: labels.get(index).map(|l| l.to_string()).unwrap_or_default(),
                from_state: SentimentState::from_score(pair[0]),
                to_state: SentimentState::from_score(pair[1]),
                change_magnitude: round2(magnitude),
                severity: severity_for(magnitude),
            })
        })
        .collect()
}

fn severity_for(magnitude: f64) -> Severity {
    if magnitude > TURNING_POINT_CRITICAL {
        Severity::Critical
    } else if magnitude > TURNING_POINT_HIGH {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn interpret(initial: f64, current: f64, trend: Trend, turning_points: &[TurningPoint]) -> String {
    let mut text = match trend {
        Trend::Declining | Trend::Improving => format!(
            "Sentiment is {} overall (from {:.0} to {:.0})",
            trend, initial, current
        ),
        _ => format!("Sentiment is STABLE (around {:.0})", current),
    };

    let critical = turning_points
        .iter()
        .filter(|p| p.severity == Severity::Critical)
        .count();
    if critical > 0 {
        text.push_str(&format!(
            ". WARNING: {} critical sentiment shift(s) detected.",
            critical
        ));
    }

    if current < INTERPRETATION_CRITICAL_BELOW {
        text.push_str(" RISK LEVEL: CRITICAL - Immediate intervention recommended.");
    } else if current < INTERPRETATION_HIGH_BELOW {
        text.push_str(" RISK LEVEL: HIGH - Attention needed soon.");
    } else if current > INTERPRETATION_POSITIVE_ABOVE {
        text.push_str(" Status: POSITIVE - No immediate action needed.");
    }

    text
}

/// First 100 characters, `...` appended when cut
fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Message {}", i)).collect()
    }

    fn points(scores: &[f64]) -> Vec<TurningPoint> {
        let owned = labels(scores.len());
        let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
        find_turning_points(scores, &refs)
    }

    #[test]
    fn test_empty_input() {
        let t = TrajectoryAnalyzer::new().analyze(&[]);
        assert_eq!(t, Trajectory::empty());
        assert_eq!(t.trend, Trend::Unknown);
        assert_eq!(t.interpretation, "No data provided");
    }

    #[test]
    fn test_single_message_insufficient() {
        let t = TrajectoryAnalyzer::new().analyze(&Message::from_texts(["hello"]));
        assert_eq!(t.trend, Trend::InsufficientData);
        assert_eq!(t.overall_change, 0.0);
        assert_eq!(t.message_count, 1);
        assert_eq!(t.current_sentiment, t.initial_sentiment);
    }

    #[test]
    fn test_declining_halves() {
        // first half (80, 75) = 77.5, second half (70, 65, 60) = 65
        assert_eq!(classify_trend(&[80.0, 75.0, 70.0, 65.0, 60.0]), Trend::Declining);
    }

    #[test]
    fn test_improving_and_stable() {
        assert_eq!(classify_trend(&[20.0, 40.0, 60.0, 80.0]), Trend::Improving);
        assert_eq!(classify_trend(&[50.0, 55.0, 52.0, 58.0]), Trend::Stable);
        // exactly 10 is not enough
        assert_eq!(classify_trend(&[50.0, 60.0]), Trend::Stable);
    }

    #[test]
    fn test_odd_length_first_half_smaller() {
        // halves: [90] vs [50, 100] -> 75 - 90 = -15
        assert_eq!(classify_trend(&[90.0, 50.0, 100.0]), Trend::Declining);
    }

    #[test]
    fn test_turning_point_strict_threshold() {
        assert!(points(&[50.0, 70.0]).is_empty());
        let found = points(&[50.0, 70.01]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 1);
        assert_eq!(found[0].severity, Severity::Medium);
        assert_eq!(found[0].timestamp, "Message 2");
    }

    #[test]
    fn test_turning_point_severity_tiers() {
        let found = points(&[50.0, 81.0, 40.0, 80.0]);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].severity, Severity::High);
        assert_eq!(found[1].severity, Severity::Critical);
        // exactly 40 is HIGH, not CRITICAL
        assert_eq!(found[2].severity, Severity::High);
        assert_eq!(found[1].from_state, SentimentState::ExtremelyPositive);
        assert_eq!(found[1].to_state, SentimentState::Neutral);
    }

    #[test]
    fn test_current_matches_last_point() {
        let msgs = Message::from_texts(["I love it", "it is slow", "terrible, I hate it"]);
        let t = TrajectoryAnalyzer::new().analyze(&msgs);
        assert_eq!(t.current_sentiment, t.timeline.last().unwrap().sentiment_score);
        assert_eq!(t.initial_sentiment, t.timeline[0].sentiment_score);
        let indices: Vec<usize> = t.timeline.iter().map(|p| p.message_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_critical_shift_flag() {
        let t = TrajectoryAnalyzer::new()
            .analyze(&Message::from_texts(["I love it, excellent, perfect", "terrible, awful, I hate it"]));
        assert!(!t.is_empty());
        assert!(t.has_critical_shift());

        let calm = TrajectoryAnalyzer::new().analyze(&Message::from_texts(["hello", "the order arrived"]));
        assert!(!calm.has_critical_shift());
        assert!(TrajectoryAnalyzer::new().analyze(&[]).is_empty());
    }

    #[test]
    fn test_preview_truncation() {
        let long = "a".repeat(150);
        let t = TrajectoryAnalyzer::new().analyze(&Message::from_texts([long]));
        assert_eq!(t.timeline[0].text.chars().count(), 103);
        assert!(t.timeline[0].text.ends_with("..."));

        let exact = "b".repeat(100);
        let t = TrajectoryAnalyzer::new().analyze(&Message::from_texts([exact.clone()]));
        assert_eq!(t.timeline[0].text, exact);
    }

    #[test]
    fn test_interpretation_clauses() {
        let tp = points(&[90.0, 20.0]);
        let text = interpret(90.0, 20.0, Trend::Declining, &tp);
        assert!(text.starts_with("Sentiment is DECLINING overall (from 90 to 20)"));
        assert!(text.contains("WARNING: 1 critical sentiment shift(s) detected."));
        assert!(text.ends_with("RISK LEVEL: CRITICAL - Immediate intervention recommended."));

        let text = interpret(45.0, 45.0, Trend::Stable, &[]);
        assert_eq!(text, "Sentiment is STABLE (around 45) RISK LEVEL: HIGH - Attention needed soon.");

        let text = interpret(60.0, 75.0, Trend::Improving, &[]);
        assert!(text.ends_with("Status: POSITIVE - No immediate action needed."));

        let text = interpret(55.0, 55.0, Trend::InsufficientData, &[]);
        assert_eq!(text, "Sentiment is STABLE (around 55)");
    }

    #[test]
    fn test_timestamps_are_kept() {
        let msgs = vec![
            Message::new("great", "2025-11-27 10:00"),
            Message::new("awful", "2025-11-27 11:00"),
        ];
        let t = TrajectoryAnalyzer::new().analyze(&msgs);
        assert_eq!(t.timeline[0].timestamp, "2025-11-27 10:00");
        assert_eq!(t.timeline[1].timestamp, "2025-11-27 11:00");
    }
}
