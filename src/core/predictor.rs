//! Action Predictor: combines the trajectory with intent cues from the last
//! few messages into a predicted next action.
//!
//! Rule tables are evaluated top to bottom; the first matching rule wins.

use serde::{Deserialize, Serialize};

use crate::core::lexicon::{count_present, normalize_terms};
use crate::core::trajectory::TrajectoryAnalyzer;
use crate::types::{
    ActionPrediction, ContextType, Message, PredictedAction, RiskLevel, TimelineBucket,
    TrajectorySummary, Trend, Urgency,
};
use crate::{
    CONFIDENCE_BASE, FINAL_MESSAGE_WINDOW, INDICATOR_STEP, MAX_INTERVENTIONS,
    MAX_TREND_STRENGTH_BONUS, STRONG_INDICATOR_BONUS, SUCCESS_BASE, SUCCESS_MAX, SUCCESS_MIN,
};

const CHURN_WORDS: &[&str] = &[
    "cancel", "leave", "stop", "switch", "competitor", "alternative",
    "expensive", "slow", "disappointed", "problem", "issue",
];

const RESOLUTION_WORDS: &[&str] = &[
    "understand", "sorry", "appreciate", "help", "support", "solution",
    "fix", "improve", "better", "thanks",
];

/// Churn and resolution intent terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorLexicon {
    pub churn: Vec<String>,
    pub resolution: Vec<String>,
}

impl Default for IndicatorLexicon {
    fn default() -> Self {
        Self {
            churn: normalize_terms(CHURN_WORDS),
            resolution: normalize_terms(RESOLUTION_WORDS),
        }
    }
}

impl IndicatorLexicon {
    pub fn normalized(self) -> Self {
        Self {
            churn: normalize_terms(self.churn),
            resolution: normalize_terms(self.resolution),
        }
    }
}

/// 15 points per distinct term present, capped at 100
fn indicator_score(terms: &[String], lowered: &str) -> f64 {
    (count_present(terms, lowered) as f64 * INDICATOR_STEP).min(100.0)
}

/// Next-action predictor
#[derive(Debug, Clone, Default)]
pub struct ActionPredictor {
    analyzer: TrajectoryAnalyzer,
    indicators: IndicatorLexicon,
}

impl ActionPredictor {
    pub fn new() -> Self {
        Self::with_parts(TrajectoryAnalyzer::new(), IndicatorLexicon::default())
    }

    pub fn with_parts(analyzer: TrajectoryAnalyzer, indicators: IndicatorLexicon) -> Self {
        Self {
            analyzer,
            indicators: indicators.normalized(),
        }
    }

    /// Predict the next action. Empty input yields [`ActionPrediction::empty`].
    pub fn predict(&self, messages: &[Message], context: ContextType) -> ActionPrediction {
        if messages.is_empty() {
            return ActionPrediction::empty();
        }

        let trajectory = self.analyzer.analyze(messages);
        let sentiment = trajectory.current_sentiment;
        let trend = trajectory.trend;

        let window = messages.len().saturating_sub(FINAL_MESSAGE_WINDOW);
        let final_text = messages[window..]
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let churn = indicator_score(&self.indicators.churn, &final_text);
        let resolution = indicator_score(&self.indicators.resolution, &final_text);

        let action = choose_action(sentiment, trend, churn, resolution);
        let confidence = confidence(&trajectory.scores(), churn, resolution);
        let timeline = choose_timeline(sentiment, trend, churn);
        let urgency = assess_urgency(sentiment, churn, action);

        tracing::debug!(
            "Prediction: {} (sentiment {:.1}, churn {:.0}, resolution {:.0})",
            action,
            sentiment,
            churn,
            resolution
        );

        ActionPrediction {
            action,
            confidence: (confidence * 10.0).round() / 10.0,
            timeline,
            urgency,
            interventions: interventions(action, context, urgency),
            success_rate: success_rate(context, urgency, action),
            explanation: explain(action, sentiment, trend, churn),
            sentiment_trajectory: Some(TrajectorySummary {
                initial: trajectory.initial_sentiment,
                current: trajectory.current_sentiment,
                trend,
                overall_change: trajectory.overall_change,
            }),
        }
    }
}

// =============================================================================
// RULE TABLES
// =============================================================================

fn choose_action(sentiment: f64, trend: Trend, churn: f64, resolution: f64) -> PredictedAction {
    if churn > 50.0 && sentiment < 40.0 {
        PredictedAction::LikelyChurn
    } else if resolution > 50.0 && trend == Trend::Improving {
        PredictedAction::LikelyResolution
    } else if sentiment > 50.0 && trend != Trend::Declining {
        PredictedAction::LikelyStay
    } else if sentiment < 30.0 && trend == Trend::Declining {
        PredictedAction::EscalationNeeded
    } else {
        PredictedAction::MonitorClosely
    }
}

/// More messages, a clear swing between the ends, and strong intent cues
/// all raise confidence. Unrounded.
fn confidence(scores: &[f64], churn: f64, resolution: f64) -> f64 {
    let n = scores.len();
    let mut value = CONFIDENCE_BASE;

    if n >= 5 {
        value += 20.0;
    } else if n >= 3 {
        value += 10.0;
    }

    if n >= 3 {
        let head: f64 = scores[..2].iter().sum();
        let tail: f64 = scores[n - 2..].iter().sum();
        let strength = (tail - head).abs() / n as f64;
        value += strength.min(MAX_TREND_STRENGTH_BONUS);
    }

    if churn.max(resolution) > 60.0 {
        value += STRONG_INDICATOR_BONUS;
    }

    value.min(100.0)
}

fn choose_timeline(sentiment: f64, trend: Trend, churn: f64) -> TimelineBucket {
    if sentiment < 20.0 && churn > 80.0 {
        TimelineBucket::Immediate
    } else if trend == Trend::Declining && churn > 60.0 {
        TimelineBucket::VerySoon
    } else if churn > 50.0 || sentiment < 40.0 {
        TimelineBucket::Soon
    } else if sentiment < 50.0 {
        TimelineBucket::MediumTerm
    } else {
        TimelineBucket::Extended
    }
}

fn assess_urgency(sentiment: f64, churn: f64, action: PredictedAction) -> Urgency {
    if sentiment < 20.0 || churn > 80.0 || action == PredictedAction::LikelyChurn {
        RiskLevel::Critical
    } else if sentiment < 40.0 || churn > 60.0 || action == PredictedAction::EscalationNeeded {
        RiskLevel::High
    } else if sentiment < 50.0 || churn > 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn interventions(action: PredictedAction, context: ContextType, urgency: Urgency) -> Vec<String> {
    let mut out: Vec<&str> = match action {
        PredictedAction::LikelyChurn => vec![
            "Immediate outreach required",
            "Prepare retention offer",
            "Escalate to senior management",
        ],
        PredictedAction::EscalationNeeded => vec![
            "Schedule urgent meeting",
            "Identify root cause",
            "Prepare solution options",
        ],
        PredictedAction::LikelyResolution => {
            vec!["Prepare resolution proposal", "Schedule follow-up"]
        }
        _ => Vec::new(),
    };

    if matches!(urgency, RiskLevel::Critical | RiskLevel::High) {
        match context {
            ContextType::Customer => {
                out.extend(["Offer priority support/upgrade", "Consider special pricing"])
            }
            ContextType::Employee => {
                out.extend(["Schedule HR meeting", "Assess job satisfaction"])
            }
            _ => {}
        }
    }

    out.into_iter().take(MAX_INTERVENTIONS).map(String::from).collect()
}

fn success_rate(context: ContextType, urgency: Urgency, action: PredictedAction) -> f64 {
    let urgency_adjust = match urgency {
        RiskLevel::Critical => -20.0,
        RiskLevel::High => -10.0,
        RiskLevel::Low => 10.0,
        RiskLevel::Medium | RiskLevel::Unknown => 0.0,
    };
    let action_adjust = match action {
        PredictedAction::LikelyResolution => 20.0,
        PredictedAction::LikelyStay => 15.0,
        PredictedAction::MonitorClosely => 5.0,
        PredictedAction::EscalationNeeded => -5.0,
        PredictedAction::LikelyChurn => -15.0,
        PredictedAction::Unknown => 0.0,
    };
    let context_adjust = if context.is_retention() { 10.0 } else { 0.0 };

    (SUCCESS_BASE + urgency_adjust + action_adjust + context_adjust).clamp(SUCCESS_MIN, SUCCESS_MAX)
}

fn explain(action: PredictedAction, sentiment: f64, trend: Trend, churn: f64) -> String {
    let lead = format!(
        "Based on current sentiment ({:.0}/100) and {} trend, ",
        sentiment,
        trend.as_str().to_lowercase()
    );
    let tail = match action {
        PredictedAction::LikelyChurn => format!(
            "the subject shows strong churn indicators ({:.0}/100). \
             Immediate action strongly recommended to prevent departure.",
            churn
        ),
        PredictedAction::LikelyResolution => "the situation appears to be resolving. \
             Continue supportive approach and follow up soon."
            .to_string(),
        PredictedAction::LikelyStay => "the relationship appears stable. \
             Maintain current level of service and monitor for changes."
            .to_string(),
        PredictedAction::EscalationNeeded => "the situation has deteriorated significantly. \
             Escalation and intervention are necessary."
            .to_string(),
        _ => "signals are mixed. Continue monitoring closely.".to_string(),
    };
    lead + &tail
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::{LexiconScorer, NeutralPolarity};
    use std::sync::Arc;

    /// Keyword-only scoring: score = 50 + 7 * (positive - negative)
    fn predictor() -> ActionPredictor {
        let scorer = LexiconScorer::new().with_polarity(Arc::new(NeutralPolarity));
        ActionPredictor::with_parts(TrajectoryAnalyzer::with_scorer(scorer), IndicatorLexicon::default())
    }

    fn predict(texts: &[&str], context: ContextType) -> ActionPrediction {
        predictor().predict(&Message::from_texts(texts.iter().copied()), context)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(predictor().predict(&[], ContextType::Customer), ActionPrediction::empty());
    }

    #[test]
    fn test_churn_scenario() {
        // scores 57, 43, 29 -> DECLINING; churn = 5 terms = 75
        let p = predict(
            &[
                "great service",
                "the app is slow",
                "I will cancel and switch to a competitor, too expensive",
            ],
            ContextType::Customer,
        );
        assert_eq!(p.action, PredictedAction::LikelyChurn);
        assert_eq!(p.timeline, TimelineBucket::VerySoon);
        assert_eq!(p.urgency, RiskLevel::Critical);
        assert_eq!(p.success_rate, 35.0);
        // 50 + 10 + |72 - 100| / 3 + 15
        assert_eq!(p.confidence, 84.3);
        assert_eq!(
            p.interventions,
            vec![
                "Immediate outreach required",
                "Prepare retention offer",
                "Escalate to senior management",
                "Offer priority support/upgrade",
            ]
        );
        assert_eq!(
            p.explanation,
            "Based on current sentiment (29/100) and declining trend, the subject shows strong \
             churn indicators (75/100). Immediate action strongly recommended to prevent departure."
        );
        let summary = p.sentiment_trajectory.unwrap();
        assert_eq!(summary.initial, 57.0);
        assert_eq!(summary.current, 29.0);
        assert_eq!(summary.trend, Trend::Declining);
    }

    #[test]
    fn test_resolution_scenario() {
        let p = predict(
            &["this is bad", "thanks, I appreciate the help and support, great solution"],
            ContextType::Customer,
        );
        assert_eq!(p.action, PredictedAction::LikelyResolution);
        assert_eq!(p.urgency, RiskLevel::Low);
        assert_eq!(p.timeline, TimelineBucket::Extended);
        // 60 + 10 + 20 + 10 clamps to 95
        assert_eq!(p.success_rate, 95.0);
        assert_eq!(p.confidence, 65.0);
        assert_eq!(p.interventions, vec!["Prepare resolution proposal", "Schedule follow-up"]);
    }

    #[test]
    fn test_stay_scenario() {
        let p = predict(&["great", "excellent and happy"], ContextType::General);
        assert_eq!(p.action, PredictedAction::LikelyStay);
        assert_eq!(p.urgency, RiskLevel::Low);
        assert_eq!(p.success_rate, 85.0);
        assert!(p.interventions.is_empty());
    }

    #[test]
    fn test_escalation_for_employee() {
        let p = predict(&["good", "terrible awful horrible"], ContextType::Employee);
        assert_eq!(p.action, PredictedAction::EscalationNeeded);
        assert_eq!(p.urgency, RiskLevel::High);
        assert_eq!(p.timeline, TimelineBucket::Soon);
        assert_eq!(p.success_rate, 55.0);
        assert_eq!(p.interventions.len(), MAX_INTERVENTIONS);
        assert_eq!(p.interventions[3], "Schedule HR meeting");
    }

    #[test]
    fn test_monitor_fallback() {
        let p = predict(&["hello", "ok"], ContextType::General);
        assert_eq!(p.action, PredictedAction::MonitorClosely);
        assert_eq!(p.urgency, RiskLevel::Low);
        assert_eq!(p.timeline, TimelineBucket::Extended);
        assert_eq!(p.success_rate, 75.0);
        assert!(p.explanation.ends_with("signals are mixed. Continue monitoring closely."));
        assert!(p.explanation.contains("stable trend"));
    }

    #[test]
    fn test_only_last_three_messages_carry_intent() {
        let p = predict(&["cancel", "hello", "hello", "hello"], ContextType::General);
        assert_eq!(p.action, PredictedAction::MonitorClosely);
    }

    #[test]
    fn test_action_rule_order() {
        // churn wins over resolution
        assert_eq!(
            choose_action(30.0, Trend::Improving, 60.0, 90.0),
            PredictedAction::LikelyChurn
        );
        assert_eq!(
            choose_action(45.0, Trend::Improving, 60.0, 90.0),
            PredictedAction::LikelyResolution
        );
        assert_eq!(
            choose_action(60.0, Trend::InsufficientData, 0.0, 0.0),
            PredictedAction::LikelyStay
        );
        assert_eq!(
            choose_action(60.0, Trend::Declining, 0.0, 0.0),
            PredictedAction::MonitorClosely
        );
    }

    #[test]
    fn test_timeline_rules() {
        assert_eq!(choose_timeline(10.0, Trend::Declining, 90.0), TimelineBucket::Immediate);
        assert_eq!(choose_timeline(30.0, Trend::Declining, 65.0), TimelineBucket::VerySoon);
        assert_eq!(choose_timeline(60.0, Trend::Stable, 55.0), TimelineBucket::Soon);
        assert_eq!(choose_timeline(45.0, Trend::Stable, 0.0), TimelineBucket::MediumTerm);
        assert_eq!(choose_timeline(50.0, Trend::Stable, 0.0), TimelineBucket::Extended);
    }

    #[test]
    fn test_urgency_rules() {
        assert_eq!(assess_urgency(60.0, 85.0, PredictedAction::MonitorClosely), RiskLevel::Critical);
        assert_eq!(assess_urgency(60.0, 0.0, PredictedAction::LikelyChurn), RiskLevel::Critical);
        assert_eq!(assess_urgency(60.0, 65.0, PredictedAction::MonitorClosely), RiskLevel::High);
        assert_eq!(assess_urgency(45.0, 0.0, PredictedAction::MonitorClosely), RiskLevel::Medium);
        assert_eq!(assess_urgency(60.0, 45.0, PredictedAction::LikelyStay), RiskLevel::Medium);
        assert_eq!(assess_urgency(50.0, 40.0, PredictedAction::LikelyStay), RiskLevel::Low);
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence(&[50.0], 0.0, 0.0), 50.0);
        assert_eq!(confidence(&[50.0, 50.0, 50.0, 50.0, 50.0], 0.0, 0.0), 70.0);
        // trend strength is capped at 20
        assert_eq!(confidence(&[100.0, 100.0, 0.0], 0.0, 0.0), 80.0);
        assert_eq!(confidence(&[100.0, 100.0, 0.0, 0.0, 0.0], 90.0, 0.0), 100.0);
    }

    #[test]
    fn test_success_rate_clamped() {
        let low = success_rate(ContextType::General, RiskLevel::Critical, PredictedAction::LikelyChurn);
        assert_eq!(low, 25.0);
        let high = success_rate(ContextType::Employee, RiskLevel::Low, PredictedAction::LikelyResolution);
        assert_eq!(high, SUCCESS_MAX);
    }

    #[test]
    fn test_indicator_terms_count_once() {
        let terms = IndicatorLexicon::default().churn;
        assert_eq!(indicator_score(&terms, "cancel cancel cancel"), 15.0);
        assert_eq!(indicator_score(&terms, "nothing here"), 0.0);
        let all = CHURN_WORDS.join(" ");
        assert_eq!(indicator_score(&terms, &all), 100.0);
    }
}
