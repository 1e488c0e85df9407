//! Signal Detector: scans messages for four categorical risk signals
//!
//! Each message runs four independent first-match keyword scans. Fired
//! signals add their weight to the message risk (capped at 100); overall
//! risk is the maximum over messages, so one severe message dominates.

use serde::{Deserialize, Serialize};

use crate::core::lexicon::{first_present, normalize_terms};
use crate::types::{
    ContextType, Message, MessageSignals, RiskAssessment, RiskLevel, SignalHit, SignalType,
};
use crate::{
    FRUSTRATION_BREAKING_BAR, MAX_KEY_PHRASES, MAX_RECOMMENDATIONS, MAX_RISK,
    SIGNAL_CONFIDENCE_STEP,
};

const COMPARISON_WORDS: &[&str] = &[
    "competitor", "alternative", "better", "cheaper", "faster",
    "other", "someone else", "another", "different", "switch",
    "change", "similar", "compare", "versus", "instead",
];

const FRUSTRATION_WORDS: &[&str] = &[
    "slow", "late", "delayed", "wait", "frustrated", "annoyed",
    "angry", "upset", "disappointed", "problem", "issue", "bug",
    "broken", "not working", "fail", "error", "impossible",
];

const DISENGAGEMENT_WORDS: &[&str] = &[
    "cancel", "stop", "end", "quit", "leave", "exit", "goodbye",
    "farewell", "thanks anyway", "no thanks", "decline", "refuse",
    "not interested", "moving on", "consider", "think about",
    "evaluate", "looking at",
];

const PRICE_WORDS: &[&str] = &[
    "expensive", "cost", "price", "cheap", "fee",
    "charge", "budget", "discount", "negotiate", "lower",
];

/// Ordered keyword lists, one per signal type. List order is the tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalLexicon {
    pub comparison: Vec<String>,
    pub frustration: Vec<String>,
    pub disengagement: Vec<String>,
    pub price: Vec<String>,
}

impl Default for SignalLexicon {
    fn default() -> Self {
        Self {
            comparison: normalize_terms(COMPARISON_WORDS),
            frustration: normalize_terms(FRUSTRATION_WORDS),
            disengagement: normalize_terms(DISENGAGEMENT_WORDS),
            price: normalize_terms(PRICE_WORDS),
        }
    }
}

impl SignalLexicon {
    pub fn terms(&self, signal_type: SignalType) -> &[String] {
        match signal_type {
            SignalType::CompetitorComparison => &self.comparison,
            SignalType::Frustration => &self.frustration,
            SignalType::Disengagement => &self.disengagement,
            SignalType::PriceConcern => &self.price,
        }
    }

    /// Lower-case and dedupe every list
    pub fn normalized(self) -> Self {
        Self {
            comparison: normalize_terms(self.comparison),
            frustration: normalize_terms(self.frustration),
            disengagement: normalize_terms(self.disengagement),
            price: normalize_terms(self.price),
        }
    }
}

/// Risk signal detector
#[derive(Debug, Clone, Default)]
pub struct SignalDetector {
    lexicon: SignalLexicon,
}

impl SignalDetector {
    pub fn new() -> Self {
        Self::with_lexicon(SignalLexicon::default())
    }

    pub fn with_lexicon(lexicon: SignalLexicon) -> Self {
        Self { lexicon: lexicon.normalized() }
    }

    /// First matching keyword per signal type, in scan order
    pub fn scan(&self, text: &str) -> Vec<SignalHit> {
        let lowered = text.to_lowercase();
        SignalType::ALL
            .iter()
            .filter_map(|&t| first_present(self.lexicon.terms(t), &lowered).map(|kw| SignalHit::new(t, kw)))
            .collect()
    }

    /// Assess a conversation. Empty input yields [`RiskAssessment::empty`].
    pub fn detect(&self, messages: &[Message], context: ContextType) -> RiskAssessment {
        if messages.is_empty() {
            return RiskAssessment::empty();
        }

        let mut flagged: Vec<MessageSignals> = Vec::new();
        let mut breaking_point: Option<usize> = None;
        let mut key_phrases: Vec<String> = Vec::new();

        for (i, msg) in messages.iter().enumerate() {
            let hits = self.scan(&msg.text);
            if hits.is_empty() {
                continue;
            }

            let mut risk = 0u32;
            for hit in &hits {
                risk += hit.signal_type.weight();
                let breaks = match hit.signal_type {
                    SignalType::CompetitorComparison | SignalType::Disengagement => true,
                    SignalType::Frustration => risk > FRUSTRATION_BREAKING_BAR,
                    SignalType::PriceConcern => false,
                };
                if breaks && breaking_point.is_none() {
                    breaking_point = Some(i + 1);
                }
                if !key_phrases.contains(&hit.text) {
                    key_phrases.push(hit.text.clone());
                }
            }

            flagged.push(MessageSignals {
                message_index: i + 1,
                timestamp: msg.timestamp.clone(),
                signals: hits,
                risk_score: risk.min(MAX_RISK),
            });
        }

        let total_risk_score = flagged.iter().map(|m| m.risk_score).max().unwrap_or(0);
        let risk_level = RiskLevel::from_score(total_risk_score);
        let confidence = (SIGNAL_CONFIDENCE_STEP * flagged.len() as u32).min(MAX_RISK);
        key_phrases.truncate(MAX_KEY_PHRASES);

        let recommendations = recommend(context, risk_level, &flagged, breaking_point);

        RiskAssessment {
            signals: flagged,
            risk_level,
            confidence,
            breaking_point,
            key_phrases,
            recommendations,
            total_risk_score,
        }
    }
}

/// Urgency clauses, then context clauses, then signal-type clauses; top 5
fn recommend(
    context: ContextType,
    level: RiskLevel,
    flagged: &[MessageSignals],
    breaking_point: Option<usize>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    if level == RiskLevel::Critical {
        out.push("URGENT: Immediate intervention required".to_string());
        if let Some(bp) = breaking_point {
            out.push(format!("Breaking point detected at message {}", bp));
        }
    }

    if level.is_elevated() {
        let clauses: &[&str] = match context {
            ContextType::Customer => &[
                "Contact customer immediately to address concerns",
                "Prepare retention offer (discount/upgrade)",
                "Escalate to account manager",
            ],
            ContextType::Employee => &[
                "Schedule 1-on-1 with HR or manager",
                "Identify root cause of dissatisfaction",
                "Prepare retention plan",
            ],
            ContextType::Investor => &[
                "Prepare detailed response addressing concerns",
                "Schedule follow-up meeting",
            ],
            ContextType::Email | ContextType::General => &[],
        };
        out.extend(clauses.iter().map(|c| c.to_string()));
    }

    if MessageSignals::any_fired(flagged, SignalType::CompetitorComparison) {
        out.push("Counter competitive threats with unique value proposition".to_string());
    }
    if MessageSignals::any_fired(flagged, SignalType::PriceConcern) {
        out.push("Review pricing strategy and alternative plans".to_string());
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

// =============================================================================
// TESTS
// =============================================================================
