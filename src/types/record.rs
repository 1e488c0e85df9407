//! Store-side records kept by the analysis store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ActionPrediction, ContextType, Message, PredictedAction, RiskAssessment,
    RiskLevel, Trajectory, Trend,
};

/// Flat summary of one analysis result, as the store keeps it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub current_sentiment: f64,
    pub trend: Option<Trend>,
    pub risk_level: RiskLevel,
    pub predicted_action: PredictedAction,
    /// Fraction in 0.0-1.0; sole trigger for risk alerts
    pub confidence: f64,
}

impl From<&Trajectory> for AnalysisRecord {
    fn from(t: &Trajectory) -> Self {
        Self {
            current_sentiment: t.current_sentiment,
            trend: Some(t.trend),
            risk_level: RiskLevel::Unknown,
            predicted_action: PredictedAction::Unknown,
            confidence: 0.0,
        }
    }
}

impl From<&RiskAssessment> for AnalysisRecord {
    fn from(r: &RiskAssessment) -> Self {
        Self {
            current_sentiment: 0.0,
            trend: None,
            risk_level: r.risk_level,
            predicted_action: PredictedAction::Unknown,
            confidence: f64::from(r.confidence) / 100.0,
        }
    }
}

impl From<&ActionPrediction> for AnalysisRecord {
    fn from(p: &ActionPrediction) -> Self {
        let (current, trend) = match &p.sentiment_trajectory {
            Some(s) => (s.current, Some(s.trend)),
            None => (0.0, None),
        };
        Self {
            current_sentiment: current,
            trend,
            risk_level: p.urgency,
            predicted_action: p.action,
            confidence: p.confidence / 100.0,
        }
    }
}

/// One stored analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: u64,
    pub customer_id: String,
    pub context_type: ContextType,
    pub analysis_date: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub record: AnalysisRecord,
}

/// Running per-customer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub context_type: ContextType,
    pub first_contact: DateTime<Utc>,
    pub last_contact: DateTime<Utc>,
    pub total_interactions: u64,
    /// Confidence of the latest analysis (0.0-1.0)
    pub churn_risk: f64,
    /// Count-weighted average of every stored sentiment
    pub lifetime_sentiment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Medium,
    High,
}

/// Raised when an analysis arrives with confidence above the alert bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: u64,
    pub customer_id: String,
    pub alert_type: PredictedAction,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    pub notes: String,
}

/// Profile, recent analyses and open alerts for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerHistory {
    pub profile: Option<CustomerProfile>,
    /// Newest first, at most 10
    pub analyses: Vec<StoredAnalysis>,
    pub active_alerts: Vec<RiskAlert>,
}

/// A profile above the churn-risk threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskCustomer {
    #[serde(flatten)]
    pub profile: CustomerProfile,
    pub active_alerts: usize,
    pub last_analysis: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_customers: usize,
    pub customers_at_risk: usize,
    pub active_alerts: usize,
    pub average_sentiment: f64,
    pub total_analyses: usize,
}
