//! Core types for the sentiment tracker

mod state;
mod context;
mod message;
mod trajectory;
mod signals;
mod prediction;
mod record;

pub use state::SentimentState;
pub use context::ContextType;
pub use message::{Message, RawMessage};
pub use trajectory::{Trend, Severity, ScoredPoint, TurningPoint, Trajectory};
pub use signals::{SignalType, SignalHit, MessageSignals, RiskLevel, RiskAssessment};
pub use prediction::{PredictedAction, TimelineBucket, TrajectorySummary, ActionPrediction, Urgency};
pub use record::{
    AnalysisRecord, StoredAnalysis, CustomerProfile, AlertSeverity, RiskAlert,
    CustomerHistory, HighRiskCustomer, StoreStatistics,
};
