//! Core modules for the sentiment tracker

pub mod lexicon;
pub mod trajectory;
pub mod signals;
pub mod predictor;
pub mod store;
pub mod api;

pub use lexicon::{LexiconConfig, LexiconScorer, NeutralPolarity, PolarityEstimator, SentimentLexicon, WordPolarity};
pub use trajectory::{TrajectoryAnalyzer, classify_trend, find_turning_points};
pub use signals::{SignalDetector, SignalLexicon};
pub use predictor::{ActionPredictor, IndicatorLexicon};
pub use store::{AnalysisStore, default_customer_id};
pub use api::{AppState, create_router, run_server};
