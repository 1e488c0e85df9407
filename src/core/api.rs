//! HTTP API for the sentiment tracker
//!
//! Endpoints:
//! - GET  /health                    - Health check
//! - POST /analyze/sentiment         - Sentiment trajectory
//! - POST /detect/signals            - Risk signals
//! - POST /predict/action            - Next-action prediction
//! - POST /analysis/save             - Store an analysis explicitly
//! - GET  /customers/:id/history     - Customer profile and history
//! - GET  /customers/high-risk       - Profiles above a churn-risk threshold
//! - GET  /statistics                - Store statistics
//! - POST /alerts/:id/resolve        - Resolve a risk alert

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::store::default_customer_id;
use crate::core::{ActionPredictor, AnalysisStore, SignalDetector, TrajectoryAnalyzer};
use crate::error::TrackerError;
use crate::types::{
    ActionPrediction, AnalysisRecord, ContextType, CustomerHistory, HighRiskCustomer, Message,
    PredictedAction, RawMessage, RiskAssessment, RiskLevel, StoreStatistics, Trajectory, Trend,
};
use crate::DEFAULT_HIGH_RISK_THRESHOLD;

/// App state
pub struct AppState {
    pub trajectory: TrajectoryAnalyzer,
    pub signals: SignalDetector,
    pub predictor: ActionPredictor,
    pub store: RwLock<AnalysisStore>,
    pub store_path: Option<PathBuf>,
}

impl AppState {
    /// Default analyzers around an existing store
    pub fn new(store: AnalysisStore, store_path: Option<PathBuf>) -> Self {
        Self {
            trajectory: TrajectoryAnalyzer::new(),
            signals: SignalDetector::new(),
            predictor: ActionPredictor::new(),
            store: RwLock::new(store),
            store_path,
        }
    }

    pub fn with_analyzers(
        mut self,
        trajectory: TrajectoryAnalyzer,
        signals: SignalDetector,
        predictor: ActionPredictor,
    ) -> Self {
        self.trajectory = trajectory;
        self.signals = signals;
        self.predictor = predictor;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalysisStore::new(), None)
    }
}

/// Analysis request shared by the three analysis endpoints
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub context_type: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Explicit save request
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub trend: Option<Trend>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub predicted_action: Option<PredictedAction>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub context_type: Option<String>,
}

/// Explicit save response
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub analysis_id: u64,
    pub customer_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HighRiskQuery {
    pub threshold: Option<f64>,
}

/// High-risk listing response
#[derive(Debug, Serialize)]
pub struct HighRiskResponse {
    pub high_risk_customers: Vec<HighRiskCustomer>,
    pub count: usize,
    pub threshold: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub alert_id: u64,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analyses_stored: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = match &self {
            TrackerError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::MissingField(_) | TrackerError::InvalidLexicon(_) => StatusCode::BAD_REQUEST,
            TrackerError::Io(_) | TrackerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health))
        .route("/analyze/sentiment", post(analyze_sentiment))
        .route("/detect/signals", post(detect_signals))
        .route("/predict/action", post(predict_action))
        .route("/analysis/save", post(save_analysis))
        .route("/customers/high-risk", get(high_risk_customers))
        .route("/customers/:id/history", get(customer_history))
        .route("/statistics", get(statistics))
        .route("/alerts/:id/resolve", post(resolve_alert))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.store.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        analyses_stored: store.len(),
    })
}

/// Sentiment trajectory; stored under the given or derived customer id
async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<Trajectory> {
    let messages = Message::resolve_all(req.messages);
    let context = request_context(req.context_type.as_deref());
    tracing::info!("Analyzing sentiment for {} messages", messages.len());

    let trajectory = state.trajectory.analyze(&messages);
    if !messages.is_empty() {
        record(&state, req.customer_id, context, &messages, AnalysisRecord::from(&trajectory)).await;
    }
    Json(trajectory)
}

async fn detect_signals(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<RiskAssessment> {
    let messages = Message::resolve_all(req.messages);
    let context = request_context(req.context_type.as_deref());
    tracing::info!("Detecting risk signals for {} messages (context: {})", messages.len(), context);

    let assessment = state.signals.detect(&messages, context);
    if !messages.is_empty() {
        record(&state, req.customer_id, context, &messages, AnalysisRecord::from(&assessment)).await;
    }
    Json(assessment)
}

async fn predict_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<ActionPrediction> {
    let messages = Message::resolve_all(req.messages);
    let context = request_context(req.context_type.as_deref());
    tracing::info!("Predicting next action for {} messages (context: {})", messages.len(), context);

    let prediction = state.predictor.predict(&messages, context);
    if !messages.is_empty() {
        record(&state, req.customer_id, context, &messages, AnalysisRecord::from(&prediction)).await;
    }
    Json(prediction)
}

/// Store an analysis assembled by the caller
async fn save_analysis(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, TrackerError> {
    let customer_id = req
        .customer_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(TrackerError::MissingField("customer_id"))?;
    if req.messages.is_empty() {
        return Err(TrackerError::MissingField("messages"));
    }

    let messages = Message::resolve_all(req.messages);
    let context = request_context(req.context_type.as_deref());
    let analysis = AnalysisRecord {
        current_sentiment: req.sentiment_score.unwrap_or(50.0),
        trend: Some(req.trend.unwrap_or(Trend::Stable)),
        risk_level: req.risk_level.unwrap_or(RiskLevel::Medium),
        predicted_action: req.predicted_action.unwrap_or(PredictedAction::Unknown),
        confidence: req.confidence.unwrap_or(0.5),
    };

    let mut store = state.store.write().await;
    let analysis_id = store.save_analysis(&customer_id, context, &messages, &analysis);
    if let Some(name) = req.customer_name.as_deref() {
        store.set_customer_name(&customer_id, name);
    }
    persist(&state, &store)?;

    tracing::info!("Analysis {} saved for {}", analysis_id, customer_id);
    Ok(Json(SaveResponse {
        success: true,
        analysis_id,
        message: format!("Analysis saved for {} with {} messages", customer_id, messages.len()),
        customer_id,
    }))
}

async fn customer_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<CustomerHistory> {
    let store = state.store.read().await;
    let history = store.customer_history(&id);
    tracing::info!("History for {}: {} analyses", id, history.analyses.len());
    Json(history)
}

async fn high_risk_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HighRiskQuery>,
) -> Json<HighRiskResponse> {
    let threshold = query.threshold.unwrap_or(DEFAULT_HIGH_RISK_THRESHOLD);
    let store = state.store.read().await;
    let customers = store.high_risk_customers(threshold);
    Json(HighRiskResponse {
        count: customers.len(),
        high_risk_customers: customers,
        threshold,
    })
}

async fn statistics(State(state): State<Arc<AppState>>) -> Json<StoreStatistics> {
    let store = state.store.read().await;
    Json(store.statistics())
}

async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: Option<Json<ResolveRequest>>,
) -> Result<Json<ResolveResponse>, TrackerError> {
    let notes = body.map(|Json(b)| b.notes).unwrap_or_default();
    let mut store = state.store.write().await;
    store.resolve_alert(id, &notes)?;
    persist(&state, &store)?;
    Ok(Json(ResolveResponse { success: true, alert_id: id }))
}

// =============================================================================
// HELPERS
// =============================================================================

/// Unknown or missing context tags fall back to `customer` at this boundary
fn request_context(tag: Option<&str>) -> ContextType {
    match tag {
        Some(tag) => ContextType::parse_or(tag, ContextType::Customer),
        None => ContextType::Customer,
    }
}

/// Store an analysis result. Persistence failures are logged, never surfaced
/// to the analysis response.
async fn record(
    state: &AppState,
    customer_id: Option<String>,
    context: ContextType,
    messages: &[Message],
    analysis: AnalysisRecord,
) {
    let customer_id = customer_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| default_customer_id(messages));
    let mut store = state.store.write().await;
    store.save_analysis(&customer_id, context, messages, &analysis);
    if let Err(e) = persist(state, &store) {
        tracing::error!("Failed to persist store: {}", e);
    }
}

fn persist(state: &AppState, store: &AnalysisStore) -> Result<(), TrackerError> {
    match &state.store_path {
        Some(path) => store.save_to_file(path),
        None => Ok(()),
    }
}

/// Run the API server
pub async fn run_server(addr: &str, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Sentiment tracker API running on {}", addr);
    tracing::info!("  POST /analyze/sentiment     - Sentiment trajectory");
    tracing::info!("  POST /detect/signals        - Risk signals");
    tracing::info!("  POST /predict/action        - Next-action prediction");
    tracing::info!("  POST /analysis/save         - Save analysis");
    tracing::info!("  GET  /customers/:id/history - Customer history");
    tracing::info!("  GET  /customers/high-risk   - High-risk customers");
    tracing::info!("  GET  /statistics            - Store statistics");
    tracing::info!("  POST /alerts/:id/resolve    - Resolve alert");
    tracing::info!("  GET  /health                - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
