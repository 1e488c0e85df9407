//! Analysis store: per-customer history, running profiles and risk alerts
//!
//! In-memory, snapshot to and from a single JSON file.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TrackerError};
use crate::types::{
    AlertSeverity, AnalysisRecord, ContextType, CustomerHistory, CustomerProfile,
    HighRiskCustomer, Message, RiskAlert, StoreStatistics, StoredAnalysis,
};
use crate::{ALERT_CONFIDENCE_THRESHOLD, ALERT_HIGH_SEVERITY_THRESHOLD, HISTORY_LIMIT};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStore {
    analyses: Vec<StoredAnalysis>,
    profiles: BTreeMap<String, CustomerProfile>,
    alerts: Vec<RiskAlert>,
    last_analysis_id: u64,
    last_alert_id: u64,
}

impl AnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    /// Append an analysis, update the customer's profile and raise an alert
    /// when confidence is above the bar. Returns the analysis id.
    pub fn save_analysis(
        &mut self,
        customer_id: &str,
        context: ContextType,
        messages: &[Message],
        record: &AnalysisRecord,
    ) -> u64 {
        let now = Utc::now();
        self.last_analysis_id += 1;
        let id = self.last_analysis_id;

        self.analyses.push(StoredAnalysis {
            id,
            customer_id: customer_id.to_string(),
            context_type: context,
            analysis_date: now,
            messages: messages.to_vec(),
            record: record.clone(),
        });

        match self.profiles.get_mut(customer_id) {
            Some(profile) => {
                let n = profile.total_interactions as f64;
                profile.lifetime_sentiment =
                    (profile.lifetime_sentiment * n + record.current_sentiment) / (n + 1.0);
                profile.total_interactions += 1;
                profile.last_contact = now;
                profile.churn_risk = record.confidence;
            }
            None => {
                self.profiles.insert(
                    customer_id.to_string(),
                    CustomerProfile {
                        customer_id: customer_id.to_string(),
                        name: None,
                        context_type: context,
                        first_contact: now,
                        last_contact: now,
                        total_interactions: 1,
                        churn_risk: record.confidence,
                        lifetime_sentiment: record.current_sentiment,
                    },
                );
            }
        }

        if record.confidence > ALERT_CONFIDENCE_THRESHOLD {
            let severity = if record.confidence > ALERT_HIGH_SEVERITY_THRESHOLD {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            self.last_alert_id += 1;
            let trend = record.trend.map(|t| t.as_str()).unwrap_or("UNKNOWN");
            self.alerts.push(RiskAlert {
                id: self.last_alert_id,
                customer_id: customer_id.to_string(),
                alert_type: record.predicted_action,
                severity,
                created_at: now,
                resolved: false,
                notes: format!(
                    "Detected {} trend with {:.0}% confidence",
                    trend,
                    record.confidence * 100.0
                ),
            });
            tracing::warn!(
                "Risk alert {} raised for {} ({:?}, confidence {:.2})",
                self.last_alert_id,
                customer_id,
                severity,
                record.confidence
            );
        }

        tracing::debug!("Stored analysis {} for {}", id, customer_id);
        id
    }

    /// Attach a display name to an existing profile
    pub fn set_customer_name(&mut self, customer_id: &str, name: &str) {
        if let Some(profile) = self.profiles.get_mut(customer_id) {
            profile.name = Some(name.to_string());
        }
    }

    pub fn profile(&self, customer_id: &str) -> Option<&CustomerProfile> {
        self.profiles.get(customer_id)
    }

    /// Profile, last 10 analyses and open alerts, newest first
    pub fn customer_history(&self, customer_id: &str) -> CustomerHistory {
        let analyses = self
            .analyses
            .iter()
            .rev()
            .filter(|a| a.customer_id == customer_id)
            .take(HISTORY_LIMIT)
            .cloned()
            .collect();

        let active_alerts = self
            .alerts
            .iter()
            .rev()
            .filter(|a| a.customer_id == customer_id && !a.resolved)
            .cloned()
            .collect();

        CustomerHistory {
            profile: self.profiles.get(customer_id).cloned(),
            analyses,
            active_alerts,
        }
    }

    /// Profiles whose churn risk is strictly above `threshold`, riskiest first
    pub fn high_risk_customers(&self, threshold: f64) -> Vec<HighRiskCustomer> {
        let mut out: Vec<HighRiskCustomer> = self
            .profiles
            .values()
            .filter(|p| p.churn_risk > threshold)
            .map(|p| HighRiskCustomer {
                profile: p.clone(),
                active_alerts: self
                    .alerts
                    .iter()
                    .filter(|a| a.customer_id == p.customer_id && !a.resolved)
                    .count(),
                last_analysis: self
                    .analyses
                    .iter()
                    .filter(|a| a.customer_id == p.customer_id)
                    .map(|a| a.analysis_date)
                    .max(),
            })
            .collect();

        out.sort_by(|a, b| {
            b.profile
                .churn_risk
                .partial_cmp(&a.profile.churn_risk)
                .unwrap_or(Ordering::Equal)
        });
        out
    }

    /// Mark an alert resolved, replacing its notes
    pub fn resolve_alert(&mut self, alert_id: u64, notes: &str) -> Result<()> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or(TrackerError::AlertNotFound(alert_id))?;
        alert.resolved = true;
        alert.notes = notes.to_string();
        tracing::info!("Resolved alert {}", alert_id);
        Ok(())
    }

    pub fn statistics(&self) -> StoreStatistics {
        let mut customers: Vec<&str> = self.analyses.iter().map(|a| a.customer_id.as_str()).collect();
        customers.sort_unstable();
        customers.dedup();

        let average_sentiment = if self.analyses.is_empty() {
            0.0
        } else {
            let sum: f64 = self.analyses.iter().map(|a| a.record.current_sentiment).sum();
            ((sum / self.analyses.len() as f64) * 100.0).round() / 100.0
        };

        StoreStatistics {
            total_customers: customers.len(),
            customers_at_risk: self
                .profiles
                .values()
                .filter(|p| p.churn_risk > ALERT_CONFIDENCE_THRESHOLD)
                .count(),
            active_alerts: self.alerts.iter().filter(|a| !a.resolved).count(),
            average_sentiment,
            total_analyses: self.analyses.len(),
        }
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Write the whole store as pretty JSON, creating parent directories
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        tracing::debug!("Store written to {}", path.display());
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let store: Self = serde_json::from_str(&json)?;
        tracing::info!(
            "Loaded {} analyses for {} customers from {}",
            store.analyses.len(),
            store.profiles.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    /// Load when the file exists, otherwise start empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::new())
        }
    }
}

/// `customer_` + first 16 hex chars of SHA-256 over the message texts
pub fn default_customer_id(messages: &[Message]) -> String {
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_string(&texts).unwrap_or_default().as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("customer_{}", hex)
}

// =============================================================================
// TESTS
// =============================================================================
