//! Relationship context tags

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller-supplied classification of the relationship.
///
/// Only selects recommendation/intervention templates; never affects
/// scoring or signal extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Customer,
    Employee,
    Email,
    Investor,
    #[default]
    General,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Customer => "customer",
            ContextType::Employee => "employee",
            ContextType::Email => "email",
            ContextType::Investor => "investor",
            ContextType::General => "general",
        }
    }

    /// Parse a tag, falling back to `fallback` for anything unrecognised
    pub fn parse_or(tag: &str, fallback: ContextType) -> ContextType {
        match tag.parse() {
            Ok(ctx) => ctx,
            Err(_) => {
                tracing::info!(tag, fallback = fallback.as_str(), "unrecognised context tag, using fallback");
                fallback
            }
        }
    }

    /// Retention-style relationships get a success bonus
    pub fn is_retention(&self) -> bool {
        matches!(self, ContextType::Customer | ContextType::Employee)
    }
}

impl FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(ContextType::Customer),
            "employee" => Ok(ContextType::Employee),
            "email" => Ok(ContextType::Email),
            "investor" => Ok(ContextType::Investor),
            "general" => Ok(ContextType::General),
            other => Err(format!("unknown context type: {}", other)),
        }
    }
}

impl std::fmt::Display for ContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
