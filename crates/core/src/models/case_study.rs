use serde::{Deserialize, Serialize};

use super::trade::TradeDirection;

/// Grouping used by the learning center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseCategory {
    /// Trend continuation setups
    Trend,
    /// Reversal setups
    Reversal,
    /// Conditions to stay out of
    Trap,
}

impl std::fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseCategory::Trend => write!(f, "TREND"),
            CaseCategory::Reversal => write!(f, "REVERSAL"),
            CaseCategory::Trap => write!(f, "TRAP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Basic,
    Advanced,
    Expert,
}

/// The five wizard steps as they played out in a worked example.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLogic {
    pub d1: &'static str,
    pub h1: &'static str,
    pub signal: &'static str,
    pub trigger: &'static str,
    pub execution: &'static str,
}

/// A worked example from the built-in library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: &'static str,
    pub category: CaseCategory,
    pub title: &'static str,
    pub direction: TradeDirection,
    pub difficulty: Difficulty,
    pub tags: &'static [&'static str],
    pub description: &'static str,
    /// Why the market behaves this way at the setup
    pub psychology: &'static str,
    pub logic: CaseLogic,
    pub key_takeaway: &'static str,
}
