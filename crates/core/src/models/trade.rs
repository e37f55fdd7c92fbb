use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::review::TradeReview;

/// Side of the market a trade is taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDirection {
    Long,
    Short,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "LONG"),
            TradeDirection::Short => write!(f, "SHORT"),
        }
    }
}

/// Lifecycle state of a trade.
///
/// `Planning`/`Open` can move to `Closed` or `Cancelled`; `Planning` can also
/// move to `Open`. `Closed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    Planning,
    Open,
    Closed,
    Cancelled,
}

impl TradeStatus {
    /// Whether no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TradeStatus::Closed | TradeStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: TradeStatus) -> bool {
        match (self, next) {
            (TradeStatus::Planning, TradeStatus::Open) => true,
            (TradeStatus::Planning | TradeStatus::Open, TradeStatus::Closed) => true,
            (TradeStatus::Planning | TradeStatus::Open, TradeStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Planning => write!(f, "PLANNING"),
            TradeStatus::Open => write!(f, "OPEN"),
            TradeStatus::Closed => write!(f, "CLOSED"),
            TradeStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// One logged trading decision.
///
/// Field names serialize in camelCase so backups written by the browser
/// version of the journal import unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Unique identifier, immutable after creation
    pub id: String,

    /// Creation timestamp
    pub date: DateTime<Utc>,

    /// Free-text symbol (e.g., "rb2601")
    pub asset: String,

    pub direction: TradeDirection,

    // Setup record captured by the entry wizard
    #[serde(default)]
    pub d1_conditions_met: bool,

    /// H1 zone confluences that were present (e.g., "level", "ma", "trendline")
    #[serde(default)]
    pub h1_zone_type: Vec<String>,

    /// Confirmation candle (e.g., "Pinbar", "Engulfing")
    #[serde(default)]
    pub entry_signal: String,

    /// 5-minute trigger (e.g., "Box Breakout")
    #[serde(default)]
    pub trigger_type: String,

    // Risk & position
    pub entry_price: f64,
    pub stop_loss_price: f64,

    /// 0 until set during trade management
    #[serde(default)]
    pub take_profit_price: f64,

    /// Currency amount at risk, computed at entry
    pub risk_amount: f64,

    /// Currency value of one price point for one lot
    pub contract_multiplier: f64,

    /// Lots
    pub position_size: u32,

    // Outcome
    pub status: TradeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,

    /// Signed currency result, present once closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<TradeReview>,
}

impl Trade {
    /// Create a trade in the `Planning` state with a fresh id and timestamp.
    /// Setup fields start empty; sizing fields are filled by the caller.
    pub fn new(
        asset: impl Into<String>,
        direction: TradeDirection,
        entry_price: f64,
        stop_loss_price: f64,
        contract_multiplier: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            asset: asset.into(),
            direction,
            d1_conditions_met: false,
            h1_zone_type: Vec::new(),
            entry_signal: String::new(),
            trigger_type: String::new(),
            entry_price,
            stop_loss_price,
            take_profit_price: 0.0,
            risk_amount: 0.0,
            contract_multiplier,
            position_size: 0,
            status: TradeStatus::Planning,
            exit_price: None,
            pnl: None,
            notes: None,
            review: None,
        }
    }

    /// Realized result, with a missing pnl counted as zero.
    pub fn pnl_or_zero(&self) -> f64 {
        self.pnl.unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// UTC calendar day the trade was logged on.
    pub fn day_key(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Realized pnl divided by the amount originally risked.
    /// A closed trade without a recorded pnl counts as 0R.
    /// `None` when an unclosed trade has no result yet or nothing was at risk.
    pub fn r_multiple(&self) -> Option<f64> {
        let pnl = if self.is_closed() { self.pnl_or_zero() } else { self.pnl? };
        if self.risk_amount > 0.0 {
            Some(pnl / self.risk_amount)
        } else {
            None
        }
    }

    /// Rating from the attached review, 0 when unreviewed.
    pub fn review_rating(&self) -> u8 {
        self.review.as_ref().map(|r| r.rating).unwrap_or(0)
    }
}
