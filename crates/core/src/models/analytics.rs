use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Returned as the profit factor when there are gains and no losses.
pub const PROFIT_FACTOR_SENTINEL: f64 = 999.0;

/// Result of sizing a position against the risk ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSize {
    /// |entry - stop|
    pub distance: f64,

    /// Currency lost per lot if the stop is hit
    pub per_lot_risk: f64,

    /// Largest lot count whose total risk fits under the ceiling
    pub lots: u32,

    /// lots × per_lot_risk
    pub actual_risk: f64,
}

impl PositionSize {
    /// The "not ready to trade" result.
    pub fn zero() -> Self {
        Self {
            distance: 0.0,
            per_lot_risk: 0.0,
            lots: 0,
            actual_risk: 0.0,
        }
    }

    pub fn is_tradeable(&self) -> bool {
        self.lots > 0
    }
}

/// Aggregate performance over closed trades.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    /// Number of closed trades (N)
    pub total_trades: usize,

    /// Closed trades with pnl > 0
    pub wins: usize,

    /// Closed trades with pnl <= 0
    pub losses: usize,

    /// wins / N × 100, 0 when N == 0
    pub win_rate: f64,

    pub total_pnl: f64,

    /// Mean pnl of winners
    pub avg_win: f64,

    /// Mean absolute pnl of losers
    pub avg_loss: f64,

    /// Gross profit / gross loss; `PROFIT_FACTOR_SENTINEL` with no losses
    pub profit_factor: f64,

    /// Expected currency result per trade
    pub expectancy: f64,

    /// avg_win / avg_loss, `None` without losses
    pub reward_risk_ratio: Option<f64>,

    /// Mean R-multiple over closed trades that recorded a risk amount
    pub avg_r_multiple: Option<f64>,
}

/// Realized pnl for one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: f64,
}

/// One cell of the recent-days calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,

    /// `None` when no trade closed on that day
    pub pnl: Option<f64>,

    pub is_today: bool,
}

/// Derived same-day loss warning. Informational only; blocks nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitBreaker {
    pub today: NaiveDate,
    pub today_pnl: f64,
    pub daily_loss_limit: f64,
    pub active: bool,
}

/// Point in the recent pnl bar series (1-based, oldest first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub index: usize,
    pub pnl: f64,
}
