use serde::{Deserialize, Serialize};

/// Risk configuration. Fixed for the lifetime of a journal; nothing in the
/// core persists or overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSettings {
    /// Account capital the risk budget is derived from.
    pub total_capital: f64,

    /// Fraction of capital risked per trade (0.02 = 2%).
    pub risk_per_trade_percent: f64,

    /// Currency ceiling on the loss of a single trade.
    pub max_risk_amount: f64,

    /// Same-day realized pnl at or below which the circuit breaker trips.
    /// Negative; twice the single-trade ceiling by default.
    pub daily_loss_limit: f64,
}

impl RiskSettings {
    /// Derive the per-trade ceiling and daily limit from capital and percent.
    pub fn from_capital(total_capital: f64, risk_per_trade_percent: f64) -> Self {
        let max_risk_amount = total_capital * risk_per_trade_percent;
        Self {
            total_capital,
            risk_per_trade_percent,
            max_risk_amount,
            daily_loss_limit: -2.0 * max_risk_amount,
        }
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self::from_capital(18_000.0, 0.02)
    }
}
