use crate::models::analytics::{PnlPoint, TradeStats, PROFIT_FACTOR_SENTINEL};
use crate::models::settings::RiskSettings;
use crate::models::trade::Trade;

/// Computes performance statistics over closed trades.
///
/// Everything is recomputed from the slice passed in on every call;
/// the trade collection can change between calls, so nothing is cached.
pub struct StatsService;

impl StatsService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate statistics over all trades with status `Closed`.
    ///
    /// A trade wins when `pnl > 0`; everything else (including break-even
    /// and missing pnl) counts as a loss.
    pub fn compute(&self, trades: &[Trade]) -> TradeStats {
        let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
        let n = closed.len();
        if n == 0 {
            return TradeStats::default();
        }

        let (winners, losers): (Vec<f64>, Vec<f64>) = closed
            .iter()
            .map(|t| t.pnl_or_zero())
            .partition(|&p| p > 0.0);

        let wins = winners.len();
        let losses = losers.len();

        let gross_profit: f64 = winners.iter().sum();
        let gross_loss: f64 = losers.iter().map(|p| p.abs()).sum();
        let total_pnl: f64 = closed.iter().map(|t| t.pnl_or_zero()).sum();

        let avg_win = if wins > 0 { gross_profit / wins as f64 } else { 0.0 };
        let avg_loss = if losses > 0 { gross_loss / losses as f64 } else { 0.0 };

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            PROFIT_FACTOR_SENTINEL
        } else {
            0.0
        };

        let win_fraction = wins as f64 / n as f64;
        let loss_fraction = losses as f64 / n as f64;
        let expectancy = win_fraction * avg_win - loss_fraction * avg_loss;

        let reward_risk_ratio = if avg_loss > 0.0 {
            Some(avg_win / avg_loss)
        } else {
            None
        };

        let r_multiples: Vec<f64> = closed.iter().filter_map(|t| t.r_multiple()).collect();
        let avg_r_multiple = if r_multiples.is_empty() {
            None
        } else {
            Some(r_multiples.iter().sum::<f64>() / r_multiples.len() as f64)
        };

        TradeStats {
            total_trades: n,
            wins,
            losses,
            win_rate: win_fraction * 100.0,
            total_pnl,
            avg_win,
            avg_loss,
            profit_factor,
            expectancy,
            reward_risk_ratio,
            avg_r_multiple,
        }
    }

    /// Capital plus all realized pnl.
    pub fn current_equity(&self, trades: &[Trade], settings: &RiskSettings) -> f64 {
        let realized: f64 = trades
            .iter()
            .filter(|t| t.is_closed())
            .map(|t| t.pnl_or_zero())
            .sum();
        settings.total_capital + realized
    }

    /// The newest `limit` closed trades as a bar series, oldest first.
    ///
    /// Expects the newest-first order the repository keeps.
    pub fn recent_pnl_series(&self, trades: &[Trade], limit: usize) -> Vec<PnlPoint> {
        let mut recent: Vec<f64> = trades
            .iter()
            .filter(|t| t.is_closed())
            .take(limit)
            .map(|t| t.pnl_or_zero())
            .collect();
        recent.reverse();
        recent
            .into_iter()
            .enumerate()
            .map(|(i, pnl)| PnlPoint { index: i + 1, pnl })
            .collect()
    }
}

impl Default for StatsService {
    fn default() -> Self {
        Self::new()
    }
}
