use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::info;

use crate::models::analytics::{CalendarDay, CircuitBreaker, DailyPnl};
use crate::models::settings::RiskSettings;
use crate::models::trade::Trade;

/// Daily loss tracking and the circuit breaker.
///
/// Days are UTC calendar days of each trade's `date`.
pub struct RiskService {
    daily_loss_limit: f64,
}

impl RiskService {
    pub fn new(settings: &RiskSettings) -> Self {
        Self {
            daily_loss_limit: settings.daily_loss_limit,
        }
    }

    /// Realized pnl of closed trades summed per day, ordered by day.
    pub fn daily_pnl_map(&self, trades: &[Trade]) -> BTreeMap<NaiveDate, f64> {
        let mut map = BTreeMap::new();
        for trade in trades.iter().filter(|t| t.is_closed()) {
            *map.entry(trade.day_key()).or_insert(0.0) += trade.pnl_or_zero();
        }
        map
    }

    pub fn daily_pnl(&self, trades: &[Trade]) -> Vec<DailyPnl> {
        self.daily_pnl_map(trades)
            .into_iter()
            .map(|(date, pnl)| DailyPnl { date, pnl })
            .collect()
    }

    /// Realized pnl of closed trades logged on `day`.
    pub fn pnl_for_day(&self, trades: &[Trade], day: NaiveDate) -> f64 {
        trades
            .iter()
            .filter(|t| t.is_closed() && t.day_key() == day)
            .map(|t| t.pnl_or_zero())
            .sum()
    }

    /// Active when today's realized pnl is at or below the daily loss limit.
    pub fn circuit_breaker(&self, trades: &[Trade], today: NaiveDate) -> CircuitBreaker {
        let today_pnl = self.pnl_for_day(trades, today);
        let active = today_pnl <= self.daily_loss_limit;
        if active {
            info!(%today, today_pnl, limit = self.daily_loss_limit, "daily loss limit reached");
        }
        CircuitBreaker {
            today,
            today_pnl,
            daily_loss_limit: self.daily_loss_limit,
            active,
        }
    }

    /// The last `days` days ending at `today`, oldest first.
    pub fn calendar(&self, trades: &[Trade], today: NaiveDate, days: u32) -> Vec<CalendarDay> {
        let map = self.daily_pnl_map(trades);
        (0..i64::from(days))
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                CalendarDay {
                    date,
                    pnl: map.get(&date).copied(),
                    is_today: date == today,
                }
            })
            .collect()
    }
}
