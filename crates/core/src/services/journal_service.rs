use crate::errors::CoreError;
use crate::models::review::{TradeReview, PLAYBOOK_MIN_RATING};
use crate::models::trade::{Trade, TradeStatus};

/// Trade lifecycle and review mutations over an in-memory collection.
///
/// Pure business logic, no I/O. The collection is kept newest first.
/// Callers load it, apply one of these operations, and write it back whole.
pub struct JournalService;

impl JournalService {
    pub fn new() -> Self {
        Self
    }

    /// Replace the trade with the same id, or insert a new one at the front.
    pub fn upsert(&self, trades: &mut Vec<Trade>, trade: Trade) {
        match trades.iter().position(|t| t.id == trade.id) {
            Some(idx) => trades[idx] = trade,
            None => trades.insert(0, trade),
        }
    }

    /// Remove a trade by id, returning it.
    pub fn delete(&self, trades: &mut Vec<Trade>, trade_id: &str) -> Result<Trade, CoreError> {
        let idx = Self::index_of(trades, trade_id)?;
        Ok(trades.remove(idx))
    }

    /// Move a planned trade to `Open`.
    pub fn open(&self, trades: &mut [Trade], trade_id: &str) -> Result<(), CoreError> {
        let trade = Self::find_mut(trades, trade_id)?;
        Self::transition(trade, TradeStatus::Open)
    }

    /// Close a trade with its realized result.
    pub fn close(
        &self,
        trades: &mut [Trade],
        trade_id: &str,
        pnl: f64,
        exit_price: Option<f64>,
    ) -> Result<(), CoreError> {
        if !pnl.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Trade result must be a finite number, got {pnl}"
            )));
        }
        let trade = Self::find_mut(trades, trade_id)?;
        Self::transition(trade, TradeStatus::Closed)?;
        trade.pnl = Some(pnl);
        trade.exit_price = exit_price;
        Ok(())
    }

    pub fn cancel(&self, trades: &mut [Trade], trade_id: &str) -> Result<(), CoreError> {
        let trade = Self::find_mut(trades, trade_id)?;
        Self::transition(trade, TradeStatus::Cancelled)
    }

    /// Set the take-profit level during trade management.
    pub fn set_take_profit(
        &self,
        trades: &mut [Trade],
        trade_id: &str,
        take_profit_price: f64,
    ) -> Result<(), CoreError> {
        if !take_profit_price.is_finite() || take_profit_price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Take-profit price must be a non-negative number, got {take_profit_price}"
            )));
        }
        let trade = Self::find_mut(trades, trade_id)?;
        if trade.status.is_terminal() {
            return Err(CoreError::ValidationError(format!(
                "Trade {trade_id} is {} and can no longer be managed",
                trade.status
            )));
        }
        trade.take_profit_price = take_profit_price;
        Ok(())
    }

    pub fn set_notes(
        &self,
        trades: &mut [Trade],
        trade_id: &str,
        notes: Option<String>,
    ) -> Result<(), CoreError> {
        let trade = Self::find_mut(trades, trade_id)?;
        trade.notes = notes;
        Ok(())
    }

    /// Attach or replace a review. Marks it as reviewed.
    /// Does not touch status or pnl.
    pub fn save_review(
        &self,
        trades: &mut [Trade],
        trade_id: &str,
        mut review: TradeReview,
    ) -> Result<(), CoreError> {
        if !review.is_rating_valid() {
            return Err(CoreError::ValidationError(format!(
                "Review rating must be between 1 and 10, got {}",
                review.rating
            )));
        }
        let trade = Self::find_mut(trades, trade_id)?;
        review.is_reviewed = true;
        trade.review = Some(review);
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn with_status<'a>(&self, trades: &'a [Trade], status: TradeStatus) -> Vec<&'a Trade> {
        trades.iter().filter(|t| t.status == status).collect()
    }

    /// Closed trades still waiting for a review.
    pub fn review_queue<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        trades
            .iter()
            .filter(|t| t.is_closed())
            .filter(|t| !t.review.as_ref().is_some_and(|r| r.is_reviewed))
            .collect()
    }

    /// Closed trades rated 8 or higher: the setups worth repeating.
    pub fn playbook<'a>(&self, trades: &'a [Trade]) -> Vec<&'a Trade> {
        trades
            .iter()
            .filter(|t| t.is_closed() && t.review_rating() >= PLAYBOOK_MIN_RATING)
            .collect()
    }

    /// Case-insensitive match against asset, notes and review tags.
    pub fn search<'a>(&self, trades: &'a [Trade], query: &str) -> Vec<&'a Trade> {
        let q = query.to_lowercase();
        trades
            .iter()
            .filter(|t| {
                t.asset.to_lowercase().contains(&q)
                    || t.notes.as_deref().unwrap_or("").to_lowercase().contains(&q)
                    || t.review
                        .as_ref()
                        .is_some_and(|r| r.tags.iter().any(|tag| tag.to_lowercase().contains(&q)))
            })
            .collect()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn index_of(trades: &[Trade], trade_id: &str) -> Result<usize, CoreError> {
        trades
            .iter()
            .position(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))
    }

    fn find_mut<'a>(trades: &'a mut [Trade], trade_id: &str) -> Result<&'a mut Trade, CoreError> {
        trades
            .iter_mut()
            .find(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))
    }

    fn transition(trade: &mut Trade, next: TradeStatus) -> Result<(), CoreError> {
        if !trade.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                id: trade.id.clone(),
                from: trade.status,
                to: next,
            });
        }
        trade.status = next;
        Ok(())
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}
