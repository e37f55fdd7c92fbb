pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    analytics::{CalendarDay, CircuitBreaker, DailyPnl, PnlPoint, PositionSize, TradeStats},
    review::TradeReview,
    settings::RiskSettings,
    trade::{Trade, TradeStatus},
};
use services::{
    journal_service::JournalService,
    risk_service::RiskService,
    sizing_service::SizingService,
    stats_service::StatsService,
    wizard_service::{TradePlan, WizardService},
};
use storage::repository::{JournalEvent, TradeRepository};
use storage::store::KeyValueStore;
use tokio::sync::broadcast;

use errors::CoreError;

/// Number of days shown on the dashboard calendar.
pub const CALENDAR_DAYS: u32 = 14;

/// Number of closed trades shown in the recent pnl chart.
pub const RECENT_TRADES: usize = 15;

/// Main entry point for the TradeLogic core library.
///
/// Holds no trade state of its own: every query reads the collection fresh
/// from the store and every mutation is a whole-collection read-modify-write.
#[must_use]
pub struct TradeJournal<S: KeyValueStore> {
    repository: TradeRepository<S>,
    settings: RiskSettings,
    sizing_service: SizingService,
    stats_service: StatsService,
    risk_service: RiskService,
    journal_service: JournalService,
    wizard_service: WizardService,
}

impl<S: KeyValueStore> std::fmt::Debug for TradeJournal<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeJournal")
            .field("settings", &self.settings)
            .finish()
    }
}

impl<S: KeyValueStore> TradeJournal<S> {
    /// Open a journal over `store` with the sample risk configuration.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, RiskSettings::default())
    }

    pub fn with_settings(store: S, settings: RiskSettings) -> Self {
        Self::build(TradeRepository::new(store), settings)
    }

    /// Open a second view over the same repository (shares change notifications).
    pub fn from_repository(repository: TradeRepository<S>, settings: RiskSettings) -> Self {
        Self::build(repository, settings)
    }

    #[must_use]
    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    #[must_use]
    pub fn repository(&self) -> &TradeRepository<S> {
        &self.repository
    }

    // ── Position Sizing ─────────────────────────────────────────────

    /// Size a position against the configured risk ceiling.
    #[must_use]
    pub fn size_position(
        &self,
        entry_price: f64,
        stop_loss_price: f64,
        contract_multiplier: f64,
    ) -> PositionSize {
        self.sizing_service
            .size(entry_price, stop_loss_price, contract_multiplier)
    }

    // ── Trade Entry ─────────────────────────────────────────────────

    /// Validate a completed wizard plan and log it as an open trade.
    pub fn log_trade(&self, plan: &TradePlan) -> Result<Trade, CoreError> {
        let trade = self.wizard_service.build_trade(plan)?;
        self.save_trade(trade.clone())?;
        Ok(trade)
    }

    /// Insert a new trade or replace the one with the same id.
    pub fn save_trade(&self, trade: Trade) -> Result<(), CoreError> {
        self.repository.update(|trades| {
            self.journal_service.upsert(trades, trade);
            Ok(())
        })
    }

    #[must_use]
    pub fn wizard(&self) -> &WizardService {
        &self.wizard_service
    }

    // ── Trade Management ────────────────────────────────────────────

    pub fn open_trade(&self, trade_id: &str) -> Result<(), CoreError> {
        self.repository
            .update(|trades| self.journal_service.open(trades, trade_id))
    }

    /// Close a trade with its realized pnl.
    pub fn close_trade(
        &self,
        trade_id: &str,
        pnl: f64,
        exit_price: Option<f64>,
    ) -> Result<(), CoreError> {
        self.repository
            .update(|trades| self.journal_service.close(trades, trade_id, pnl, exit_price))
    }

    pub fn cancel_trade(&self, trade_id: &str) -> Result<(), CoreError> {
        self.repository
            .update(|trades| self.journal_service.cancel(trades, trade_id))
    }

    pub fn set_take_profit(&self, trade_id: &str, take_profit_price: f64) -> Result<(), CoreError> {
        self.repository.update(|trades| {
            self.journal_service
                .set_take_profit(trades, trade_id, take_profit_price)
        })
    }

    pub fn set_notes(&self, trade_id: &str, notes: Option<String>) -> Result<(), CoreError> {
        self.repository
            .update(|trades| self.journal_service.set_notes(trades, trade_id, notes))
    }

    /// Delete a trade, returning it.
    pub fn delete_trade(&self, trade_id: &str) -> Result<Trade, CoreError> {
        self.repository
            .update(|trades| self.journal_service.delete(trades, trade_id))
    }

    /// Delete every trade.
    pub fn clear_all(&self) -> Result<(), CoreError> {
        self.repository.clear()
    }

    // ── Review ──────────────────────────────────────────────────────

    /// Attach or replace the review of a trade.
    pub fn save_review(&self, trade_id: &str, review: TradeReview) -> Result<(), CoreError> {
        self.repository
            .update(|trades| self.journal_service.save_review(trades, trade_id, review))
    }

    /// Closed trades without a saved review.
    pub fn review_queue(&self) -> Result<Vec<Trade>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self
            .journal_service
            .review_queue(&trades)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Closed trades rated 8 or higher.
    pub fn playbook(&self) -> Result<Vec<Trade>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self
            .journal_service
            .playbook(&trades)
            .into_iter()
            .cloned()
            .collect())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// All trades, newest first.
    pub fn trades(&self) -> Result<Vec<Trade>, CoreError> {
        self.repository.load()
    }

    pub fn get_trade(&self, trade_id: &str) -> Result<Option<Trade>, CoreError> {
        Ok(self
            .repository
            .load()?
            .into_iter()
            .find(|t| t.id == trade_id))
    }

    pub fn trades_with_status(&self, status: TradeStatus) -> Result<Vec<Trade>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self
            .journal_service
            .with_status(&trades, status)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Trades currently in the market.
    pub fn open_positions(&self) -> Result<Vec<Trade>, CoreError> {
        self.trades_with_status(TradeStatus::Open)
    }

    /// Match asset, notes and review tags (case-insensitive).
    pub fn search(&self, query: &str) -> Result<Vec<Trade>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self
            .journal_service
            .search(&trades, query)
            .into_iter()
            .cloned()
            .collect())
    }

    // ── Statistics ──────────────────────────────────────────────────

    /// Win rate, profit factor, expectancy and friends over closed trades.
    pub fn stats(&self) -> Result<TradeStats, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.stats_service.compute(&trades))
    }

    /// Capital plus realized pnl.
    pub fn current_equity(&self) -> Result<f64, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.stats_service.current_equity(&trades, &self.settings))
    }

    /// The latest closed trades as a chart series, oldest first.
    pub fn recent_pnl(&self) -> Result<Vec<PnlPoint>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.stats_service.recent_pnl_series(&trades, RECENT_TRADES))
    }

    // ── Risk ────────────────────────────────────────────────────────

    pub fn daily_pnl(&self) -> Result<Vec<DailyPnl>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.risk_service.daily_pnl(&trades))
    }

    /// Circuit breaker state for `today` (UTC day).
    pub fn circuit_breaker_on(&self, today: NaiveDate) -> Result<CircuitBreaker, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.risk_service.circuit_breaker(&trades, today))
    }

    /// Circuit breaker state for the current UTC day.
    pub fn circuit_breaker(&self) -> Result<CircuitBreaker, CoreError> {
        self.circuit_breaker_on(chrono::Utc::now().date_naive())
    }

    /// The last 14 days ending at `today`, oldest first.
    pub fn calendar_on(&self, today: NaiveDate) -> Result<Vec<CalendarDay>, CoreError> {
        let trades = self.repository.load()?;
        Ok(self.risk_service.calendar(&trades, today, CALENDAR_DAYS))
    }

    pub fn calendar(&self) -> Result<Vec<CalendarDay>, CoreError> {
        self.calendar_on(chrono::Utc::now().date_naive())
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// All trades as a JSON array, suitable for a backup file.
    pub fn export_json(&self) -> Result<String, CoreError> {
        self.repository.export_json()
    }

    /// Number of trades an import file holds, without writing anything.
    /// Lets the caller confirm before the destructive import.
    pub fn preview_import(&self, json: &str) -> Result<usize, CoreError> {
        Ok(self.repository.preview_import(json)?.len())
    }

    /// Replace every stored trade with the contents of a backup file.
    pub fn import_json(&self, json: &str) -> Result<usize, CoreError> {
        self.repository.import_json(json)
    }

    // ── Notifications ───────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<JournalEvent> {
        self.repository.subscribe()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(repository: TradeRepository<S>, settings: RiskSettings) -> Self {
        Self {
            repository,
            sizing_service: SizingService::new(&settings),
            stats_service: StatsService::new(),
            risk_service: RiskService::new(&settings),
            journal_service: JournalService::new(),
            wizard_service: WizardService::new(&settings),
            settings,
        }
    }
}
