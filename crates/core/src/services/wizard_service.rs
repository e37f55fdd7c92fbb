use chrono::Utc;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::analytics::PositionSize;
use crate::models::settings::RiskSettings;
use crate::models::trade::{Trade, TradeDirection, TradeStatus};
use crate::services::sizing_service::SizingService;

/// Minimum number of H1 confluences required at the entry zone.
pub const MIN_H1_CONFLUENCES: usize = 2;

/// Contract multiplier for rebar futures, the default instrument.
pub const DEFAULT_MULTIPLIER: f64 = 10.0;

pub const DEFAULT_ASSET: &str = "rb2601";

/// Steps of the guided entry, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    /// Daily trend filter
    DailyTrend = 1,
    /// Hourly entry zone
    HourlyZone = 2,
    /// Confirmation candle
    Signal = 3,
    /// 5-minute trigger and position sizing
    Trigger = 4,
    /// Final review before submitting
    Confirm = 5,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::DailyTrend,
        WizardStep::HourlyZone,
        WizardStep::Signal,
        WizardStep::Trigger,
        WizardStep::Confirm,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.number() as usize).copied()
    }

    pub fn previous(&self) -> Option<WizardStep> {
        (self.number() as usize)
            .checked_sub(2)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}

/// D1 trend filter. Every box must be ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyChecklist {
    /// MA60 sloping in the trade direction
    pub ma60_sloped: bool,
    /// Price holding on the right side of MA20
    pub price_beyond_ma20: bool,
    /// Higher highs/lows (or lower, for shorts)
    pub dow_structure: bool,
}

impl DailyChecklist {
    pub fn all_met(&self) -> bool {
        self.ma60_sloped && self.price_beyond_ma20 && self.dow_structure
    }
}

/// H1 zone confluences. At least `MIN_H1_CONFLUENCES` must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HourlyChecklist {
    pub level: bool,
    pub ma: bool,
    pub trendline: bool,
}

impl HourlyChecklist {
    pub fn count(&self) -> usize {
        [self.level, self.ma, self.trendline]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    /// Names of the ticked confluences, as stored on the trade.
    pub fn zone_types(&self) -> Vec<String> {
        [("level", self.level), ("ma", self.ma), ("trendline", self.trendline)]
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// Everything the entry wizard collects before a trade is logged.
#[derive(Debug, Clone, PartialEq)]
pub struct TradePlan {
    pub asset: String,
    pub direction: TradeDirection,
    pub daily: DailyChecklist,
    pub hourly: HourlyChecklist,
    pub entry_signal: String,
    pub trigger_type: String,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub contract_multiplier: f64,
}

impl Default for TradePlan {
    fn default() -> Self {
        Self {
            asset: DEFAULT_ASSET.to_string(),
            direction: TradeDirection::Long,
            daily: DailyChecklist::default(),
            hourly: HourlyChecklist::default(),
            entry_signal: String::new(),
            trigger_type: String::new(),
            entry_price: 0.0,
            stop_loss_price: 0.0,
            contract_multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// Validates wizard steps and turns a finished plan into an open trade.
pub struct WizardService {
    sizing: SizingService,
}

impl WizardService {
    pub fn new(settings: &RiskSettings) -> Self {
        Self {
            sizing: SizingService::new(settings),
        }
    }

    /// Position the plan would be sized to right now.
    pub fn size(&self, plan: &TradePlan) -> PositionSize {
        self.sizing
            .size(plan.entry_price, plan.stop_loss_price, plan.contract_multiplier)
    }

    /// Check one step's gate. Steps do not check earlier steps.
    pub fn validate_step(&self, plan: &TradePlan, step: WizardStep) -> Result<(), CoreError> {
        match step {
            WizardStep::DailyTrend => {
                if !plan.daily.all_met() {
                    return Err(CoreError::ValidationError(
                        "Daily trend filter: all three conditions must be met".into(),
                    ));
                }
            }
            WizardStep::HourlyZone => {
                let count = plan.hourly.count();
                if count < MIN_H1_CONFLUENCES {
                    return Err(CoreError::ValidationError(format!(
                        "Hourly zone needs at least {MIN_H1_CONFLUENCES} confluences, got {count}"
                    )));
                }
            }
            WizardStep::Signal => {
                if plan.entry_signal.trim().is_empty() {
                    return Err(CoreError::ValidationError(
                        "A confirmation signal must be selected".into(),
                    ));
                }
            }
            WizardStep::Trigger => {
                if plan.asset.trim().is_empty() {
                    return Err(CoreError::ValidationError("Asset must not be empty".into()));
                }
                if !self.size(plan).is_tradeable() {
                    return Err(CoreError::ValidationError(format!(
                        "Stop is too wide for the {:.0} risk ceiling: position size is 0",
                        self.sizing.max_risk_amount()
                    )));
                }
            }
            WizardStep::Confirm => {}
        }
        Ok(())
    }

    /// First step whose gate fails, if any.
    pub fn first_invalid_step(&self, plan: &TradePlan) -> Option<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .find(|step| self.validate_step(plan, *step).is_err())
    }

    /// Validate every step and produce an `Open` trade sized to the ceiling.
    pub fn build_trade(&self, plan: &TradePlan) -> Result<Trade, CoreError> {
        for step in WizardStep::ALL {
            self.validate_step(plan, step)?;
        }
        let size = self.size(plan);

        Ok(Trade {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            asset: plan.asset.trim().to_string(),
            direction: plan.direction,
            d1_conditions_met: true,
            h1_zone_type: plan.hourly.zone_types(),
            entry_signal: plan.entry_signal.clone(),
            trigger_type: plan.trigger_type.clone(),
            entry_price: plan.entry_price,
            stop_loss_price: plan.stop_loss_price,
            take_profit_price: 0.0,
            risk_amount: size.actual_risk,
            contract_multiplier: plan.contract_multiplier,
            position_size: size.lots,
            status: TradeStatus::Open,
            exit_price: None,
            pnl: None,
            notes: None,
            review: None,
        })
    }
}
