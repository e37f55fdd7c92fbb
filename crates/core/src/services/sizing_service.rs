use crate::models::analytics::PositionSize;
use crate::models::settings::RiskSettings;

/// Sizes positions so that a stop-out never loses more than the ceiling.
///
/// Pure calculation with no I/O and no state.
pub struct SizingService {
    max_risk_amount: f64,
}

impl SizingService {
    pub fn new(settings: &RiskSettings) -> Self {
        Self {
            max_risk_amount: settings.max_risk_amount,
        }
    }

    pub fn max_risk_amount(&self) -> f64 {
        self.max_risk_amount
    }

    /// Size a position against the configured ceiling.
    pub fn size(&self, entry_price: f64, stop_loss_price: f64, contract_multiplier: f64) -> PositionSize {
        position_size(entry_price, stop_loss_price, contract_multiplier, self.max_risk_amount)
    }
}

/// Largest whole number of lots whose stop-out loss fits under `max_risk_amount`.
///
/// `distance = |entry - stop|`, `per_lot_risk = distance × multiplier`,
/// `lots = floor(max_risk / per_lot_risk)`. Never rounds up.
///
/// The lot count saturates at `u32::MAX`, so when `max_risk / per_lot_risk`
/// exceeds that the result is `u32::MAX` lots rather than the true maximum.
///
/// Unset or non-positive prices, a non-positive multiplier, non-finite input
/// and zero stop distance all resolve to `PositionSize::zero()`.
pub fn position_size(
    entry_price: f64,
    stop_loss_price: f64,
    contract_multiplier: f64,
    max_risk_amount: f64,
) -> PositionSize {
    let inputs = [entry_price, stop_loss_price, contract_multiplier, max_risk_amount];
    if inputs.iter().any(|v| !v.is_finite()) {
        return PositionSize::zero();
    }
    if entry_price <= 0.0 || stop_loss_price <= 0.0 || contract_multiplier <= 0.0 {
        return PositionSize::zero();
    }

    let distance = (entry_price - stop_loss_price).abs();
    let per_lot_risk = distance * contract_multiplier;
    if per_lot_risk == 0.0 || max_risk_amount <= 0.0 {
        return PositionSize {
            distance,
            per_lot_risk,
            ..PositionSize::zero()
        };
    }

    // `as` saturates at u32::MAX for absurdly tight stops
    let mut lots = (max_risk_amount / per_lot_risk).floor() as u32;

    // The quotient can land one ulp on the wrong side of an integer.
    // Settle on the exact bound using the same product the caller will check.
    while lots > 0 && f64::from(lots) * per_lot_risk > max_risk_amount {
        lots -= 1;
    }
    while lots < u32::MAX && f64::from(lots + 1) * per_lot_risk <= max_risk_amount {
        lots += 1;
    }

    PositionSize {
        distance,
        per_lot_risk,
        lots,
        actual_risk: f64::from(lots) * per_lot_risk,
    }
}
