// ═══════════════════════════════════════════════════════════════════
// Sizing Tests — position_size, SizingService
// ═══════════════════════════════════════════════════════════════════

use tradelogic_core::models::analytics::PositionSize;
use tradelogic_core::models::settings::RiskSettings;
use tradelogic_core::services::sizing_service::{position_size, SizingService};

const MAX_RISK: f64 = 360.0;

fn assert_within_ceiling_and_maximal(entry: f64, stop: f64, mult: f64, max: f64) {
    let size = position_size(entry, stop, mult, max);
    let per_lot = (entry - stop).abs() * mult;
    assert!(
        f64::from(size.lots) * per_lot <= max,
        "lots={} per_lot={per_lot} exceeds {max}",
        size.lots
    );
    if per_lot > 0.0 {
        assert!(
            f64::from(size.lots + 1) * per_lot > max,
            "lots={} is not maximal for per_lot={per_lot}",
            size.lots
        );
    }
    assert!(size.actual_risk <= max);
}

// ═══════════════════════════════════════════════════════════════════
// Concrete scenarios
// ═══════════════════════════════════════════════════════════════════

mod scenarios {
    use super::*;

    #[test]
    fn rebar_long_twenty_point_stop() {
        let size = position_size(3600.0, 3580.0, 10.0, MAX_RISK);
        assert_eq!(size.distance, 20.0);
        assert_eq!(size.per_lot_risk, 200.0);
        assert_eq!(size.lots, 1);
        assert_eq!(size.actual_risk, 200.0);
    }

    #[test]
    fn short_side_uses_absolute_distance() {
        let size = position_size(3580.0, 3600.0, 10.0, MAX_RISK);
        assert_eq!(size.per_lot_risk, 200.0);
        assert_eq!(size.lots, 1);
    }

    #[test]
    fn exact_fit_is_not_rounded_down() {
        // 9 points × 10 = 90 per lot, 4 lots = 360 exactly
        let size = position_size(3609.0, 3600.0, 10.0, MAX_RISK);
        assert_eq!(size.lots, 4);
        assert_eq!(size.actual_risk, 360.0);
    }

    #[test]
    fn never_rounds_up() {
        // 7 points × 10 = 70 per lot; 360 / 70 = 5.14
        let size = position_size(3607.0, 3600.0, 10.0, MAX_RISK);
        assert_eq!(size.lots, 5);
        assert_eq!(size.actual_risk, 350.0);
    }

    #[test]
    fn stop_wider_than_ceiling_gives_zero_lots() {
        let size = position_size(3600.0, 3550.0, 10.0, MAX_RISK);
        assert_eq!(size.per_lot_risk, 500.0);
        assert_eq!(size.lots, 0);
        assert_eq!(size.actual_risk, 0.0);
        assert!(!size.is_tradeable());
    }

    #[test]
    fn fractional_prices() {
        // 0.3 × 100 = 30 per lot → 12 lots
        let size = position_size(1.3, 1.0, 100.0, MAX_RISK);
        assert_within_ceiling_and_maximal(1.3, 1.0, 100.0, MAX_RISK);
        assert!(size.lots == 11 || size.lots == 12);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Degenerate input
// ═══════════════════════════════════════════════════════════════════

mod degenerate {
    use super::*;

    #[test]
    fn zero_distance_is_zero_for_any_multiplier() {
        for mult in [0.5, 1.0, 10.0, 300.0] {
            let size = position_size(3600.0, 3600.0, mult, MAX_RISK);
            assert_eq!(size.lots, 0);
            assert_eq!(size.actual_risk, 0.0);
        }
    }

    #[test]
    fn unset_entry_price() {
        assert_eq!(position_size(0.0, 3580.0, 10.0, MAX_RISK), PositionSize::zero());
    }

    #[test]
    fn unset_stop_price() {
        assert_eq!(position_size(3600.0, 0.0, 10.0, MAX_RISK), PositionSize::zero());
    }

    #[test]
    fn negative_prices() {
        assert_eq!(position_size(-3600.0, 3580.0, 10.0, MAX_RISK).lots, 0);
        assert_eq!(position_size(3600.0, -1.0, 10.0, MAX_RISK).lots, 0);
    }

    #[test]
    fn non_positive_multiplier() {
        assert_eq!(position_size(3600.0, 3580.0, 0.0, MAX_RISK).lots, 0);
        assert_eq!(position_size(3600.0, 3580.0, -10.0, MAX_RISK).lots, 0);
    }

    #[test]
    fn non_finite_input() {
        assert_eq!(position_size(f64::NAN, 3580.0, 10.0, MAX_RISK).lots, 0);
        assert_eq!(position_size(3600.0, f64::INFINITY, 10.0, MAX_RISK).lots, 0);
        assert_eq!(position_size(3600.0, 3580.0, 10.0, f64::NAN).lots, 0);
    }

    #[test]
    fn zero_ceiling() {
        assert_eq!(position_size(3600.0, 3580.0, 10.0, 0.0).lots, 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Ceiling and maximality across a grid of inputs
// ═══════════════════════════════════════════════════════════════════

mod bounds {
    use super::*;

    #[test]
    fn holds_for_assorted_inputs() {
        let entries = [1.0, 2.5, 99.99, 3600.0, 48_250.5];
        let distances = [0.01, 0.1, 0.3, 1.0, 7.0, 19.99, 250.0];
        let multipliers = [0.1, 1.0, 3.0, 10.0, 300.0];
        for &entry in &entries {
            for &d in &distances {
                if d >= entry {
                    continue;
                }
                for &m in &multipliers {
                    assert_within_ceiling_and_maximal(entry, entry - d, m, MAX_RISK);
                    assert_within_ceiling_and_maximal(entry, entry + d, m, MAX_RISK);
                }
            }
        }
    }

    #[test]
    fn tiny_stop_saturates_instead_of_overflowing() {
        let size = position_size(1.0, 1.0 + 1e-12, 1e-6, 1e9);
        assert_eq!(size.lots, u32::MAX);
        assert!(size.actual_risk <= 1e9);
    }
}

// ═══════════════════════════════════════════════════════════════════
// SizingService
// ═══════════════════════════════════════════════════════════════════

mod service {
    use super::*;

    #[test]
    fn uses_configured_ceiling() {
        let svc = SizingService::new(&RiskSettings::default());
        assert_eq!(svc.max_risk_amount(), 360.0);
        assert_eq!(svc.size(3600.0, 3580.0, 10.0).lots, 1);
    }

    #[test]
    fn larger_account_sizes_up() {
        let svc = SizingService::new(&RiskSettings::from_capital(100_000.0, 0.02));
        // 2000 / 200 = 10
        assert_eq!(svc.size(3600.0, 3580.0, 10.0).lots, 10);
    }
}
