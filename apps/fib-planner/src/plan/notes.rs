//! Summary ratios shown alongside a plan in advanced mode.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculator::DerivedPlan;
use super::inputs::TradeInputs;

/// Allocation and exposure summary of a valid plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingNotes {
    /// Share of the full position taken at each entry, in percent.
    pub entry_allocation_pct: [Decimal; 3],
    /// Risk dollars as a percent of the account.
    pub capital_at_risk_pct: Decimal,
    /// Total notional as a percent of the account.
    pub capital_deployment_pct: Decimal,
    /// Total notional per risk dollar.
    pub leverage_ratio: Decimal,
}

impl TradingNotes {
    /// Derive notes from a plan. `None` for a withheld plan.
    #[must_use]
    pub fn from_plan(inputs: &TradeInputs, plan: &DerivedPlan) -> Option<Self> {
        if !plan.valid {
            return None;
        }

        let [e1, e2, e3] = plan.entries();
        Some(Self {
            entry_allocation_pct: [
                percent(e1.quantity, plan.total_units),
                percent(e2.quantity, plan.total_units),
                percent(e3.quantity, plan.total_units),
            ],
            capital_at_risk_pct: percent(plan.risk_dollars, inputs.account_size),
            capital_deployment_pct: percent(plan.total_entry_dollars, inputs.account_size),
            leverage_ratio: ratio(plan.total_entry_dollars, plan.risk_dollars),
        })
    }
}

/// Quotient, or zero when the denominator is zero or the division overflows.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// [`ratio`] scaled to percent, or zero when the scaling overflows.
fn percent(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .and_then(|q| q.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::calculator::compute;

    fn assert_close(actual: Decimal, expected: Decimal) {
        assert!(
            (actual - expected).abs() < dec!(0.05),
            "expected ≈{expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_notes() {
        let inputs = TradeInputs::default();
        let plan = compute(&inputs);
        let notes = TradingNotes::from_plan(&inputs, &plan).unwrap();

        assert_close(notes.entry_allocation_pct[0], dec!(11.1));
        assert_close(notes.entry_allocation_pct[1], dec!(33.3));
        assert_close(notes.entry_allocation_pct[2], dec!(55.6));
        assert_eq!(notes.capital_at_risk_pct, dec!(2));

        let deployment = plan.total_entry_dollars / inputs.account_size * dec!(100);
        assert_eq!(notes.capital_deployment_pct, deployment);
        assert_eq!(notes.leverage_ratio, plan.total_entry_dollars / dec!(200));
    }

    #[test]
    fn test_withheld_plan_has_no_notes() {
        let inputs = TradeInputs::ZERO;
        assert!(TradingNotes::from_plan(&inputs, &compute(&inputs)).is_none());
    }

    #[test]
    fn test_zero_units_allocate_nothing() {
        let plan = DerivedPlan {
            valid: true,
            ..DerivedPlan::default()
        };
        let notes = TradingNotes::from_plan(&TradeInputs::default(), &plan).unwrap();
        assert_eq!(notes.entry_allocation_pct, [Decimal::ZERO; 3]);
        assert_eq!(notes.leverage_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_huge_deployment_does_not_overflow() {
        let inputs = TradeInputs {
            account_size: dec!(1),
            risk_percent: dec!(100),
            entry_price: dec!(10000000000000000000),
            stop_loss: dec!(10000000000000000000.00000001),
            level1_price: dec!(1),
            tp_price: dec!(1),
        };
        let plan = compute(&inputs);
        assert!(plan.valid);

        let notes = TradingNotes::from_plan(&inputs, &plan).unwrap();
        // Notional / account fits, but × 100 does not
        assert_eq!(notes.capital_deployment_pct, Decimal::ZERO);
        assert_eq!(notes.capital_at_risk_pct, dec!(100));
        assert_close(notes.entry_allocation_pct[2], dec!(55.6));
    }
}
