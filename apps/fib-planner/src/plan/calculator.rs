//! Scaled-entry plan derivation.
//!
//! A short is built in three stages. Entry 1 is the stated entry price;
//! entries 2 and 3 sit at the 38.2% and 61.8% retracements toward the stop.
//! Size is split 1:3:5 across the stages and scaled so that a full fill
//! stopped out loses exactly the risk budget.
//!
//! # Example
//!
//! ```rust
//! use fib_planner::plan::{TradeInputs, compute};
//! use rust_decimal_macros::dec;
//!
//! let plan = compute(&TradeInputs::default());
//! assert!(plan.valid);
//! assert_eq!(plan.risk_dollars, dec!(200));
//! assert_eq!(plan.entry2.price, dec!(159.88968));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::TradeInputs;
use super::risk_reward::{RiskRewards, Transition};
use super::validation::{ValidationErrors, validate};

// ============================================================================
// Domain Constants
// ============================================================================

/// Retracement of Entry 2 toward the stop.
pub const RETRACEMENT_ENTRY_2: Decimal = dec!(0.382);

/// Retracement of Entry 3 toward the stop.
pub const RETRACEMENT_ENTRY_3: Decimal = dec!(0.618);

/// Size weights of entries 1, 2 and 3.
pub const ENTRY_WEIGHTS: [Decimal; 3] = [dec!(1), dec!(3), dec!(5)];

/// Sum of [`ENTRY_WEIGHTS`].
pub const TOTAL_WEIGHT: Decimal = dec!(9);

const PERCENT: Decimal = dec!(100);

// ============================================================================
// Plan Types
// ============================================================================

/// One staged entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLevel {
    /// Fill price.
    pub price: Decimal,
    /// Units sold at this level.
    pub quantity: Decimal,
    /// Notional at this level (`price × quantity`).
    pub dollars: Decimal,
}

/// Loss if price reaches the stop after the first N entries filled.
///
/// Values are signed: zero or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossScenarios {
    /// Only Entry 1 filled.
    pub entry1: Decimal,
    /// Entries 1 and 2 filled.
    pub entry2: Decimal,
    /// All entries filled.
    pub entry3: Decimal,
}

/// Profit magnitudes per [`Transition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitScenarios {
    /// Entry 1 covered at Level 1.
    pub entry1_to_level1: Decimal,
    /// Entry 1 covered at the take-profit price.
    pub entry1_to_take_profit: Decimal,
    /// Entry 2 size covered at the Entry 1 price.
    pub entry2_to_entry1: Decimal,
    /// Entries 1 and 2 covered at Level 1.
    pub entry2_to_level1: Decimal,
    /// Entries 1 and 2 covered at the take-profit price.
    pub entry2_to_take_profit: Decimal,
    /// Entry 3 size covered at the Entry 2 price.
    pub entry3_to_entry2: Decimal,
    /// Entry 3 size covered at the Entry 1 price.
    pub entry3_to_entry1: Decimal,
    /// Full position covered at Level 1.
    pub entry3_to_level1: Decimal,
    /// Full position covered at the take-profit price.
    pub entry3_to_take_profit: Decimal,
}

impl ProfitScenarios {
    /// Profit for one transition.
    #[must_use]
    pub const fn get(&self, transition: Transition) -> Decimal {
        match transition {
            Transition::Entry1ToLevel1 => self.entry1_to_level1,
            Transition::Entry1ToTakeProfit => self.entry1_to_take_profit,
            Transition::Entry2ToEntry1 => self.entry2_to_entry1,
            Transition::Entry2ToLevel1 => self.entry2_to_level1,
            Transition::Entry2ToTakeProfit => self.entry2_to_take_profit,
            Transition::Entry3ToEntry2 => self.entry3_to_entry2,
            Transition::Entry3ToEntry1 => self.entry3_to_entry1,
            Transition::Entry3ToLevel1 => self.entry3_to_level1,
            Transition::Entry3ToTakeProfit => self.entry3_to_take_profit,
        }
    }
}

/// Everything derived from a set of [`TradeInputs`].
///
/// The default value is the withheld plan: every number zero, no ratios,
/// `valid == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPlan {
    /// Whether the plan was computed from valid inputs.
    pub valid: bool,
    /// Dollars lost if the full position is stopped out.
    pub risk_dollars: Decimal,
    /// Initial entry.
    pub entry1: EntryLevel,
    /// 38.2% retracement entry.
    pub entry2: EntryLevel,
    /// 61.8% retracement entry.
    pub entry3: EntryLevel,
    /// Size-weighted average entry price.
    pub weighted_entry: Decimal,
    /// `|weighted_entry − stop_loss|`.
    #[serde(rename = "distanceToSL")]
    pub distance_to_stop: Decimal,
    /// Full position size.
    pub total_units: Decimal,
    /// One weight unit of size (`total_units / 9`).
    #[serde(rename = "baseQty")]
    pub base_quantity: Decimal,
    /// Sum of the entry notionals.
    pub total_entry_dollars: Decimal,
    /// Stop-out losses.
    pub losses: LossScenarios,
    /// Target profits.
    pub profits: ProfitScenarios,
    /// Profit / max-loss per transition.
    pub risk_rewards: RiskRewards,
}

impl DerivedPlan {
    /// The zeroed plan reported for invalid inputs.
    #[must_use]
    pub fn withheld() -> Self {
        Self::default()
    }

    /// Maximum loss magnitude (`|losses.entry3|`).
    #[must_use]
    pub fn max_loss(&self) -> Decimal {
        self.losses.entry3.abs()
    }

    /// The three entries in order.
    #[must_use]
    pub const fn entries(&self) -> [&EntryLevel; 3] {
        [&self.entry1, &self.entry2, &self.entry3]
    }
}

/// Validation result and plan, produced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEvaluation {
    /// Inputs the evaluation was run on.
    pub inputs: TradeInputs,
    /// Validation failures (empty when valid).
    pub errors: ValidationErrors,
    /// Derived plan, or the withheld plan.
    pub plan: DerivedPlan,
}

impl PlanEvaluation {
    /// Whether a plan was produced.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.plan.valid
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute the plan, or the withheld plan if the inputs fail validation.
#[must_use]
pub fn compute(inputs: &TradeInputs) -> DerivedPlan {
    if validate(inputs).is_empty() {
        derive_or_withhold(inputs)
    } else {
        DerivedPlan::withheld()
    }
}

/// Validate then compute, as one step.
#[must_use]
pub fn evaluate(inputs: &TradeInputs) -> PlanEvaluation {
    let errors = validate(inputs);
    let plan = if errors.is_empty() {
        derive_or_withhold(inputs)
    } else {
        DerivedPlan::withheld()
    };

    PlanEvaluation {
        inputs: *inputs,
        errors,
        plan,
    }
}

fn derive_or_withhold(inputs: &TradeInputs) -> DerivedPlan {
    derive(inputs).unwrap_or_else(|| {
        tracing::warn!(?inputs, "plan arithmetic overflowed; withholding plan");
        DerivedPlan::withheld()
    })
}

/// Derive the plan without validating. `None` on arithmetic overflow.
pub(crate) fn derive(inputs: &TradeInputs) -> Option<DerivedPlan> {
    let risk_dollars = inputs
        .account_size
        .checked_mul(inputs.risk_percent)?
        .checked_div(PERCENT)?;

    // Entry prices
    let span = inputs.stop_loss.checked_sub(inputs.entry_price)?;
    let e1 = inputs.entry_price;
    let e2 = e1.checked_add(span.checked_mul(RETRACEMENT_ENTRY_2)?)?;
    let e3 = e1.checked_add(span.checked_mul(RETRACEMENT_ENTRY_3)?)?;

    let [w1, w2, w3] = ENTRY_WEIGHTS;
    let weighted_entry = e1
        .checked_mul(w1)?
        .checked_add(e2.checked_mul(w2)?)?
        .checked_add(e3.checked_mul(w3)?)?
        .checked_div(TOTAL_WEIGHT)?;

    let distance_to_stop = weighted_entry.checked_sub(inputs.stop_loss)?.abs();
    let total_units = if distance_to_stop.is_zero() {
        Decimal::ZERO
    } else {
        risk_dollars.checked_div(distance_to_stop)?
    };

    // Quantities and notionals
    let base_quantity = total_units.checked_div(TOTAL_WEIGHT)?;
    let entry1 = entry_level(e1, base_quantity, w1)?;
    let entry2 = entry_level(e2, base_quantity, w2)?;
    let entry3 = entry_level(e3, base_quantity, w3)?;
    let total_entry_dollars = entry1
        .dollars
        .checked_add(entry2.dollars)?
        .checked_add(entry3.dollars)?;

    // Stop-out losses, cumulative over filled entries
    let (q1, q2, q3) = (entry1.quantity, entry2.quantity, entry3.quantity);
    let cost2 = entry1.dollars.checked_add(entry2.dollars)?;
    let losses = LossScenarios {
        entry1: stop_out_loss(inputs.stop_loss, q1, entry1.dollars)?,
        entry2: stop_out_loss(inputs.stop_loss, q1.checked_add(q2)?, cost2)?,
        entry3: stop_out_loss(inputs.stop_loss, total_units, total_entry_dollars)?,
    };

    let (level1, tp) = (inputs.level1_price, inputs.tp_price);
    let profits = ProfitScenarios {
        entry1_to_level1: gain(e1, level1, q1)?,
        entry1_to_take_profit: gain(e1, tp, q1)?,
        entry2_to_entry1: gain(e1, e2, q2)?,
        entry2_to_level1: gain(e1, level1, q1)?.checked_add(gain(e2, level1, q2)?)?,
        entry2_to_take_profit: gain(e1, tp, q1)?.checked_add(gain(e2, tp, q2)?)?,
        entry3_to_entry2: gain(e2, e3, q3)?,
        entry3_to_entry1: gain(e1, e3, q3)?,
        entry3_to_level1: gain(weighted_entry, level1, total_units)?,
        entry3_to_take_profit: gain(weighted_entry, tp, total_units)?,
    };

    let risk_rewards = RiskRewards::from_profits(losses.entry3.abs(), |t| profits.get(t));

    tracing::debug!(
        %risk_dollars,
        %weighted_entry,
        %total_units,
        ratios = risk_rewards.len(),
        "derived plan"
    );

    Some(DerivedPlan {
        valid: true,
        risk_dollars,
        entry1,
        entry2,
        entry3,
        weighted_entry,
        distance_to_stop,
        total_units,
        base_quantity,
        total_entry_dollars,
        losses,
        profits,
        risk_rewards,
    })
}

fn entry_level(price: Decimal, base_quantity: Decimal, weight: Decimal) -> Option<EntryLevel> {
    let quantity = base_quantity.checked_mul(weight)?;
    Some(EntryLevel {
        price,
        quantity,
        dollars: quantity.checked_mul(price)?,
    })
}

/// `-|stop × units − cost|`
fn stop_out_loss(stop: Decimal, units: Decimal, cost: Decimal) -> Option<Decimal> {
    Some(-stop.checked_mul(units)?.checked_sub(cost)?.abs())
}

/// `|(from − to) × quantity|`
fn gain(from: Decimal, to: Decimal, quantity: Decimal) -> Option<Decimal> {
    Some(from.checked_sub(to)?.checked_mul(quantity)?.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::inputs::InputField;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_reference_plan() {
        let plan = compute(&TradeInputs::default());
        assert!(plan.valid);

        assert_eq!(plan.risk_dollars, dec!(200));
        assert_eq!(plan.entry1.price, dec!(158.27));
        assert_eq!(plan.entry2.price, dec!(159.88968));
        assert_eq!(plan.entry3.price, dec!(160.89032));

        // (158.27 + 3 × 159.88968 + 5 × 160.89032) / 9
        assert_close(plan.weighted_entry, dec!(160.265626667), dec!(0.000001));
        assert_close(plan.distance_to_stop, dec!(2.244373333), dec!(0.000001));
        assert_close(plan.total_units, dec!(89.11), dec!(0.01));
        assert_close(plan.base_quantity * TOTAL_WEIGHT, plan.total_units, dec!(0.0000001));
    }

    #[test]
    fn test_quantities_follow_weights() {
        let plan = compute(&TradeInputs::default());
        assert_eq!(plan.entry1.quantity, plan.base_quantity);
        assert_eq!(plan.entry2.quantity, plan.base_quantity * dec!(3));
        assert_eq!(plan.entry3.quantity, plan.base_quantity * dec!(5));
        assert_eq!(
            plan.total_entry_dollars,
            plan.entry1.dollars + plan.entry2.dollars + plan.entry3.dollars
        );
    }

    #[test]
    fn test_full_stop_out_loses_risk_budget() {
        let plan = compute(&TradeInputs::default());
        assert_close(plan.losses.entry3, dec!(-200), dec!(0.000001));
        assert_close(plan.max_loss(), dec!(200), dec!(0.000001));
        assert!(plan.losses.entry1 <= Decimal::ZERO);
        assert!(plan.losses.entry1.abs() < plan.losses.entry2.abs());
        assert!(plan.losses.entry2.abs() < plan.losses.entry3.abs());
    }

    #[test]
    fn test_profit_scenarios() {
        let plan = compute(&TradeInputs::default());
        let p = &plan.profits;
        let q1 = plan.entry1.quantity;

        assert_eq!(p.entry1_to_level1, (dec!(158.27) - dec!(155.84)) * q1);
        assert_eq!(p.entry1_to_take_profit, (dec!(158.27) - dec!(154.12)) * q1);
        assert_eq!(
            p.entry2_to_level1,
            p.entry1_to_level1 + (plan.entry2.price - dec!(155.84)) * plan.entry2.quantity
        );
        assert!(p.entry3_to_take_profit > p.entry3_to_level1);
        assert!(p.entry3_to_entry1 > p.entry3_to_entry2);
        for t in Transition::ALL {
            assert!(p.get(t) >= Decimal::ZERO, "{t} should be a magnitude");
        }
    }

    #[test]
    fn test_risk_rewards_reference() {
        let plan = compute(&TradeInputs::default());
        assert_eq!(plan.risk_rewards.len(), 9);

        // (weighted − tp) / (stop − weighted)
        let rr = plan.risk_rewards.get(Transition::Entry3ToTakeProfit).unwrap();
        assert_close(rr, dec!(2.7383), dec!(0.001));
        for t in Transition::ALL {
            let expected = plan.profits.get(t) / plan.max_loss();
            assert_close(plan.risk_rewards.get(t).unwrap(), expected, dec!(0.0000001));
        }
    }

    #[test]
    fn test_invalid_inputs_withhold_plan() {
        let mut inputs = TradeInputs::default();
        inputs.set(InputField::StopLoss, dec!(150));
        let plan = compute(&inputs);
        assert_eq!(plan, DerivedPlan::withheld());
        assert!(!plan.valid);
        assert!(plan.risk_rewards.is_empty());
    }

    #[test]
    fn test_zero_distance_guard() {
        // Entry at the stop collapses every retracement onto the stop.
        let inputs = TradeInputs {
            stop_loss: dec!(158.27),
            ..TradeInputs::default()
        };
        let plan = derive(&inputs).unwrap();
        assert_eq!(plan.weighted_entry, inputs.stop_loss);
        assert_eq!(plan.distance_to_stop, Decimal::ZERO);
        assert_eq!(plan.total_units, Decimal::ZERO);
        for entry in plan.entries() {
            assert_eq!(entry.quantity, Decimal::ZERO);
            assert_eq!(entry.dollars, Decimal::ZERO);
        }
        assert_eq!(plan.total_entry_dollars, Decimal::ZERO);
        assert_eq!(plan.losses, LossScenarios::default());
        assert!(plan.risk_rewards.is_empty());

        // Through the public path the same inputs are rejected outright.
        assert_eq!(compute(&inputs), DerivedPlan::withheld());
    }

    #[test]
    fn test_overflow_is_withheld() {
        let inputs = TradeInputs {
            account_size: Decimal::MAX,
            risk_percent: dec!(100),
            ..TradeInputs::default()
        };
        assert!(validate(&inputs).is_empty());
        assert!(derive(&inputs).is_none());
        assert_eq!(compute(&inputs), DerivedPlan::withheld());
    }

    #[test]
    fn test_evaluate_pairs_errors_with_plan() {
        let ok = evaluate(&TradeInputs::default());
        assert!(ok.is_valid());
        assert!(ok.errors.is_empty());
        assert_eq!(ok.plan, compute(&TradeInputs::default()));

        let bad = evaluate(&TradeInputs::ZERO);
        assert!(!bad.is_valid());
        assert_eq!(bad.errors.len(), 6);
        assert_eq!(bad.plan, DerivedPlan::withheld());
    }

    #[test]
    fn test_plan_serializes_legacy_names() {
        let json = serde_json::to_value(compute(&TradeInputs::default())).unwrap();
        assert_eq!(json["valid"], serde_json::json!(true));
        assert!(json.get("distanceToSL").is_some());
        assert!(json.get("baseQty").is_some());
        assert!(json["riskRewards"].get("Entry 3 → Take Profit").is_some());
    }
}
