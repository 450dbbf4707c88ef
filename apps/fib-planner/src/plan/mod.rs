//! Position plan core: inputs, validation, calculation.
//!
//! Validation and calculation are pure functions of [`TradeInputs`]. Nothing
//! is cached between calls; callers re-run [`evaluate`] whenever an input
//! changes.

pub mod calculator;
pub mod inputs;
pub mod notes;
pub mod risk_reward;
pub mod validation;

pub use calculator::{
    DerivedPlan, ENTRY_WEIGHTS, EntryLevel, LossScenarios, PlanEvaluation, ProfitScenarios,
    RETRACEMENT_ENTRY_2, RETRACEMENT_ENTRY_3, TOTAL_WEIGHT, compute, evaluate,
};
pub use inputs::{InputField, TradeInputs, UnknownFieldError, parse_numeric};
pub use notes::TradingNotes;
pub use risk_reward::{RiskRewards, Transition};
pub use validation::{MAX_RISK_PERCENT, ValidationErrors, validate};
