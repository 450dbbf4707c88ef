//! Input validation for short-position plans.
//!
//! Every rule is evaluated; nothing short-circuits. A field appears in the
//! result once per violated rule set, so the key set is exactly the set of
//! offending fields.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::inputs::{InputField, TradeInputs};

/// Upper bound for `riskPercent` (inclusive).
pub const MAX_RISK_PERCENT: Decimal = dec!(100);

/// Field → message mapping. Empty means the inputs are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<InputField, String>);

impl ValidationErrors {
    /// Record a violation for `field`, replacing any earlier message.
    pub fn insert(&mut self, field: InputField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Whether the inputs passed every rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of offending fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: InputField) -> bool {
        self.0.contains_key(&field)
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: InputField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Offending fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = InputField> + '_ {
        self.0.keys().copied()
    }

    /// Messages in form order, for an aggregated error list.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.values().map(String::as_str)
    }

    /// `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (InputField, &str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Validate trade inputs for a short position.
#[must_use]
pub fn validate(inputs: &TradeInputs) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let zero = Decimal::ZERO;

    // Domain rules
    if inputs.account_size <= zero {
        errors.insert(InputField::AccountSize, "Account size must be greater than 0");
    }

    if inputs.risk_percent <= zero || inputs.risk_percent > MAX_RISK_PERCENT {
        errors.insert(
            InputField::RiskPercent,
            "Risk percent must be between 0.1 and 100",
        );
    }

    if inputs.entry_price <= zero {
        errors.insert(InputField::EntryPrice, "Entry price must be greater than 0");
    }

    if inputs.stop_loss <= zero {
        errors.insert(InputField::StopLoss, "Stop loss must be greater than 0");
    }

    if inputs.level1_price <= zero {
        errors.insert(InputField::Level1Price, "Level 1 price must be greater than 0");
    }

    if inputs.tp_price <= zero {
        errors.insert(InputField::TpPrice, "Take profit price must be greater than 0");
    }

    // Short-position ordering rules
    if inputs.entry_price > zero && inputs.stop_loss > zero && inputs.stop_loss <= inputs.entry_price {
        errors.insert(
            InputField::StopLoss,
            "For short positions, stop loss must be above entry price",
        );
    }

    if inputs.entry_price > zero && inputs.tp_price > zero && inputs.tp_price >= inputs.entry_price {
        errors.insert(
            InputField::TpPrice,
            "For short positions, take profit must be below entry price",
        );
    }

    if inputs.entry_price > zero
        && inputs.level1_price > zero
        && inputs.level1_price >= inputs.entry_price
    {
        errors.insert(
            InputField::Level1Price,
            "Level 1 price should be below entry price for short positions",
        );
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), errors = %errors, "trade inputs rejected");
    }

    errors
}
