//! Trade inputs and the text → number boundary.
//!
//! Everything that reaches the validator and calculator is already a
//! [`Decimal`]. Free text coming from a form field, a CLI flag or an
//! interactive session is coerced here with `parseFloat` semantics: the
//! longest numeric prefix wins and anything unparseable becomes zero.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Input Field
// ============================================================================

/// One of the six user-supplied trade parameters.
///
/// Ordering follows the form layout, which is also the order errors are
/// reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    /// Total trading account balance.
    AccountSize,
    /// Percentage of the account to risk on this trade.
    RiskPercent,
    /// Initial short-entry price.
    EntryPrice,
    /// Price where the trade is abandoned.
    StopLoss,
    /// First partial profit target.
    Level1Price,
    /// Final profit target.
    TpPrice,
}

impl InputField {
    /// All fields in form order.
    pub const ALL: [Self; 6] = [
        Self::AccountSize,
        Self::RiskPercent,
        Self::EntryPrice,
        Self::StopLoss,
        Self::Level1Price,
        Self::TpPrice,
    ];

    /// Wire name of the field (camelCase).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccountSize => "accountSize",
            Self::RiskPercent => "riskPercent",
            Self::EntryPrice => "entryPrice",
            Self::StopLoss => "stopLoss",
            Self::Level1Price => "level1Price",
            Self::TpPrice => "tpPrice",
        }
    }

    /// Human label shown next to the value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccountSize => "Account Size ($)",
            Self::RiskPercent => "Risk Percent (%)",
            Self::EntryPrice => "Entry Price ($)",
            Self::StopLoss => "Stop Loss ($)",
            Self::Level1Price => "Level 1 Price ($)",
            Self::TpPrice => "Take Profit ($)",
        }
    }

    /// Short help text for the field.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::AccountSize => "Total trading account balance",
            Self::RiskPercent => {
                "Percentage of account to risk on this trade (recommended: 1-3%)"
            }
            Self::EntryPrice => "Initial entry price for the trade",
            Self::StopLoss => "Price level where you'll exit if trade goes against you",
            Self::Level1Price => "First partial profit target",
            Self::TpPrice => "Final profit target for the trade",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input field '{0}' (expected one of: accountSize, riskPercent, entryPrice, stopLoss, level1Price, tpPrice)")]
pub struct UnknownFieldError(pub String);

impl FromStr for InputField {
    type Err = UnknownFieldError;

    /// Accepts camelCase, snake_case and kebab-case spellings, plus the short
    /// aliases used in interactive sessions (`account`, `risk`, `entry`,
    /// `stop`, `level1`, `tp`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "accountsize" | "account" => Ok(Self::AccountSize),
            "riskpercent" | "risk" => Ok(Self::RiskPercent),
            "entryprice" | "entry" => Ok(Self::EntryPrice),
            "stoploss" | "stop" | "sl" => Ok(Self::StopLoss),
            "level1price" | "level1" => Ok(Self::Level1Price),
            "tpprice" | "tp" | "takeprofit" => Ok(Self::TpPrice),
            _ => Err(UnknownFieldError(s.trim().to_string())),
        }
    }
}

// ============================================================================
// Trade Inputs
// ============================================================================

/// The six numeric parameters of a short trade plan.
///
/// Deserializing fills missing fields from [`TradeInputs::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeInputs {
    /// Total account equity.
    pub account_size: Decimal,
    /// Percent of the account to risk, in (0, 100].
    pub risk_percent: Decimal,
    /// Initial short-entry price.
    pub entry_price: Decimal,
    /// Stop price, above the entry for a short.
    pub stop_loss: Decimal,
    /// First partial-profit price, below the entry.
    pub level1_price: Decimal,
    /// Final take-profit price, below the entry.
    pub tp_price: Decimal,
}

impl Default for TradeInputs {
    /// The reset record.
    fn default() -> Self {
        Self {
            account_size: dec!(10000),
            risk_percent: dec!(2),
            entry_price: dec!(158.27),
            stop_loss: dec!(162.51),
            level1_price: dec!(155.84),
            tp_price: dec!(154.12),
        }
    }
}

impl TradeInputs {
    /// All-zero record, the value every field coerces to when left blank.
    pub const ZERO: Self = Self {
        account_size: Decimal::ZERO,
        risk_percent: Decimal::ZERO,
        entry_price: Decimal::ZERO,
        stop_loss: Decimal::ZERO,
        level1_price: Decimal::ZERO,
        tp_price: Decimal::ZERO,
    };

    /// Read one field.
    #[must_use]
    pub const fn get(&self, field: InputField) -> Decimal {
        match field {
            InputField::AccountSize => self.account_size,
            InputField::RiskPercent => self.risk_percent,
            InputField::EntryPrice => self.entry_price,
            InputField::StopLoss => self.stop_loss,
            InputField::Level1Price => self.level1_price,
            InputField::TpPrice => self.tp_price,
        }
    }

    /// Overwrite one field.
    pub fn set(&mut self, field: InputField, value: Decimal) {
        let slot = match field {
            InputField::AccountSize => &mut self.account_size,
            InputField::RiskPercent => &mut self.risk_percent,
            InputField::EntryPrice => &mut self.entry_price,
            InputField::StopLoss => &mut self.stop_loss,
            InputField::Level1Price => &mut self.level1_price,
            InputField::TpPrice => &mut self.tp_price,
        };
        *slot = value;
    }

    /// Return a copy with one field replaced by coerced free text.
    #[must_use]
    pub fn with_field(mut self, field: InputField, text: &str) -> Self {
        self.set(field, parse_numeric(text));
        self
    }

    /// Build inputs from `(field, text)` pairs, starting from [`TradeInputs::ZERO`].
    ///
    /// Fields that never appear stay at zero, like an empty form field.
    pub fn from_text_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (InputField, &'a str)>,
    {
        fields
            .into_iter()
            .fold(Self::ZERO, |inputs, (field, text)| inputs.with_field(field, text))
    }
}

// ============================================================================
// Text Boundary
// ============================================================================

/// Largest exponent magnitude a [`Decimal`] can absorb.
const MAX_EXPONENT: i32 = 28;

#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn numeric_prefix() -> &'static regex::Regex {
    static NUMERIC_PREFIX: OnceLock<regex::Regex> = OnceLock::new();
    NUMERIC_PREFIX.get_or_init(|| {
        regex::Regex::new(r"^\s*([+-])?(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?")
            .expect("numeric prefix regex is valid")
    })
}

/// Coerce free text into a number.
///
/// Leading whitespace is skipped and the longest numeric prefix is parsed
/// (`"12.5abc"` → 12.5, `"1e2"` → 100). Empty, non-numeric or
/// unrepresentable text yields zero.
#[must_use]
pub fn parse_numeric(text: &str) -> Decimal {
    let Some(caps) = numeric_prefix().captures(text) else {
        return Decimal::ZERO;
    };

    let int_part = caps.get(2).map_or("", |m| m.as_str());
    let frac_part = caps.get(3).map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let sign = caps.get(1).map_or("", |m| m.as_str());
    let sign = if sign == "-" { "-" } else { "" };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    // No implicit fractional digit: it would cost a place of scale.
    let mantissa = if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    };

    let parsed = match caps.get(4).map(|m| m.as_str().parse::<i32>()) {
        // Beyond 28 digits either way the value is not representable.
        Some(Ok(exponent)) if exponent.abs() <= MAX_EXPONENT => {
            Decimal::from_scientific(&format!("{mantissa}e{exponent}"))
        }
        Some(_) => {
            tracing::debug!(text, "numeric exponent out of range; coerced to 0");
            return Decimal::ZERO;
        }
        None => Decimal::from_str(&mantissa),
    };

    parsed.map(|value| value.normalize()).unwrap_or_else(|e| {
        tracing::debug!(text, error = %e, "numeric text out of range; coerced to 0");
        Decimal::ZERO
    })
}
