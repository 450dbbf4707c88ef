//! Profit transitions and their risk/reward ratios.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named profit scenario: the position built up to some entry, closed at
/// some lower price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Entry 1 filled, covered at Level 1.
    #[serde(rename = "Entry 1 → Level 1")]
    Entry1ToLevel1,
    /// Entry 1 filled, covered at the take-profit price.
    #[serde(rename = "Entry 1 → Take Profit")]
    Entry1ToTakeProfit,
    /// Entry 2 size covered back at the Entry 1 price.
    #[serde(rename = "Entry 2 → Entry 1")]
    Entry2ToEntry1,
    /// Entries 1 and 2 filled, covered at Level 1.
    #[serde(rename = "Entry 2 → Level 1")]
    Entry2ToLevel1,
    /// Entries 1 and 2 filled, covered at the take-profit price.
    #[serde(rename = "Entry 2 → Take Profit")]
    Entry2ToTakeProfit,
    /// Entry 3 size covered back at the Entry 2 price.
    #[serde(rename = "Entry 3 → Entry 2")]
    Entry3ToEntry2,
    /// Entry 3 size covered back at the Entry 1 price.
    #[serde(rename = "Entry 3 → Entry 1")]
    Entry3ToEntry1,
    /// Full position covered at Level 1.
    #[serde(rename = "Entry 3 → Level 1")]
    Entry3ToLevel1,
    /// Full position covered at the take-profit price.
    #[serde(rename = "Entry 3 → Take Profit")]
    Entry3ToTakeProfit,
}

impl Transition {
    /// Every transition, in display order.
    pub const ALL: [Self; 9] = [
        Self::Entry1ToLevel1,
        Self::Entry1ToTakeProfit,
        Self::Entry2ToEntry1,
        Self::Entry2ToLevel1,
        Self::Entry2ToTakeProfit,
        Self::Entry3ToEntry2,
        Self::Entry3ToEntry1,
        Self::Entry3ToLevel1,
        Self::Entry3ToTakeProfit,
    ];

    /// Display label, e.g. `Entry 1 → Level 1`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry1ToLevel1 => "Entry 1 → Level 1",
            Self::Entry1ToTakeProfit => "Entry 1 → Take Profit",
            Self::Entry2ToEntry1 => "Entry 2 → Entry 1",
            Self::Entry2ToLevel1 => "Entry 2 → Level 1",
            Self::Entry2ToTakeProfit => "Entry 2 → Take Profit",
            Self::Entry3ToEntry2 => "Entry 3 → Entry 2",
            Self::Entry3ToEntry1 => "Entry 3 → Entry 1",
            Self::Entry3ToLevel1 => "Entry 3 → Level 1",
            Self::Entry3ToTakeProfit => "Entry 3 → Take Profit",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profit / max-loss ratio per transition.
///
/// Either all nine transitions are present or none is (when the maximum loss
/// is zero).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskRewards(BTreeMap<Transition, Decimal>);

impl RiskRewards {
    /// Ratio threshold at or above which a transition pays at least what it risks.
    pub const FAVORABLE_THRESHOLD: Decimal = Decimal::ONE;

    /// Divide each profit by `max_loss`.
    ///
    /// Returns the empty mapping when `max_loss` is zero, or when any division
    /// overflows.
    pub fn from_profits<F>(max_loss: Decimal, profit: F) -> Self
    where
        F: Fn(Transition) -> Decimal,
    {
        if max_loss.is_zero() {
            return Self::default();
        }

        Transition::ALL
            .into_iter()
            .map(|t| profit(t).checked_div(max_loss).map(|ratio| (t, ratio)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map_or_else(Self::default, Self)
    }

    /// Ratio for one transition.
    #[must_use]
    pub fn get(&self, transition: Transition) -> Option<Decimal> {
        self.0.get(&transition).copied()
    }

    /// Number of ratios (0 or 9).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no ratio was computed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Transition, Decimal)> + '_ {
        self.0.iter().map(|(t, r)| (*t, *r))
    }

    /// Transitions whose ratio is at least 1:1.
    pub fn favorable(&self) -> impl Iterator<Item = Transition> + '_ {
        self.iter()
            .filter(|(_, ratio)| *ratio >= Self::FAVORABLE_THRESHOLD)
            .map(|(t, _)| t)
    }
}
