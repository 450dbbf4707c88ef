//! Report rendering for a [`PlanEvaluation`].

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::format::{format_currency, format_number, format_percent, format_ratio};
use crate::plan::{InputField, PlanEvaluation, RiskRewards, Transition, TradingNotes};

const TITLE: &str = "Fibonacci Retracement Position Size Calculator";
const LABEL_WIDTH: usize = 28;

/// Render an evaluation in the configured format.
pub fn render(evaluation: &PlanEvaluation, output: &OutputConfig) -> Result<String> {
    match output.format {
        OutputFormat::Text => Ok(TextReport::new(evaluation, output).to_string()),
        OutputFormat::Json => {
            let report = JsonReport {
                evaluation,
                notes: notes_for(evaluation, output),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
    }
}

fn notes_for(evaluation: &PlanEvaluation, output: &OutputConfig) -> Option<TradingNotes> {
    if output.advanced {
        TradingNotes::from_plan(&evaluation.inputs, &evaluation.plan)
    } else {
        None
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    evaluation: &'a PlanEvaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<TradingNotes>,
}

// ============================================================================
// Text Report
// ============================================================================

/// Human-readable report, sectioned like the calculator page.
pub struct TextReport<'a> {
    evaluation: &'a PlanEvaluation,
    decimals: u32,
    notes: Option<TradingNotes>,
}

impl<'a> TextReport<'a> {
    /// Build a report for `evaluation` using the output settings.
    #[must_use]
    pub fn new(evaluation: &'a PlanEvaluation, output: &OutputConfig) -> Self {
        Self {
            evaluation,
            decimals: output.decimals,
            notes: notes_for(evaluation, output),
        }
    }

    fn price(&self, value: Decimal) -> String {
        format!("${}", format_number(value, self.decimals))
    }

    fn write_inputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inputs")?;
        for field in InputField::ALL {
            let value = self.evaluation.inputs.get(field);
            let marker = if self.evaluation.errors.contains(field) { "  !" } else { "" };
            writeln!(f, "  {:<LABEL_WIDTH$}{}{marker}", field.label(), value.normalize())?;
        }
        Ok(())
    }

    fn write_errors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Please fix the following errors:")?;
        for message in self.evaluation.errors.messages() {
            writeln!(f, "  • {message}")?;
        }
        Ok(())
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.evaluation.plan;
        writeln!(f, "Risk & Entry Details")?;
        row(f, "Risk Dollars:", &format_currency(plan.risk_dollars))?;
        row(f, "Weighted Entry Price:", &self.price(plan.weighted_entry))?;
        row(f, "Distance to Stop Loss:", &self.price(plan.distance_to_stop))?;
        row(f, "Total Units:", &format_number(plan.total_units, self.decimals))?;
        row(f, "Total Investment:", &format_currency(plan.total_entry_dollars))
    }

    fn write_entries(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 3] = [
            "Entry 1 (Initial Entry)",
            "Entry 2 (38.2% Retracement)",
            "Entry 3 (61.8% Retracement)",
        ];

        writeln!(f, "Entry Levels")?;
        for (name, entry) in NAMES.iter().zip(self.evaluation.plan.entries()) {
            let detail = format!(
                "{}  Qty: {} • {}",
                self.price(entry.price),
                format_number(entry.quantity, self.decimals),
                format_currency(entry.dollars)
            );
            row(f, name, &detail)?;
        }
        Ok(())
    }

    fn write_losses(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let losses = &self.evaluation.plan.losses;
        writeln!(f, "Loss Scenarios")?;
        row(f, "If only Entry 1 fills:", &format_currency(losses.entry1.abs()))?;
        row(f, "If Entry 1 & 2 fill:", &format_currency(losses.entry2.abs()))?;
        row(f, "Max Loss (all entries):", &format_currency(losses.entry3.abs()))
    }

    fn write_profits(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profits = &self.evaluation.plan.profits;
        writeln!(f, "Profit Scenarios")?;
        for t in Transition::ALL {
            row(f, &format!("{t}:"), &format_currency(profits.get(t)))?;
        }
        Ok(())
    }

    fn write_ratios(f: &mut fmt::Formatter<'_>, ratios: &RiskRewards) -> fmt::Result {
        let favorable: Vec<Transition> = ratios.favorable().collect();
        writeln!(f, "Risk/Reward Ratios")?;
        for (t, ratio) in ratios.iter() {
            let marker = if favorable.contains(&t) { " *" } else { "" };
            row(f, &format!("{t}:"), &format!("{}{marker}", format_ratio(ratio)))?;
        }
        writeln!(f, "  (* pays at least what it risks)")
    }

    fn write_notes(f: &mut fmt::Formatter<'_>, notes: &TradingNotes) -> fmt::Result {
        writeln!(f, "Trading Notes")?;
        writeln!(f, "  Position Sizing Strategy:")?;
        for (i, pct) in notes.entry_allocation_pct.iter().enumerate() {
            writeln!(f, "    • Entry {}: {} of total position", i + 1, format_percent(*pct))?;
        }
        writeln!(f, "  Risk Management:")?;
        writeln!(
            f,
            "    • Total capital at risk: {}",
            format_percent(notes.capital_at_risk_pct)
        )?;
        writeln!(
            f,
            "    • Capital deployment: {}",
            format_percent(notes.capital_deployment_pct)
        )?;
        writeln!(f, "    • Leverage ratio: {}", format_ratio(notes.leverage_ratio))
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f)?;
        self.write_inputs(f)?;
        writeln!(f)?;

        if !self.evaluation.errors.is_empty() {
            return self.write_errors(f);
        }
        if !self.evaluation.is_valid() {
            return writeln!(f, "Plan could not be computed for these inputs.");
        }

        self.write_details(f)?;
        writeln!(f)?;
        self.write_entries(f)?;
        writeln!(f)?;
        self.write_losses(f)?;
        writeln!(f)?;
        self.write_profits(f)?;

        let ratios = &self.evaluation.plan.risk_rewards;
        if !ratios.is_empty() {
            writeln!(f)?;
            Self::write_ratios(f, ratios)?;
        }

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            Self::write_notes(f, notes)?;
        }
        Ok(())
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    writeln!(f, "  {label:<LABEL_WIDTH$}{value}")
}
