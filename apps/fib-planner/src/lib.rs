// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Fib Planner - Rust Core Library
//!
//! Position sizing for short trades scaled in over three Fibonacci
//! retracement entries. Entry 1 sits at the entry price; entries 2 and 3 sit
//! 38.2% and 61.8% of the way from the entry toward the stop loss. Quantities
//! follow 1:3:5 weights sized so that a stop-out with every entry filled loses
//! exactly the risk budget.
//!
//! # Modules
//!
//! - `plan`: inputs, validation, derivation, risk/reward and trading notes
//! - `format`: currency and number rendering
//! - `report`: text and JSON reports of an evaluation
//! - `session`: line-oriented interactive editing
//! - `config`: YAML configuration with env interpolation
//! - `telemetry`: tracing subscriber setup
//! - `error`: errors and exit codes for the binary
//!
//! Everything under `plan` is pure: the same inputs always produce the same
//! evaluation, and invalid inputs never produce partial results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Modules
// =============================================================================

/// Configuration loading.
pub mod config;

/// Errors and exit codes.
pub mod error;

/// Display formatting.
pub mod format;

/// Plan derivation.
pub mod plan;

/// Report rendering.
pub mod report;

/// Interactive session.
pub mod session;

/// Tracing setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{Config, ConfigError, load_config};
pub use error::{PlannerError, Result};
pub use plan::{
    DerivedPlan, InputField, PlanEvaluation, TradeInputs, TradingNotes, ValidationErrors,
    compute, evaluate, validate,
};
