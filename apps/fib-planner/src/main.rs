//! Fib Planner Binary
//!
//! Sizes a short position scaled in over three Fibonacci retracement entries.
//!
//! # Usage
//!
//! ```bash
//! fib-planner plan --account-size 10000 --risk-percent 2 --entry-price 158.27 \
//!     --stop-loss 162.51 --level1-price 155.84 --tp-price 154.12
//! fib-planner plan --format json --advanced
//! fib-planner interactive
//! fib-planner defaults
//! ```
//!
//! # Environment Variables
//!
//! - `FIB_PLANNER_CONFIG`: Path to the YAML config (default: `fib-planner.yaml` if present)
//! - `RUST_LOG`: Log filter (default: configured level, else warn)

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use fib_planner::config::{Config, OutputFormat, load_config};
use fib_planner::error::EXIT_INVALID_INPUTS;
use fib_planner::plan::{InputField, TradeInputs, evaluate};
use fib_planner::report::render;
use fib_planner::session::Session;
use fib_planner::telemetry::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "fib-planner", version, about = "Fibonacci retracement position-size planner for short entries")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "FIB_PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level, overriding the configured one
    #[arg(
        long,
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error", "off"]
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one set of inputs and print the report
    Plan(PlanArgs),
    /// Edit inputs line by line and re-evaluate after each change
    Interactive {
        /// Start with trading notes shown
        #[arg(long)]
        advanced: bool,
    },
    /// Print the configured default inputs as JSON
    Defaults,
}

/// `--format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Field values are free text; unparseable text counts as 0.
#[derive(Debug, Args)]
struct PlanArgs {
    /// Account size in dollars
    #[arg(long, allow_hyphen_values = true)]
    account_size: Option<String>,
    /// Percent of the account to risk
    #[arg(long, allow_hyphen_values = true)]
    risk_percent: Option<String>,
    /// Entry 1 price
    #[arg(long, allow_hyphen_values = true)]
    entry_price: Option<String>,
    /// Stop loss price (above entry for shorts)
    #[arg(long, allow_hyphen_values = true)]
    stop_loss: Option<String>,
    /// First profit target
    #[arg(long, allow_hyphen_values = true)]
    level1_price: Option<String>,
    /// Final take-profit target
    #[arg(long, allow_hyphen_values = true)]
    tp_price: Option<String>,
    /// Report format, overriding the configured one
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Include trading notes
    #[arg(long)]
    advanced: bool,
}

impl PlanArgs {
    fn overrides(&self) -> [(InputField, Option<&str>); 6] {
        [
            (InputField::AccountSize, self.account_size.as_deref()),
            (InputField::RiskPercent, self.risk_percent.as_deref()),
            (InputField::EntryPrice, self.entry_price.as_deref()),
            (InputField::StopLoss, self.stop_loss.as_deref()),
            (InputField::Level1Price, self.level1_price.as_deref()),
            (InputField::TpPrice, self.tp_price.as_deref()),
        ]
    }

    fn apply_to(&self, defaults: TradeInputs) -> TradeInputs {
        self.overrides()
            .into_iter()
            .fold(defaults, |inputs, (field, text)| match text {
                Some(text) => inputs.with_field(field, text),
                None => inputs,
            })
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(level) = cli.log_level {
        config.observability.logging.level = level;
    }
    init_tracing(&config.observability.logging);

    match cli.command {
        Command::Plan(args) => run_plan(config, &args),
        Command::Interactive { advanced } => run_interactive(config, advanced),
        Command::Defaults => {
            println!("{}", serde_json::to_string_pretty(&config.defaults)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_plan(mut config: Config, args: &PlanArgs) -> anyhow::Result<ExitCode> {
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    config.output.advanced |= args.advanced;

    let inputs = args.apply_to(config.defaults);
    let evaluation = evaluate(&inputs);
    tracing::info!(
        valid = evaluation.is_valid(),
        errors = evaluation.errors.len(),
        "plan evaluated"
    );

    let report = render(&evaluation, &config.output)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{report}")?;

    if evaluation.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INVALID_INPUTS))
    }
}

fn run_interactive(mut config: Config, advanced: bool) -> anyhow::Result<ExitCode> {
    config.output.advanced |= advanced;
    let mut session = Session::new(config.defaults, config.output);

    tracing::info!("interactive session started");
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    if let Err(err) = session.run(stdin, &mut stdout) {
        tracing::error!(error = %err, "interactive session failed");
        return Ok(ExitCode::from(&err));
    }
    Ok(ExitCode::SUCCESS)
}
