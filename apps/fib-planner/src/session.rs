//! Line-oriented interactive session.
//!
//! Each line is one command. Every change to the inputs re-evaluates the plan
//! and prints the full report, the way the calculator page updates as fields
//! are edited.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::config::OutputConfig;
use crate::error::{PlannerError, Result};
use crate::plan::{InputField, TradeInputs, evaluate};
use crate::report::render;

const PROMPT: &str = "> ";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace one field with free text.
    Set(InputField, String),
    /// Restore the default record.
    Reset,
    /// Print the current report.
    Show,
    /// Toggle trading notes.
    Advanced,
    /// List commands and fields.
    Help,
    /// End the session.
    Quit,
}

impl FromStr for Command {
    type Err = PlannerError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "set" => {
                let rest = rest.trim_start();
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Set(field.parse()?, value.trim().to_string()))
            }
            "reset" => Ok(Self::Reset),
            "show" => Ok(Self::Show),
            "advanced" => Ok(Self::Advanced),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(PlannerError::UnknownCommand(word.to_string())),
        }
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print this text and keep reading.
    Print(String),
    /// Stop reading.
    Quit,
}

/// Mutable session state.
#[derive(Debug, Clone)]
pub struct Session {
    defaults: TradeInputs,
    inputs: TradeInputs,
    output: OutputConfig,
}

impl Session {
    /// Start a session from the configured defaults.
    #[must_use]
    pub const fn new(defaults: TradeInputs, output: OutputConfig) -> Self {
        Self {
            defaults,
            inputs: defaults,
            output,
        }
    }

    /// Current inputs.
    #[must_use]
    pub const fn inputs(&self) -> &TradeInputs {
        &self.inputs
    }

    /// Whether trading notes are shown.
    #[must_use]
    pub const fn advanced(&self) -> bool {
        self.output.advanced
    }

    /// Render the current report.
    pub fn report(&self) -> Result<String> {
        render(&evaluate(&self.inputs), &self.output)
    }

    /// Apply one command.
    pub fn apply(&mut self, command: Command) -> Result<Step> {
        match command {
            Command::Set(field, text) => {
                self.inputs = self.inputs.with_field(field, &text);
                tracing::debug!(%field, value = %self.inputs.get(field), "field updated");
                self.report().map(Step::Print)
            }
            Command::Reset => {
                self.inputs = self.defaults;
                tracing::debug!("inputs reset");
                self.report().map(Step::Print)
            }
            Command::Show => self.report().map(Step::Print),
            Command::Advanced => {
                self.output.advanced = !self.output.advanced;
                self.report().map(Step::Print)
            }
            Command::Help => Ok(Step::Print(help_text())),
            Command::Quit => Ok(Step::Quit),
        }
    }

    /// Read commands from `input` until EOF or `quit`, writing to `out`.
    ///
    /// Unknown commands and fields are reported and the session continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.report()?)?;
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                write!(out, "{PROMPT}")?;
                out.flush()?;
                continue;
            }

            match line.parse::<Command>().and_then(|command| self.apply(command)) {
                Ok(Step::Print(text)) => writeln!(out, "{text}")?,
                Ok(Step::Quit) => return Ok(()),
                Err(err) if err.is_recoverable() => writeln!(out, "error: {err}")?,
                Err(err) => return Err(err),
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }
}

fn help_text() -> String {
    let mut text = String::from(
        "Commands:\n  set <field> <value>   change a field\n  reset                 restore defaults\n  show                  print the report\n  advanced              toggle trading notes\n  help                  this list\n  quit                  leave\n\nFields:\n",
    );
    for field in InputField::ALL {
        text.push_str(&format!("  {:<14}{}\n", field.name(), field.hint()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn session() -> Session {
        Session::new(TradeInputs::default(), OutputConfig::default())
    }

    #[test_case("show", Command::Show ; "show")]
    #[test_case("  RESET ", Command::Reset ; "reset uppercase")]
    #[test_case("advanced", Command::Advanced ; "advanced")]
    #[test_case("?", Command::Help ; "help alias")]
    #[test_case("exit", Command::Quit ; "quit alias")]
    #[test_case("set entry 150.5", Command::Set(InputField::EntryPrice, "150.5".into()) ; "set alias")]
    #[test_case("set stop-loss", Command::Set(InputField::StopLoss, String::new()) ; "set without value")]
    fn test_parse_command(line: &str, expected: Command) {
        assert_eq!(line.parse::<Command>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "launch".parse::<Command>(),
            Err(PlannerError::UnknownCommand(word)) if word == "launch"
        ));
        assert!(matches!(
            "set nothing 1".parse::<Command>(),
            Err(PlannerError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_then_reset() {
        let mut session = session();
        let step = session
            .apply(Command::Set(InputField::AccountSize, "abc".into()))
            .unwrap();
        assert_eq!(session.inputs().account_size, dec!(0));
        let Step::Print(report) = step else {
            panic!("expected report");
        };
        assert!(report.contains("Account size must be greater than 0"));

        session.apply(Command::Reset).unwrap();
        assert_eq!(session.inputs(), &TradeInputs::default());
    }

    #[test]
    fn test_advanced_toggles() {
        let mut session = session();
        assert!(!session.advanced());
        let Step::Print(report) = session.apply(Command::Advanced).unwrap() else {
            panic!("expected report");
        };
        assert!(session.advanced());
        assert!(report.contains("Trading Notes"));
    }

    #[test]
    fn test_run_script() {
        let script = "set risk 1\nbogus\n\nset tp 150\nquit\nset risk 50\n";
        let mut out = Vec::new();
        let mut session = session();
        session.run(script.as_bytes(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("error: unknown command 'bogus'"));
        assert_eq!(session.inputs().risk_percent, dec!(1));
        assert_eq!(session.inputs().tp_price, dec!(150));
        assert!(out.contains("$100.00"));
    }

    #[test]
    fn test_help_lists_fields() {
        let text = help_text();
        for field in InputField::ALL {
            assert!(text.contains(field.name()));
        }
    }
}
