//! Line-oriented calculator session.
//!
//! Each input line is one [`Command`]. A line made only of keypad labels
//! (`4 8 0 0`, `1 2 . 5`, `del`) presses those keys in order; every other
//! line starts with a command word. After each command the session prints
//! the screen, as text or JSON.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;
use tip_core::{KeypadAction, Rounding, TipCalculatorState, TipSnapshot};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::utils::{normalize_field_input, opt_display, parse_toggle};

pub const HELP: &str = "\
keys:     0-9  .  del  clear  done     (several per line: 4 8 0 0)
fields:   tip <pct>   tax <pct>   people <n>
rounding: round-bill up|down|off   round-tip up|down|off   tax-on-tip on|off
country:  country <name>   search <text>
other:    show   help   quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid value '{value}' for '{command}'")]
    InvalidValue {
        command: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Keys(Vec<KeypadAction>),
    TipPercent(String),
    SalesTax(String),
    People(String),
    RoundBill(Rounding),
    RoundTip(Rounding),
    TaxOnTip(bool),
    Country(String),
    Search(String),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        if word.is_empty() {
            return Err(CommandError::Empty);
        }

        if KeypadAction::parse(word).is_some() {
            return line
                .split_whitespace()
                .map(|token| {
                    KeypadAction::parse(token)
                        .ok_or_else(|| CommandError::Unknown(token.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Command::Keys);
        }

        let require = |command: &'static str, expected: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument { command, expected })
            } else {
                Ok(rest)
            }
        };
        let rounding = |command: &'static str| -> Result<Rounding, CommandError> {
            let value = require(command, "up, down or off")?;
            Rounding::parse(value).ok_or_else(|| CommandError::InvalidValue {
                command,
                value: value.to_string(),
            })
        };

        match word.to_ascii_lowercase().as_str() {
            "tip" => Ok(Command::TipPercent(normalize_field_input(rest))),
            "tax" => Ok(Command::SalesTax(normalize_field_input(rest))),
            "people" => Ok(Command::People(normalize_field_input(rest))),
            "round-bill" => rounding("round-bill").map(Command::RoundBill),
            "round-tip" => rounding("round-tip").map(Command::RoundTip),
            "tax-on-tip" => {
                let value = require("tax-on-tip", "on or off")?;
                parse_toggle(value)
                    .map(Command::TaxOnTip)
                    .ok_or_else(|| CommandError::InvalidValue {
                        command: "tax-on-tip",
                        value: value.to_string(),
                    })
            }
            "country" => {
                require("country", "a country name").map(|name| Command::Country(name.to_string()))
            }
            "search" => Ok(Command::Search(rest.to_string())),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// What the session wants shown after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Screen(TipSnapshot),
    Rejected(String),
    Countries(Vec<String>),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A calculator session plus the pending result of country detection.
pub struct Session {
    state: TipCalculatorState,
    detection: Option<oneshot::Receiver<Option<String>>>,
    user_selected_country: bool,
}

impl Session {
    pub fn new(state: TipCalculatorState) -> Self {
        Self {
            state,
            detection: None,
            user_selected_country: false,
        }
    }

    /// Attaches a pending detection result. It is applied before the first
    /// command that runs after it arrives, unless a country was picked by
    /// hand in the meantime.
    pub fn with_detection(
        mut self,
        detection: oneshot::Receiver<Option<String>>,
    ) -> Self {
        self.detection = Some(detection);
        self
    }

    pub fn state(&self) -> &TipCalculatorState {
        &self.state
    }

    fn poll_detection(&mut self) {
        let Some(receiver) = self.detection.as_mut() else {
            return;
        };
        let detected = match receiver.try_recv() {
            Ok(detected) => detected,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => None,
        };
        self.detection = None;

        match detected {
            Some(name) if !self.user_selected_country => {
                if let Err(error) = self.state.select_country(&name) {
                    warn!(%error, "detected country not applied");
                } else {
                    info!(country = %name, "detected country applied");
                }
            }
            Some(name) => debug!(country = %name, "detected country ignored"),
            None => debug!("no country detected"),
        }
    }

    pub fn execute(
        &mut self,
        command: Command,
    ) -> Reply {
        self.poll_detection();

        let rejected =
            |what: &str, value: &str| Reply::Rejected(format!("{what} '{value}' rejected"));

        match command {
            Command::Keys(actions) => {
                for action in actions {
                    self.state.dispatch(action);
                }
            }
            Command::TipPercent(text) => {
                if !self.state.set_tip_percent(&text) {
                    return rejected("tip percentage", &text);
                }
            }
            Command::SalesTax(text) => {
                if !self.state.set_sales_tax(&text) {
                    return rejected("sales tax", &text);
                }
            }
            Command::People(text) => {
                if !self.state.set_num_of_people(&text) {
                    return rejected("people count", &text);
                }
            }
            Command::RoundBill(rounding) => {
                if !self.state.set_bill_rounding(rounding) {
                    return rejected("bill rounding", rounding.as_str());
                }
            }
            Command::RoundTip(rounding) => {
                if !self.state.set_tip_rounding(rounding) {
                    return rejected("tip rounding", rounding.as_str());
                }
            }
            Command::TaxOnTip(on) => {
                if !self.state.set_tax_on_tip(on) {
                    return rejected("tax on tip", if on { "on" } else { "off" });
                }
            }
            Command::Country(name) => match self.state.select_country(&name) {
                Ok(()) => self.user_selected_country = true,
                Err(error) => return Reply::Rejected(error.to_string()),
            },
            Command::Search(query) => {
                return Reply::Countries(
                    self.state
                        .countries()
                        .search(&query)
                        .into_iter()
                        .map(|c| format!("{} ({}%)", c.name, c.tip_percentage.normalize()))
                        .collect(),
                );
            }
            Command::Show => {}
            Command::Help => return Reply::Help,
            Command::Quit => return Reply::Quit,
        }

        Reply::Screen(self.state.snapshot())
    }
}

fn render<W: Write>(
    out: &mut W,
    reply: &Reply,
    format: OutputFormat,
) -> Result<()> {
    match (reply, format) {
        (Reply::Screen(snapshot), OutputFormat::Text) => {
            writeln!(out, "{snapshot}")?;
            writeln!(out)?;
        }
        (Reply::Screen(snapshot), OutputFormat::Json) => {
            writeln!(out, "{}", serde_json::to_string(snapshot)?)?;
        }
        (Reply::Rejected(message), _) => writeln!(out, "error: {message}")?,
        (Reply::Countries(names), _) if names.is_empty() => {
            writeln!(out, "no matching countries")?
        }
        (Reply::Countries(names), _) => {
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
        (Reply::Help, _) => writeln!(out, "{HELP}")?,
        (Reply::Quit, _) => {}
    }
    Ok(())
}

/// Runs commands from `input` until it ends or `quit` is read.
///
/// Blank lines and lines starting with `#` are skipped. Bad commands print
/// an error line and the session carries on.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Text {
        writeln!(
            out,
            "Country: {}",
            opt_display(session.state().selected_country())
        )?;
        render(out, &Reply::Screen(session.state().snapshot()), format)?;
    }

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reply = match Command::parse(line) {
            Ok(command) => session.execute(command),
            Err(error) => Reply::Rejected(error.to_string()),
        };
        render(out, &reply, format)?;
        if reply == Reply::Quit {
            break;
        }
    }
    out.flush()?;
    Ok(())
}
