//! Calculator screen state and its reducer.
//!
//! [`TipCalculatorState`] owns the raw inputs of the tip screen and the
//! derived monetary values. Every mutation goes through one of its methods,
//! and each of them recomputes the derived values before returning, so a
//! [`TipSnapshot`] taken at any point is consistent with the inputs.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::common::format_currency;
use crate::calculations::{TipCalculation, TipInput, TipOverflow, TipResult};
use crate::entry::EntryBuffer;
use crate::models::{CalculatorSettings, CountryTable, KeypadAction, Rounding};

static PERCENT_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]*\.?[0-9]*$").expect("percent pattern is valid")
});

static PEOPLE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("people pattern is valid"));

/// Errors surfaced by [`TipCalculatorState`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TipStateError {
    /// The requested country is not in the country table.
    #[error("unknown country '{0}'")]
    UnknownCountry(String),

    /// The change would make a derived amount too large to hold.
    #[error(transparent)]
    Overflow(#[from] TipOverflow),
}

/// Reads a percentage field that passed [`PERCENT_TEXT`]. Blank or a lone
/// point counts as zero; `None` when the number does not fit in a
/// [`Decimal`].
fn percent_value(text: &str) -> Option<Decimal> {
    let trimmed = text.strip_suffix('.').unwrap_or(text);
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    let normalized = if trimmed.starts_with('.') {
        format!("0{trimmed}")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// State of one tip calculator session.
#[derive(Debug, Clone)]
pub struct TipCalculatorState {
    settings: CalculatorSettings,
    countries: CountryTable,

    bill_amount: EntryBuffer,
    tip_percent: String,
    sales_tax: String,
    num_of_people: u32,
    bill_rounding: Rounding,
    tip_rounding: Rounding,
    tax_on_tip: bool,
    selected_country: Option<String>,

    derived: TipResult,
}

impl TipCalculatorState {
    /// Creates a session with default inputs and the given country table.
    pub fn new(
        settings: CalculatorSettings,
        countries: CountryTable,
    ) -> Self {
        let mut state = Self {
            bill_amount: EntryBuffer::new(settings.max_entry_digits),
            tip_percent: settings.default_tip_percent.normalize().to_string(),
            sales_tax: "0".to_string(),
            num_of_people: 1,
            bill_rounding: Rounding::Exact,
            tip_rounding: Rounding::Exact,
            tax_on_tip: false,
            selected_country: None,
            derived: TipResult::default(),
            settings,
            countries,
        };
        if let Some(derived) = state.calculate(&state.tip_input(), "settings") {
            state.derived = derived;
        }
        state
    }

    /// Pre-selects the country matching the system time zone, if any.
    ///
    /// Only the selection changes; the tip percentage stays at its default
    /// until a country is explicitly selected.
    pub fn select_default_country(
        &mut self,
        system_time_zone: Option<&str>,
    ) {
        self.selected_country = system_time_zone
            .and_then(|tz| self.countries.find_by_time_zone(tz))
            .map(|country| country.name.clone());
        debug!(selected = ?self.selected_country, "default country");
    }

    // ─── keypad ─────────────────────────────────────────────────────────

    /// Applies a keypad action and recomputes the derived values.
    ///
    /// An action whose amount would be too large to calculate with is
    /// dropped and the state is left as it was.
    pub fn dispatch(
        &mut self,
        action: KeypadAction,
    ) {
        let mut entry = self.bill_amount.clone();
        let mut people = self.num_of_people;
        let changed = match action {
            KeypadAction::Digit(n) => entry.push_digit(n),
            KeypadAction::Decimal => entry.push_decimal_point(),
            KeypadAction::Delete => entry.pop(),
            KeypadAction::Clear => {
                entry.clear();
                people = 1;
                true
            }
            KeypadAction::Confirm => match entry.commit() {
                Some(value) => {
                    info!(bill = %value, "bill amount confirmed");
                    true
                }
                None => {
                    debug!("nothing to confirm");
                    false
                }
            },
        };

        let input = TipInput {
            bill_amount: entry.value(),
            num_of_people: people,
            ..self.tip_input()
        };
        if let Some(derived) = self.calculate(&input, action.as_str()) {
            self.bill_amount = entry;
            self.num_of_people = people;
            self.derived = derived;
        }
        debug!(action = action.as_str(), changed, raw = self.bill_amount.raw(), "keypad");
    }

    // ─── direct field entry ─────────────────────────────────────────────

    /// Overwrites the tip percentage. Rejects anything but digits with at
    /// most one decimal point, and numbers too large to calculate with,
    /// returning `false` and keeping the old value.
    pub fn set_tip_percent(
        &mut self,
        text: &str,
    ) -> bool {
        let Some(tip_percent) = Self::percent_field(text, "tip percentage") else {
            return false;
        };
        let input = TipInput {
            tip_percent,
            ..self.tip_input()
        };
        self.apply(&input, "tip percentage", |state| {
            state.tip_percent = text.to_string();
        })
    }

    /// Overwrites the sales tax percentage. Same validation as
    /// [`Self::set_tip_percent`].
    pub fn set_sales_tax(
        &mut self,
        text: &str,
    ) -> bool {
        let Some(sales_tax) = Self::percent_field(text, "sales tax") else {
            return false;
        };
        let input = TipInput {
            sales_tax,
            ..self.tip_input()
        };
        self.apply(&input, "sales tax", |state| {
            state.sales_tax = text.to_string();
        })
    }

    /// Overwrites the people count. Digits only; blank and `0` become 1.
    pub fn set_num_of_people(
        &mut self,
        text: &str,
    ) -> bool {
        if !PEOPLE_TEXT.is_match(text) {
            warn!(input = text, "rejected people count");
            return false;
        }
        let count = if text.is_empty() {
            1
        } else {
            match text.parse::<u32>() {
                Ok(n) => n.max(1),
                Err(e) => {
                    warn!(input = text, "people count out of range: {}", e);
                    return false;
                }
            }
        };
        let input = TipInput {
            num_of_people: count,
            ..self.tip_input()
        };
        self.apply(&input, "people count", |state| {
            state.num_of_people = count;
        })
    }

    /// Rounding applied to the total tip (the "round bill" toggles).
    pub fn set_bill_rounding(
        &mut self,
        rounding: Rounding,
    ) -> bool {
        let input = TipInput {
            bill_rounding: rounding,
            ..self.tip_input()
        };
        self.apply(&input, rounding.as_str(), |state| {
            state.bill_rounding = rounding;
        })
    }

    /// Rounding applied to each person's tip share.
    pub fn set_tip_rounding(
        &mut self,
        rounding: Rounding,
    ) -> bool {
        let input = TipInput {
            tip_rounding: rounding,
            ..self.tip_input()
        };
        self.apply(&input, rounding.as_str(), |state| {
            state.tip_rounding = rounding;
        })
    }

    /// Returns `false` when the taxed bill would be too large, which can
    /// happen with a huge sales tax typed while the switch was off.
    pub fn set_tax_on_tip(
        &mut self,
        tax_on_tip: bool,
    ) -> bool {
        let input = TipInput {
            tax_on_tip,
            ..self.tip_input()
        };
        self.apply(&input, "tax on tip", |state| {
            state.tax_on_tip = tax_on_tip;
        })
    }

    // ─── country ────────────────────────────────────────────────────────

    /// Selects a country and adopts its customary tip percentage.
    ///
    /// # Errors
    ///
    /// [`TipStateError::UnknownCountry`] when `name` is not in the table and
    /// [`TipStateError::Overflow`] when its tip cannot be applied to the
    /// current bill; the state is left as it was.
    pub fn select_country(
        &mut self,
        name: &str,
    ) -> Result<(), TipStateError> {
        let country = self.countries.find(name).ok_or_else(|| {
            warn!(country = name, "unknown country");
            TipStateError::UnknownCountry(name.to_string())
        })?;
        let tip_percent = country.tip_percentage;
        let country_name = country.name.clone();

        let input = TipInput {
            tip_percent,
            ..self.tip_input()
        };
        let derived = TipCalculation::calculate(&input)?;

        self.tip_percent = tip_percent.normalize().to_string();
        self.selected_country = Some(country_name);
        self.derived = derived;
        info!(
            country = name,
            tip_percent = %self.tip_percent,
            "country selected"
        );
        Ok(())
    }

    pub fn countries(&self) -> &CountryTable {
        &self.countries
    }

    // ─── reads ──────────────────────────────────────────────────────────

    pub fn bill_amount(&self) -> Decimal {
        self.bill_amount.value()
    }

    pub fn entry(&self) -> &EntryBuffer {
        &self.bill_amount
    }

    pub fn tip_percent(&self) -> &str {
        &self.tip_percent
    }

    pub fn sales_tax(&self) -> &str {
        &self.sales_tax
    }

    pub fn num_of_people(&self) -> u32 {
        self.num_of_people
    }

    pub fn bill_rounding(&self) -> Rounding {
        self.bill_rounding
    }

    pub fn tip_rounding(&self) -> Rounding {
        self.tip_rounding
    }

    pub fn round_up_bill(&self) -> bool {
        self.bill_rounding.is_up()
    }

    pub fn round_down_bill(&self) -> bool {
        self.bill_rounding.is_down()
    }

    pub fn round_up_tip(&self) -> bool {
        self.tip_rounding.is_up()
    }

    pub fn round_down_tip(&self) -> bool {
        self.tip_rounding.is_down()
    }

    pub fn tax_on_tip(&self) -> bool {
        self.tax_on_tip
    }

    pub fn selected_country(&self) -> Option<&str> {
        self.selected_country.as_deref()
    }

    /// Derived values from the last mutation.
    pub fn derived(&self) -> &TipResult {
        &self.derived
    }

    /// Display view of the whole screen.
    pub fn snapshot(&self) -> TipSnapshot {
        let symbol = self.settings.currency_symbol.as_str();
        TipSnapshot {
            bill_amount: format_currency(self.bill_amount(), symbol),
            entry: self.bill_amount.raw().to_string(),
            tip_percent: self.tip_percent.clone(),
            sales_tax: self.sales_tax.clone(),
            num_of_people: self.num_of_people,
            round_up_bill: self.round_up_bill(),
            round_down_bill: self.round_down_bill(),
            round_up_tip: self.round_up_tip(),
            round_down_tip: self.round_down_tip(),
            tax_on_tip: self.tax_on_tip,
            total_tip: format_currency(self.derived.total_tip, symbol),
            tip_per_person: format_currency(self.derived.tip_per_person, symbol),
            total_per_person: format_currency(self.derived.total_per_person, symbol),
            total_bill_amount: format_currency(self.derived.total_bill_amount, symbol),
            selected_country: self.selected_country.clone(),
        }
    }

    fn percent_field(
        text: &str,
        field: &'static str,
    ) -> Option<Decimal> {
        if !PERCENT_TEXT.is_match(text) {
            warn!(input = text, "rejected {field}");
            return None;
        }
        let value = percent_value(text);
        if value.is_none() {
            warn!(input = text, "{field} does not fit in a decimal");
        }
        value
    }

    fn tip_input(&self) -> TipInput {
        TipInput {
            bill_amount: self.bill_amount.value(),
            tip_percent: percent_value(&self.tip_percent).unwrap_or_default(),
            sales_tax: percent_value(&self.sales_tax).unwrap_or_default(),
            num_of_people: self.num_of_people,
            bill_rounding: self.bill_rounding,
            tip_rounding: self.tip_rounding,
            tax_on_tip: self.tax_on_tip,
        }
    }

    fn calculate(
        &self,
        input: &TipInput,
        change: &str,
    ) -> Option<TipResult> {
        TipCalculation::calculate(input)
            .map_err(|error| warn!(change, %error, "change rejected"))
            .ok()
    }

    /// Commits `update` with the derived values of `input`, or leaves the
    /// state alone when they cannot be calculated.
    fn apply(
        &mut self,
        input: &TipInput,
        change: &str,
        update: impl FnOnce(&mut Self),
    ) -> bool {
        let Some(derived) = self.calculate(input, change) else {
            return false;
        };
        update(self);
        self.derived = derived;
        true
    }
}

/// Read-only display values handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TipSnapshot {
    pub bill_amount: String,
    pub entry: String,
    pub tip_percent: String,
    pub sales_tax: String,
    pub num_of_people: u32,
    pub round_up_bill: bool,
    pub round_down_bill: bool,
    pub round_up_tip: bool,
    pub round_down_tip: bool,
    pub tax_on_tip: bool,
    pub total_tip: String,
    pub tip_per_person: String,
    pub total_per_person: String,
    pub total_bill_amount: String,
    pub selected_country: Option<String>,
}

impl fmt::Display for TipSnapshot {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let flag = |on: bool| if on { "x" } else { " " };

        writeln!(f, "Bill amount      {:>14}", self.bill_amount)?;
        writeln!(f, "Tip              {:>13}%", self.tip_percent)?;
        writeln!(f, "Sales tax        {:>13}%", self.sales_tax)?;
        writeln!(f, "People           {:>14}", self.num_of_people)?;
        writeln!(
            f,
            "Country          {:>14}",
            self.selected_country.as_deref().unwrap_or("-")
        )?;
        writeln!(
            f,
            "Round bill  [{}] up [{}] down   Round tip [{}] up [{}] down   Tax on tip [{}]",
            flag(self.round_up_bill),
            flag(self.round_down_bill),
            flag(self.round_up_tip),
            flag(self.round_down_tip),
            flag(self.tax_on_tip),
        )?;
        writeln!(f, "Total tip        {:>14}", self.total_tip)?;
        writeln!(f, "Tip per person   {:>14}", self.tip_per_person)?;
        writeln!(f, "Total per person {:>14}", self.total_per_person)?;
        write!(f, "Total bill       {:>14}", self.total_bill_amount)
    }
}
