use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fewest digits the entry buffer may be capped at.
pub const MIN_ENTRY_DIGITS: usize = 8;

/// Most digits the entry buffer may be capped at.
pub const MAX_ENTRY_DIGITS: usize = 10;

/// Startup settings for a calculator session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Prefix used when formatting money, e.g. `$`.
    pub currency_symbol: String,

    /// Tip percentage used until a country is selected.
    pub default_tip_percent: Decimal,

    /// Digit ceiling for the bill entry buffer, clamped to
    /// [`MIN_ENTRY_DIGITS`]..=[`MAX_ENTRY_DIGITS`].
    pub max_entry_digits: usize,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            default_tip_percent: Decimal::from(15),
            max_entry_digits: MAX_ENTRY_DIGITS,
        }
    }
}
