mod country;
mod keypad_action;
mod rounding;
mod settings;

pub use country::{Country, CountryTable};
pub use keypad_action::KeypadAction;
pub use rounding::Rounding;
pub use settings::{CalculatorSettings, MAX_ENTRY_DIGITS, MIN_ENTRY_DIGITS};
