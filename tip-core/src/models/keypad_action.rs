use serde::{Deserialize, Serialize};

/// A key press on the numeric keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeypadAction {
    /// A digit key, `0..=9`.
    Digit(u8),
    Decimal,
    Delete,
    Clear,
    /// The "done" key.
    Confirm,
}

impl KeypadAction {
    /// Returns a digit action, or `None` when `n` is not a single digit.
    pub fn digit(n: u8) -> Option<Self> {
        (n <= 9).then_some(Self::Digit(n))
    }

    /// Maps a keypad label to its action.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "." => Some(Self::Decimal),
            "del" | "delete" | "backspace" => Some(Self::Delete),
            "c" | "clear" => Some(Self::Clear),
            "done" | "ok" | "=" => Some(Self::Confirm),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => ch
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .and_then(Self::digit),
                    _ => None,
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digit(_) => "digit",
            Self::Decimal => ".",
            Self::Delete => "del",
            Self::Clear => "clear",
            Self::Confirm => "done",
        }
    }
}
