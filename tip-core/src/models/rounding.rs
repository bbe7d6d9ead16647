use serde::{Deserialize, Serialize};

/// Rounding policy for a derived monetary value.
///
/// Replaces a pair of mutually exclusive round-up / round-down toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    #[default]
    Exact,
    Up,
    Down,
}

impl Rounding {
    /// Builds a policy from a round-up / round-down toggle pair.
    /// Round-up wins when both are set.
    pub fn from_flags(
        round_up: bool,
        round_down: bool,
    ) -> Self {
        match (round_up, round_down) {
            (true, _) => Self::Up,
            (false, true) => Self::Down,
            (false, false) => Self::Exact,
        }
    }

    pub fn is_up(self) -> bool {
        self == Self::Up
    }

    pub fn is_down(self) -> bool {
        self == Self::Down
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "off",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "exact" | "none" => Some(Self::Exact),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}
