//! Lemonade clicker: pick a lemon, squeeze it a random number of times,
//! drink, start over.

use std::fmt;

use rand::RngExt;
use tracing::debug;

pub const MIN_SQUEEZES: u32 = 2;
pub const MAX_SQUEEZES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemonadeStep {
    Select,
    Squeeze,
    Drink,
    Restart,
}

impl LemonadeStep {
    /// Image resource shown for this step.
    pub fn image(self) -> &'static str {
        match self {
            LemonadeStep::Select => "lemon_tree",
            LemonadeStep::Squeeze => "lemon_squeeze",
            LemonadeStep::Drink => "lemon_drink",
            LemonadeStep::Restart => "lemon_restart",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            LemonadeStep::Select => "Tap the lemon tree to select a lemon",
            LemonadeStep::Squeeze => "Keep tapping the lemon to squeeze it",
            LemonadeStep::Drink => "Tap the lemonade to drink it",
            LemonadeStep::Restart => "Tap the empty glass to start again",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LemonadeStep::Select => "Lemon tree",
            LemonadeStep::Squeeze => "Lemon",
            LemonadeStep::Drink => "Glass of lemonade",
            LemonadeStep::Restart => "Empty glass",
        }
    }
}

impl fmt::Display for LemonadeStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{}] {}", self.image(), self.prompt())
    }
}

/// Uniform draw in `MIN_SQUEEZES..=MAX_SQUEEZES`.
pub fn random_squeezes() -> u32 {
    rand::rng().random_range(MIN_SQUEEZES..=MAX_SQUEEZES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemonade {
    step: LemonadeStep,
    squeezes_left: u32,
}

impl Default for Lemonade {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemonade {
    pub fn new() -> Self {
        Self {
            step: LemonadeStep::Select,
            squeezes_left: 0,
        }
    }

    pub fn step(&self) -> LemonadeStep {
        self.step
    }

    /// Squeezes still needed; zero outside the squeeze step.
    pub fn squeezes_left(&self) -> u32 {
        self.squeezes_left
    }

    pub fn tap(&mut self) -> LemonadeStep {
        self.tap_with(random_squeezes)
    }

    /// Advances one tap. `draw` supplies the squeeze count whenever the
    /// squeeze step is entered; it is clamped to the allowed range.
    pub fn tap_with<F>(
        &mut self,
        mut draw: F,
    ) -> LemonadeStep
    where
        F: FnMut() -> u32,
    {
        self.step = match self.step {
            LemonadeStep::Select => {
                self.squeezes_left = draw().clamp(MIN_SQUEEZES, MAX_SQUEEZES);
                LemonadeStep::Squeeze
            }
            LemonadeStep::Squeeze => {
                self.squeezes_left = self.squeezes_left.saturating_sub(1);
                if self.squeezes_left == 0 {
                    LemonadeStep::Drink
                } else {
                    LemonadeStep::Squeeze
                }
            }
            LemonadeStep::Drink => LemonadeStep::Restart,
            LemonadeStep::Restart => LemonadeStep::Select,
        };
        debug!(step = ?self.step, squeezes_left = self.squeezes_left, "lemonade tap");
        self.step
    }
}
