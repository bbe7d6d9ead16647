use std::fmt;

use rand::RngExt;

/// One face of a six-sided die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieRoll(u8);

impl DieRoll {
    pub fn new(face: u8) -> Option<Self> {
        (1..=6).contains(&face).then_some(Self(face))
    }

    pub fn face(self) -> u8 {
        self.0
    }

    /// Image resource for the face, `dice_1` to `dice_6`.
    pub fn image(self) -> String {
        format!("dice_{}", self.0)
    }
}

impl fmt::Display for DieRoll {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.image())
    }
}

pub fn roll() -> DieRoll {
    DieRoll(rand::rng().random_range(1..=6))
}
