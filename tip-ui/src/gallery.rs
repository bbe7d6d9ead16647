//! Art gallery viewer: four artworks, stepped through with Previous and
//! Next. Neither button wraps around.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artwork {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: u16,
    /// Image resource shown for the artwork.
    pub image: &'static str,
}

impl fmt::Display for Artwork {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "[{}] {} by {} ({})", self.image, self.title, self.artist, self.year)
    }
}

pub const ARTWORKS: [Artwork; 4] = [
    Artwork {
        title: "Giraffe",
        artist: "Kachinga",
        year: 2020,
        image: "giraffe",
    },
    Artwork {
        title: "Meerkat",
        artist: "Mule",
        year: 2021,
        image: "meerkat",
    },
    Artwork {
        title: "Peacock",
        artist: "Kachman",
        year: 2022,
        image: "peacock",
    },
    Artwork {
        title: "Puppy",
        artist: "KGM",
        year: 2023,
        image: "puppy",
    },
];

/// A move through the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Previous,
    Next,
}

impl Move {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "prev" | "previous" | "p" => Some(Self::Previous),
            "next" | "n" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Position in [`ARTWORKS`], 1-based like the on-screen counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gallery {
    current: usize,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self { current: 1 }
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn artwork(&self) -> &'static Artwork {
        &ARTWORKS[self.current - 1]
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current < ARTWORKS.len()
    }

    /// Steps back one artwork. Returns `false` on the first one.
    pub fn go_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Steps forward one artwork. Returns `false` on the last one.
    pub fn go_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn apply(
        &mut self,
        step: Move,
    ) -> bool {
        let moved = match step {
            Move::Previous => self.go_previous(),
            Move::Next => self.go_next(),
        };
        debug!(?step, moved, position = self.current, "gallery move");
        moved
    }
}

impl fmt::Display for Gallery {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{} {}", self.current, ARTWORKS.len(), self.artwork())
    }
}
