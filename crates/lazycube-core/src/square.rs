use crate::colour::{Colour, NUM_COLOURS};
use serde::{Deserialize, Serialize};

/// One sticker position with its per-colour observation tally.
///
/// The cached colour is the plurality vote. Ties keep whichever colour
/// reached the maximum first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    colour: Colour,
    seen: [u32; NUM_COLOURS + 1],
}

impl Default for Square {
    fn default() -> Self {
        Self::new()
    }
}

impl Square {
    /// A square with no observations. Its colour is `Unknown`.
    pub fn new() -> Self {
        Self {
            colour: Colour::Unknown,
            seen: [0; NUM_COLOURS + 1],
        }
    }

    /// A square holding `colour` with the given tally.
    pub fn with_colour(colour: Colour, count: u32) -> Self {
        let mut square = Self::new();
        square.set(colour, count);
        square
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Tally of the current colour.
    pub fn times_seen(&self) -> u32 {
        self.seen[self.colour.index()]
    }

    /// Tally of any colour.
    pub fn seen(&self, colour: Colour) -> u32 {
        self.seen[colour.index()]
    }

    /// Record one more sighting of `colour`. Tallies saturate.
    pub fn observe(&mut self, colour: Colour) {
        let seen = &mut self.seen[colour.index()];
        *seen = seen.saturating_add(1);
        self.recheck();
    }

    /// Overwrite the tally for `colour`.
    ///
    /// `colour` becomes the current colour when the square is still unknown or
    /// when `count` matches or beats the incumbent's tally. If the write lowered
    /// the incumbent below another colour, the plurality is recomputed.
    pub fn set(&mut self, colour: Colour, count: u32) {
        if self.colour == Colour::Unknown || count >= self.times_seen() {
            self.colour = colour;
        }
        self.seen[colour.index()] = count;

        let max = self.seen.iter().copied().max().unwrap_or(0);
        if self.times_seen() < max {
            self.recheck();
        }
    }

    /// Pin the current colour without touching the tallies.
    pub fn force_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }

    /// Most seen real colour other than the current one.
    pub fn second_colour(&self) -> Option<Colour> {
        let mut best: Option<Colour> = None;
        for colour in Colour::ALL {
            if colour == self.colour {
                continue;
            }
            match best {
                Some(b) if self.seen(colour) <= self.seen(b) => {}
                _ => best = Some(colour),
            }
        }
        best
    }

    /// Tally of [`Square::second_colour`].
    pub fn second_seen(&self) -> u32 {
        self.second_colour().map(|c| self.seen(c)).unwrap_or(0)
    }

    fn recheck(&mut self) {
        for colour in Colour::ALL_WITH_UNKNOWN {
            if self.seen(colour) > self.times_seen() {
                self.colour = colour;
            }
        }
    }
}
