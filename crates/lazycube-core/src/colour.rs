use serde::{Deserialize, Serialize};

/// Sticker colour of a Rubik's cube, plus the `Unknown` sentinel for cells
/// that have not been observed yet.
///
/// The declaration order is significant: the six real colours are listed in
/// cube slot order, and `Unknown` is always last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Colour {
    Orange,
    Green,
    Red,
    Blue,
    White,
    Yellow,
    Unknown,
}

/// Number of real colours (and cube faces).
pub const NUM_COLOURS: usize = 6;

impl Colour {
    /// The six real colours, in slot order.
    pub const ALL: [Colour; NUM_COLOURS] = [
        Colour::Orange,
        Colour::Green,
        Colour::Red,
        Colour::Blue,
        Colour::White,
        Colour::Yellow,
    ];

    /// Every value including `Unknown`, in declaration order.
    pub const ALL_WITH_UNKNOWN: [Colour; NUM_COLOURS + 1] = [
        Colour::Orange,
        Colour::Green,
        Colour::Red,
        Colour::Blue,
        Colour::White,
        Colour::Yellow,
        Colour::Unknown,
    ];

    /// Ordinal of the colour (0-5, `Unknown` is 6).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Cube slot holding the face with this centre colour.
    pub fn slot(self) -> Option<usize> {
        match self {
            Colour::Unknown => None,
            c => Some(c.index()),
        }
    }

    pub fn is_known(self) -> bool {
        self != Colour::Unknown
    }

    /// Colour from its ordinal. Ordinal 6 is `Unknown`; anything above is rejected.
    pub fn from_index(index: u8) -> Option<Colour> {
        Colour::ALL_WITH_UNKNOWN.get(index as usize).copied()
    }

    /// First letter of the colour name (`N` for unknown).
    pub fn letter(self) -> char {
        match self {
            Colour::Orange => 'O',
            Colour::Green => 'G',
            Colour::Red => 'R',
            Colour::Blue => 'B',
            Colour::White => 'W',
            Colour::Yellow => 'Y',
            Colour::Unknown => 'N',
        }
    }

    /// Parse a colour letter. `N`, `.` and `?` all read as unknown.
    pub fn from_letter(c: char) -> Option<Colour> {
        match c.to_ascii_uppercase() {
            'O' => Some(Colour::Orange),
            'G' => Some(Colour::Green),
            'R' => Some(Colour::Red),
            'B' => Some(Colour::Blue),
            'W' => Some(Colour::White),
            'Y' => Some(Colour::Yellow),
            'N' | '.' | '?' => Some(Colour::Unknown),
            _ => None,
        }
    }

    /// The colour on the opposite side of a solved cube.
    pub fn opposite(self) -> Colour {
        match self {
            Colour::Orange => Colour::Red,
            Colour::Red => Colour::Orange,
            Colour::Green => Colour::Blue,
            Colour::Blue => Colour::Green,
            Colour::White => Colour::Yellow,
            Colour::Yellow => Colour::White,
            Colour::Unknown => Colour::Unknown,
        }
    }

    /// Face letter used by the two-phase solver, with orange at the front and
    /// white on top.
    pub fn direction(self) -> char {
        match self {
            Colour::White => 'U',
            Colour::Green => 'R',
            Colour::Orange => 'F',
            Colour::Yellow => 'D',
            Colour::Blue => 'L',
            Colour::Red => 'B',
            Colour::Unknown => 'N',
        }
    }

    /// Digit used by the cube display widget, `None` for unknown cells.
    pub fn display_digit(self) -> Option<char> {
        match self {
            Colour::White => Some('0'),
            Colour::Yellow => Some('1'),
            Colour::Orange => Some('2'),
            Colour::Red => Some('3'),
            Colour::Blue => Some('4'),
            Colour::Green => Some('5'),
            Colour::Unknown => None,
        }
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colour::Orange => write!(f, "Orange"),
            Colour::Green => write!(f, "Green"),
            Colour::Red => write!(f, "Red"),
            Colour::Blue => write!(f, "Blue"),
            Colour::White => write!(f, "White"),
            Colour::Yellow => write!(f, "Yellow"),
            Colour::Unknown => write!(f, "Unknown"),
        }
    }
}
