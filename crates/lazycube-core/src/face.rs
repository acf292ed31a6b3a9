use crate::colour::Colour;
use crate::error::{CubeError, CubeResult};
use crate::square::Square;
use serde::{Deserialize, Serialize};

/// Cells per face.
pub const FACE_CELLS: usize = 9;
/// Index of the centre cell.
pub const CENTRE: usize = 4;

/// Source cell for each destination cell of a quarter turn.
const ROTATION: [usize; FACE_CELLS] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

/// Cell order used by the display widget: rows bottom to top.
const DISPLAY_ORDER: [usize; FACE_CELLS] = [6, 7, 8, 3, 4, 5, 0, 1, 2];

/// Nine squares in row-major order. The centre colour decides which cube
/// slot the face belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    squares: [Square; FACE_CELLS],
}

impl Default for Face {
    fn default() -> Self {
        Self::blank()
    }
}

impl Face {
    /// Nine unknown squares.
    pub fn blank() -> Self {
        Self {
            squares: std::array::from_fn(|_| Square::new()),
        }
    }

    /// A blank face whose centre has been seen once as `centre`.
    pub fn with_centre(centre: Colour) -> Self {
        let mut face = Self::blank();
        face.squares[CENTRE].observe(centre);
        face
    }

    /// Each cell seen once in the given colour. Unknown cells stay blank.
    pub fn from_colours(colours: [Colour; FACE_CELLS]) -> Self {
        let mut face = Self::blank();
        for (square, colour) in face.squares.iter_mut().zip(colours) {
            if colour.is_known() {
                square.observe(colour);
            }
        }
        face
    }

    /// A face read straight off one frame: every cell holds its detected
    /// colour with a zero tally.
    pub fn from_detections<I>(colours: I) -> CubeResult<Self>
    where
        I: IntoIterator<Item = Colour>,
    {
        let colours: Vec<Colour> = colours.into_iter().collect();
        if colours.len() != FACE_CELLS {
            return Err(CubeError::WrongLength {
                expected: FACE_CELLS,
                actual: colours.len(),
            });
        }

        let mut face = Self::blank();
        for (square, colour) in face.squares.iter_mut().zip(colours) {
            square.set(colour, 0);
        }
        Ok(face)
    }

    /// Parse nine colour letters (`N`, `.` or `?` for unknown).
    pub fn from_letters(s: &str) -> CubeResult<Self> {
        let colours = parse_letters(s)?;
        if colours.len() != FACE_CELLS {
            return Err(CubeError::WrongLength {
                expected: FACE_CELLS,
                actual: colours.len(),
            });
        }
        let mut cells = [Colour::Unknown; FACE_CELLS];
        cells.copy_from_slice(&colours);
        Ok(Self::from_colours(cells))
    }

    pub fn centre(&self) -> Colour {
        self.squares[CENTRE].colour()
    }

    pub fn square(&self, index: usize) -> &Square {
        &self.squares[index]
    }

    pub fn square_mut(&mut self, index: usize) -> &mut Square {
        &mut self.squares[index]
    }

    pub fn squares(&self) -> &[Square; FACE_CELLS] {
        &self.squares
    }

    pub fn colours(&self) -> [Colour; FACE_CELLS] {
        std::array::from_fn(|i| self.squares[i].colour())
    }

    /// Tally of the weakest cell.
    pub fn min_times_seen(&self) -> u32 {
        self.squares
            .iter()
            .map(Square::times_seen)
            .min()
            .unwrap_or(0)
    }

    /// The face turned a quarter clockwise.
    pub fn rotate(&self) -> Face {
        Face {
            squares: std::array::from_fn(|i| self.squares[ROTATION[i]].clone()),
        }
    }

    /// The face turned `turns` quarters clockwise.
    pub fn rotated(&self, turns: usize) -> Face {
        let mut face = self.clone();
        for _ in 0..turns % 4 {
            face = face.rotate();
        }
        face
    }

    /// True when every cell other than the centre is unknown.
    pub fn is_empty(&self) -> bool {
        self.squares
            .iter()
            .enumerate()
            .all(|(i, s)| i == CENTRE || s.colour() == Colour::Unknown)
    }

    /// True when no cell is unknown.
    pub fn is_complete(&self) -> bool {
        self.squares.iter().all(|s| s.colour().is_known())
    }

    pub fn to_letters(&self) -> String {
        self.squares.iter().map(|s| s.colour().letter()).collect()
    }

    pub fn to_direction_string(&self) -> String {
        self.squares.iter().map(|s| s.colour().direction()).collect()
    }

    pub fn to_display_digits(&self) -> String {
        DISPLAY_ORDER
            .iter()
            .filter_map(|&i| self.squares[i].colour().display_digit())
            .collect()
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_letters())
    }
}

pub(crate) fn parse_letters(s: &str) -> CubeResult<Vec<Colour>> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| Colour::from_letter(c).ok_or_else(|| CubeError::InvalidColour(c.to_string())))
        .collect()
}
