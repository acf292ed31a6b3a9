use crate::colour::{Colour, NUM_COLOURS};
use crate::error::{CubeError, CubeResult};
use crate::face::{parse_letters, Face, FACE_CELLS};
use crate::square::Square;
use crate::verify::{FaceletVerifier, ParityCheck};
use serde::{Deserialize, Serialize};

/// Cells across all six faces.
pub const CUBE_CELLS: usize = NUM_COLOURS * FACE_CELLS;

/// Faces and quarter turns making up the solver's URFDLB string.
const DIRECTION_FACES: [(usize, usize); NUM_COLOURS] = [(4, 3), (1, 0), (0, 0), (5, 1), (3, 0), (2, 0)];

/// Faces and quarter turns for the display widget.
const DISPLAY_FACES: [(usize, usize); NUM_COLOURS] = [(4, 3), (5, 0), (0, 3), (2, 3), (3, 2), (1, 3)];

/// Faces and quarter turns for the letter-per-face format.
const LETTER_FACES: [(usize, usize); NUM_COLOURS] = [(2, 0), (1, 2), (0, 2), (3, 2), (4, 2), (5, 2)];

/// Six faces in slot order (orange, green, red, blue, white, yellow).
///
/// Cells are addressed either per face or through the flattened 54-cell view,
/// slot-major then row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cube {
    faces: [Face; NUM_COLOURS],
}

impl Default for Cube {
    fn default() -> Self {
        Self::new()
    }
}

impl Cube {
    /// Unknown cells everywhere except the six fixed centres.
    pub fn new() -> Self {
        Self {
            faces: std::array::from_fn(|slot| Face::with_centre(Colour::ALL[slot])),
        }
    }

    /// Every cell unknown, centres included.
    pub fn empty() -> Self {
        Self {
            faces: std::array::from_fn(|_| Face::blank()),
        }
    }

    /// Build from 54 colours in flattened order.
    pub fn from_colours(colours: &[Colour]) -> CubeResult<Self> {
        if colours.len() != CUBE_CELLS {
            return Err(CubeError::WrongLength {
                expected: CUBE_CELLS,
                actual: colours.len(),
            });
        }

        let faces = std::array::from_fn(|slot| {
            let mut cells = [Colour::Unknown; FACE_CELLS];
            cells.copy_from_slice(&colours[slot * FACE_CELLS..(slot + 1) * FACE_CELLS]);
            Face::from_colours(cells)
        });
        Ok(Self { faces })
    }

    /// Build from colour ordinals (0-5, 6 for unknown).
    pub fn from_indices(indices: &[u8]) -> CubeResult<Self> {
        let colours = indices
            .iter()
            .map(|&i| Colour::from_index(i).ok_or_else(|| CubeError::InvalidColour(i.to_string())))
            .collect::<CubeResult<Vec<_>>>()?;
        Self::from_colours(&colours)
    }

    /// Build from 54 colour letters; whitespace is ignored.
    pub fn from_letters(s: &str) -> CubeResult<Self> {
        Self::from_colours(&parse_letters(s)?)
    }

    /// Put `face` into the slot named by its centre colour.
    ///
    /// Returns the slot, or `None` when the centre is unknown.
    pub fn place(&mut self, face: Face) -> Option<usize> {
        let slot = face.centre().slot()?;
        self.faces[slot] = face;
        Some(slot)
    }

    pub fn set_face(&mut self, slot: usize, face: Face) {
        self.faces[slot] = face;
    }

    pub fn face(&self, slot: usize) -> &Face {
        &self.faces[slot]
    }

    pub fn faces(&self) -> &[Face; NUM_COLOURS] {
        &self.faces
    }

    pub fn square(&self, index: usize) -> &Square {
        self.faces[index / FACE_CELLS].square(index % FACE_CELLS)
    }

    pub fn colour_at(&self, index: usize) -> Colour {
        self.square(index).colour()
    }

    /// The flattened 54-cell colour view.
    pub fn colours(&self) -> Vec<Colour> {
        self.faces.iter().flat_map(|f| f.colours()).collect()
    }

    /// Slots sharing an edge with `slot`.
    pub fn neighbours(slot: usize) -> [usize; 4] {
        if slot >= 4 {
            [0, 1, 2, 3]
        } else {
            let offset = 1 - slot % 2;
            [offset, 2 + offset, 4, 5]
        }
    }

    /// No unknown cell anywhere. Says nothing about validity.
    pub fn is_complete(&self) -> bool {
        self.faces.iter().all(Face::is_complete)
    }

    /// URFDLB facelet string for the two-phase solver.
    pub fn to_direction_string(&self) -> String {
        DIRECTION_FACES
            .iter()
            .map(|&(slot, turns)| self.faces[slot].rotated(turns).to_direction_string())
            .collect()
    }

    /// Digit string consumed by the cube display widget.
    pub fn to_display_string(&self) -> String {
        DISPLAY_FACES
            .iter()
            .map(|&(slot, turns)| self.faces[slot].rotated(turns).to_display_digits())
            .collect()
    }

    /// One letter string per face for the secondary solver format.
    pub fn to_letter_faces(&self) -> [String; NUM_COLOURS] {
        LETTER_FACES.map(|(slot, turns)| self.faces[slot].rotated(turns).to_letters())
    }

    /// True when the default facelet verifier rejects the cube.
    pub fn parity_check_fail(&self) -> bool {
        FaceletVerifier.verify(self).is_err()
    }
}

impl std::fmt::Display for Cube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", face)?;
        }
        Ok(())
    }
}
