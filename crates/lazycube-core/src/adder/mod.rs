//! Face placement.
//!
//! A scanned face is placed into the slot named by its centre colour. The
//! four orientations are tried in turn against the full validator; when none
//! fits, every placed face is re-oriented together by backtracking search.

mod backtrack;

pub use backtrack::solve;

use crate::cube::Cube;
use crate::face::Face;
use crate::validator::CubeValidator;
use tracing::debug;

/// Builds up a cube one face at a time, keeping it valid after every step.
#[derive(Debug, Clone, Default)]
pub struct FaceAdder {
    cube: Cube,
}

impl FaceAdder {
    /// Start from a cube holding only the six centres.
    pub fn new() -> Self {
        Self { cube: Cube::new() }
    }

    /// Start from an existing cube.
    pub fn with_cube(cube: Cube) -> Self {
        Self { cube }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn into_cube(self) -> Cube {
        self.cube
    }

    /// Add `face` to the working cube.
    ///
    /// Returns false and leaves the cube untouched when no orientation of
    /// this face (and of the faces already placed) yields a valid cube, or
    /// when the face has no known centre.
    pub fn add_face(&mut self, face: &Face) -> bool {
        let mut candidate = self.cube.clone();
        let Some(slot) = candidate.place(face.clone()) else {
            debug!("face {} has no centre colour", face);
            return false;
        };

        // rotation never changes colour counts
        if !CubeValidator::new(&candidate).counts_valid() {
            debug!(slot, "colour counts exceeded, face rejected");
            return false;
        }

        let mut rotated = face.clone();
        for turns in 0..4 {
            candidate.set_face(slot, rotated.clone());
            if CubeValidator::new(&candidate).is_cube_valid() {
                debug!(slot, turns, "face placed");
                self.cube = candidate;
                return true;
            }
            rotated = rotated.rotate();
        }

        candidate.set_face(slot, face.clone());
        debug!(slot, "no rotation fits, backtracking");
        match solve(&candidate) {
            Some(cube) => {
                debug!(slot, "backtracking found a valid arrangement");
                self.cube = cube;
                true
            }
            None => {
                debug!(slot, "backtracking exhausted");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;

    fn face(s: &str) -> Face {
        Face::from_letters(s).unwrap()
    }

    #[test]
    fn test_blank_cube_keeps_face_as_given() {
        for letters in [
            "BWWOOYBWY",
            "OYRWYROGG",
            "BYGOGOORR",
            "YGOWWRBOR",
            "BWGGBRWBG",
            "GRGRRWWGB",
        ] {
            let f = face(letters);
            let slot = f.centre().slot().unwrap();
            let mut adder = FaceAdder::new();
            assert!(adder.add_face(&f));
            assert_eq!(adder.cube().face(slot).to_letters(), letters);
            for other in (0..6).filter(|&s| s != slot) {
                assert!(adder.cube().face(other).is_empty());
            }
        }
    }

    #[test]
    fn test_unknown_centre_rejected() {
        let mut adder = FaceAdder::new();
        assert!(!adder.add_face(&face("OOOONOOOO")));
        assert_eq!(adder.cube(), &Cube::new());
    }

    #[test]
    fn test_count_ceiling_rejects_without_search() {
        let mut adder = FaceAdder::new();
        assert!(adder.add_face(&face("WWWWOWWWW")));
        // nine whites already on the orange face plus the white centre
        assert!(!adder.add_face(&face("WWWWGWWWW")));
        assert_eq!(adder.cube().face(Colour::Green.index()).to_letters(), "NNNNGNNNN");
    }
}
