//! Solvability check on a completed cube.
//!
//! The cube is converted to its URFDLB facelet string and decoded into
//! cubies. A cube that passes every structural check in the validator can
//! still be unsolvable: a flipped edge, a twisted corner, or two swapped
//! pieces. Those show up here.

use crate::cube::Cube;
use thiserror::Error;

const U: usize = 0;
const R: usize = 9;
const F: usize = 18;
const D: usize = 27;
const L: usize = 36;
const B: usize = 45;

/// Face letters in facelet order.
const FACE_LETTERS: [char; 6] = ['U', 'R', 'F', 'D', 'L', 'B'];

const CORNER_FACELETS: [[usize; 3]; 8] = [
    [U + 8, R, F + 2],
    [U + 6, F, L + 2],
    [U, L, B + 2],
    [U + 2, B, R + 2],
    [D + 2, F + 8, R + 6],
    [D, L + 8, F + 6],
    [D + 6, B + 8, L + 6],
    [D + 8, R + 8, B + 6],
];

const EDGE_FACELETS: [[usize; 2]; 12] = [
    [U + 5, R + 1],
    [U + 7, F + 1],
    [U + 3, L + 1],
    [U + 1, B + 1],
    [D + 5, R + 7],
    [D + 1, F + 7],
    [D + 3, L + 7],
    [D + 7, B + 7],
    [F + 5, R + 3],
    [F + 3, L + 5],
    [B + 5, L + 3],
    [B + 3, R + 5],
];

// Face indices: U=0 R=1 F=2 D=3 L=4 B=5
const CORNER_COLOURS: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 2, 4],
    [0, 4, 5],
    [0, 5, 1],
    [3, 2, 1],
    [3, 4, 2],
    [3, 5, 4],
    [3, 1, 5],
];

const EDGE_COLOURS: [[usize; 2]; 12] = [
    [0, 1],
    [0, 2],
    [0, 4],
    [0, 5],
    [3, 1],
    [3, 2],
    [3, 4],
    [3, 5],
    [2, 1],
    [2, 4],
    [5, 4],
    [5, 1],
];

/// Why a cube cannot be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("some facelet colour does not appear exactly nine times")]
    FaceletCount,
    #[error("not every edge piece is present exactly once")]
    MissingEdge,
    #[error("one edge is flipped")]
    EdgeFlip,
    #[error("not every corner piece is present exactly once")]
    MissingCorner,
    #[error("one corner is twisted")]
    CornerTwist,
    #[error("two pieces are swapped")]
    Parity,
}

impl VerifyError {
    /// Numeric code in the two-phase solver's convention.
    pub fn code(self) -> i32 {
        match self {
            VerifyError::FaceletCount => -1,
            VerifyError::MissingEdge => -2,
            VerifyError::EdgeFlip => -3,
            VerifyError::MissingCorner => -4,
            VerifyError::CornerTwist => -5,
            VerifyError::Parity => -6,
        }
    }
}

/// Decides whether a completed cube can actually be solved.
pub trait ParityCheck {
    fn verify(&self, cube: &Cube) -> Result<(), VerifyError>;
}

/// Facelet-to-cubie decoding of the URFDLB string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceletVerifier;

impl ParityCheck for FaceletVerifier {
    fn verify(&self, cube: &Cube) -> Result<(), VerifyError> {
        verify_facelets(&cube.to_direction_string())
    }
}

/// Verify a 54-letter URFDLB facelet string.
pub fn verify_facelets(facelets: &str) -> Result<(), VerifyError> {
    let faces: Vec<usize> = facelets
        .chars()
        .map(|c| FACE_LETTERS.iter().position(|&l| l == c))
        .collect::<Option<Vec<_>>>()
        .ok_or(VerifyError::FaceletCount)?;

    if faces.len() != 54 {
        return Err(VerifyError::FaceletCount);
    }
    let mut counts = [0usize; 6];
    for &face in &faces {
        counts[face] += 1;
    }
    if counts.iter().any(|&n| n != 9) {
        return Err(VerifyError::FaceletCount);
    }

    let (edge_perm, edge_flip) = decode_edges(&faces)?;
    if edge_flip.iter().sum::<usize>() % 2 != 0 {
        return Err(VerifyError::EdgeFlip);
    }

    let (corner_perm, corner_twist) = decode_corners(&faces)?;
    if corner_twist.iter().sum::<usize>() % 3 != 0 {
        return Err(VerifyError::CornerTwist);
    }

    if permutation_parity(&edge_perm) != permutation_parity(&corner_perm) {
        return Err(VerifyError::Parity);
    }
    Ok(())
}

fn decode_edges(faces: &[usize]) -> Result<([usize; 12], [usize; 12]), VerifyError> {
    let mut perm = [0usize; 12];
    let mut flip = [0usize; 12];
    let mut present = [0usize; 12];

    for (i, [a, b]) in EDGE_FACELETS.iter().enumerate() {
        let (fa, fb) = (faces[*a], faces[*b]);
        let (j, o) = EDGE_COLOURS
            .iter()
            .enumerate()
            .find_map(|(j, &[c0, c1])| {
                if fa == c0 && fb == c1 {
                    Some((j, 0))
                } else if fa == c1 && fb == c0 {
                    Some((j, 1))
                } else {
                    None
                }
            })
            .ok_or(VerifyError::MissingEdge)?;
        perm[i] = j;
        flip[i] = o;
        present[j] += 1;
    }

    if present.iter().any(|&n| n != 1) {
        return Err(VerifyError::MissingEdge);
    }
    Ok((perm, flip))
}

fn decode_corners(faces: &[usize]) -> Result<([usize; 8], [usize; 8]), VerifyError> {
    let mut perm = [0usize; 8];
    let mut twist = [0usize; 8];
    let mut present = [0usize; 8];

    for (i, cell) in CORNER_FACELETS.iter().enumerate() {
        // the twist is the position of the U or D sticker
        let ori = (0..3)
            .find(|&o| faces[cell[o]] == 0 || faces[cell[o]] == 3)
            .ok_or(VerifyError::MissingCorner)?;
        let col1 = faces[cell[(ori + 1) % 3]];
        let col2 = faces[cell[(ori + 2) % 3]];
        let j = CORNER_COLOURS
            .iter()
            .position(|c| c[1] == col1 && c[2] == col2)
            .ok_or(VerifyError::MissingCorner)?;
        perm[i] = j;
        twist[i] = ori;
        present[j] += 1;
    }

    if present.iter().any(|&n| n != 1) {
        return Err(VerifyError::MissingCorner);
    }
    Ok((perm, twist))
}

fn permutation_parity(perm: &[usize]) -> usize {
    let mut inversions = 0;
    for i in 0..perm.len() {
        for j in 0..i {
            if perm[j] > perm[i] {
                inversions += 1;
            }
        }
    }
    inversions % 2
}
