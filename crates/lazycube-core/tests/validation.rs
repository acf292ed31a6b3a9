//! Validator and facelet verifier against real scrambles.

mod common;

use common::*;
use lazycube_core::{verify_facelets, Colour, Cube, CubeValidator, FaceletVerifier, ParityCheck, VerifyError};

fn swapped(cube: &Cube, a: usize, b: usize) -> Cube {
    let mut colours = cube.colours();
    colours.swap(a, b);
    Cube::from_colours(&colours).unwrap()
}

fn with_cells(cube: &Cube, cells: &[(usize, Colour)]) -> Cube {
    let mut colours = cube.colours();
    for &(i, c) in cells {
        colours[i] = c;
    }
    Cube::from_colours(&colours).unwrap()
}

#[test]
fn test_scrambles_pass_both_checks() {
    for faces in &SCRAMBLED {
        let cube = cube(faces);
        assert!(CubeValidator::new(&cube).is_cube_valid());
        assert_eq!(FaceletVerifier.verify(&cube), Ok(()));
        assert!(!cube.parity_check_fail());
    }
}

#[test]
fn test_direction_strings() {
    assert_eq!(
        cube(&SCRAMBLED[0]).to_direction_string(),
        "LUUBUDDRRFRBBRFRLUFBUUFDRLDUUBFDFDFLFLRLLBLUBLRDRBDFDB"
    );
    assert_eq!(
        cube(&SCRAMBLED[3]).to_direction_string(),
        "DLDRUFRDDRURRRLUDRFBBBFBUUBFRLDDLFUBBFUDLLLRLFFLUBFUBD"
    );
    assert_eq!(verify_facelets(&cube(&SCRAMBLED[1]).to_direction_string()), Ok(()));
}

#[test]
fn test_swapped_corner_stickers_fail_corners_only() {
    let report = CubeValidator::new(&swapped(&cube(&SCRAMBLED[1]), 0, 2)).report();
    assert!(report.centres && report.edges && report.counts && report.no_duplicate_corners);
    assert!(!report.corners);
}

#[test]
fn test_duplicated_edge_fails_edges_only() {
    let base = cube(&SCRAMBLED[1]);
    // 1 and 7 give a repeated pair; 1 and 48 give an opposite pair
    for (a, b) in [(1, 7), (1, 48)] {
        let report = CubeValidator::new(&swapped(&base, a, b)).report();
        assert!(report.centres && report.counts && report.corners && report.no_duplicate_corners);
        assert!(!report.edges, "swap {a}/{b}");
    }
}

#[test]
fn test_local_checks_miss_what_the_verifier_catches() {
    let solved = cube(&SOLVED);

    let flipped = with_cells(&solved, &[(1, Colour::White), (39, Colour::Orange)]);
    assert!(CubeValidator::new(&flipped).is_cube_valid());
    assert_eq!(FaceletVerifier.verify(&flipped), Err(VerifyError::EdgeFlip));

    let twisted = with_cells(
        &solved,
        &[(0, Colour::Blue), (36, Colour::Orange), (29, Colour::White)],
    );
    assert!(CubeValidator::new(&twisted).is_cube_valid());
    assert_eq!(FaceletVerifier.verify(&twisted), Err(VerifyError::CornerTwist));

    let swapped_edges = with_cells(
        &solved,
        &[(1, Colour::Orange), (39, Colour::Yellow), (7, Colour::Orange), (48, Colour::White)],
    );
    assert!(CubeValidator::new(&swapped_edges).is_cube_valid());
    assert_eq!(FaceletVerifier.verify(&swapped_edges), Err(VerifyError::Parity));
    assert_eq!(VerifyError::Parity.code(), -6);
}

#[test]
fn test_partial_cubes_are_valid_until_contradicted() {
    let partial = Cube::from_letters(MISSING_GREEN).unwrap();
    assert!(!partial.is_complete());
    let report = CubeValidator::new(&partial).report();
    assert!(!report.centres);
    assert!(report.edges && report.counts && report.corners && report.no_duplicate_corners);

    let with_centre = with_cells(&partial, &[(13, Colour::Green)]);
    assert!(CubeValidator::new(&with_centre).is_cube_valid());
}
