//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use lazycube_core::{Colour, Cube, Face, FaceAdder};

pub const SOLVED: [&str; 6] = [
    "OOOOOOOOO",
    "GGGGGGGGG",
    "RRRRRRRRR",
    "BBBBBBBBB",
    "WWWWWWWWW",
    "YYYYYYYYY",
];

/// Scrambled cubes in slot order. Each one is a valid, solvable cube.
pub const SCRAMBLED: [[&str; 6]; 4] = [
    ["ORWWOYGBY", "OGRRGOGBW", "BGYGRYOYR", "OBGBBRBWR", "YRBGWWGYW", "ROBWYOWOY"],
    ["GRRGORYOW", "GYWWGYOBB", "GBOOROYGW", "YBOWBWBRO", "WYGBWWYRR", "BORGYYBGR"],
    ["WYYRORBYY", "OWWGGBGOW", "GWGRRBOGR", "OWGOBYWRR", "OOYBWBBGR", "RGBOYYYWB"],
    ["ORRRORWWR", "GWGGGBWYG", "OOBWROWRY", "ROWYBBBGB", "GGYYWBYOY", "BBRGYWOYO"],
];

/// Five faces of a scramble with the green face missing entirely.
pub const MISSING_GREEN: &str = "GYGBOGGGR NNNNNNNNN RWWYRYOWW GWYGBYOOW ORROWORRY BGYWYBOBB";

/// Five faces of a scramble with the white face missing entirely.
pub const MISSING_WHITE: &str = "YORROYWRR BBORGOGWB YWRBRWYYO GGBGBBBYO NNNNNNNNN WORWYGGOW";

pub fn face(letters: &str) -> Face {
    Face::from_letters(letters).unwrap()
}

pub fn cube(faces: &[&str; 6]) -> Cube {
    Cube::from_letters(&faces.join("")).unwrap()
}

/// Add each face, turned clockwise the given number of times, to a fresh adder.
pub fn assemble(steps: &[(&str, usize)]) -> FaceAdder {
    let mut adder = FaceAdder::new();
    for &(letters, turns) in steps {
        let f = face(letters).rotated(turns);
        assert!(adder.add_face(&f), "face {letters} turned {turns} was rejected");
    }
    adder
}

/// Letters of every face in slot order.
pub fn letters(cube: &Cube) -> Vec<String> {
    cube.faces().iter().map(Face::to_letters).collect()
}


pub fn colour(c: char) -> Colour {
    Colour::from_letter(c).unwrap()
}
