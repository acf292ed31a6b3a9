use crate::colour::NUM_COLOURS;
use crate::cube::Cube;
use crate::face::Face;
use crate::validator::CubeValidator;

/// Search for an orientation of every non-empty face in `source` that makes
/// the whole cube valid.
///
/// Faces are placed one slot at a time into a cube holding only centres.
/// Each rotation is checked against the neighbouring slots before the search
/// goes deeper; a slot that cannot be filled is reset to its bare centre.
pub fn solve(source: &Cube) -> Option<Cube> {
    let mut working = Cube::new();
    if search(source, &mut working) {
        Some(working)
    } else {
        None
    }
}

fn search(source: &Cube, working: &mut Cube) -> bool {
    if all_assigned(source, working) && CubeValidator::new(working).is_cube_valid() {
        return true;
    }

    let Some(slot) = next_unassigned(source, working) else {
        return false;
    };

    let mut face = source.face(slot).clone();
    let centre = face.centre();
    for _ in 0..4 {
        working.set_face(slot, face.clone());
        face = face.rotate();

        let validator = CubeValidator::new(working);
        let consistent = Cube::neighbours(slot).iter().all(|&n| {
            let pair = [slot, n];
            validator.edges_valid(&pair) && validator.corners_valid(&pair)
        });

        if consistent && search(source, working) {
            return true;
        }
        working.set_face(slot, Face::with_centre(centre));
    }

    false
}

fn all_assigned(source: &Cube, working: &Cube) -> bool {
    (0..NUM_COLOURS).all(|slot| source.face(slot).is_empty() || !working.face(slot).is_empty())
}

fn next_unassigned(source: &Cube, working: &Cube) -> Option<usize> {
    (0..NUM_COLOURS).find(|&slot| !source.face(slot).is_empty() && working.face(slot).is_empty())
}
