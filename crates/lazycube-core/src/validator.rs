use crate::colour::{Colour, NUM_COLOURS};
use crate::cube::{Cube, CUBE_CELLS};
use crate::face::{CENTRE, FACE_CELLS};
use serde::{Deserialize, Serialize};

/// Cell pairs that meet across a face boundary.
const EDGES: [[usize; 2]; 12] = [
    [1, 39],
    [3, 32],
    [7, 48],
    [5, 12],
    [19, 41],
    [21, 14],
    [23, 30],
    [25, 50],
    [37, 28],
    [34, 52],
    [46, 16],
    [10, 43],
];

/// Primary cell of each corner.
const CORNERS: [usize; 8] = [0, 2, 6, 8, 18, 20, 24, 26];

/// The two partner cells of each corner, in clockwise order.
const CORNER_PARTNERS: [[usize; 2]; 8] = [
    [36, 29],
    [9, 42],
    [35, 51],
    [45, 15],
    [44, 11],
    [27, 38],
    [17, 47],
    [53, 33],
];

/// Every slot.
pub const ALL_SLOTS: [usize; NUM_COLOURS] = [0, 1, 2, 3, 4, 5];

fn slot_of(index: usize) -> usize {
    index / FACE_CELLS
}

/// Two colours that can never share an edge or corner.
fn pair_is_invalid(a: Colour, b: Colour) -> bool {
    a == b || a.opposite() == b
}

/// Partner orderings that only appear on a mirror-image corner.
fn partner_order_is_invalid(primary: Colour, first: Colour, second: Colour) -> bool {
    use Colour::*;

    let forbidden: &[(Colour, Colour)] = match primary {
        Orange => &[(Green, Yellow), (White, Green), (Blue, White), (Yellow, Blue)],
        Green => &[(Red, Yellow), (White, Red), (Orange, White), (Yellow, Orange)],
        Red => &[(Green, White), (Yellow, Green), (Blue, Yellow), (White, Blue)],
        Blue => &[(Orange, Yellow), (White, Orange), (Red, White), (Yellow, Red)],
        White => &[(Green, Orange), (Red, Green), (Blue, Red), (Orange, Blue)],
        Yellow => &[(Green, Red), (Orange, Green), (Blue, Orange), (Red, Blue)],
        Unknown => &[],
    };
    forbidden.contains(&(first, second))
}

/// Structural checks on a cube snapshot.
///
/// Every check is recomputed from scratch. Unknown cells are tolerated
/// wherever a partial cube can still be consistent.
pub struct CubeValidator<'a> {
    cube: &'a Cube,
}

impl<'a> CubeValidator<'a> {
    pub fn new(cube: &'a Cube) -> Self {
        Self { cube }
    }

    fn colour(&self, index: usize) -> Colour {
        self.cube.colour_at(index)
    }

    /// All five checks.
    pub fn is_cube_valid(&self) -> bool {
        self.centres_valid()
            && self.all_edges_valid()
            && self.counts_valid()
            && self.all_corners_valid()
            && self.no_duplicate_corners()
    }

    /// Each slot's centre holds the slot's own colour.
    pub fn centres_valid(&self) -> bool {
        Colour::ALL
            .iter()
            .enumerate()
            .all(|(slot, &c)| self.colour(slot * FACE_CELLS + CENTRE) == c)
    }

    pub fn all_edges_valid(&self) -> bool {
        self.edges_valid(&ALL_SLOTS)
    }

    /// Edge check limited to edges whose two faces are both in `slots`.
    pub fn edges_valid(&self, slots: &[usize]) -> bool {
        let mut seen: Vec<(Colour, Colour)> = Vec::with_capacity(EDGES.len());

        for [a, b] in EDGES {
            if !slots.contains(&slot_of(a)) || !slots.contains(&slot_of(b)) {
                continue;
            }
            let (ca, cb) = (self.colour(a), self.colour(b));
            if !ca.is_known() || !cb.is_known() {
                continue;
            }
            if pair_is_invalid(ca, cb) {
                return false;
            }
            let key = if ca <= cb { (ca, cb) } else { (cb, ca) };
            if seen.contains(&key) {
                return false;
            }
            seen.push(key);
        }
        true
    }

    pub fn all_corners_valid(&self) -> bool {
        self.corners_valid(&ALL_SLOTS)
    }

    /// Corner check limited to corners touching at least one face in `slots`.
    pub fn corners_valid(&self, slots: &[usize]) -> bool {
        for (&primary, &[p1, p2]) in CORNERS.iter().zip(CORNER_PARTNERS.iter()) {
            if ![primary, p1, p2]
                .iter()
                .any(|&cell| slots.contains(&slot_of(cell)))
            {
                continue;
            }

            let (c0, c1, c2) = (self.colour(primary), self.colour(p1), self.colour(p2));
            let unknown = [c0, c1, c2].iter().filter(|c| !c.is_known()).count();
            if unknown <= 1 && (c0 == c1 || c0 == c2 || c1 == c2) {
                return false;
            }

            if c0.is_known() && (c1 == c0.opposite() || c2 == c0.opposite()) {
                return false;
            }

            if c1.is_known() && c2.is_known() {
                if pair_is_invalid(c1, c2) || partner_order_is_invalid(c0, c1, c2) {
                    return false;
                }
            }
        }
        true
    }

    /// No two fully known corners carry the same three colours.
    pub fn no_duplicate_corners(&self) -> bool {
        let triples: Vec<Option<[Colour; 3]>> = CORNERS
            .iter()
            .zip(CORNER_PARTNERS.iter())
            .map(|(&primary, &[p1, p2])| {
                let mut triple = [self.colour(primary), self.colour(p1), self.colour(p2)];
                if triple.iter().any(|c| !c.is_known()) {
                    return None;
                }
                triple.sort();
                Some(triple)
            })
            .collect();

        for (i, a) in triples.iter().enumerate() {
            let Some(a) = a else { continue };
            if triples[i + 1..].iter().flatten().any(|b| b == a) {
                return false;
            }
        }
        true
    }

    /// No real colour appears more than nine times.
    pub fn counts_valid(&self) -> bool {
        let mut counts = [0usize; NUM_COLOURS + 1];
        for index in 0..CUBE_CELLS {
            counts[self.colour(index).index()] += 1;
        }
        counts[..NUM_COLOURS].iter().all(|&n| n <= FACE_CELLS)
    }

    /// Every sub-check in one record.
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            centres: self.centres_valid(),
            edges: self.all_edges_valid(),
            counts: self.counts_valid(),
            corners: self.all_corners_valid(),
            no_duplicate_corners: self.no_duplicate_corners(),
        }
    }
}

/// Outcome of each validator check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub centres: bool,
    pub edges: bool,
    pub counts: bool,
    pub corners: bool,
    /// True when no corner is duplicated
    pub no_duplicate_corners: bool,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.centres && self.edges && self.counts && self.corners && self.no_duplicate_corners
    }
}
