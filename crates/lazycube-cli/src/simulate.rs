//! Synthetic camera frames for a known cube.

use lazycube_core::{BoundingBox, Colour, Cube, DetectionClass, Prediction, FACE_CELLS, NUM_COLOURS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Known solvable cubes, faces in slot order.
pub const SCRAMBLES: [[&str; 6]; 4] = [
    ["ORWWOYGBY", "OGRRGOGBW", "BGYGRYOYR", "OBGBBRBWR", "YRBGWWGYW", "ROBWYOWOY"],
    ["GRRGORYOW", "GYWWGYOBB", "GBOOROYGW", "YBOWBWBRO", "WYGBWWYRR", "BORGYYBGR"],
    ["WYYRORBYY", "OWWGGBGOW", "GWGRRBOGR", "OWGOBYWRR", "OOYBWBBGR", "RGBOYYYWB"],
    ["ORRRORWWR", "GWGGGBWYG", "OOBWROWRY", "ROWYBBBGB", "GGYYWBYOY", "BBRGYWOYO"],
];

const SPACING: i32 = 60;
const HALF_SQUARE: i32 = 25;
const FRAME_MS: u64 = 100;

/// One recorded detection frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Capture time relative to the first frame
    #[serde(default)]
    pub at_ms: Option<u64>,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub seed: u64,
    /// Frames shown per face
    pub frames: usize,
    /// Probability that any one sticker is misread
    pub noise: f64,
}

/// The cube being shown and the frames a camera would report for it.
pub struct Simulation {
    pub cube: Cube,
    pub frames: Vec<Frame>,
}

pub fn simulate(options: &SimulateOptions) -> Simulation {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let scramble = SCRAMBLES[rng.gen_range(0..SCRAMBLES.len())];
    let cube = Cube::from_letters(&scramble.concat()).unwrap_or_default();

    let mut order: Vec<usize> = (0..NUM_COLOURS).collect();
    order.shuffle(&mut rng);

    let mut frames = Vec::new();
    for slot in order {
        let shown = cube.face(slot).rotated(rng.gen_range(0..4)).colours();
        let origin = (rng.gen_range(60..160), rng.gen_range(60..160));
        for _ in 0..options.frames {
            let at_ms = frames.len() as u64 * FRAME_MS;
            frames.push(Frame {
                at_ms: Some(at_ms),
                predictions: face_predictions(&shown, origin, options.noise, &mut rng),
            });
        }
    }

    Simulation { cube, frames }
}

fn face_predictions(
    colours: &[Colour; FACE_CELLS],
    origin: (i32, i32),
    noise: f64,
    rng: &mut StdRng,
) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = colours
        .iter()
        .enumerate()
        .map(|(i, &colour)| {
            let x = origin.0 + (i % 3) as i32 * SPACING + rng.gen_range(-4..=4);
            let y = origin.1 + (i / 3) as i32 * SPACING + rng.gen_range(-4..=4);
            let seen = if rng.gen_bool(noise.clamp(0.0, 1.0)) {
                misread(colour, rng)
            } else {
                colour
            };
            Prediction::new(
                rng.gen_range(55..=99),
                BoundingBox::new(x - HALF_SQUARE, y - HALF_SQUARE, x + HALF_SQUARE, y + HALF_SQUARE),
                DetectionClass::Square(seen),
            )
        })
        .collect();

    let margin = SPACING - HALF_SQUARE;
    predictions.push(Prediction::new(
        rng.gen_range(80..=99),
        BoundingBox::new(
            origin.0 - margin,
            origin.1 - margin,
            origin.0 + 2 * SPACING + margin,
            origin.1 + 2 * SPACING + margin,
        ),
        DetectionClass::Face,
    ));
    predictions.shuffle(rng);
    predictions
}

fn misread(colour: Colour, rng: &mut StdRng) -> Colour {
    let others: Vec<Colour> = Colour::ALL.into_iter().filter(|&c| c != colour).collect();
    others.choose(rng).copied().unwrap_or(colour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazycube_core::CubeValidator;

    #[test]
    fn test_scrambles_are_valid() {
        for scramble in SCRAMBLES {
            let cube = Cube::from_letters(&scramble.concat()).unwrap();
            assert!(CubeValidator::new(&cube).is_cube_valid());
            assert!(!cube.parity_check_fail());
        }
    }

    #[test]
    fn test_simulation_is_seeded() {
        let options = SimulateOptions {
            seed: 5,
            frames: 4,
            noise: 0.1,
        };
        let a = simulate(&options);
        let b = simulate(&options);
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.frames.len(), 24);
        assert!(a.frames.iter().all(|f| f.predictions.len() == 10));
        assert_eq!(a.frames[3].at_ms, Some(300));
    }

    #[test]
    fn test_frame_json_defaults() {
        let frame: Frame = serde_json::from_str(r#"{"predictions": []}"#).unwrap();
        assert_eq!(frame.at_ms, None);
        assert!(frame.predictions.is_empty());
    }
}
