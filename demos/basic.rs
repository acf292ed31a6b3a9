//! Basic example of using the cube scan engine

use lazycube_core::{
    BoundingBox, Cube, CubeValidator, DetectionClass, Face, FaceAdder, Prediction, ScanConfig,
    ScanEvent, Scanner,
};

const SCRAMBLE: [&str; 6] = [
    "GRRGORYOW",
    "GYWWGYOBB",
    "GBOOROYGW",
    "YBOWBWBRO",
    "WYGBWWYRR",
    "BORGYYBGR",
];

fn frame(face: &Face) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = face
        .colours()
        .iter()
        .enumerate()
        .map(|(i, &colour)| {
            let (x, y) = (100 + (i % 3) as i32 * 60, 100 + (i / 3) as i32 * 60);
            Prediction::new(
                90,
                BoundingBox::new(x - 25, y - 25, x + 25, y + 25),
                DetectionClass::Square(colour),
            )
        })
        .collect();
    predictions.push(Prediction::new(95, BoundingBox::new(50, 50, 270, 270), DetectionClass::Face));
    predictions
}

fn main() {
    // Place faces directly, in whatever orientation they were read
    println!("Adding faces one at a time...\n");
    let mut adder = FaceAdder::new();
    for (letters, turns) in SCRAMBLE.iter().zip([0, 0, 2, 0, 1, 0]) {
        let face = Face::from_letters(letters).expect("valid face letters").rotated(turns);
        let placed = adder.add_face(&face);
        println!("{} -> {}", face.to_letters(), if placed { "placed" } else { "rejected" });
    }

    println!("\nAssembled cube:");
    println!("{}", adder.cube());

    let report = CubeValidator::new(adder.cube()).report();
    println!("\nValidation: {:?}", report);
    println!("Solvable: {}", !adder.cube().parity_check_fail());
    println!("Solver string: {}", adder.cube().to_direction_string());
    println!("Display string: {}", adder.cube().to_display_string());

    // Drive the full pipeline with synthetic detections
    println!("\n--- Scanning synthetic frames (turbo) ---\n");
    let mut scanner = Scanner::new(ScanConfig::turbo());
    let mut on_event = |event: &ScanEvent| match event {
        ScanEvent::CubeComplete(cube) => println!("complete:\n{}", cube),
        other => println!("{:?}", other),
    };
    for face in adder.cube().faces() {
        for _ in 0..3 {
            scanner.process_frame(&frame(face), &mut on_event);
        }
    }

    // Parse a cube from a string
    println!("\n--- Parsing a cube from string ---\n");
    let letters = SCRAMBLE.join("");
    if let Ok(cube) = Cube::from_letters(&letters) {
        println!("Valid: {}", CubeValidator::new(&cube).is_cube_valid());
        println!("Letter faces: {:?}", cube.to_letter_faces());
    }
}
