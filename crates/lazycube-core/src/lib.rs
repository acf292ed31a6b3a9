//! Rubik's cube scan assembly engine.
//!
//! Takes noisy per-frame sticker detections and turns them into one
//! consistent, solvable cube:
//!
//! - [`FaceDetector`] groups detection boxes into faces and orders them 3x3
//! - [`AdderQueue`] accumulates colour votes per cell across frames
//! - [`FaceAdder`] places faces with rotation search and backtracking
//! - [`CubeValidator`] checks centres, edges, corners and colour counts
//! - [`FaceletVerifier`] rejects flipped, twisted or swapped pieces
//! - [`Scanner`] drives all of the above one frame at a time
//!
//! # Example
//!
//! ```
//! use lazycube_core::{Face, FaceAdder, CubeValidator};
//!
//! let mut adder = FaceAdder::new();
//! let face = Face::from_letters("ORYGWBWYG").unwrap();
//! assert!(adder.add_face(&face));
//! assert!(CubeValidator::new(adder.cube()).is_cube_valid());
//! ```

pub mod adder;
pub mod colour;
pub mod config;
pub mod cube;
pub mod detector;
pub mod error;
pub mod face;
pub mod queue;
pub mod scanner;
pub mod square;
pub mod validator;
pub mod verify;

pub use adder::FaceAdder;
pub use colour::{Colour, NUM_COLOURS};
pub use config::ScanConfig;
pub use cube::{Cube, CUBE_CELLS};
pub use detector::{BoundingBox, DetectionCenter, DetectionClass, FaceDetector, Prediction};
pub use error::{CubeError, CubeResult};
pub use face::{Face, FACE_CELLS};
pub use queue::AdderQueue;
pub use scanner::{ScanEvent, ScanObserver, ScanStatus, Scanner};
pub use square::Square;
pub use validator::{CubeValidator, ValidationReport};
pub use verify::{verify_facelets, FaceletVerifier, ParityCheck, VerifyError};
