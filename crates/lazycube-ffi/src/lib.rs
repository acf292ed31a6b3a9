use lazycube_core::{
    BoundingBox, Colour, Cube, CubeValidator, DetectionClass, FaceletVerifier, ParityCheck,
    Prediction, ScanConfig, ScanEvent, Scanner,
};
use std::sync::{Arc, Mutex};

uniffi::setup_scaffolding!();

/// Sticker colour as seen by the host app
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum CubeColour {
    Orange,
    Green,
    Red,
    Blue,
    White,
    Yellow,
    Unknown,
}

impl From<Colour> for CubeColour {
    fn from(c: Colour) -> Self {
        match c {
            Colour::Orange => CubeColour::Orange,
            Colour::Green => CubeColour::Green,
            Colour::Red => CubeColour::Red,
            Colour::Blue => CubeColour::Blue,
            Colour::White => CubeColour::White,
            Colour::Yellow => CubeColour::Yellow,
            Colour::Unknown => CubeColour::Unknown,
        }
    }
}

impl From<CubeColour> for Colour {
    fn from(c: CubeColour) -> Self {
        match c {
            CubeColour::Orange => Colour::Orange,
            CubeColour::Green => Colour::Green,
            CubeColour::Red => Colour::Red,
            CubeColour::Blue => Colour::Blue,
            CubeColour::White => Colour::White,
            CubeColour::Yellow => Colour::Yellow,
            CubeColour::Unknown => Colour::Unknown,
        }
    }
}

/// One detection box from the camera model, already in display pixels
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DetectionBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// 0-5 for a sticker colour, 6 for a whole face
    pub class_index: u8,
    /// Score as a percentage
    pub confidence: u8,
}

impl DetectionBox {
    fn to_prediction(&self) -> Option<Prediction> {
        let class = DetectionClass::from_index(self.class_index)?;
        let bbox = BoundingBox::new(self.left, self.top, self.right, self.bottom);
        Some(Prediction::new(self.confidence, bbox, class))
    }
}

impl From<Prediction> for DetectionBox {
    fn from(p: Prediction) -> Self {
        DetectionBox {
            left: p.bbox.left,
            top: p.bbox.top,
            right: p.bbox.right,
            bottom: p.bbox.bottom,
            class_index: p.class.index(),
            confidence: p.confidence,
        }
    }
}

/// Something the UI should react to after a frame
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ScanSignal {
    /// A face is confidently scanned
    FaceScanned { colour: CubeColour },
    /// Ask the user to show this face again
    FaceNeedsRescan { colour: CubeColour },
    /// The scanned faces can never be solved; start over
    UnrecoverableFailure,
    /// Scan finished
    CubeComplete {
        solver_string: String,
        display_string: String,
    },
    RotateHint { on: bool },
    SoftFailure,
    CompleteFailureSuggested,
}

impl From<&ScanEvent> for ScanSignal {
    fn from(event: &ScanEvent) -> Self {
        match event {
            ScanEvent::FaceScanned(c) => ScanSignal::FaceScanned { colour: (*c).into() },
            ScanEvent::FaceNeedsRescan(c) => ScanSignal::FaceNeedsRescan { colour: (*c).into() },
            ScanEvent::UnrecoverableFailure => ScanSignal::UnrecoverableFailure,
            ScanEvent::CubeComplete(cube) => ScanSignal::CubeComplete {
                solver_string: cube.to_direction_string(),
                display_string: cube.to_display_string(),
            },
            ScanEvent::RotateHint { on } => ScanSignal::RotateHint { on: *on },
            ScanEvent::SoftFailure => ScanSignal::SoftFailure,
            ScanEvent::CompleteFailureSuggested => ScanSignal::CompleteFailureSuggested,
        }
    }
}

/// A scan session for mobile platforms
///
/// Frames may arrive from any thread; each one is processed under the lock.
#[derive(uniffi::Object)]
pub struct CubeScanner {
    scanner: Mutex<Scanner>,
}

#[uniffi::export]
impl CubeScanner {
    /// Start a new scan session
    #[uniffi::constructor]
    pub fn new(turbo: bool) -> Arc<Self> {
        let config = ScanConfig {
            turbo,
            ..ScanConfig::default()
        };
        Arc::new(Self {
            scanner: Mutex::new(Scanner::new(config)),
        })
    }

    /// Feed one frame of detections and collect what happened
    pub fn submit_frame(&self, boxes: Vec<DetectionBox>) -> Vec<ScanSignal> {
        let predictions: Vec<Prediction> = boxes.iter().filter_map(DetectionBox::to_prediction).collect();
        let mut signals = Vec::new();
        let mut collect = |event: &ScanEvent| signals.push(ScanSignal::from(event));

        self.scanner.lock().unwrap().process_frame(&predictions, &mut collect);
        signals
    }

    pub fn set_turbo(&self, turbo: bool) {
        self.scanner.lock().unwrap().set_turbo(turbo);
    }

    /// Forget everything and scan from scratch
    pub fn reset(&self) {
        self.scanner.lock().unwrap().reset();
    }

    /// Colours of the faces scanned so far, in scan order
    pub fn scanned_faces(&self) -> Vec<CubeColour> {
        let scanner = self.scanner.lock().unwrap();
        scanner
            .queue()
            .buffered_colours()
            .iter()
            .map(|&c| c.into())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.scanner.lock().unwrap().is_complete()
    }

    /// All 54 cells, face by face
    pub fn cube_colours(&self) -> Vec<CubeColour> {
        let scanner = self.scanner.lock().unwrap();
        scanner.cube().colours().into_iter().map(CubeColour::from).collect()
    }

    /// URFDLB facelets for the two-phase solver
    pub fn solver_string(&self) -> String {
        self.scanner.lock().unwrap().cube().to_direction_string()
    }

    /// Digits for the cube display widget
    pub fn display_string(&self) -> String {
        self.scanner.lock().unwrap().cube().to_display_string()
    }

    /// Current tuning as JSON
    pub fn config_json(&self) -> String {
        let scanner = self.scanner.lock().unwrap();
        serde_json::to_string(scanner.config()).unwrap_or_default()
    }
}

// MARK: - Cube Validation

/// Result of validating a 54-letter cube string
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum CubeValidation {
    Valid,
    /// Some sticker arrangement is impossible
    Invalid {
        centres: bool,
        edges: bool,
        counts: bool,
        corners: bool,
        no_duplicate_corners: bool,
    },
    /// Stickers look plausible but no sequence of moves solves the cube
    Unsolvable { code: i32, reason: String },
    InvalidFormat { reason: String },
}

/// Validate a cube given as 54 colour letters (O G R B W Y, N for unknown),
/// face by face in orange, green, red, blue, white, yellow order.
#[uniffi::export]
pub fn validate_cube_string(cube: String) -> CubeValidation {
    let cube = match Cube::from_letters(&cube) {
        Ok(c) => c,
        Err(e) => {
            return CubeValidation::InvalidFormat {
                reason: e.to_string(),
            }
        }
    };

    let report = CubeValidator::new(&cube).report();
    if !report.is_valid() {
        return CubeValidation::Invalid {
            centres: report.centres,
            edges: report.edges,
            counts: report.counts,
            corners: report.corners,
            no_duplicate_corners: report.no_duplicate_corners,
        };
    }

    if cube.is_complete() {
        if let Err(e) = FaceletVerifier.verify(&cube) {
            return CubeValidation::Unsolvable {
                code: e.code(),
                reason: e.to_string(),
            };
        }
    }
    CubeValidation::Valid
}

// Free functions for model plumbing

/// Convert one raw model output box to a detection in display pixels
#[uniffi::export]
pub fn detection_from_model(
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    model_index: u32,
    score: f32,
    factor: f32,
) -> Option<DetectionBox> {
    Prediction::from_model(left, top, right, bottom, model_index as usize, score, factor).map(DetectionBox::from)
}

/// Create a scanner from a JSON configuration; missing fields take defaults
#[uniffi::export]
pub fn scanner_from_config(json: String) -> Option<Arc<CubeScanner>> {
    let config: ScanConfig = serde_json::from_str(&json).ok()?;
    Some(Arc::new(CubeScanner {
        scanner: Mutex::new(Scanner::new(config)),
    }))
}
