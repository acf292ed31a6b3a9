//! Turning raw object-detection boxes into ordered faces.
//!
//! The detector model reports one box per visible sticker plus one box per
//! visible face. Stickers are grouped by the face box containing them, then
//! ordered row by row into the 3x3 layout the rest of the engine expects.

use crate::colour::Colour;
use crate::error::CubeResult;
use crate::face::{Face, FACE_CELLS};
use serde::{Deserialize, Serialize};

/// Model label order mapped onto engine class indices.
const MODEL_CLASS_MAP: [u8; 7] = [3, 1, 0, 2, 4, 5, 6];

/// Class index the detector uses for a whole face.
pub const FACE_CLASS: u8 = 6;

/// Axis-aligned box in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).abs()
    }

    /// Integer midpoint.
    pub fn centre(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    /// Strict containment; points on the border are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x > self.left && x < self.right && y > self.top && y < self.bottom
    }
}

/// What a detection box shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionClass {
    Square(Colour),
    Face,
}

impl DetectionClass {
    /// Class from its engine index: 0-5 are colours, 6 is a face.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            FACE_CLASS => Some(DetectionClass::Face),
            i if (i as usize) < Colour::ALL.len() => Some(DetectionClass::Square(Colour::ALL[i as usize])),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            DetectionClass::Square(colour) => colour.index() as u8,
            DetectionClass::Face => FACE_CLASS,
        }
    }
}

/// One detection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Score as a percentage
    pub confidence: u8,
    pub bbox: BoundingBox,
    pub class: DetectionClass,
}

impl Prediction {
    pub fn new(confidence: u8, bbox: BoundingBox, class: DetectionClass) -> Self {
        Self {
            confidence,
            bbox,
            class,
        }
    }

    /// Convert a raw model output: scale the box to display pixels and map
    /// the model's label onto the engine's class order.
    pub fn from_model(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        model_index: usize,
        score: f32,
        factor: f32,
    ) -> Option<Self> {
        let class = DetectionClass::from_index(*MODEL_CLASS_MAP.get(model_index)?)?;
        let bbox = BoundingBox::new(
            (left * factor) as i32,
            (top * factor) as i32,
            (right * factor) as i32,
            (bottom * factor) as i32,
        );
        let confidence = (score * 100.0).clamp(0.0, 100.0) as u8;
        Some(Self::new(confidence, bbox, class))
    }

    pub fn is_face(&self) -> bool {
        self.class == DetectionClass::Face
    }
}

/// Centre point of one sticker detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionCenter {
    pub x: i32,
    pub y: i32,
    pub colour: Colour,
}

impl DetectionCenter {
    pub fn new(x: i32, y: i32, colour: Colour) -> Self {
        Self { x, y, colour }
    }
}

/// Groups and orders sticker detections.
///
/// Carries a running average of sticker size across calls; all distance
/// tolerances are half of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaceDetector {
    avg_square_size: f32,
}

impl FaceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a known average sticker size.
    pub fn with_average_size(avg_square_size: f32) -> Self {
        Self { avg_square_size }
    }

    pub fn average_size(&self) -> f32 {
        self.avg_square_size
    }

    /// Pixel tolerance used for row and corner clustering.
    pub fn tolerance(&self) -> i32 {
        (self.avg_square_size as i32) / 2
    }

    fn measure(&mut self, bbox: &BoundingBox) {
        self.avg_square_size = (self.avg_square_size + bbox.width() as f32) / 2.0;
        self.avg_square_size = (self.avg_square_size + bbox.height() as f32) / 2.0;
    }

    /// Sticker centres inside each face box. Only groups of exactly nine are
    /// kept.
    pub fn group_faces(&mut self, predictions: &[Prediction]) -> Vec<Vec<DetectionCenter>> {
        let mut faces = Vec::new();

        for (i, face) in predictions.iter().enumerate() {
            if !face.is_face() {
                continue;
            }

            let mut group = Vec::new();
            for (j, p) in predictions.iter().enumerate() {
                let DetectionClass::Square(colour) = p.class else {
                    continue;
                };
                if i == j {
                    continue;
                }
                self.measure(&p.bbox);

                let (x, y) = p.bbox.centre();
                if face.bbox.contains(x, y) {
                    group.push(DetectionCenter::new(x, y, colour));
                }
            }

            if group.len() == FACE_CELLS {
                faces.push(group);
            }
        }
        faces
    }

    /// Order sticker centres row by row, top-left to bottom-right.
    ///
    /// Each pass picks the top-left and top-right candidates, takes every
    /// point close to the line through them as one row, and repeats on the
    /// rest. The top-left point is always consumed, so the loop terminates
    /// on any input.
    pub fn order_face(&self, centres: &[DetectionCenter]) -> Vec<DetectionCenter> {
        let tol = self.tolerance();
        let mut remaining = centres.to_vec();
        let mut ordered = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let mut by_sum = remaining.clone();
            by_sum.sort_by_key(|p| (p.x + p.y, p.x, p.y));
            let Some(start) = cluster(by_sum.iter(), |p| p.x + p.y, tol)
                .into_iter()
                .min_by_key(|p| (p.x, p.y))
            else {
                break;
            };

            let mut by_diff = remaining.clone();
            by_diff.sort_by_key(|p| (p.x - p.y, p.x, p.y));
            let Some(end) = cluster(by_diff.iter().rev(), |p| p.x - p.y, tol)
                .into_iter()
                .min_by_key(|p| (p.x, p.y))
            else {
                break;
            };

            let start_pos = remaining.iter().position(|p| *p == start).unwrap_or(0);
            if start.x == end.x {
                ordered.push(remaining.remove(start_pos));
                continue;
            }

            let m = (end.y - start.y) as f32 / (end.x - start.x) as f32;
            let c = start.y as f32 - m * start.x as f32;

            let (mut row, rest): (Vec<_>, Vec<_>) = remaining
                .into_iter()
                .enumerate()
                .partition(|(k, p)| *k == start_pos || (p.y - (m * p.x as f32 + c) as i32).abs() <= tol);
            row.sort_by_key(|(_, p)| (p.x, p.y));
            ordered.extend(row.into_iter().map(|(_, p)| p));
            remaining = rest.into_iter().map(|(_, p)| p).collect();
        }
        ordered
    }

    /// Group, order and convert every complete face in one frame.
    pub fn detect_faces(&mut self, predictions: &[Prediction]) -> CubeResult<Vec<Face>> {
        self.group_faces(predictions)
            .iter()
            .map(|group| {
                let ordered = self.order_face(group);
                Face::from_detections(ordered.iter().map(|p| p.colour))
            })
            .collect()
    }
}

/// Leading run of points whose consecutive keys differ by at most `tol`.
fn cluster<'a, I, K>(points: I, key: K, tol: i32) -> Vec<DetectionCenter>
where
    I: Iterator<Item = &'a DetectionCenter>,
    K: Fn(&DetectionCenter) -> i32,
{
    let mut run: Vec<DetectionCenter> = Vec::new();
    for p in points {
        if let Some(last) = run.last() {
            if (key(last) - key(p)).abs() > tol {
                break;
            }
        }
        run.push(*p);
    }
    run
}
