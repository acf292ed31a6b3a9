//! Frame-by-frame scan driver.
//!
//! Wires the detector, the adder queue and the retry policy together and
//! reports progress to an observer. One call handles one detection frame.

use crate::colour::Colour;
use crate::config::ScanConfig;
use crate::cube::Cube;
use crate::detector::{FaceDetector, Prediction};
use crate::face::Face;
use crate::queue::AdderQueue;
use crate::validator::CubeValidator;
use crate::verify::ParityCheck;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Progress notifications emitted while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanEvent {
    /// A new face reached the buffer
    FaceScanned(Colour),
    /// A face could not be placed and should be shown again
    FaceNeedsRescan(Colour),
    /// The scanned faces can never form a solvable cube
    UnrecoverableFailure,
    /// The cube is complete and valid
    CubeComplete(Cube),
    /// Show or hide the "rotate the cube" hint
    RotateHint { on: bool },
    /// Faces failed to flush for the first time
    SoftFailure,
    /// Failures have persisted; a full rescan is advisable
    CompleteFailureSuggested,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Completed,
    Failed,
    Scanning { buffered: usize },
}

/// Receives scan events.
pub trait ScanObserver {
    fn notify(&mut self, event: &ScanEvent);
}

impl ScanObserver for Vec<ScanEvent> {
    fn notify(&mut self, event: &ScanEvent) {
        self.push(event.clone());
    }
}

impl<F> ScanObserver for F
where
    F: FnMut(&ScanEvent),
{
    fn notify(&mut self, event: &ScanEvent) {
        self(event)
    }
}

/// Owns the whole scan session state.
///
/// `process_frame` takes `&mut self`, so frames are serialized by
/// construction; hosts sharing a scanner across threads wrap it in a mutex.
pub struct Scanner {
    config: ScanConfig,
    detector: FaceDetector,
    queue: AdderQueue,
    completed: bool,
    unrecoverable: bool,
    last_buffered: Option<usize>,
    last_face_at: Option<Instant>,
    fail_at: Option<Instant>,
    complete_fail_sent: bool,
    rotate_hint: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        let queue = AdderQueue::new(&config);
        Self::with_queue(config, queue)
    }

    /// Use a custom solvability oracle.
    pub fn with_parity_check(config: ScanConfig, parity: Box<dyn ParityCheck + Send>) -> Self {
        let queue = AdderQueue::with_parity_check(&config, parity);
        Self::with_queue(config, queue)
    }

    fn with_queue(config: ScanConfig, queue: AdderQueue) -> Self {
        Self {
            config,
            detector: FaceDetector::new(),
            queue,
            completed: false,
            unrecoverable: false,
            last_buffered: None,
            last_face_at: None,
            fail_at: None,
            complete_fail_sent: false,
            rotate_hint: false,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn set_turbo(&mut self, turbo: bool) {
        self.config.turbo = turbo;
        self.queue.set_turbo(&self.config, turbo);
    }

    /// Drop all gathered evidence and start a new session.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.detector = FaceDetector::new();
        self.completed = false;
        self.unrecoverable = false;
        self.last_buffered = None;
        self.last_face_at = None;
        self.fail_at = None;
        self.complete_fail_sent = false;
        self.rotate_hint = false;
    }

    pub fn queue(&self) -> &AdderQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut AdderQueue {
        &mut self.queue
    }

    pub fn cube(&self) -> &Cube {
        self.queue.cube()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn process_frame<O>(&mut self, predictions: &[Prediction], observer: &mut O) -> ScanStatus
    where
        O: ScanObserver + ?Sized,
    {
        self.process_frame_at(predictions, observer, Instant::now())
    }

    /// Process one frame as if it arrived at `now`.
    pub fn process_frame_at<O>(
        &mut self,
        predictions: &[Prediction],
        observer: &mut O,
        now: Instant,
    ) -> ScanStatus
    where
        O: ScanObserver + ?Sized,
    {
        if self.completed {
            return ScanStatus::Completed;
        }
        if self.unrecoverable {
            return ScanStatus::Failed;
        }

        match self.detector.detect_faces(predictions) {
            Ok(faces) => {
                for face in faces {
                    self.queue.add_element(face);
                }
            }
            Err(err) => warn!(%err, "dropping malformed face detections"),
        }

        let failed = match self.queue.add_candidate_faces() {
            Ok(failed) => failed,
            Err(err) => {
                warn!(%err, "scan cannot produce a solvable cube");
                self.unrecoverable = true;
                observer.notify(&ScanEvent::UnrecoverableFailure);
                return ScanStatus::Failed;
            }
        };

        for face in &failed {
            observer.notify(&ScanEvent::FaceNeedsRescan(face.centre()));
        }

        let buffered = self.queue.buffered_len();
        if self.last_buffered != Some(buffered) {
            self.last_buffered = Some(buffered);
            self.last_face_at = Some(now);
            if let Some(&colour) = self.queue.buffered_colours().last() {
                observer.notify(&ScanEvent::FaceScanned(colour));
            }
        }

        self.update_rotate_hint(now, observer);
        self.handle_failures(&failed, now, observer);

        let cube = self.queue.cube();
        if cube.is_complete() && CubeValidator::new(cube).is_cube_valid() {
            info!("cube scan complete");
            self.completed = true;
            observer.notify(&ScanEvent::CubeComplete(cube.clone()));
            return ScanStatus::Completed;
        }

        ScanStatus::Scanning {
            buffered: self.queue.buffered_len(),
        }
    }

    fn update_rotate_hint<O>(&mut self, now: Instant, observer: &mut O)
    where
        O: ScanObserver + ?Sized,
    {
        let quiet = self
            .last_face_at
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default();
        let on = quiet > Duration::from_millis(self.config.rotate_hint_after_ms) && self.fail_at.is_none();

        if on != self.rotate_hint {
            debug!(on, "rotate hint");
            self.rotate_hint = on;
            observer.notify(&ScanEvent::RotateHint { on });
        }
    }

    fn handle_failures<O>(&mut self, failed: &[Face], now: Instant, observer: &mut O)
    where
        O: ScanObserver + ?Sized,
    {
        if !failed.is_empty() && self.fail_at.is_none() {
            observer.notify(&ScanEvent::SoftFailure);
            self.fail_at = Some(now);
        }

        for face in failed {
            let colour = face.centre();
            if self.queue.record_failure(colour) >= self.config.fail_reset_threshold {
                observer.notify(&ScanEvent::FaceNeedsRescan(colour));
                self.queue.reset_face(colour);
                self.queue.clear_failures(colour);
            }
        }

        // timed from the first failure, checked on every later cycle
        if let Some(since) = self.fail_at {
            let elapsed = now.saturating_duration_since(since);
            if !self.complete_fail_sent && elapsed > Duration::from_millis(self.config.complete_fail_after_ms) {
                warn!("failures persisted, suggesting a full rescan");
                self.complete_fail_sent = true;
                observer.notify(&ScanEvent::CompleteFailureSuggested);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{BoundingBox, DetectionClass};

    /// Nine sticker boxes plus a face box for one face.
    fn frame(letters: &str) -> Vec<Prediction> {
        let mut predictions = Vec::new();
        for (i, l) in letters.chars().enumerate() {
            let (x, y) = (100 + (i % 3) as i32 * 60, 100 + (i / 3) as i32 * 60);
            predictions.push(Prediction::new(
                90,
                BoundingBox::new(x - 25, y - 25, x + 25, y + 25),
                DetectionClass::Square(Colour::from_letter(l).unwrap()),
            ));
        }
        predictions.push(Prediction::new(
            95,
            BoundingBox::new(50, 50, 270, 270),
            DetectionClass::Face,
        ));
        predictions
    }

    const SOLVED: [&str; 6] = [
        "OOOOOOOOO",
        "GGGGGGGGG",
        "RRRRRRRRR",
        "BBBBBBBBB",
        "WWWWWWWWW",
        "YYYYYYYYY",
    ];

    #[test]
    fn test_turbo_scan_completes() {
        let mut scanner = Scanner::new(ScanConfig::turbo());
        let mut events: Vec<ScanEvent> = Vec::new();
        let start = Instant::now();
        let mut status = ScanStatus::Scanning { buffered: 0 };

        for (i, letters) in SOLVED.iter().enumerate() {
            for k in 0..3 {
                let now = start + Duration::from_millis((i * 3 + k) as u64 * 100);
                status = scanner.process_frame_at(&frame(letters), &mut events, now);
            }
        }

        assert_eq!(status, ScanStatus::Completed);
        assert!(scanner.is_complete());
        let scanned: Vec<Colour> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::FaceScanned(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(scanned, Colour::ALL.to_vec());
        assert!(matches!(events.last(), Some(ScanEvent::CubeComplete(_))));

        // further frames are ignored
        let before = events.len();
        assert_eq!(scanner.process_frame(&frame(SOLVED[0]), &mut events), ScanStatus::Completed);
        assert_eq!(events.len(), before);
    }

    #[test]
    fn test_rotate_hint_transitions() {
        let mut scanner = Scanner::new(ScanConfig::turbo());
        let mut events: Vec<ScanEvent> = Vec::new();
        let start = Instant::now();

        scanner.process_frame_at(&[], &mut events, start);
        scanner.process_frame_at(&[], &mut events, start + Duration::from_millis(6000));
        scanner.process_frame_at(&[], &mut events, start + Duration::from_millis(7000));
        assert_eq!(events, vec![ScanEvent::RotateHint { on: true }]);

        for k in 0..3 {
            let now = start + Duration::from_millis(7100 + k * 100);
            scanner.process_frame_at(&frame(SOLVED[0]), &mut events, now);
        }
        assert!(events.contains(&ScanEvent::FaceScanned(Colour::Orange)));
        assert_eq!(events.last(), Some(&ScanEvent::RotateHint { on: false }));
    }

    #[test]
    fn test_closure_observer() {
        let mut scanner = Scanner::new(ScanConfig::turbo());
        let mut count = 0;
        let mut observer = |_: &ScanEvent| count += 1;
        for _ in 0..3 {
            scanner.process_frame(&frame(SOLVED[4]), &mut observer);
        }
        assert_eq!(count, 1);
        assert_eq!(scanner.queue().buffered_colours(), &[Colour::White]);
    }

    #[test]
    fn test_persistent_failure_suggests_full_rescan() {
        let config = ScanConfig {
            fail_reset_threshold: 1000,
            ..ScanConfig::turbo()
        };
        let mut scanner = Scanner::new(config);
        let mut events: Vec<ScanEvent> = Vec::new();
        let start = Instant::now();
        let mut tick = 0u64;
        let mut show = |scanner: &mut Scanner, events: &mut Vec<ScanEvent>, letters: &str| {
            let now = start + Duration::from_millis(tick * 100);
            tick += 1;
            scanner.process_frame_at(&frame(letters), events, now)
        };

        for letters in &SOLVED[1..] {
            for _ in 0..3 {
                show(&mut scanner, &mut events, *letters);
            }
        }
        // sixteen reds: this orange face never fits
        for _ in 0..200 {
            show(&mut scanner, &mut events, "RRRROORRR");
        }

        let count = |wanted: &ScanEvent| events.iter().filter(|e| *e == wanted).count();
        assert_eq!(count(&ScanEvent::SoftFailure), 1);
        assert_eq!(count(&ScanEvent::CompleteFailureSuggested), 1);
        assert!(count(&ScanEvent::FaceNeedsRescan(Colour::Orange)) > 150);
        assert!(!scanner.is_complete());
    }

    #[test]
    fn test_reset_starts_over() {
        let mut scanner = Scanner::new(ScanConfig::turbo());
        let mut events: Vec<ScanEvent> = Vec::new();
        for _ in 0..3 {
            scanner.process_frame(&frame(SOLVED[1]), &mut events);
        }
        assert_eq!(scanner.queue().buffered_len(), 1);

        scanner.reset();
        assert_eq!(scanner.queue().buffered_len(), 0);
        assert!(scanner.config().turbo);
        assert_eq!(scanner.cube(), &Cube::new());
    }
}
