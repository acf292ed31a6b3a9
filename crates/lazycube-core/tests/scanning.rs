//! The full pipeline from detection boxes to a finished cube.

mod common;

use common::*;
use lazycube_core::{
    BoundingBox, Colour, Cube, DetectionClass, Prediction, ScanConfig, ScanEvent, ScanStatus,
    Scanner,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// One camera frame showing a single face, stickers jittered and shuffled.
fn frame(letters: &str, rng: &mut StdRng) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = letters
        .chars()
        .enumerate()
        .map(|(i, l)| {
            let x = 100 + (i % 3) as i32 * 60 + rng.gen_range(-3..=3);
            let y = 100 + (i / 3) as i32 * 60 + rng.gen_range(-3..=3);
            Prediction::new(
                rng.gen_range(60..=99),
                BoundingBox::new(x - 25, y - 25, x + 25, y + 25),
                DetectionClass::Square(colour(l)),
            )
        })
        .collect();
    predictions.push(Prediction::new(
        97,
        BoundingBox::new(50, 50, 270, 270),
        DetectionClass::Face,
    ));
    predictions.shuffle(rng);
    predictions
}

/// Misread cell `index` as some other colour.
fn misread(letters: &str, index: usize) -> String {
    letters
        .chars()
        .enumerate()
        .map(|(i, l)| match (i == index, l) {
            (true, 'B') => 'G',
            (true, _) => 'B',
            (false, _) => l,
        })
        .collect()
}

struct Session {
    scanner: Scanner,
    events: Vec<ScanEvent>,
    start: Instant,
    frames: u64,
    rng: StdRng,
}

impl Session {
    fn new(config: ScanConfig) -> Self {
        Self {
            scanner: Scanner::new(config),
            events: Vec::new(),
            start: Instant::now(),
            frames: 0,
            rng: StdRng::seed_from_u64(11),
        }
    }

    fn show(&mut self, letters: &str, times: usize) -> ScanStatus {
        let mut status = ScanStatus::Scanning { buffered: 0 };
        for _ in 0..times {
            let predictions = frame(letters, &mut self.rng);
            let now = self.start + Duration::from_millis(self.frames * 100);
            self.frames += 1;
            status = self.scanner.process_frame_at(&predictions, &mut self.events, now);
        }
        status
    }
}

#[test]
fn test_noisy_scramble_scan_completes() {
    let expected = &SCRAMBLED[1];
    let turns = [0, 0, 2, 0, 1, 0];
    let mut session = Session::new(ScanConfig::default());
    let mut status = ScanStatus::Scanning { buffered: 0 };
    for (slot, (&letters, t)) in expected.iter().zip(turns).enumerate() {
        let shown = face(letters).rotated(t).to_letters();
        session.show(&shown, 1);
        // two misreads of the top-left sticker are outvoted
        session.show(&misread(&shown, 0), 2);
        status = session.show(&shown, 11);
        if slot < 5 {
            assert_eq!(status, ScanStatus::Scanning { buffered: slot + 1 });
        }
    }

    assert_eq!(status, ScanStatus::Completed);
    let Some(ScanEvent::CubeComplete(cube)) = session.events.last() else {
        panic!("no completion event in {:?}", session.events);
    };
    assert_eq!(letters(cube), expected.to_vec());
    assert!(!cube.parity_check_fail());

    let scanned: Vec<Colour> = session
        .events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::FaceScanned(c) => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(scanned, Colour::ALL.to_vec());
    assert!(!session.events.iter().any(|e| matches!(e, ScanEvent::SoftFailure)));
}

#[test]
fn test_promotion_needs_enough_frames() {
    let mut session = Session::new(ScanConfig::default());
    assert_eq!(session.show(SOLVED[2], 11), ScanStatus::Scanning { buffered: 0 });
    assert_eq!(session.show(SOLVED[2], 1), ScanStatus::Scanning { buffered: 1 });
    assert_eq!(session.scanner.queue().buffered_colours(), &[Colour::Red]);
}

#[test]
fn test_bad_face_is_reset_and_rescanned() {
    let mut session = Session::new(ScanConfig::turbo());
    for letters in &SOLVED[1..] {
        session.show(letters, 3);
    }
    assert_eq!(session.scanner.queue().buffered_len(), 5);

    // sixteen reds once placed
    session.show("RRRROORRR", 3);
    assert!(session.events.contains(&ScanEvent::SoftFailure));
    assert!(session.events.contains(&ScanEvent::FaceNeedsRescan(Colour::Orange)));
    assert!(!session.scanner.queue().is_buffered(Colour::Orange));
    assert!(session.scanner.queue().queued(Colour::Orange).is_none());

    assert_eq!(session.show(SOLVED[0], 3), ScanStatus::Completed);
    assert_eq!(letters(session.scanner.cube()), SOLVED.to_vec());
}

#[test]
fn test_unsolvable_scan_fails_for_good() {
    let mut session = Session::new(ScanConfig::turbo());
    let mut faces = SOLVED.map(String::from);
    faces[0] = "OWOOOOOOO".into();
    faces[4] = "WWWOWWWWW".into();

    let mut status = ScanStatus::Scanning { buffered: 0 };
    for letters in &faces {
        status = session.show(letters, 3);
    }
    assert_eq!(status, ScanStatus::Failed);
    assert!(session.events.contains(&ScanEvent::UnrecoverableFailure));

    let before = session.events.len();
    assert_eq!(session.show(SOLVED[0], 1), ScanStatus::Failed);
    assert_eq!(session.events.len(), before);

    session.scanner.reset();
    assert_eq!(session.scanner.cube(), &Cube::new());
    assert_eq!(session.show(SOLVED[3], 3), ScanStatus::Scanning { buffered: 1 });
}

#[test]
fn test_recorded_frames_replay_identically() {
    let mut rng = StdRng::seed_from_u64(3);
    let frames: Vec<Vec<Prediction>> = SOLVED
        .iter()
        .flat_map(|letters| (0..3).map(|_| frame(letters, &mut rng)).collect::<Vec<_>>())
        .collect();

    let json = serde_json::to_string(&frames).unwrap();
    let replayed: Vec<Vec<Prediction>> = serde_json::from_str(&json).unwrap();
    assert_eq!(replayed, frames);

    let config: ScanConfig = serde_json::from_str(r#"{"turbo": true}"#).unwrap();
    let mut scanner = Scanner::new(config);
    let mut events: Vec<ScanEvent> = Vec::new();
    let start = Instant::now();
    let mut status = ScanStatus::Scanning { buffered: 0 };
    for (i, predictions) in replayed.iter().enumerate() {
        let now = start + Duration::from_millis(i as u64 * 100);
        status = scanner.process_frame_at(predictions, &mut events, now);
    }
    assert_eq!(status, ScanStatus::Completed);
    assert!(matches!(events.last(), Some(ScanEvent::CubeComplete(_))));
}

#[test]
fn test_rotated_rescans_merge_into_one_face() {
    let mut session = Session::new(ScanConfig::default());
    let shown = face(SCRAMBLED[0][4]);
    session.show(&shown.to_letters(), 4);
    session.show(&shown.rotated(1).to_letters(), 4);
    session.show(&shown.rotated(3).to_letters(), 4);

    let queue = session.scanner.queue();
    assert!(queue.is_buffered(Colour::White));
    let merged = queue.queued(Colour::White).unwrap();
    assert_eq!(merged.to_letters(), shown.to_letters());
    assert_eq!(merged.min_times_seen(), 11);
}
