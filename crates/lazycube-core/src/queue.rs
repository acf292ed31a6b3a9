//! Temporal integration of scanned faces.
//!
//! Every frame contributes one observation per visible face. Observations of
//! the same centre colour are aligned to a common orientation and merged into
//! a running tally; once the weakest cell of a face is confident enough the
//! face is promoted to the buffer. When all six faces are buffered they are
//! flushed into a [`FaceAdder`].

use crate::adder::FaceAdder;
use crate::colour::{Colour, NUM_COLOURS};
use crate::config::ScanConfig;
use crate::cube::Cube;
use crate::error::{CubeError, CubeResult};
use crate::face::{Face, FACE_CELLS};
use crate::verify::{FaceletVerifier, ParityCheck};
use itertools::Itertools;
use tracing::{debug, info, trace, warn};

/// Confidence accumulator and buffer in front of the face adder.
pub struct AdderQueue {
    /// One accumulating face per centre colour, in first-seen order
    queue: Vec<Face>,
    /// Promoted colours, in promotion order; faces live in `queue`
    buffer: Vec<Colour>,
    fail_counts: [u32; NUM_COLOURS],
    adder: FaceAdder,
    parity: Box<dyn ParityCheck + Send>,
    frame_threshold: u32,
    rotation_match_threshold: usize,
    swap_threshold: f32,
}

impl Default for AdderQueue {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl AdderQueue {
    pub fn new(config: &ScanConfig) -> Self {
        Self::with_parity_check(config, Box::new(FaceletVerifier))
    }

    /// Use a custom solvability oracle, e.g. the host solver's own verifier.
    pub fn with_parity_check(config: &ScanConfig, parity: Box<dyn ParityCheck + Send>) -> Self {
        Self {
            queue: Vec::new(),
            buffer: Vec::new(),
            fail_counts: [0; NUM_COLOURS],
            adder: FaceAdder::new(),
            parity,
            frame_threshold: config.promotion_threshold(),
            rotation_match_threshold: config.rotation_match_threshold,
            swap_threshold: config.swap_threshold,
        }
    }

    /// Drop every observation and start again from a blank cube.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.buffer.clear();
        self.fail_counts = [0; NUM_COLOURS];
        self.adder = FaceAdder::new();
    }

    /// Switch the promotion threshold between the normal and turbo values.
    pub fn set_turbo(&mut self, config: &ScanConfig, turbo: bool) {
        self.frame_threshold = if turbo {
            config.turbo_frame_threshold
        } else {
            config.frame_threshold
        };
    }

    /// The adder's working cube.
    pub fn cube(&self) -> &Cube {
        self.adder.cube()
    }

    /// Number of promoted faces.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_buffered(&self, colour: Colour) -> bool {
        self.buffer.contains(&colour)
    }

    /// Promoted colours in promotion order.
    pub fn buffered_colours(&self) -> &[Colour] {
        &self.buffer
    }

    /// Promoted faces in promotion order.
    pub fn buffered_faces(&self) -> Vec<&Face> {
        self.buffer.iter().filter_map(|&c| self.queued(c)).collect()
    }

    /// The accumulating face for `colour`, promoted or not.
    pub fn queued(&self, colour: Colour) -> Option<&Face> {
        self.queue.iter().find(|f| f.centre() == colour)
    }

    fn queued_mut(&mut self, colour: Colour) -> Option<&mut Face> {
        self.queue.iter_mut().find(|f| f.centre() == colour)
    }

    /// Merge one observation of a face.
    pub fn add_element(&mut self, face: Face) {
        let colour = face.centre();
        if !colour.is_known() {
            debug!("dropping face without a centre colour");
            return;
        }

        let rotation_match_threshold = self.rotation_match_threshold;
        match self.queued_mut(colour) {
            Some(stored) => {
                let aligned = align_rotation(stored, &face, rotation_match_threshold);
                for i in 0..FACE_CELLS {
                    stored.square_mut(i).observe(aligned.square(i).colour());
                }
            }
            None => self.queue.push(face),
        }

        let confident = self
            .queued(colour)
            .map(|f| f.min_times_seen() > self.frame_threshold)
            .unwrap_or(false);
        if confident && !self.is_buffered(colour) {
            info!(%colour, "face promoted to buffer");
            self.buffer.push(colour);
        }
    }

    /// Flush buffered faces into the cube once all six are present, and
    /// repair parity by reordering if the completed cube is unsolvable.
    ///
    /// Returns the faces that could not be placed. `Err(Unrecoverable)`
    /// means no ordering of the buffered faces gives a solvable cube.
    /// Parity repair needs all six faces buffered.
    pub fn add_candidate_faces(&mut self) -> CubeResult<Vec<Face>> {
        let mut failed = Vec::new();
        if self.buffer.len() == NUM_COLOURS {
            failed = self.flush();
        }

        if self.buffer.len() == NUM_COLOURS
            && self.adder.cube().is_complete()
            && self.parity.verify(self.adder.cube()).is_err()
        {
            self.fix_parity()?;
        }
        Ok(failed)
    }

    fn flush(&mut self) -> Vec<Face> {
        let faces: Vec<Face> = self.buffered_faces().into_iter().cloned().collect();
        let mut failed = Vec::new();
        for face in faces {
            if !self.adder.add_face(&face) {
                warn!(colour = %face.centre(), "face failed to flush");
                failed.push(face);
            }
        }
        info!(failed = failed.len(), "flushed buffered faces");
        failed
    }

    fn fix_parity(&mut self) -> CubeResult<()> {
        let faces: Vec<Face> = self.buffered_faces().into_iter().cloned().collect();

        for order in (0..faces.len()).permutations(faces.len()) {
            trace!(?order, "trying face order");
            let mut adder = FaceAdder::new();
            for &i in &order {
                if !adder.add_face(&faces[i]) {
                    trace!(colour = %faces[i].centre(), "face failed in reordering");
                }
            }
            if self.parity.verify(adder.cube()).is_ok() {
                info!(?order, "parity fixed by reordering faces");
                self.adder = adder;
                return Ok(());
            }
        }

        warn!("no face order gives a solvable cube");
        Err(CubeError::Unrecoverable)
    }

    /// Forget everything gathered for `colour` so it can be scanned afresh.
    pub fn reset_face(&mut self, colour: Colour) {
        if let Some(pos) = self.buffer.iter().position(|&c| c == colour) {
            self.buffer.remove(pos);
            self.queue.retain(|f| f.centre() != colour);
            warn!(%colour, "buffered face reset");
        }
    }

    /// Count one more flush failure for `colour`; returns the new count.
    pub fn record_failure(&mut self, colour: Colour) -> u32 {
        match colour.slot() {
            Some(slot) => {
                self.fail_counts[slot] += 1;
                self.fail_counts[slot]
            }
            None => 0,
        }
    }

    pub fn clear_failures(&mut self, colour: Colour) {
        if let Some(slot) = colour.slot() {
            self.fail_counts[slot] = 0;
        }
    }

    pub fn failures(&self, colour: Colour) -> u32 {
        colour.slot().map(|s| self.fail_counts[s]).unwrap_or(0)
    }

    /// Try repairing the buffered face of `colour` by switching ambiguous
    /// squares to their runner-up colour.
    ///
    /// Squares whose runner-up tally is above the swap threshold are
    /// candidates. With one to three candidates every non-empty subset is
    /// tried. The first variant the adder accepts replaces the buffered face
    /// with the swapped squares pinned.
    pub fn try_colour_swaps(&mut self, colour: Colour) -> bool {
        if !self.is_buffered(colour) {
            return false;
        }
        let Some(face) = self.queued(colour).cloned() else {
            return false;
        };

        let threshold = self.swap_threshold;
        let candidates: Vec<usize> = (0..FACE_CELLS)
            .filter(|&i| {
                let square = face.square(i);
                square.second_seen() as f32 > threshold * square.times_seen() as f32
            })
            .collect();
        if candidates.is_empty() || candidates.len() > 3 {
            return false;
        }

        for mask in 1u32..(1 << candidates.len()) {
            let subset: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &i)| i)
                .collect();

            let mut modified = face.clone();
            for &i in &subset {
                if let Some(second) = modified.square(i).second_colour() {
                    modified.square_mut(i).force_colour(second);
                }
            }

            if self.adder.add_face(&modified) {
                info!(%colour, ?subset, "colour swap accepted");
                for &i in &subset {
                    let square = modified.square_mut(i);
                    let pinned = square.colour();
                    square.set(pinned, u32::MAX);
                }
                if let Some(stored) = self.queued_mut(colour) {
                    *stored = modified;
                }
                return true;
            }
            debug!(%colour, ?subset, "colour swap rejected");
        }
        false
    }
}

/// Rotate `incoming` to line up with `stored`.
///
/// The first rotation matching at least `threshold` cells wins; otherwise
/// the rotation with the most matches.
fn align_rotation(stored: &Face, incoming: &Face, threshold: usize) -> Face {
    let mut best = (0, incoming.clone());
    let mut rotated = incoming.clone();

    for _ in 0..4 {
        let matches = (0..FACE_CELLS)
            .filter(|&i| rotated.square(i).colour() == stored.square(i).colour())
            .count();
        if matches >= threshold {
            return rotated;
        }
        if matches > best.0 {
            best = (matches, rotated.clone());
        }
        rotated = rotated.rotate();
    }
    best.1
}
