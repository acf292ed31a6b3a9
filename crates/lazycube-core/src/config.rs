use serde::{Deserialize, Serialize};

/// Environment variable that switches turbo mode on.
pub const TURBO_ENV: &str = "LAZYCUBE_TURBO";

/// Tuning knobs for the scan pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Trade confidence for speed by promoting faces after very few frames
    pub turbo: bool,
    /// A face is promoted once its weakest cell has been seen more often than this
    pub frame_threshold: u32,
    /// Promotion threshold used in turbo mode
    pub turbo_frame_threshold: u32,
    /// Matching cells (of 9) that mark two observations as the same orientation
    pub rotation_match_threshold: usize,
    /// Flush failures of one colour before its buffered face is discarded
    pub fail_reset_threshold: u32,
    /// Quiet period before the user is told to rotate the cube
    pub rotate_hint_after_ms: u64,
    /// Time after the first failure before a full rescan is suggested
    pub complete_fail_after_ms: u64,
    /// Second-colour ratio that makes a square a swap candidate
    pub swap_threshold: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            turbo: false,
            frame_threshold: 10,
            turbo_frame_threshold: 1,
            rotation_match_threshold: 7,
            fail_reset_threshold: 1,
            rotate_hint_after_ms: 5000,
            complete_fail_after_ms: 15000,
            swap_threshold: 0.3,
        }
    }
}

impl ScanConfig {
    pub fn turbo() -> Self {
        Self {
            turbo: true,
            ..Self::default()
        }
    }

    /// Defaults, with turbo mode taken from `LAZYCUBE_TURBO`.
    pub fn from_env() -> Self {
        let turbo = matches!(
            std::env::var(TURBO_ENV).as_deref(),
            Ok("1") | Ok("true") | Ok("on")
        );
        Self {
            turbo,
            ..Self::default()
        }
    }

    /// The promotion threshold currently in force.
    pub fn promotion_threshold(&self) -> u32 {
        if self.turbo {
            self.turbo_frame_threshold
        } else {
            self.frame_threshold
        }
    }
}
