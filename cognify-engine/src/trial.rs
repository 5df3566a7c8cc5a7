use cognify_core::TrialRecord;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Per-trial phase lengths, in nanoseconds on the session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialDurations {
    pub cue_ns: u64,
    pub display_ns: u64,
    pub gap_ns: u64,
}

impl TrialDurations {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            cue_ns: config.cue_display_ms * 1_000_000,
            display_ns: config.response_deadline_ms() * 1_000_000,
            gap_ns: config.blank_gap_ms * 1_000_000,
        }
    }
}

/// A completed session: every trial finalized, in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub config: SessionConfig,
    pub trials: Vec<TrialRecord>,
}
