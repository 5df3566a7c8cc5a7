use serde::{Deserialize, Serialize};

use crate::response::ResponseValue;
use crate::stimulus::{ScoringRule, StimulusSpec};

/// Outcome of a single finalized trial.
///
/// The first four belong to cued-recognition scoring, the last three to
/// discrimination scoring; a trial only ever receives one from its own rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Hit,
    Miss,
    FalsePositive,
    CorrectRejection,
    Correct,
    Incorrect,
    Timeout,
}

impl Classification {
    pub fn is_correct(&self) -> bool {
        matches!(
            self,
            Classification::Hit | Classification::CorrectRejection | Classification::Correct
        )
    }

    pub fn rule(&self) -> ScoringRule {
        match self {
            Classification::Hit
            | Classification::Miss
            | Classification::FalsePositive
            | Classification::CorrectRejection => ScoringRule::CuedRecognition,
            Classification::Correct | Classification::Incorrect | Classification::Timeout => {
                ScoringRule::Discrimination
            }
        }
    }
}

/// Recorded result per trial. Built once, at finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub stimulus: StimulusSpec,
    pub user_responded: bool,
    pub selected_value: Option<ResponseValue>,
    pub is_correct: bool,
    pub classification: Classification,
    pub reaction_time_ms: Option<f64>,
    /// Finalization time, nanoseconds on the session timer.
    pub timestamp_ns: u64,
}

impl TrialRecord {
    pub fn position(&self) -> usize {
        self.stimulus.position
    }
}
