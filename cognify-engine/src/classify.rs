//! Per-trial scoring. Pure: looks at one stimulus and one response only.

use cognify_core::{Classification, ResponseValue, ScoringRule, StimulusSpec, TrialRecord};

/// A response captured inside a trial's window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedResponse {
    pub value: ResponseValue,
    pub reaction_time_ms: f64,
}

pub fn classify(stimulus: &StimulusSpec, response: Option<&ResponseValue>) -> Classification {
    match stimulus.task().scoring_rule() {
        ScoringRule::CuedRecognition => match (response.is_some(), stimulus.is_target) {
            (true, true) => Classification::Hit,
            (false, true) => Classification::Miss,
            (true, false) => Classification::FalsePositive,
            (false, false) => Classification::CorrectRejection,
        },
        ScoringRule::Discrimination => match response {
            None => Classification::Timeout,
            Some(value) if stimulus.expected_response().as_ref() == Some(value) => {
                Classification::Correct
            }
            Some(_) => Classification::Incorrect,
        },
    }
}

/// Builds the frozen record for a resolved trial.
pub fn finalize(
    stimulus: StimulusSpec,
    response: Option<CapturedResponse>,
    timestamp_ns: u64,
) -> TrialRecord {
    let classification = classify(&stimulus, response.as_ref().map(|r| &r.value));
    TrialRecord {
        stimulus,
        user_responded: response.is_some(),
        selected_value: response.map(|r| r.value),
        is_correct: classification.is_correct(),
        classification,
        reaction_time_ms: response.map(|r| r.reaction_time_ms),
        timestamp_ns,
    }
}
