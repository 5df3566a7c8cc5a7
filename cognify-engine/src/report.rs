//! Persistence-ready summaries.
//!
//! These are the per-task payloads the surrounding application stores. The
//! engine only builds them; sending them anywhere is the caller's job.

use cognify_core::TrialRecord;
use serde::{Deserialize, Serialize};

use crate::config::TaskConfig;
use crate::metrics::{SessionMetrics, aggregate};
use crate::trial::SessionResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NBackSummary {
    pub n_value: usize,
    pub accuracy: u32,
    pub hits: usize,
    pub misses: usize,
    pub false_positives: usize,
    pub correct_rejections: usize,
    pub avg_reaction_time: u64,
    pub total_trials: usize,
    pub total_targets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlankerSummary {
    pub score: usize,
    pub misses: usize,
    pub false_positives: usize,
    pub accuracy: u32,
    pub avg_reaction_time_ms: u64,
    /// Every captured reaction time, right or wrong, in trial order.
    pub reaction_times: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StroopSummary {
    pub rt_neutral_ms: u64,
    pub rt_emotional_ms: u64,
    pub accuracy_neutral_pct: u32,
    pub accuracy_emotional_pct: u32,
    pub interference_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskSummary {
    NBack(NBackSummary),
    Flanker(FlankerSummary),
    Stroop(StroopSummary),
}

/// Rounded milliseconds; an absent average is stored as zero.
fn round_ms(ms: Option<f64>) -> u64 {
    ms.map(|v| v.round().max(0.0) as u64).unwrap_or(0)
}

fn reaction_times(trials: &[TrialRecord]) -> Vec<u64> {
    trials
        .iter()
        .filter_map(|t| t.reaction_time_ms)
        .map(|rt| rt.round() as u64)
        .collect()
}

impl TaskSummary {
    pub fn from_result(result: &SessionResult) -> Self {
        Self::from_metrics(result, &aggregate(result))
    }

    pub fn from_metrics(result: &SessionResult, metrics: &SessionMetrics) -> Self {
        match result.config.task {
            TaskConfig::NBack { n_value, .. } => {
                let sd = metrics.signal_detection.unwrap_or_default();
                TaskSummary::NBack(NBackSummary {
                    n_value,
                    accuracy: metrics.accuracy,
                    hits: sd.hits,
                    misses: sd.misses,
                    false_positives: sd.false_positives,
                    correct_rejections: sd.correct_rejections,
                    avg_reaction_time: round_ms(metrics.avg_reaction_time_ms),
                    total_trials: metrics.total_trials,
                    total_targets: sd.total_targets,
                })
            }
            TaskConfig::Flanker { .. } => {
                let counts = metrics.discrimination.unwrap_or_default();
                TaskSummary::Flanker(FlankerSummary {
                    score: counts.correct,
                    misses: counts.timeouts,
                    false_positives: counts.incorrect,
                    accuracy: metrics.accuracy,
                    avg_reaction_time_ms: round_ms(metrics.avg_reaction_time_ms),
                    reaction_times: reaction_times(&result.trials),
                })
            }
            TaskConfig::Stroop => {
                let (neutral, emotional) = metrics
                    .blocks
                    .map(|b| (b.neutral, b.emotional))
                    .unwrap_or_default();
                let rt_neutral_ms = round_ms(neutral.avg_reaction_time_ms);
                let rt_emotional_ms = round_ms(emotional.avg_reaction_time_ms);
                TaskSummary::Stroop(StroopSummary {
                    rt_neutral_ms,
                    rt_emotional_ms,
                    accuracy_neutral_pct: neutral.accuracy,
                    accuracy_emotional_pct: emotional.accuracy,
                    interference_ms: rt_emotional_ms as i64 - rt_neutral_ms as i64,
                })
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CapturedResponse, finalize};
    use crate::config::SessionConfig;
    use cognify_core::{ArrowDirection, FlankerArrows, Payload, ResponseValue, StimulusSpec};

    fn flanker_trial(position: usize, answer: Option<(ArrowDirection, f64)>) -> TrialRecord {
        let stimulus = StimulusSpec::new(
            Payload::Arrows(FlankerArrows {
                center: ArrowDirection::Left,
                congruent: true,
                flankers_per_side: 2,
            }),
            position,
        );
        let response = answer.map(|(d, reaction_time_ms)| CapturedResponse {
            value: ResponseValue::Direction(d),
            reaction_time_ms,
        });
        finalize(stimulus, response, 0)
    }

    #[test]
    fn flanker_summary_matches_uploaded_shape() {
        let result = SessionResult {
            config: SessionConfig {
                total_trials: 3,
                ..SessionConfig::flanker()
            },
            trials: vec![
                flanker_trial(0, Some((ArrowDirection::Left, 512.4))),
                flanker_trial(1, Some((ArrowDirection::Right, 300.0))),
                flanker_trial(2, None),
            ],
        };
        let summary = TaskSummary::from_result(&result);
        let TaskSummary::Flanker(f) = &summary else {
            panic!("expected flanker summary");
        };
        assert_eq!(f.score, 1);
        assert_eq!(f.false_positives, 1);
        assert_eq!(f.misses, 1);
        assert_eq!(f.accuracy, 33);
        assert_eq!(f.avg_reaction_time_ms, 512);
        assert_eq!(f.reaction_times, vec![512, 300]);

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["falsePositives"], 1);
        assert_eq!(json["avgReactionTimeMs"], 512);
    }
}
