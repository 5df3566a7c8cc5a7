//! Session summary statistics.
//!
//! Reaction-time averages only use trials that were answered *and* scored
//! correct (hits for n-back); misses, timeouts and wrong answers never dilute
//! them.

use cognify_core::{BlockLabel, Classification, Payload, ScoringRule, TaskKind, TrialRecord};
use serde::{Deserialize, Serialize};

use crate::trial::SessionResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalDetection {
    pub hits: usize,
    pub misses: usize,
    pub false_positives: usize,
    pub correct_rejections: usize,
    pub total_targets: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminationCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub timeouts: usize,
}

/// Accuracy and speed over a subset of trials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsetMetrics {
    pub trials: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub avg_reaction_time_ms: Option<f64>,
}

impl SubsetMetrics {
    pub fn from_trials<'a>(trials: impl IntoIterator<Item = &'a TrialRecord>) -> Self {
        let mut total = 0;
        let mut correct = 0;
        let mut rt_sum = 0.0;
        let mut rt_count = 0usize;
        for t in trials {
            total += 1;
            if t.is_correct {
                correct += 1;
                if t.user_responded {
                    if let Some(rt) = t.reaction_time_ms {
                        rt_sum += rt;
                        rt_count += 1;
                    }
                }
            }
        }
        Self {
            trials: total,
            correct,
            accuracy: percent(correct, total),
            avg_reaction_time_ms: (rt_count > 0).then(|| rt_sum / rt_count as f64),
        }
    }
}

/// Emotional vs neutral block comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockComparison {
    pub neutral: SubsetMetrics,
    pub emotional: SubsetMetrics,
    /// Emotional minus neutral mean RT; positive means emotional was slower.
    pub interference_ms: Option<f64>,
}

/// Congruent vs incongruent flanker comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CongruencyComparison {
    pub congruent: SubsetMetrics,
    pub incongruent: SubsetMetrics,
    /// Incongruent minus congruent mean RT.
    pub flanker_effect_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub task: TaskKind,
    pub total_trials: usize,
    pub correct: usize,
    /// Percentage of correct trials, rounded, in `0..=100`.
    pub accuracy: u32,
    pub avg_reaction_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_detection: Option<SignalDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrimination: Option<DiscriminationCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlockComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congruency: Option<CongruencyComparison>,
}

pub fn aggregate(result: &SessionResult) -> SessionMetrics {
    summarize(result.config.kind(), &result.trials)
}

/// Folds finalized trials of one task into summary statistics.
pub fn summarize(task: TaskKind, trials: &[TrialRecord]) -> SessionMetrics {
    let overall = SubsetMetrics::from_trials(trials);

    let mut metrics = SessionMetrics {
        task,
        total_trials: overall.trials,
        correct: overall.correct,
        accuracy: overall.accuracy,
        avg_reaction_time_ms: overall.avg_reaction_time_ms,
        signal_detection: None,
        discrimination: None,
        blocks: None,
        congruency: None,
    };

    match task.scoring_rule() {
        ScoringRule::CuedRecognition => {
            metrics.signal_detection = Some(signal_detection(trials));
        }
        ScoringRule::Discrimination => {
            metrics.discrimination = Some(discrimination(trials));
        }
    }

    match task {
        TaskKind::Stroop => metrics.blocks = Some(blocks(trials)),
        TaskKind::Flanker => metrics.congruency = Some(congruency(trials)),
        TaskKind::NBack => {}
    }
    metrics
}

fn signal_detection(trials: &[TrialRecord]) -> SignalDetection {
    let mut sd = SignalDetection::default();
    for t in trials {
        match t.classification {
            Classification::Hit => sd.hits += 1,
            Classification::Miss => sd.misses += 1,
            Classification::FalsePositive => sd.false_positives += 1,
            Classification::CorrectRejection => sd.correct_rejections += 1,
            _ => {}
        }
        if t.stimulus.is_target {
            sd.total_targets += 1;
        }
    }
    sd
}

fn discrimination(trials: &[TrialRecord]) -> DiscriminationCounts {
    let mut counts = DiscriminationCounts::default();
    for t in trials {
        match t.classification {
            Classification::Correct => counts.correct += 1,
            Classification::Incorrect => counts.incorrect += 1,
            Classification::Timeout => counts.timeouts += 1,
            _ => {}
        }
    }
    counts
}

fn blocks(trials: &[TrialRecord]) -> BlockComparison {
    let of = |label: BlockLabel| {
        SubsetMetrics::from_trials(
            trials
                .iter()
                .filter(move |t| t.stimulus.block_label == Some(label)),
        )
    };
    let neutral = of(BlockLabel::Neutral);
    let emotional = of(BlockLabel::Emotional);
    BlockComparison {
        neutral,
        emotional,
        interference_ms: difference(emotional.avg_reaction_time_ms, neutral.avg_reaction_time_ms),
    }
}

fn congruency(trials: &[TrialRecord]) -> CongruencyComparison {
    let of = |congruent: bool| {
        SubsetMetrics::from_trials(trials.iter().filter(move |t| {
            matches!(&t.stimulus.payload, Payload::Arrows(a) if a.congruent == congruent)
        }))
    };
    let congruent = of(true);
    let incongruent = of(false);
    CongruencyComparison {
        congruent,
        incongruent,
        flanker_effect_ms: difference(
            incongruent.avg_reaction_time_ms,
            congruent.avg_reaction_time_ms,
        ),
    }
}

fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CapturedResponse, finalize};
    use cognify_core::{InkColor, ResponseValue, StimulusSpec};

    fn letter(position: usize, is_target: bool, rt: Option<f64>) -> TrialRecord {
        let stimulus = StimulusSpec {
            payload: Payload::Letter { letter: 'A' },
            position,
            is_target,
            block_label: None,
        };
        let response = rt.map(|reaction_time_ms| CapturedResponse {
            value: ResponseValue::Match,
            reaction_time_ms,
        });
        finalize(stimulus, response, 0)
    }

    fn word(label: BlockLabel, answer: Option<(InkColor, f64)>) -> TrialRecord {
        let stimulus = StimulusSpec {
            payload: Payload::Word {
                word: "Path".into(),
                ink: InkColor::Red,
            },
            position: 0,
            is_target: false,
            block_label: Some(label),
        };
        let response = answer.map(|(ink, reaction_time_ms)| CapturedResponse {
            value: ResponseValue::Color(ink),
            reaction_time_ms,
        });
        finalize(stimulus, response, 0)
    }

    #[test]
    fn nback_counts_and_rt_over_hits_only() {
        let trials = vec![
            letter(0, true, Some(400.0)),  // hit
            letter(1, true, None),         // miss
            letter(2, false, Some(100.0)), // false positive
            letter(3, false, None),        // correct rejection
        ];
        let m = summarize(TaskKind::NBack, &trials);
        assert_eq!(
            m.signal_detection,
            Some(SignalDetection {
                hits: 1,
                misses: 1,
                false_positives: 1,
                correct_rejections: 1,
                total_targets: 2,
            })
        );
        assert_eq!(m.accuracy, 50);
        assert_eq!(m.avg_reaction_time_ms, Some(400.0));
        assert!(m.discrimination.is_none());
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        let trials = vec![
            letter(0, false, None),
            letter(1, false, None),
            letter(2, false, Some(300.0)),
        ];
        assert_eq!(summarize(TaskKind::NBack, &trials).accuracy, 67);
    }

    #[test]
    fn stroop_interference_is_emotional_minus_neutral() {
        let trials = vec![
            word(BlockLabel::Neutral, Some((InkColor::Red, 440.0))),
            word(BlockLabel::Neutral, Some((InkColor::Red, 460.0))),
            word(BlockLabel::Neutral, Some((InkColor::Blue, 100.0))),
            word(BlockLabel::Emotional, Some((InkColor::Red, 500.0))),
            word(BlockLabel::Emotional, None),
        ];
        let m = summarize(TaskKind::Stroop, &trials);
        let blocks = m.blocks.unwrap();
        assert_eq!(blocks.neutral.avg_reaction_time_ms, Some(450.0));
        assert_eq!(blocks.neutral.accuracy, 67);
        assert_eq!(blocks.emotional.avg_reaction_time_ms, Some(500.0));
        assert_eq!(blocks.emotional.accuracy, 50);
        assert_eq!(blocks.interference_ms, Some(50.0));
        assert_eq!(
            m.discrimination,
            Some(DiscriminationCounts {
                correct: 3,
                incorrect: 1,
                timeouts: 1,
            })
        );
    }

    #[test]
    fn no_interference_without_both_blocks() {
        let trials = vec![word(BlockLabel::Neutral, Some((InkColor::Red, 300.0)))];
        let m = summarize(TaskKind::Stroop, &trials);
        assert_eq!(m.blocks.unwrap().interference_ms, None);
    }

    #[test]
    fn empty_session_is_all_zero() {
        let m = summarize(TaskKind::Flanker, &[]);
        assert_eq!(m.accuracy, 0);
        assert_eq!(m.avg_reaction_time_ms, None);
        assert_eq!(m.total_trials, 0);
    }
}
