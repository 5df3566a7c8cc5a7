use serde::{Deserialize, Serialize};
use std::fmt;

use crate::response::ResponseValue;

/// Task families the engine knows how to generate and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    NBack,
    Flanker,
    Stroop,
}

impl TaskKind {
    pub fn scoring_rule(&self) -> ScoringRule {
        match self {
            TaskKind::NBack => ScoringRule::CuedRecognition,
            TaskKind::Flanker | TaskKind::Stroop => ScoringRule::Discrimination,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::NBack => f.write_str("n-back"),
            TaskKind::Flanker => f.write_str("flanker"),
            TaskKind::Stroop => f.write_str("stroop"),
        }
    }
}

/// How a trial's response is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// Respond only when the stimulus is a target (go / no-go on `is_target`).
    CuedRecognition,
    /// Every trial has exactly one expected answer.
    Discrimination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowDirection {
    Left,
    Right,
}

impl ArrowDirection {
    pub fn opposite(&self) -> Self {
        match self {
            ArrowDirection::Left => ArrowDirection::Right,
            ArrowDirection::Right => ArrowDirection::Left,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            ArrowDirection::Left => '<',
            ArrowDirection::Right => '>',
        }
    }
}

/// Ink palette for the Stroop task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkColor {
    Red,
    Green,
    Blue,
    Purple,
}

impl InkColor {
    pub const PALETTE: [InkColor; 4] = [
        InkColor::Red,
        InkColor::Green,
        InkColor::Blue,
        InkColor::Purple,
    ];

    /// Key the participant presses to name this colour.
    pub fn key(&self) -> char {
        match self {
            InkColor::Red => 'r',
            InkColor::Green => 'g',
            InkColor::Blue => 'b',
            InkColor::Purple => 'p',
        }
    }
}

impl fmt::Display for InkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InkColor::Red => "red",
            InkColor::Green => "green",
            InkColor::Blue => "blue",
            InkColor::Purple => "purple",
        };
        f.write_str(name)
    }
}

/// Block membership for block-structured tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockLabel {
    Neutral,
    Emotional,
}

/// A row of arrows: the centre one is the answer, the rest are distractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlankerArrows {
    pub center: ArrowDirection,
    pub congruent: bool,
    pub flankers_per_side: usize,
}

impl FlankerArrows {
    pub fn flanker(&self) -> ArrowDirection {
        if self.congruent {
            self.center
        } else {
            self.center.opposite()
        }
    }

    pub fn width(&self) -> usize {
        self.flankers_per_side * 2 + 1
    }

    /// Renders e.g. `<<><<` for an incongruent right-pointing centre.
    pub fn render(&self) -> String {
        let side: String = std::iter::repeat_n(self.flanker().symbol(), self.flankers_per_side)
            .collect();
        format!("{side}{}{side}", self.center.symbol())
    }
}

impl fmt::Display for FlankerArrows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Task-specific content of one stimulus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Letter { letter: char },
    Arrows(FlankerArrows),
    Word { word: String, ink: InkColor },
}

impl Payload {
    pub fn task(&self) -> TaskKind {
        match self {
            Payload::Letter { .. } => TaskKind::NBack,
            Payload::Arrows(_) => TaskKind::Flanker,
            Payload::Word { .. } => TaskKind::Stroop,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Letter { letter } => write!(f, "{letter}"),
            Payload::Arrows(arrows) => write!(f, "{arrows}"),
            Payload::Word { word, ink } => write!(f, "{word} ({ink})"),
        }
    }
}

/// One element of a generated sequence. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusSpec {
    pub payload: Payload,
    pub position: usize,
    pub is_target: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_label: Option<BlockLabel>,
}

impl StimulusSpec {
    pub fn new(payload: Payload, position: usize) -> Self {
        Self {
            payload,
            position,
            is_target: false,
            block_label: None,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.payload.task()
    }

    /// The single correct answer for discrimination tasks.
    ///
    /// Cued-recognition stimuli have no expected value; their ground truth is
    /// `is_target`.
    pub fn expected_response(&self) -> Option<ResponseValue> {
        match &self.payload {
            Payload::Letter { .. } => None,
            Payload::Arrows(arrows) => Some(ResponseValue::Direction(arrows.center)),
            Payload::Word { ink, .. } => Some(ResponseValue::Color(*ink)),
        }
    }
}
