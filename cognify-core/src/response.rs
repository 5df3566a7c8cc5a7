use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stimulus::{ArrowDirection, InkColor, TaskKind};

/// A participant's answer, already decoded from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseValue {
    /// "That one matches" (space bar in n-back).
    Match,
    Direction(ArrowDirection),
    Color(InkColor),
}

impl ResponseValue {
    /// Maps a key to a response for the given task; unrelated keys yield `None`.
    pub fn from_key(task: TaskKind, key: char) -> Option<Self> {
        match task {
            TaskKind::NBack => (key == ' ').then_some(ResponseValue::Match),
            TaskKind::Flanker => match key {
                '<' => Some(ResponseValue::Direction(ArrowDirection::Left)),
                '>' => Some(ResponseValue::Direction(ArrowDirection::Right)),
                _ => None,
            },
            TaskKind::Stroop => {
                let key = key.to_ascii_lowercase();
                InkColor::PALETTE
                    .iter()
                    .find(|c| c.key() == key)
                    .map(|c| ResponseValue::Color(*c))
            }
        }
    }
}

impl fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseValue::Match => f.write_str("match"),
            ResponseValue::Direction(d) => write!(f, "{}", d.symbol()),
            ResponseValue::Color(c) => write!(f, "{c}"),
        }
    }
}
