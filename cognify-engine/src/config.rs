use std::path::Path;

use cognify_core::{BlockLabel, TaskKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::sequence::stroop::{EMOTIONAL_WORDS, NEUTRAL_WORDS};

/// Levels the product picks from when it randomizes n-back difficulty.
pub const NBACK_LEVELS: [usize; 2] = [2, 3];

/// Task-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskConfig {
    NBack {
        n_value: usize,
        target_count: usize,
    },
    Flanker {
        #[serde(default = "default_flankers_per_side")]
        flankers_per_side: usize,
    },
    Stroop,
}

fn default_flankers_per_side() -> usize {
    2
}

impl TaskConfig {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskConfig::NBack { .. } => TaskKind::NBack,
            TaskConfig::Flanker { .. } => TaskKind::Flanker,
            TaskConfig::Stroop => TaskKind::Stroop,
        }
    }
}

/// Parameters of one session, supplied by the caller as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub task: TaskConfig,
    pub total_trials: usize,
    pub stimulus_display_ms: u64,
    #[serde(default)]
    pub blank_gap_ms: u64,
    /// Must match `stimulus_display_ms` when given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_window_ms: Option<u64>,
    /// Memorize cue shown before each n-back anchor; zero disables it.
    #[serde(default)]
    pub cue_display_ms: u64,
}

impl SessionConfig {
    /// Letter n-back as shipped: 30 letters, 5 targets, 1.5 s per letter.
    pub fn nback(n_value: usize) -> Self {
        Self {
            task: TaskConfig::NBack {
                n_value,
                target_count: 5,
            },
            total_trials: 30,
            stimulus_display_ms: 1500,
            blank_gap_ms: 500,
            response_window_ms: None,
            cue_display_ms: 1200,
        }
    }

    pub fn flanker() -> Self {
        Self {
            task: TaskConfig::Flanker {
                flankers_per_side: default_flankers_per_side(),
            },
            total_trials: 10,
            stimulus_display_ms: 3000,
            blank_gap_ms: 0,
            response_window_ms: None,
            cue_display_ms: 0,
        }
    }

    pub fn stroop() -> Self {
        Self {
            task: TaskConfig::Stroop,
            total_trials: 8,
            stimulus_display_ms: 3000,
            blank_gap_ms: 600,
            response_window_ms: None,
            cue_display_ms: 0,
        }
    }

    pub fn preset(kind: TaskKind) -> Self {
        match kind {
            TaskKind::NBack => Self::nback(NBACK_LEVELS[0]),
            TaskKind::Flanker => Self::flanker(),
            TaskKind::Stroop => Self::stroop(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn kind(&self) -> TaskKind {
        self.task.kind()
    }

    /// The response window always collapses onto the display window.
    pub fn response_deadline_ms(&self) -> u64 {
        self.stimulus_display_ms
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.total_trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.stimulus_display_ms == 0 {
            return Err(ConfigError::ZeroDisplay);
        }
        if let Some(window_ms) = self.response_window_ms {
            if window_ms != self.stimulus_display_ms {
                return Err(ConfigError::ResponseWindowMismatch {
                    window_ms,
                    display_ms: self.stimulus_display_ms,
                });
            }
        }

        match self.task {
            TaskConfig::NBack {
                n_value,
                target_count,
            } => {
                if n_value == 0 {
                    return Err(ConfigError::ZeroLevel);
                }
                let required = min_trials_for_targets(n_value, target_count);
                if required > self.total_trials {
                    return Err(ConfigError::InsufficientRoom {
                        n_value,
                        target_count,
                        required,
                        available: self.total_trials,
                    });
                }
            }
            TaskConfig::Flanker { flankers_per_side } => {
                if flankers_per_side == 0 {
                    return Err(ConfigError::ZeroFlankers);
                }
            }
            TaskConfig::Stroop => {
                let (neutral, emotional) = stroop_block_sizes(self.total_trials);
                for (block, requested, available) in [
                    (BlockLabel::Neutral, neutral, NEUTRAL_WORDS.len()),
                    (BlockLabel::Emotional, emotional, EMOTIONAL_WORDS.len()),
                ] {
                    if requested > available {
                        return Err(ConfigError::PoolExhausted {
                            block,
                            requested,
                            available,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Randomized n-back level, as the product picks it at game start.
pub fn nback_level<R: Rng + ?Sized>(rng: &mut R) -> usize {
    NBACK_LEVELS[rng.random_range(0..NBACK_LEVELS.len())]
}

/// Shortest session that fits `target_count` anchors with zero jitter:
/// anchors every `n + 2` trials, the last one followed by its target.
pub fn min_trials_for_targets(n_value: usize, target_count: usize) -> usize {
    match target_count {
        0 => 1,
        t => (t - 1) * (n_value + 2) + n_value + 1,
    }
}

/// `(neutral, emotional)` trial counts. The odd trial, if any, goes emotional.
pub fn stroop_block_sizes(total_trials: usize) -> (usize, usize) {
    let neutral = total_trials / 2;
    (neutral, total_trials - neutral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn presets_are_valid() {
        for kind in [TaskKind::NBack, TaskKind::Flanker, TaskKind::Stroop] {
            let config = SessionConfig::preset(kind);
            assert_eq!(config.validate(), Ok(()), "{kind}");
            assert_eq!(config.kind(), kind);
        }
        assert_eq!(SessionConfig::nback(3).validate(), Ok(()));
    }

    #[test]
    fn rejects_targets_that_cannot_fit() {
        let mut config = SessionConfig::nback(2);
        config.total_trials = 20;
        config.task = TaskConfig::NBack {
            n_value: 4,
            target_count: 4,
        };
        // 3 * 6 + 4 + 1
        assert_eq!(
            config.validate(),
            Err(ConfigError::InsufficientRoom {
                n_value: 4,
                target_count: 4,
                required: 23,
                available: 20,
            })
        );
    }

    #[test]
    fn rejects_level_larger_than_session() {
        let mut config = SessionConfig::nback(40);
        config.task = TaskConfig::NBack {
            n_value: 40,
            target_count: 1,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InsufficientRoom { required: 41, .. })
        ));
    }

    #[test]
    fn rejects_split_response_window() {
        let mut config = SessionConfig::flanker();
        config.response_window_ms = Some(2000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ResponseWindowMismatch {
                window_ms: 2000,
                display_ms: 3000
            })
        );
        config.response_window_ms = Some(3000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_oversized_stroop_blocks() {
        let mut config = SessionConfig::stroop();
        config.total_trials = 17;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PoolExhausted {
                block: BlockLabel::Emotional,
                requested: 9,
                available: 8,
            })
        );
    }

    #[test]
    fn rejects_degenerate_values() {
        let mut config = SessionConfig::stroop();
        config.total_trials = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTrials));

        let mut config = SessionConfig::flanker();
        config.stimulus_display_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDisplay));

        let config = SessionConfig {
            task: TaskConfig::Flanker {
                flankers_per_side: 0,
            },
            ..SessionConfig::flanker()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFlankers));
    }

    #[test]
    fn parses_toml() {
        let config = SessionConfig::from_toml_str(
            r#"
            total_trials = 24
            stimulus_display_ms = 1000
            blank_gap_ms = 250

            [task]
            kind = "n_back"
            n_value = 3
            target_count = 3
            "#,
        )
        .unwrap();
        assert_eq!(
            config.task,
            TaskConfig::NBack {
                n_value: 3,
                target_count: 3
            }
        );
        assert_eq!(config.cue_display_ms, 0);
        assert_eq!(config.response_window_ms, None);
    }

    #[test]
    fn flanker_width_defaults_in_toml() {
        let config = SessionConfig::from_toml_str(
            r#"
            total_trials = 12
            stimulus_display_ms = 2000

            [task]
            kind = "flanker"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.task,
            TaskConfig::Flanker {
                flankers_per_side: 2
            }
        );
    }

    #[test]
    fn toml_is_validated() {
        let err = SessionConfig::from_toml_str(
            r#"
            total_trials = 0
            stimulus_display_ms = 2000

            [task]
            kind = "stroop"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::ZeroTrials)));
    }

    #[test]
    fn nback_level_is_two_or_three() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert!(NBACK_LEVELS.contains(&nback_level(&mut rng)));
        }
    }

    #[test]
    fn stroop_blocks_split_odd_counts() {
        assert_eq!(stroop_block_sizes(8), (4, 4));
        assert_eq!(stroop_block_sizes(7), (3, 4));
    }
}
