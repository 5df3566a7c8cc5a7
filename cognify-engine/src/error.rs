//! Error types for the trial engine

use cognify_core::{BlockLabel, TaskKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Session configuration rejected before generation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Trial slot bookkeeping violated
    #[error("Trial arena error: {0}")]
    Arena(#[from] ArenaError),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a `SessionConfig` cannot produce a valid session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("total_trials must be at least 1")]
    ZeroTrials,

    #[error("stimulus_display_ms must be greater than zero")]
    ZeroDisplay,

    #[error(
        "response_window_ms ({window_ms}) must equal stimulus_display_ms ({display_ms}); \
         responses are only accepted while the stimulus is visible"
    )]
    ResponseWindowMismatch { window_ms: u64, display_ms: u64 },

    #[error("n-back level must be at least 1")]
    ZeroLevel,

    #[error(
        "{target_count} targets at {n_value}-back need at least {required} trials, \
         but the session has {available}"
    )]
    InsufficientRoom {
        n_value: usize,
        target_count: usize,
        required: usize,
        available: usize,
    },

    #[error("flanker stimulus needs at least one flanker per side")]
    ZeroFlankers,

    #[error("{block:?} word pool has {available} words, {requested} requested")]
    PoolExhausted {
        block: BlockLabel,
        requested: usize,
        available: usize,
    },

    #[error("sequence has {actual} stimuli, session expects {expected}")]
    SequenceLength { expected: usize, actual: usize },

    #[error("stimulus at index {index} claims position {position}")]
    MisplacedStimulus { index: usize, position: usize },

    #[error("stimulus at index {index} is a {actual} stimulus in a {expected} session")]
    WrongTask {
        index: usize,
        expected: TaskKind,
        actual: TaskKind,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("trial {0} was already finalized")]
    AlreadyFinalized(usize),

    #[error("trial {index} is outside the session ({len} trials)")]
    OutOfRange { index: usize, len: usize },

    #[error("{missing} of {len} trials were never finalized")]
    Incomplete { missing: usize, len: usize },
}
