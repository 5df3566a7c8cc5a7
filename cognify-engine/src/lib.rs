pub mod arena;
pub mod classify;
pub mod config;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod scheduler;
pub mod sequence;
pub mod trial;

pub use arena::TrialArena;
pub use classify::{CapturedResponse, classify, finalize};
pub use config::{SessionConfig, TaskConfig};
pub use error::{ArenaError, ConfigError, EngineError, Result};
pub use metrics::{SessionMetrics, aggregate, summarize};
pub use observer::{SessionEvent, SessionObserver, session_result};
pub use report::TaskSummary;
pub use scheduler::{IgnoreReason, ResponseOutcome, SessionStatus, TrialScheduler};
pub use trial::{SessionResult, TrialDurations};
