pub mod phase;
pub mod response;
pub mod stimulus;
pub mod trial;

pub use phase::TrialPhase;
pub use response::ResponseValue;
pub use stimulus::{
    ArrowDirection, BlockLabel, FlankerArrows, InkColor, Payload, ScoringRule, StimulusSpec,
    TaskKind,
};
pub use trial::{Classification, TrialRecord};
