/// Authoritative phase of a running session.
///
/// Every timed phase carries the trial it belongs to and the timer
/// timestamp (ns) at which it ends, so a late event can always be matched
/// against the phase it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialPhase {
    #[default]
    Idle,
    /// "Remember this" cue ahead of an anchor stimulus.
    Cue { trial: usize, until_ns: u64 },
    /// Stimulus on screen; this is also the response window.
    StimulusVisible {
        trial: usize,
        onset_ns: u64,
        deadline_ns: u64,
    },
    /// Blank screen after a finalized trial.
    InterTrialGap { trial: usize, until_ns: u64 },
    Complete,
    Aborted,
}

impl TrialPhase {
    pub fn allows_input(&self) -> bool {
        matches!(self, TrialPhase::StimulusVisible { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrialPhase::Complete | TrialPhase::Aborted)
    }

    pub fn trial(&self) -> Option<usize> {
        match *self {
            TrialPhase::Cue { trial, .. }
            | TrialPhase::StimulusVisible { trial, .. }
            | TrialPhase::InterTrialGap { trial, .. } => Some(trial),
            _ => None,
        }
    }

    /// When this phase ends on its own, if it is timed.
    pub fn ends_at(&self) -> Option<u64> {
        match *self {
            TrialPhase::Cue { until_ns, .. } | TrialPhase::InterTrialGap { until_ns, .. } => {
                Some(until_ns)
            }
            TrialPhase::StimulusVisible { deadline_ns, .. } => Some(deadline_ns),
            _ => None,
        }
    }
}
