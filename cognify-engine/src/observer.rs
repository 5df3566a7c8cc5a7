use cognify_core::{StimulusSpec, TrialRecord};

use crate::trial::SessionResult;

/// Presentation-side callbacks. The engine talks forward only through these.
pub trait SessionObserver {
    /// A memorize cue is up for the upcoming stimulus.
    fn on_cue_shown(&mut self, _stimulus: &StimulusSpec) {}
    fn on_stimulus_shown(&mut self, stimulus: &StimulusSpec);
    fn on_trial_finalized(&mut self, trial: &TrialRecord);
    /// Hands the finished session over to the caller.
    fn on_session_complete(&mut self, result: SessionResult);
}

impl<O: SessionObserver + ?Sized> SessionObserver for &mut O {
    fn on_cue_shown(&mut self, stimulus: &StimulusSpec) {
        (**self).on_cue_shown(stimulus)
    }
    fn on_stimulus_shown(&mut self, stimulus: &StimulusSpec) {
        (**self).on_stimulus_shown(stimulus)
    }
    fn on_trial_finalized(&mut self, trial: &TrialRecord) {
        (**self).on_trial_finalized(trial)
    }
    fn on_session_complete(&mut self, result: SessionResult) {
        (**self).on_session_complete(result)
    }
}

/// Callback flattened into a value, for recording observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CueShown(StimulusSpec),
    StimulusShown(StimulusSpec),
    TrialFinalized(TrialRecord),
    SessionComplete(SessionResult),
}

impl SessionObserver for Vec<SessionEvent> {
    fn on_cue_shown(&mut self, stimulus: &StimulusSpec) {
        self.push(SessionEvent::CueShown(stimulus.clone()));
    }
    fn on_stimulus_shown(&mut self, stimulus: &StimulusSpec) {
        self.push(SessionEvent::StimulusShown(stimulus.clone()));
    }
    fn on_trial_finalized(&mut self, trial: &TrialRecord) {
        self.push(SessionEvent::TrialFinalized(trial.clone()));
    }
    fn on_session_complete(&mut self, result: SessionResult) {
        self.push(SessionEvent::SessionComplete(result));
    }
}

/// Pulls the session result out of a recorded event list.
pub fn session_result(events: &[SessionEvent]) -> Option<&SessionResult> {
    events.iter().find_map(|e| match e {
        SessionEvent::SessionComplete(result) => Some(result),
        _ => None,
    })
}
