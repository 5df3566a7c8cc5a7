//! The trial state machine.
//!
//! One scheduler drives one session. It is cooperative: nothing happens until
//! the host calls [`TrialScheduler::poll`] or [`TrialScheduler::submit_response`],
//! and each call first applies every phase deadline that has already passed.
//! Because a trial can only be resolved out of `StimulusVisible`, and resolving
//! always leaves that phase, a deadline and a response can never both finalize
//! the same trial.

use cognify_core::{Classification, ResponseValue, StimulusSpec, TaskKind, TrialPhase, TrialRecord};
use cognify_timing::Timer;
use rand::Rng;
use tracing::{debug, error, info, trace};

use crate::arena::TrialArena;
use crate::classify::{self, CapturedResponse};
use crate::config::{SessionConfig, TaskConfig};
use crate::error::{ArenaError, ConfigError, Result};
use crate::observer::SessionObserver;
use crate::sequence;
use crate::trial::{SessionResult, TrialDurations};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Why a response did not count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotStarted,
    /// Only the memorize cue is up; no trial is open yet.
    CueShowing,
    /// The current trial already has its response or its deadline passed.
    TrialResolved,
    SessionOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseOutcome {
    Accepted {
        trial: usize,
        classification: Classification,
        reaction_time_ms: f64,
    },
    Ignored(IgnoreReason),
}

impl ResponseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ResponseOutcome::Accepted { .. })
    }
}

pub struct TrialScheduler<T, O>
where
    T: Timer,
    O: SessionObserver,
{
    config: SessionConfig,
    sequence: Vec<StimulusSpec>,
    cued: Vec<bool>,
    durations: TrialDurations,
    timer: T,
    observer: O,
    arena: TrialArena,
    phase: TrialPhase,
}

impl<T, O> TrialScheduler<T, O>
where
    T: Timer,
    O: SessionObserver,
{
    /// Wraps an already generated sequence.
    pub fn new(
        config: SessionConfig,
        sequence: Vec<StimulusSpec>,
        timer: T,
        observer: O,
    ) -> Result<Self> {
        config.validate()?;
        if sequence.len() != config.total_trials {
            return Err(ConfigError::SequenceLength {
                expected: config.total_trials,
                actual: sequence.len(),
            }
            .into());
        }
        check_sequence(&config, &sequence)?;

        let cued = cue_flags(&config, &sequence);
        Ok(Self {
            durations: TrialDurations::from_config(&config),
            arena: TrialArena::new(sequence.len()),
            config,
            sequence,
            cued,
            timer,
            observer,
            phase: TrialPhase::Idle,
        })
    }

    /// Generates the sequence for `config` and wraps it.
    pub fn generate<R: Rng + ?Sized>(
        config: SessionConfig,
        rng: &mut R,
        timer: T,
        observer: O,
    ) -> Result<Self> {
        let sequence = sequence::generate(&config, rng)?;
        Self::new(config, sequence, timer, observer)
    }

    /// Leaves `Idle` and presents the first trial. Returns false if the
    /// session had already started.
    pub fn start(&mut self) -> bool {
        if self.phase != TrialPhase::Idle {
            return false;
        }
        info!(
            task = %self.config.kind(),
            trials = self.sequence.len(),
            "session started"
        );
        let now = self.timer.now();
        self.enter_trial(0, now);
        true
    }

    /// Applies every deadline that has passed and returns the resulting phase.
    pub fn poll(&mut self) -> TrialPhase {
        let now = self.timer.now();
        self.advance_to(now);
        self.phase
    }

    /// Offers a response to the open trial, timestamped now.
    ///
    /// A response at or after the trial's deadline is late: the deadline is
    /// applied first and the response is ignored rather than carried into the
    /// next trial. The response only counts for a stimulus that was already
    /// on screen before those deadlines were applied; a stimulus that the
    /// catch-up itself brings up was not yet visible to the participant.
    pub fn submit_response(&mut self, value: ResponseValue) -> ResponseOutcome {
        let now = self.timer.now();
        let before = self.phase;
        self.advance_to(now);

        let outcome = match (before, self.phase) {
            (
                TrialPhase::StimulusVisible {
                    trial, onset_ns, ..
                },
                TrialPhase::StimulusVisible { trial: open, .. },
            ) if open == trial => {
                let reaction_time_ms = now.saturating_sub(onset_ns) as f64 / 1_000_000.0;
                let captured = CapturedResponse {
                    value,
                    reaction_time_ms,
                };
                match self.resolve(trial, Some(captured), now) {
                    Ok(classification) => ResponseOutcome::Accepted {
                        trial,
                        classification,
                        reaction_time_ms,
                    },
                    Err(e) => {
                        error!(trial, error = %e, "response for a finalized trial");
                        ResponseOutcome::Ignored(IgnoreReason::TrialResolved)
                    }
                }
            }
            (_, TrialPhase::Complete | TrialPhase::Aborted) => {
                ResponseOutcome::Ignored(IgnoreReason::SessionOver)
            }
            (TrialPhase::Idle, _) => ResponseOutcome::Ignored(IgnoreReason::NotStarted),
            (TrialPhase::Cue { .. }, _) => ResponseOutcome::Ignored(IgnoreReason::CueShowing),
            _ => ResponseOutcome::Ignored(IgnoreReason::TrialResolved),
        };

        if let ResponseOutcome::Ignored(reason) = outcome {
            trace!(%value, ?reason, phase = ?self.phase, "response ignored");
        }
        outcome
    }

    /// Stops the session. The open trial, if unresolved, is dropped and no
    /// `SessionResult` is ever produced. Returns false if already finished.
    pub fn abort(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        let discarded = self
            .phase
            .trial()
            .filter(|trial| !self.arena.is_finalized(*trial));
        self.phase = TrialPhase::Aborted;
        info!(
            finalized = self.arena.finalized_count(),
            total = self.sequence.len(),
            ?discarded,
            "session aborted"
        );
        true
    }

    fn advance_to(&mut self, now: u64) {
        while let Some(ends_at) = self.phase.ends_at() {
            if now < ends_at {
                break;
            }
            match self.phase {
                TrialPhase::Cue { trial, .. } => self.show_stimulus(trial, now),
                TrialPhase::StimulusVisible { trial, .. } => {
                    // Deadline fired with no response.
                    if let Err(e) = self.resolve(trial, None, now) {
                        error!(trial, error = %e, "deadline for a finalized trial");
                    }
                }
                TrialPhase::InterTrialGap { trial, .. } => self.enter_trial(trial + 1, now),
                _ => break,
            }
        }
    }

    fn enter_trial(&mut self, trial: usize, now: u64) {
        if trial >= self.sequence.len() {
            self.complete();
            return;
        }
        if self.cued[trial] {
            self.phase = TrialPhase::Cue {
                trial,
                until_ns: now + self.durations.cue_ns,
            };
            debug!(trial, "cue shown");
            self.observer.on_cue_shown(&self.sequence[trial]);
        } else {
            self.show_stimulus(trial, now);
        }
    }

    fn show_stimulus(&mut self, trial: usize, now: u64) {
        self.phase = TrialPhase::StimulusVisible {
            trial,
            onset_ns: now,
            deadline_ns: now + self.durations.display_ns,
        };
        debug!(trial, payload = %self.sequence[trial].payload, "stimulus shown");
        self.observer.on_stimulus_shown(&self.sequence[trial]);
    }

    /// Finalizes `trial` and opens the inter-trial gap.
    fn resolve(
        &mut self,
        trial: usize,
        response: Option<CapturedResponse>,
        now: u64,
    ) -> std::result::Result<Classification, ArenaError> {
        let record = classify::finalize(self.sequence[trial].clone(), response, now);
        let classification = record.classification;

        self.phase = TrialPhase::InterTrialGap {
            trial,
            until_ns: now + self.durations.gap_ns,
        };

        self.arena.finalize(trial, record)?;
        if let Some(record) = self.arena.get(trial) {
            debug!(
                trial,
                ?classification,
                rt_ms = ?record.reaction_time_ms,
                "trial finalized"
            );
            self.observer.on_trial_finalized(record);
        }
        Ok(classification)
    }

    fn complete(&mut self) {
        match self.arena.clone().into_records() {
            Ok(trials) => {
                self.phase = TrialPhase::Complete;
                info!(
                    task = %self.config.kind(),
                    trials = trials.len(),
                    "session complete"
                );
                self.observer.on_session_complete(SessionResult {
                    config: self.config.clone(),
                    trials,
                });
            }
            Err(e) => {
                error!(error = %e, "session ended with unfinalized trials");
                self.phase = TrialPhase::Aborted;
            }
        }
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            TrialPhase::Idle => SessionStatus::Idle,
            TrialPhase::Complete => SessionStatus::Completed,
            TrialPhase::Aborted => SessionStatus::Aborted,
            _ => SessionStatus::Running,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.config.kind()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sequence(&self) -> &[StimulusSpec] {
        &self.sequence
    }

    /// Stimulus of the trial currently cued or on screen.
    pub fn current_stimulus(&self) -> Option<&StimulusSpec> {
        match self.phase {
            TrialPhase::Cue { trial, .. } | TrialPhase::StimulusVisible { trial, .. } => {
                self.sequence.get(trial)
            }
            _ => None,
        }
    }

    /// `(1-based trial, total)` while running.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        self.phase
            .trial()
            .map(|trial| (trial + 1, self.sequence.len()))
    }

    /// Timer timestamp of the next scheduled transition.
    pub fn next_deadline(&self) -> Option<u64> {
        self.phase.ends_at()
    }

    /// Records finalized so far, in order. Useful after an abort.
    pub fn finalized_trials(&self) -> impl Iterator<Item = &TrialRecord> {
        self.arena.finalized()
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }
}

/// Every stimulus must sit at its own index and belong to the configured task.
fn check_sequence(
    config: &SessionConfig,
    sequence: &[StimulusSpec],
) -> std::result::Result<(), ConfigError> {
    let expected = config.kind();
    for (index, stimulus) in sequence.iter().enumerate() {
        if stimulus.position != index {
            return Err(ConfigError::MisplacedStimulus {
                index,
                position: stimulus.position,
            });
        }
        let actual = stimulus.task();
        if actual != expected {
            return Err(ConfigError::WrongTask {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

/// Marks n-back anchors for a memorize cue when cues are enabled.
fn cue_flags(config: &SessionConfig, sequence: &[StimulusSpec]) -> Vec<bool> {
    let mut cued = vec![false; sequence.len()];
    if let TaskConfig::NBack { n_value, .. } = config.task {
        if config.cue_display_ms > 0 {
            for anchor in sequence::nback::anchor_positions(sequence, n_value) {
                cued[anchor] = true;
            }
        }
    }
    cued
}
