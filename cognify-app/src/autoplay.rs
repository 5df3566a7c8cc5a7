//! Simulated participant on a manual clock. Runs a whole session instantly.

use anyhow::{Result, bail};
use cognify_core::{InkColor, ResponseValue, StimulusSpec, TrialPhase};
use cognify_engine::{SessionConfig, SessionResult, TrialScheduler};
use cognify_timing::{ManualTimer, Timer};
use rand::Rng;
use tracing::debug;

use crate::app::ConsoleObserver;

/// Reaction-time range of the simulated participant, in ms.
const RT_RANGE: std::ops::RangeInclusive<u64> = 350..=650;

/// Chance that a response is withheld or wrong.
const SLIP_RATE: f64 = 0.1;

pub fn run<R: Rng + ?Sized>(config: SessionConfig, rng: &mut R) -> Result<SessionResult> {
    let timer = ManualTimer::new();
    let mut s = TrialScheduler::generate(config, rng, timer.clone(), ConsoleObserver::default())?;
    s.start();

    while !s.phase().is_terminal() {
        if let TrialPhase::StimulusVisible { trial, .. } = s.phase() {
            let stimulus = s.sequence()[trial].clone();
            if let Some(value) = answer(&stimulus, rng) {
                let rt = rng.random_range(RT_RANGE).min(s.config().stimulus_display_ms - 1);
                timer.advance_ms(rt);
                let outcome = s.submit_response(value);
                debug!(trial, ?outcome, "simulated response");
                continue;
            }
        }
        match s.next_deadline() {
            Some(deadline) => timer.set_ns(deadline.max(timer.now())),
            None => break,
        }
        s.poll();
    }

    match s.into_observer().result {
        Some(result) => Ok(result),
        None => bail!("simulated session ended without a result"),
    }
}

/// What the participant presses for `stimulus`, if anything. A slip on a
/// discrimination trial is a withheld answer or a wrong one, evenly.
fn answer<R: Rng + ?Sized>(stimulus: &StimulusSpec, rng: &mut R) -> Option<ResponseValue> {
    let slip = rng.random_bool(SLIP_RATE);
    match stimulus.expected_response() {
        // Cued recognition: press on targets only.
        None => (stimulus.is_target != slip).then_some(ResponseValue::Match),
        Some(expected) if slip => rng.random_bool(0.5).then(|| wrong(expected, rng)),
        Some(expected) => Some(expected),
    }
}

fn wrong<R: Rng + ?Sized>(expected: ResponseValue, rng: &mut R) -> ResponseValue {
    match expected {
        ResponseValue::Direction(d) => ResponseValue::Direction(d.opposite()),
        ResponseValue::Color(ink) => {
            let others: Vec<InkColor> = InkColor::PALETTE
                .iter()
                .copied()
                .filter(|c| *c != ink)
                .collect();
            ResponseValue::Color(others[rng.random_range(0..others.len())])
        }
        ResponseValue::Match => ResponseValue::Match,
    }
}
