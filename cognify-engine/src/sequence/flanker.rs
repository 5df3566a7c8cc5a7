use cognify_core::{ArrowDirection, FlankerArrows, Payload, StimulusSpec};
use rand::Rng;

/// Builds `total_trials` arrow rows.
///
/// Centre direction and congruency are fair coin flips. A row identical to
/// the previous one is never emitted; drawing uniformly from the other three
/// combinations is the same distribution as redrawing until they differ.
pub fn generate<R: Rng + ?Sized>(
    total_trials: usize,
    flankers_per_side: usize,
    rng: &mut R,
) -> Vec<StimulusSpec> {
    let all: Vec<FlankerArrows> = [ArrowDirection::Left, ArrowDirection::Right]
        .into_iter()
        .flat_map(|center| {
            [true, false].map(|congruent| FlankerArrows {
                center,
                congruent,
                flankers_per_side,
            })
        })
        .collect();

    let mut sequence: Vec<StimulusSpec> = Vec::with_capacity(total_trials);
    let mut previous: Option<FlankerArrows> = None;

    for position in 0..total_trials {
        let candidates: Vec<&FlankerArrows> =
            all.iter().filter(|a| Some(**a) != previous).collect();
        let arrows = *candidates[rng.random_range(0..candidates.len())];
        previous = Some(arrows);
        sequence.push(StimulusSpec::new(Payload::Arrows(arrows), position));
    }
    sequence
}
