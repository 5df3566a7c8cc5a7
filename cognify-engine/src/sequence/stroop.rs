//! Emotional Stroop sequences: two balanced word blocks, randomly interleaved.

use cognify_core::{BlockLabel, InkColor, Payload, StimulusSpec};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::stroop_block_sizes;

pub const NEUTRAL_WORDS: [&str; 8] = [
    "Table", "Path", "Chair", "Street", "Window", "Paper", "Garden", "Bottle",
];

pub const EMOTIONAL_WORDS: [&str; 8] = [
    "Death", "Kill", "Shame", "Murder", "Fear", "Trauma", "Pain", "Grief",
];

fn draw_block<R: Rng + ?Sized>(
    pool: &[&str],
    count: usize,
    label: BlockLabel,
    rng: &mut R,
) -> Vec<(String, InkColor, BlockLabel)> {
    let mut words = pool.to_vec();
    words.shuffle(rng);
    words.truncate(count);
    words
        .into_iter()
        .map(|word| {
            let ink = InkColor::PALETTE[rng.random_range(0..InkColor::PALETTE.len())];
            (word.to_string(), ink, label)
        })
        .collect()
}

/// Builds `total_trials` coloured words, half from each pool.
///
/// Callers validate the block sizes against the pools first; a short pool
/// simply yields fewer words.
pub fn generate<R: Rng + ?Sized>(total_trials: usize, rng: &mut R) -> Vec<StimulusSpec> {
    let (neutral, emotional) = stroop_block_sizes(total_trials);

    let mut trials = draw_block(&NEUTRAL_WORDS, neutral, BlockLabel::Neutral, rng);
    trials.extend(draw_block(
        &EMOTIONAL_WORDS,
        emotional,
        BlockLabel::Emotional,
        rng,
    ));
    trials.shuffle(rng);

    trials
        .into_iter()
        .enumerate()
        .map(|(position, (word, ink, label))| StimulusSpec {
            payload: Payload::Word { word, ink },
            position,
            is_target: false,
            block_label: Some(label),
        })
        .collect()
}
