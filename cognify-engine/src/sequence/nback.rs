//! Letter n-back sequences.
//!
//! A target is not placed on its own: it is the repeat of an earlier anchor
//! letter exactly `n` positions back. Anchors are spread left to right so that
//! each one has room for its target and no two overlap.

use cognify_core::{Payload, StimulusSpec};
use rand::Rng;

pub const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Upper bound of the random start offset and of the jitter between anchors.
pub const MAX_JITTER: usize = 2;

/// Picks anchor positions for `target_count` targets.
///
/// Starts at a random offset and then advances by `n_value + 2` plus jitter.
/// Offset and jitter are clamped to the slack still left, so every
/// configuration that fits with zero jitter gets all of its anchors.
/// Otherwise placement is greedy and stops once `anchor + n_value` would
/// fall outside the session.
pub fn place_anchors<R: Rng + ?Sized>(
    total_trials: usize,
    n_value: usize,
    target_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let stride = n_value + 2;
    let mut anchors = Vec::with_capacity(target_count);
    let mut pos = 0;

    for placed in 0..target_count {
        if pos + n_value >= total_trials {
            break;
        }
        // Room left if every later anchor also takes zero jitter.
        let remaining = target_count - placed - 1;
        let slack = (total_trials - 1).saturating_sub(pos + remaining * stride + n_value);
        pos += rng.random_range(0..=MAX_JITTER.min(slack));
        anchors.push(pos);
        pos += stride;
    }
    anchors
}

/// Builds a sequence of `total_trials` letters with one target per anchor.
///
/// Filler letters never repeat the previous letter and never match the letter
/// `n_value` back, so the only n-back matches in the output are the intended
/// targets. The letter right before a target also avoids the target letter,
/// which keeps consecutive letters distinct for `n_value >= 2`.
pub fn generate<R: Rng + ?Sized>(
    total_trials: usize,
    n_value: usize,
    target_count: usize,
    rng: &mut R,
) -> Vec<StimulusSpec> {
    let anchors = place_anchors(total_trials, n_value, target_count, rng);

    let mut anchor_of = vec![None; total_trials];
    for &anchor in &anchors {
        anchor_of[anchor + n_value] = Some(anchor);
    }

    let mut letters: Vec<char> = Vec::with_capacity(total_trials);
    let mut sequence = Vec::with_capacity(total_trials);

    for i in 0..total_trials {
        let (letter, is_target) = match anchor_of[i] {
            Some(anchor) => (letters[anchor], true),
            None => {
                let mut excluded = Vec::with_capacity(3);
                if i > 0 {
                    excluded.push(letters[i - 1]);
                }
                if i >= n_value {
                    excluded.push(letters[i - n_value]);
                }
                if n_value > 1 {
                    if let Some(Some(anchor)) = anchor_of.get(i + 1) {
                        excluded.push(letters[*anchor]);
                    }
                }
                (draw_letter(&excluded, rng), false)
            }
        };

        letters.push(letter);
        sequence.push(StimulusSpec {
            payload: Payload::Letter { letter },
            position: i,
            is_target,
            block_label: None,
        });
    }
    sequence
}

fn draw_letter<R: Rng + ?Sized>(excluded: &[char], rng: &mut R) -> char {
    let candidates: Vec<char> = LETTERS
        .iter()
        .copied()
        .filter(|l| !excluded.contains(l))
        .collect();
    candidates[rng.random_range(0..candidates.len())]
}

/// Positions whose letter is the anchor of a later target.
pub fn anchor_positions(sequence: &[StimulusSpec], n_value: usize) -> Vec<usize> {
    sequence
        .iter()
        .filter(|s| s.is_target && s.position >= n_value)
        .map(|s| s.position - n_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn letter(s: &StimulusSpec) -> char {
        match s.payload {
            Payload::Letter { letter } => letter,
            _ => unreachable!("n-back emits letters only"),
        }
    }

    #[test]
    fn anchors_are_spaced_and_fit() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let anchors = place_anchors(30, 3, 5, &mut rng);
            assert_eq!(anchors.len(), 5, "seed {seed}");
            assert!(anchors[0] <= MAX_JITTER);
            for pair in anchors.windows(2) {
                let gap = pair[1] - pair[0];
                assert!((5..=5 + MAX_JITTER).contains(&gap), "gap {gap}");
            }
            assert!(anchors[4] + 3 < 30);
        }
    }

    #[test]
    fn tight_session_leaves_no_jitter() {
        // (5 - 1) * 4 + 2 + 1 = 19: exactly enough room.
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(place_anchors(19, 2, 5, &mut rng), vec![0, 4, 8, 12, 16]);
    }

    #[test]
    fn stops_when_out_of_room() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(place_anchors(10, 2, 5, &mut rng).len(), 2);
    }

    #[test]
    fn targets_repeat_their_anchor() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(30, 2, 5, &mut rng);
            assert_eq!(seq.len(), 30);
            let targets: Vec<_> = seq.iter().filter(|s| s.is_target).collect();
            assert_eq!(targets.len(), 5);
            for t in targets {
                assert_eq!(letter(t), letter(&seq[t.position - 2]));
            }
        }
    }

    #[test]
    fn only_targets_match_n_back() {
        for n in 1..=4 {
            for seed in 0..50 {
                let mut rng = StdRng::seed_from_u64(seed);
                let seq = generate(40, n, 4, &mut rng);
                for i in n..seq.len() {
                    let matches = letter(&seq[i]) == letter(&seq[i - n]);
                    assert_eq!(matches, seq[i].is_target, "n={n} seed={seed} i={i}");
                }
            }
        }
    }

    #[test]
    fn no_consecutive_repeats_above_one_back() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(30, 3, 5, &mut rng);
            for pair in seq.windows(2) {
                assert_ne!(letter(&pair[0]), letter(&pair[1]), "seed {seed}");
            }
        }
    }

    #[test]
    fn anchor_positions_recovered_from_targets() {
        let mut rng = StdRng::seed_from_u64(11);
        let seq = generate(30, 2, 5, &mut rng);
        let mut rng = StdRng::seed_from_u64(11);
        let anchors = place_anchors(30, 2, 5, &mut rng);
        assert_eq!(anchor_positions(&seq, 2), anchors);
    }
}
