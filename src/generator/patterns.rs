use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::keyboard::key::PhysicalKey;
use crate::keyboard::rows::RowSpec;

const REPEAT_REPS: usize = 4;
const ADJACENT_REPS: usize = 3;
const ALTERNATING_REPS: usize = 4;
const MIRROR_REPS: usize = 4;
const ROLL_REPS: usize = 2;
const ROLL_MAX_LEN: usize = 4;
const PSEUDO_WORD_COUNT: usize = 10;

/// Length of the uniform-random sequence emitted for an unknown algorithm id.
pub const FALLBACK_LEN: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternAlgorithm {
    Repeat,
    Adjacent,
    Alternating,
    Mirror,
    Rolls,
    Pseudo,
}

impl PatternAlgorithm {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "repeat" => Some(PatternAlgorithm::Repeat),
            "adjacent" => Some(PatternAlgorithm::Adjacent),
            "alternating" => Some(PatternAlgorithm::Alternating),
            "mirror" => Some(PatternAlgorithm::Mirror),
            "rolls" => Some(PatternAlgorithm::Rolls),
            "pseudo" => Some(PatternAlgorithm::Pseudo),
            _ => None,
        }
    }
}

/// Dispatch on an algorithm id string. An unknown id is not an error: the
/// defined default is a fixed-length uniform-random draw over the row's
/// combined key set.
pub fn generate(
    algorithm_id: &str,
    row: &RowSpec,
    shuffle: bool,
    rng: &mut SmallRng,
) -> Vec<PhysicalKey> {
    match PatternAlgorithm::from_id(algorithm_id) {
        Some(PatternAlgorithm::Repeat) => single_key_repeat(row, shuffle, rng),
        Some(PatternAlgorithm::Adjacent) => same_hand_adjacent(row, shuffle, rng),
        Some(PatternAlgorithm::Alternating) => alternating_pairs(row, shuffle, rng),
        Some(PatternAlgorithm::Mirror) => mirror_pairs(row, shuffle, rng),
        Some(PatternAlgorithm::Rolls) => rolls(row, shuffle, rng),
        Some(PatternAlgorithm::Pseudo) => pseudo_words(row, shuffle, rng),
        None => {
            log::debug!("unknown pattern algorithm {algorithm_id:?}, using uniform random");
            uniform_random(row, rng)
        }
    }
}

/// Flatten key groups into one sequence with a space between groups.
fn join_with_spaces(groups: Vec<Vec<PhysicalKey>>) -> Vec<PhysicalKey> {
    let mut seq = Vec::new();
    for group in groups {
        seq.extend(group);
        seq.push(PhysicalKey::Space);
    }
    seq.pop();
    seq
}

/// Isolation drill: every key of the row repeated a fixed count, key groups
/// separated by spaces. Row order unless shuffled.
pub fn single_key_repeat(row: &RowSpec, shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let mut pool = row.combined();
    if shuffle {
        pool.shuffle(rng);
    }

    let groups = pool.into_iter().map(|key| vec![key; REPEAT_REPS]).collect();
    join_with_spaces(groups)
}

/// Neighbor drill: consecutive adjacent pairs within each hand.
pub fn same_hand_adjacent(row: &RowSpec, shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let mut pairs: Vec<Vec<PhysicalKey>> = Vec::new();
    for hand in [&row.left, &row.right] {
        for pair in hand.windows(2) {
            pairs.push(pair.to_vec());
        }
    }
    if pairs.is_empty() {
        // Hands too small to pair (single-key focus rows): isolation instead.
        return single_key_repeat(row, shuffle, rng);
    }

    let mut pool: Vec<Vec<PhysicalKey>> = Vec::new();
    for _ in 0..ADJACENT_REPS {
        pool.extend(pairs.iter().cloned());
    }
    if shuffle {
        pool.shuffle(rng);
    }
    join_with_spaces(pool)
}

/// Hand-alternation drill: one key from the left hand, one from the right.
pub fn alternating_pairs(row: &RowSpec, shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let pairs: Vec<Vec<PhysicalKey>> = row
        .left
        .iter()
        .zip(row.right.iter())
        .map(|(&l, &r)| vec![l, r])
        .collect();
    if pairs.is_empty() {
        return single_key_repeat(row, shuffle, rng);
    }

    let mut pool: Vec<Vec<PhysicalKey>> = Vec::new();
    for _ in 0..ALTERNATING_REPS {
        pool.extend(pairs.iter().cloned());
    }
    if shuffle {
        pool.shuffle(rng);
    }
    join_with_spaces(pool)
}

/// Mirror drill: keys at mirrored finger positions across hands, paired from
/// the ends inward.
pub fn mirror_pairs(row: &RowSpec, shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let pairs: Vec<Vec<PhysicalKey>> = row
        .left
        .iter()
        .zip(row.right.iter().rev())
        .map(|(&l, &r)| vec![l, r])
        .collect();
    if pairs.is_empty() {
        return single_key_repeat(row, shuffle, rng);
    }

    let mut pool: Vec<Vec<PhysicalKey>> = Vec::new();
    for _ in 0..MIRROR_REPS {
        pool.extend(pairs.iter().cloned());
    }
    if shuffle {
        pool.shuffle(rng);
    }
    join_with_spaces(pool)
}

/// Roll drill: runs of up to four keys within one hand, emitted inward
/// (pinky to index) and outward (index to pinky).
pub fn rolls(row: &RowSpec, shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let mut patterns: Vec<Vec<PhysicalKey>> = Vec::new();
    for hand in [&row.left, &row.right] {
        for run in hand.chunks(ROLL_MAX_LEN) {
            patterns.push(run.to_vec());
            patterns.push(run.iter().rev().copied().collect());
        }
    }
    if patterns.is_empty() {
        return Vec::new();
    }

    let mut pool: Vec<Vec<PhysicalKey>> = Vec::new();
    for _ in 0..ROLL_REPS {
        pool.extend(patterns.iter().cloned());
    }
    if shuffle {
        pool.shuffle(rng);
    }
    join_with_spaces(pool)
}

/// Free-recall drill: random "words" of 4-6 keys drawn from the whole row.
/// Inherently random, so the shuffle flag has nothing left to do.
pub fn pseudo_words(row: &RowSpec, _shuffle: bool, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let all_keys = row.combined();
    if all_keys.is_empty() {
        return Vec::new();
    }

    let mut seq = Vec::new();
    for _ in 0..PSEUDO_WORD_COUNT {
        let length = rng.gen_range(4..=6);
        for _ in 0..length {
            seq.push(all_keys[rng.gen_range(0..all_keys.len())]);
        }
        seq.push(PhysicalKey::Space);
    }
    seq.pop();
    seq
}

fn uniform_random(row: &RowSpec, rng: &mut SmallRng) -> Vec<PhysicalKey> {
    let all_keys = row.combined();
    if all_keys.is_empty() {
        return Vec::new();
    }
    (0..FALLBACK_LEN)
        .map(|_| all_keys[rng.gen_range(0..all_keys.len())])
        .collect()
}
