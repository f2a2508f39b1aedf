use rand::Rng;
use rand::seq::SliceRandom;

pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

const MIN_VISIBLE: usize = 3;

/// Number of selectable letters for the word at `position` in a batch of
/// `batch_size`. Rises linearly from 3 on the first word to the full alphabet
/// on the last.
pub fn visible_count(position: usize, batch_size: usize) -> usize {
    if batch_size <= 1 || position + 1 >= batch_size {
        return ALPHABET.len();
    }
    let span = (ALPHABET.len() - MIN_VISIBLE) as f64;
    let ratio = position as f64 / (batch_size - 1) as f64;
    let count = (MIN_VISIBLE as f64 + ratio * span).round() as usize;
    count.clamp(MIN_VISIBLE, ALPHABET.len())
}

/// The correct letter plus `count - 1` distinct random distractors, in
/// alphabetical order. A count of 26 or more yields the whole alphabet.
pub fn pick_visible_letters<R: Rng + ?Sized>(correct: char, count: usize, rng: &mut R) -> Vec<char> {
    if count >= ALPHABET.len() {
        return ALPHABET.to_vec();
    }

    let pool: Vec<char> = ALPHABET.iter().copied().filter(|&l| l != correct).collect();
    let take = count.saturating_sub(1).min(pool.len());

    let mut visible: Vec<char> = pool.choose_multiple(rng, take).copied().collect();
    visible.push(correct);
    visible.sort_unstable();
    visible
}
