pub const MAX_STARS: u8 = 3;

/// Share of the batch that must be correct to earn a celebration.
const CELEBRATION_RATIO: f64 = 0.6;

/// 3 stars from 90%, 2 from 60%, 1 for any correct word.
pub fn star_rating(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = correct as f64 / total as f64;
    if ratio >= 0.9 {
        3
    } else if ratio >= 0.6 {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    }
}

pub fn should_celebrate(correct: usize, total: usize) -> bool {
    total > 0 && correct as f64 >= total as f64 * CELEBRATION_RATIO
}
