pub mod dictionary;
pub mod distractors;

use rand::RngCore;

/// Supplies the words for a session and wrong answers for multiple choice.
pub trait WordSource: Send {
    /// Up to `count` distinct words in random order.
    fn sample_batch(&mut self, count: usize, rng: &mut dyn RngCore) -> Vec<String>;

    /// `count` plausible wrong answers for `word`, never the word itself.
    fn distractors(&mut self, word: &str, count: usize, rng: &mut dyn RngCore) -> Vec<String>;
}
