use rand::Rng;

use crate::session::difficulty;

/// Result of a single accepted letter, used for immediate feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LetterFeedback {
    /// Index into the full character sequence that was filled.
    pub slot: usize,
    pub letter: char,
    pub correct: bool,
}

/// Entry state for one word in spelling mode.
#[derive(Clone, Debug)]
pub struct WordAttempt {
    pub word: String,
    /// Every character of the word, separators included.
    pub slots: Vec<char>,
    /// The answer key: `slots` without separators.
    pub expected: Vec<char>,
    pub entered: Vec<char>,
    /// Next fillable slot. Never rests on a separator.
    pub cursor: usize,
    pub visible: Vec<char>,
    accepting: bool,
}

pub fn is_separator(ch: char) -> bool {
    !ch.is_alphabetic()
}

impl WordAttempt {
    pub fn new(word: &str) -> Self {
        // Input is lowercased on entry, so the answer key must be too.
        let slots: Vec<char> = word.chars().flat_map(char::to_lowercase).collect();
        let expected = slots.iter().copied().filter(|&c| !is_separator(c)).collect();
        let mut attempt = Self {
            word: word.to_string(),
            slots,
            expected,
            entered: Vec::new(),
            cursor: 0,
            visible: Vec::new(),
            accepting: false,
        };
        attempt.skip_separators_forward();
        attempt
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn open(&mut self) {
        if !self.is_complete() {
            self.accepting = true;
        }
    }

    pub fn seal(&mut self) {
        self.accepting = false;
    }

    pub fn is_complete(&self) -> bool {
        self.entered.len() == self.expected.len()
    }

    /// The letter the learner should enter next, if any.
    pub fn next_expected(&self) -> Option<char> {
        self.expected.get(self.entered.len()).copied()
    }

    /// Positional, all-or-nothing comparison.
    pub fn is_correct(&self) -> bool {
        self.is_complete() && self.entered == self.expected
    }

    pub fn answer(&self) -> String {
        self.entered.iter().collect()
    }

    /// Record a letter. Wrong letters are accepted too; the returned feedback
    /// only says whether it matched. Sealing on completion is automatic.
    pub fn submit(&mut self, ch: char) -> Option<LetterFeedback> {
        if !self.accepting || self.is_complete() {
            return None;
        }

        let letter = ch.to_lowercase().next().unwrap_or(ch);
        let index = self.entered.len();
        let correct = self.expected[index] == letter;
        let slot = self.cursor;

        self.entered.push(letter);
        self.cursor += 1;
        self.skip_separators_forward();

        if self.is_complete() {
            self.seal();
        }

        Some(LetterFeedback {
            slot,
            letter,
            correct,
        })
    }

    /// Remove the last letter. Returns the slot that was cleared.
    pub fn undo(&mut self) -> Option<usize> {
        if !self.accepting || self.entered.is_empty() {
            return None;
        }

        self.entered.pop();
        self.cursor = self.cursor.saturating_sub(1);
        while self.cursor > 0 && self.slots.get(self.cursor).is_some_and(|&c| is_separator(c)) {
            self.cursor -= 1;
        }
        Some(self.cursor)
    }

    /// Resample the visible alphabet around the next expected letter.
    pub fn refresh_visible<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        if let Some(correct) = self.next_expected() {
            self.visible = difficulty::pick_visible_letters(correct, count, rng);
        }
    }

    pub fn show_all_letters(&mut self) {
        self.visible = difficulty::ALPHABET.to_vec();
    }

    fn skip_separators_forward(&mut self) {
        while self.cursor < self.slots.len() && is_separator(self.slots[self.cursor]) {
            self.cursor += 1;
        }
    }
}
