use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillMode {
    Spelling,
    MultipleChoice,
}

impl DrillMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DrillMode::Spelling => "spelling",
            DrillMode::MultipleChoice => "multiple_choice",
        }
    }
}

/// One finished word. Never modified after it is recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub word: String,
    pub correct: bool,
    /// Letters entered, or the chosen word in multiple choice.
    pub user_answer: String,
    pub mode: DrillMode,
}

/// Final tally for a finished session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub mode: DrillMode,
    pub correct: usize,
    pub total: usize,
    pub stars: u8,
    pub celebrate: bool,
    pub outcomes: Vec<Outcome>,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    pub fn from_outcomes(mode: DrillMode, outcomes: &[Outcome], total: usize) -> Self {
        let correct = outcomes.iter().filter(|o| o.correct).count();
        Self {
            mode,
            correct,
            total,
            stars: scoring::star_rating(correct, total),
            celebrate: scoring::should_celebrate(correct, total),
            outcomes: outcomes.to_vec(),
            finished_at: Utc::now(),
        }
    }

    pub fn missed(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.correct)
    }
}
