pub mod attempt;
pub mod controller;
pub mod countdown;
pub mod difficulty;
pub mod input;
pub mod result;

pub use controller::{Collaborators, Cue, Session, SessionController, SessionSettings, Stage};
pub use input::{InputMode, LetterSource};
pub use result::{DrillMode, Outcome, SessionReport};
