pub mod command;
pub mod letters;

use std::sync::Arc;

/// Asynchronous completions handed back to the session controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// The audio prompt with this generation has finished (or failed).
    PromptFinished { prompt: u64 },
    /// A resolved letter from the listening session with this generation.
    SpokenLetter { listen: u64, letter: char },
}

/// Where collaborators post their signals. The front end routes these into
/// its event loop so they are processed one at a time.
pub type Notifier = Arc<dyn Fn(Signal) + Send + Sync>;

/// Fired exactly once when an utterance ends.
pub type Done = Box<dyn FnOnce() + Send>;

/// Receives single lowercase letters while listening is active.
pub type LetterSink = Box<dyn Fn(char) + Send + Sync>;

/// Text-to-speech prompt. `done` must be called exactly once, also when
/// speech is unavailable or fails.
pub trait Announcer: Send {
    fn speak(&mut self, word: &str, done: Done);
}

/// Spoken-letter recognition.
pub trait LetterListener: Send {
    /// Begin listening. Returns false when recognition cannot start.
    fn start(&mut self, on_letter: LetterSink) -> bool;
    /// Stop listening. Safe to call when nothing is active.
    fn stop(&mut self);
}

/// No audio output: every prompt completes immediately.
pub struct Mute;

impl Announcer for Mute {
    fn speak(&mut self, _word: &str, done: Done) {
        done();
    }
}

/// Recognition is not available on this system.
pub struct NoRecognizer;

impl LetterListener for NoRecognizer {
    fn start(&mut self, _on_letter: LetterSink) -> bool {
        false
    }

    fn stop(&mut self) {}
}
