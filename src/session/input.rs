use log::{debug, warn};

use crate::speech::{LetterListener, Notifier, Signal};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Keyboard,
    Speech,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Keyboard => "keyboard",
            InputMode::Speech => "speech",
        }
    }
}

/// Where a letter guess came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterSource {
    /// Physical key press. Only letters on the visible keyboard count.
    Key,
    /// Click on the on-screen keyboard.
    Tap,
    /// Resolved speech from the listening session with this generation.
    Speech { listen: u64 },
}

/// Decides which letter events reach the answer tracker and owns the
/// speech-listening channel.
pub struct ModalityAdapter {
    mode: InputMode,
    listener: Box<dyn LetterListener>,
    generation: u64,
    listening: Option<u64>,
}

impl ModalityAdapter {
    pub fn new(listener: Box<dyn LetterListener>) -> Self {
        Self {
            mode: InputMode::Keyboard,
            listener,
            generation: 0,
            listening: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_some()
    }

    /// Whether a guess from `source` may be forwarded, given the letters
    /// currently offered.
    pub fn admits(&self, source: LetterSource, letter: char, visible: &[char]) -> bool {
        if !letter.is_ascii_alphabetic() {
            return false;
        }
        let letter = letter.to_ascii_lowercase();
        match source {
            LetterSource::Key => visible.contains(&letter),
            LetterSource::Tap => self.mode == InputMode::Keyboard && visible.contains(&letter),
            LetterSource::Speech { listen } => {
                self.mode == InputMode::Speech && self.listening == Some(listen)
            }
        }
    }

    /// Open the live channel for a word that is now accepting input. In
    /// speech mode this starts the recognizer, falling back to keyboard if it
    /// cannot start.
    pub fn activate(&mut self, notifier: &Notifier) {
        if self.mode != InputMode::Speech {
            return;
        }
        self.deactivate();

        self.generation += 1;
        let listen = self.generation;
        let notifier = notifier.clone();
        let started = self.listener.start(Box::new(move |letter: char| {
            notifier(Signal::SpokenLetter { listen, letter })
        }));

        if started {
            debug!("listening for spoken letters (generation {listen})");
            self.listening = Some(listen);
        } else {
            warn!("speech recognition could not start, using keyboard");
            self.mode = InputMode::Keyboard;
        }
    }

    /// Stop any listening session. Unconditional and idempotent.
    pub fn deactivate(&mut self) {
        self.listening = None;
        self.listener.stop();
    }

    /// Flip between keyboard and speech. `live` says whether the current word
    /// is accepting input, in which case speech starts right away.
    pub fn toggle(&mut self, live: bool, notifier: &Notifier) -> InputMode {
        match self.mode {
            InputMode::Keyboard => {
                self.mode = InputMode::Speech;
                if live {
                    self.activate(notifier);
                }
            }
            InputMode::Speech => {
                self.mode = InputMode::Keyboard;
                self.deactivate();
            }
        }
        self.mode
    }
}
