use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::generator::WordSource;
use crate::session::attempt::{LetterFeedback, WordAttempt};
use crate::session::countdown::{Countdown, CountdownStep};
use crate::session::difficulty;
use crate::session::input::{InputMode, LetterSource, ModalityAdapter};
use crate::session::result::{DrillMode, Outcome, SessionReport};
use crate::speech::{Announcer, LetterListener, Notifier, Signal};

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_COUNTDOWN_TICKS: u8 = 5;
pub const DEFAULT_CHOICE_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub batch_size: usize,
    pub countdown_ticks: u8,
    /// Buttons offered in multiple choice, the target included.
    pub choice_count: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            countdown_ticks: DEFAULT_COUNTDOWN_TICKS,
            choice_count: DEFAULT_CHOICE_COUNT,
        }
    }
}

/// External capabilities the controller drives.
pub struct Collaborators {
    pub announcer: Box<dyn Announcer>,
    pub listener: Box<dyn LetterListener>,
    pub words: Box<dyn WordSource>,
    pub notifier: Notifier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// No session running.
    Idle,
    /// Waiting for the audio prompt to finish.
    Prompting,
    /// Counting down; the value is the tick currently showing.
    Countdown(u8),
    Accepting,
    AwaitingChoice,
    /// Word resolved; waiting for the learner to advance.
    Sealed,
    Finished,
}

/// Feedback moments for the front end to play or flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    CountdownTick(u8),
    LetterCorrect,
    LetterWrong,
    WordCorrect,
    WordIncorrect,
    Celebration,
}

/// One practice batch. A fresh value is built for every session.
#[derive(Clone, Debug)]
pub struct Session {
    words: Vec<String>,
    index: usize,
    mode: DrillMode,
    results: Vec<Outcome>,
}

impl Session {
    fn new(mode: DrillMode, words: Vec<String>) -> Self {
        Self {
            words,
            index: 0,
            mode,
            results: Vec::new(),
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn results(&self) -> &[Outcome] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.index).map(|w| w.as_str())
    }

    pub fn is_last_word(&self) -> bool {
        self.index + 1 >= self.words.len()
    }
}

pub struct SessionController {
    settings: SessionSettings,
    announcer: Box<dyn Announcer>,
    words: Box<dyn WordSource>,
    notifier: Notifier,
    modality: ModalityAdapter,
    rng: SmallRng,
    session: Option<Session>,
    stage: Stage,
    attempt: Option<WordAttempt>,
    choices: Vec<String>,
    chosen: Option<String>,
    countdown: Option<Countdown>,
    prompt: u64,
    cues: Vec<Cue>,
    report: Option<SessionReport>,
}

impl SessionController {
    pub fn new(settings: SessionSettings, collaborators: Collaborators) -> Self {
        Self::with_rng(settings, collaborators, SmallRng::from_entropy())
    }

    pub fn with_rng(settings: SessionSettings, collaborators: Collaborators, rng: SmallRng) -> Self {
        Self {
            settings,
            announcer: collaborators.announcer,
            words: collaborators.words,
            notifier: collaborators.notifier,
            modality: ModalityAdapter::new(collaborators.listener),
            rng,
            session: None,
            stage: Stage::Idle,
            attempt: None,
            choices: Vec::new(),
            chosen: None,
            countdown: None,
            prompt: 0,
            cues: Vec::new(),
            report: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Takes effect from the next session.
    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    /// Swap the corpus. Takes effect from the next session.
    pub fn set_word_source(&mut self, words: Box<dyn WordSource>) {
        self.words = words;
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn attempt(&self) -> Option<&WordAttempt> {
        self.attempt.as_ref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn input_mode(&self) -> InputMode {
        self.modality.mode()
    }

    pub fn is_listening(&self) -> bool {
        self.modality.is_listening()
    }

    /// Whether the on-screen letter board takes taps right now.
    pub fn accepts_taps(&self) -> bool {
        self.stage == Stage::Accepting && self.input_mode() == InputMode::Keyboard
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.current_word())
    }

    /// 1-based position of the current word and the batch size.
    pub fn progress(&self) -> (usize, usize) {
        match self.session {
            Some(ref s) => ((s.index + 1).min(s.len()), s.len()),
            None => (0, 0),
        }
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Begin a new session in `mode`, discarding any session in progress.
    pub fn start(&mut self, mode: DrillMode) {
        self.abandon();
        let words = self.words.sample_batch(self.settings.batch_size, &mut self.rng);
        info!("starting {} session with {} words", mode.as_str(), words.len());
        self.session = Some(Session::new(mode, words));
        self.report = None;

        if self.session.as_ref().is_some_and(|s| s.is_empty()) {
            self.finish();
        } else {
            self.begin_word();
        }
    }

    /// Tear down the running session. Stops listening and invalidates any
    /// pending prompt.
    pub fn abandon(&mut self) {
        self.modality.deactivate();
        self.prompt += 1;
        self.session = None;
        self.attempt = None;
        self.countdown = None;
        self.choices.clear();
        self.chosen = None;
        self.transition(Stage::Idle);
    }

    /// Route a collaborator completion back into the state machine.
    pub fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::PromptFinished { prompt } => {
                if self.stage == Stage::Prompting && prompt == self.prompt {
                    self.begin_countdown();
                }
            }
            Signal::SpokenLetter { listen, letter } => {
                self.enter_letter(LetterSource::Speech { listen }, letter);
            }
        }
    }

    /// One countdown unit has elapsed.
    pub fn countdown_elapsed(&mut self) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        match countdown.elapse() {
            CountdownStep::Tick(n) => {
                self.cues.push(Cue::CountdownTick(n));
                self.transition(Stage::Countdown(n));
            }
            CountdownStep::Done => self.open_input(),
        }
    }

    /// Forward a letter guess to the answer tracker, if the source is live
    /// and the word is accepting input.
    pub fn enter_letter(&mut self, source: LetterSource, letter: char) -> Option<LetterFeedback> {
        if self.stage != Stage::Accepting {
            return None;
        }
        let count = self.visible_count();
        let attempt = self.attempt.as_mut()?;
        if !self.modality.admits(source, letter, &attempt.visible) {
            return None;
        }

        let feedback = attempt.submit(letter)?;
        self.cues.push(if feedback.correct {
            Cue::LetterCorrect
        } else {
            Cue::LetterWrong
        });

        if attempt.is_complete() {
            self.seal_spelling();
        } else {
            attempt.refresh_visible(count, &mut self.rng);
        }
        Some(feedback)
    }

    /// Remove the last letter. Returns the cleared slot.
    pub fn undo(&mut self) -> Option<usize> {
        if self.stage != Stage::Accepting {
            return None;
        }
        let count = self.visible_count();
        let attempt = self.attempt.as_mut()?;
        let slot = attempt.undo()?;
        attempt.refresh_visible(count, &mut self.rng);
        Some(slot)
    }

    /// Submit a whole-word choice. Returns whether it was right; `None` if no
    /// choice is being awaited or `word` was not offered.
    pub fn choose(&mut self, word: &str) -> Option<bool> {
        if self.stage != Stage::AwaitingChoice || !self.choices.iter().any(|c| c == word) {
            return None;
        }
        let target = self.current_word()?.to_string();
        let correct = word == target;
        self.chosen = Some(word.to_string());
        self.record(Outcome {
            word: target,
            correct,
            user_answer: word.to_string(),
            mode: DrillMode::MultipleChoice,
        });
        Some(correct)
    }

    pub fn choose_index(&mut self, index: usize) -> Option<bool> {
        let word = self.choices.get(index)?.clone();
        self.choose(&word)
    }

    /// Learner asked to move on from a sealed word.
    pub fn advance(&mut self) -> bool {
        if self.stage != Stage::Sealed {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.index += 1;
        if session.index >= session.len() {
            self.finish();
        } else {
            self.begin_word();
        }
        true
    }

    pub fn toggle_input_mode(&mut self) -> InputMode {
        let live = self.stage == Stage::Accepting;
        let mode = self.modality.toggle(live, &self.notifier);
        debug!("input mode now {}", mode.as_str());
        mode
    }

    /// Speak the current word again. Does not affect the stage.
    pub fn repeat_prompt(&mut self) -> bool {
        if !matches!(self.stage, Stage::Accepting | Stage::AwaitingChoice) {
            return false;
        }
        let Some(word) = self.current_word().map(str::to_string) else {
            return false;
        };
        self.announcer.speak(&word, Box::new(|| {}));
        true
    }

    fn visible_count(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| difficulty::visible_count(s.index, s.len()))
            .unwrap_or(difficulty::ALPHABET.len())
    }

    fn transition(&mut self, stage: Stage) {
        if self.stage != stage {
            debug!("stage {:?} -> {:?}", self.stage, stage);
        }
        self.stage = stage;
    }

    fn begin_word(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(word) = session.current_word().map(str::to_string) else {
            return;
        };

        self.attempt = match session.mode {
            DrillMode::Spelling => Some(WordAttempt::new(&word)),
            DrillMode::MultipleChoice => None,
        };
        self.choices.clear();
        self.chosen = None;
        self.transition(Stage::Prompting);

        self.prompt += 1;
        let prompt = self.prompt;
        let notifier = self.notifier.clone();
        self.announcer.speak(
            &word,
            Box::new(move || notifier(Signal::PromptFinished { prompt })),
        );
    }

    fn begin_countdown(&mut self) {
        let (countdown, step) = Countdown::start(self.settings.countdown_ticks);
        match step {
            CountdownStep::Tick(n) => {
                self.countdown = Some(countdown);
                self.cues.push(Cue::CountdownTick(n));
                self.transition(Stage::Countdown(n));
            }
            CountdownStep::Done => self.open_input(),
        }
    }

    fn open_input(&mut self) {
        self.countdown = None;
        let Some(mode) = self.session.as_ref().map(|s| s.mode) else {
            return;
        };

        match mode {
            DrillMode::Spelling => {
                let count = self.visible_count();
                let Some(attempt) = self.attempt.as_mut() else {
                    return;
                };
                attempt.open();
                attempt.refresh_visible(count, &mut self.rng);
                let empty = attempt.is_complete();
                self.transition(Stage::Accepting);
                if empty {
                    self.seal_spelling();
                } else {
                    self.modality.activate(&self.notifier);
                }
            }
            DrillMode::MultipleChoice => {
                let Some(target) = self.current_word().map(str::to_string) else {
                    return;
                };
                let wanted = self.settings.choice_count.saturating_sub(1).max(1);
                let mut choices = self.words.distractors(&target, wanted, &mut self.rng);
                choices.push(target);
                choices.shuffle(&mut self.rng);
                self.choices = choices;
                self.transition(Stage::AwaitingChoice);
            }
        }
    }

    fn seal_spelling(&mut self) {
        self.modality.deactivate();
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        attempt.seal();
        attempt.show_all_letters();
        let outcome = Outcome {
            word: attempt.word.clone(),
            correct: attempt.is_correct(),
            user_answer: attempt.answer(),
            mode: DrillMode::Spelling,
        };
        self.record(outcome);
    }

    fn record(&mut self, outcome: Outcome) {
        debug!(
            "sealed {:?}: answer {:?}, correct {}",
            outcome.word, outcome.user_answer, outcome.correct
        );
        self.cues.push(if outcome.correct {
            Cue::WordCorrect
        } else {
            Cue::WordIncorrect
        });
        if let Some(session) = self.session.as_mut() {
            session.results.push(outcome);
        }
        self.transition(Stage::Sealed);
    }

    fn finish(&mut self) {
        self.modality.deactivate();
        self.attempt = None;
        self.choices.clear();
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let report = SessionReport::from_outcomes(session.mode, &session.results, session.len());
        info!(
            "session finished: {}/{} correct, {} stars",
            report.correct, report.total, report.stars
        );
        let missed: Vec<&str> = report.missed().map(|o| o.word.as_str()).collect();
        if !missed.is_empty() {
            debug!("missed words: {}", missed.join(", "));
        }
        if report.celebrate {
            self.cues.push(Cue::Celebration);
        }
        self.report = Some(report);
        self.transition(Stage::Finished);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::generator::dictionary::WordBank;
    use crate::speech::{Mute, NoRecognizer};

    type Signals = Arc<Mutex<Vec<Signal>>>;

    fn controller(words: &[&str], settings: SessionSettings) -> (SessionController, Signals) {
        let signals: Signals = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&signals);
        let collaborators = Collaborators {
            announcer: Box::new(Mute),
            listener: Box::new(NoRecognizer),
            words: Box::new(WordBank::from_words(words.iter().copied())),
            notifier: Arc::new(move |s: Signal| sink.lock().unwrap().push(s)),
        };
        let rng = SmallRng::seed_from_u64(42);
        (SessionController::with_rng(settings, collaborators, rng), signals)
    }

    fn pump(controller: &mut SessionController, signals: &Signals) {
        let pending: Vec<Signal> = signals.lock().unwrap().drain(..).collect();
        for signal in pending {
            controller.handle_signal(signal);
        }
    }

    fn open(controller: &mut SessionController, signals: &Signals) {
        pump(controller, signals);
        while matches!(controller.stage(), Stage::Countdown(_)) {
            controller.countdown_elapsed();
        }
    }

    #[test]
    fn prompt_completion_is_not_handled_synchronously() {
        let (mut c, signals) = controller(&["cat"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        assert_eq!(c.stage(), Stage::Prompting);
        assert_eq!(signals.lock().unwrap().len(), 1);

        pump(&mut c, &signals);
        assert_eq!(c.stage(), Stage::Countdown(5));
    }

    #[test]
    fn countdown_ticks_five_times_before_input() {
        let (mut c, signals) = controller(&["cat"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        pump(&mut c, &signals);

        for _ in 0..4 {
            c.countdown_elapsed();
            assert!(matches!(c.stage(), Stage::Countdown(_)));
        }
        c.countdown_elapsed();
        assert_eq!(c.stage(), Stage::Accepting);

        let ticks: Vec<Cue> = c
            .drain_cues()
            .into_iter()
            .filter(|cue| matches!(cue, Cue::CountdownTick(_)))
            .collect();
        assert_eq!(ticks.len(), 5);
    }

    #[test]
    fn letters_before_countdown_ends_are_ignored() {
        let (mut c, signals) = controller(&["cat"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        assert_eq!(c.enter_letter(LetterSource::Key, 'c'), None);
        pump(&mut c, &signals);
        assert_eq!(c.enter_letter(LetterSource::Key, 'c'), None);
        assert!(c.attempt().unwrap().entered.is_empty());
    }

    #[test]
    fn stale_prompt_signal_is_ignored() {
        let (mut c, signals) = controller(&["cat", "dog"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        let stale = signals.lock().unwrap().drain(..).collect::<Vec<_>>();
        c.start(DrillMode::Spelling);
        for signal in stale {
            c.handle_signal(signal);
        }
        assert_eq!(c.stage(), Stage::Prompting);
    }

    #[test]
    fn hidden_keys_are_rejected() {
        let (mut c, signals) = controller(&["cat", "dog"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        open(&mut c, &signals);

        let visible = c.attempt().unwrap().visible.clone();
        assert_eq!(visible.len(), 3);
        let hidden = difficulty::ALPHABET
            .iter()
            .copied()
            .find(|l| !visible.contains(l))
            .unwrap();
        assert_eq!(c.enter_letter(LetterSource::Key, hidden), None);
        assert!(c.attempt().unwrap().entered.is_empty());
    }

    #[test]
    fn sealed_word_waits_for_advance() {
        let settings = SessionSettings {
            batch_size: 2,
            countdown_ticks: 0,
            ..SessionSettings::default()
        };
        let (mut c, signals) = controller(&["ox", "ax"], settings);
        c.start(DrillMode::Spelling);
        open(&mut c, &signals);

        let word = c.current_word().unwrap().to_string();
        for ch in word.chars() {
            c.enter_letter(LetterSource::Tap, ch);
        }
        assert_eq!(c.stage(), Stage::Sealed);
        assert_eq!(c.session().unwrap().results().len(), 1);
        assert_eq!(c.enter_letter(LetterSource::Tap, 'x'), None);
        assert_eq!(c.undo(), None);

        assert!(c.advance());
        assert_eq!(c.stage(), Stage::Prompting);
        assert_eq!(c.session().unwrap().index(), 1);
        assert!(!c.advance());
    }

    #[test]
    fn undo_resamples_for_previous_position() {
        let settings = SessionSettings {
            countdown_ticks: 0,
            ..SessionSettings::default()
        };
        let (mut c, signals) = controller(&["cat"], settings);
        c.start(DrillMode::Spelling);
        open(&mut c, &signals);

        assert!(c.enter_letter(LetterSource::Key, 'c').is_some());
        assert!(c.attempt().unwrap().visible.contains(&'a'));
        assert_eq!(c.undo(), Some(0));
        assert!(c.attempt().unwrap().visible.contains(&'c'));
        assert_eq!(c.undo(), None);
    }

    #[test]
    fn multiple_choice_accepts_exactly_one_pick() {
        let settings = SessionSettings {
            batch_size: 1,
            countdown_ticks: 0,
            choice_count: 3,
        };
        let (mut c, signals) = controller(&["cat", "dog", "sun", "hat"], settings);
        c.start(DrillMode::MultipleChoice);
        assert_eq!(c.enter_letter(LetterSource::Key, 'c'), None);
        open(&mut c, &signals);

        assert_eq!(c.stage(), Stage::AwaitingChoice);
        assert_eq!(c.choices().len(), 3);
        let target = c.current_word().unwrap().to_string();
        assert!(c.choices().contains(&target));

        assert_eq!(c.choose("not offered"), None);
        assert_eq!(c.choose(&target), Some(true));
        assert_eq!(c.choose(&target), None);
        assert_eq!(c.session().unwrap().results().len(), 1);
    }

    #[test]
    fn abandon_returns_to_idle_and_drops_session() {
        let (mut c, signals) = controller(&["cat"], SessionSettings::default());
        c.start(DrillMode::Spelling);
        pump(&mut c, &signals);
        c.abandon();
        assert_eq!(c.stage(), Stage::Idle);
        assert!(c.session().is_none());
        c.countdown_elapsed();
        assert_eq!(c.stage(), Stage::Idle);
    }

    #[test]
    fn empty_corpus_finishes_immediately() {
        let (mut c, _signals) = controller(&[], SessionSettings::default());
        c.start(DrillMode::Spelling);
        assert_eq!(c.stage(), Stage::Finished);
        assert_eq!(c.report().unwrap().total, 0);
    }

    #[test]
    fn repeat_prompt_only_while_answering() {
        let settings = SessionSettings {
            countdown_ticks: 0,
            ..SessionSettings::default()
        };
        let (mut c, signals) = controller(&["cat"], settings);
        c.start(DrillMode::Spelling);
        assert!(!c.repeat_prompt());
        open(&mut c, &signals);
        assert!(c.repeat_prompt());
        assert_eq!(c.stage(), Stage::Accepting);
    }
}
