use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use spellbee::engine::scoring::MAX_STARS;
use spellbee::generator::WordSource;
use spellbee::session::difficulty::ALPHABET;
use spellbee::session::{
    Collaborators, Cue, DrillMode, InputMode, LetterSource, SessionController, SessionSettings,
    Stage,
};
use spellbee::speech::{Announcer, Done, LetterListener, LetterSink, Mute, NoRecognizer, Signal};

/// Hands out a fixed batch in order and fixed distractors.
struct ScriptedWords {
    batch: Vec<String>,
    distractors: Vec<String>,
}

impl ScriptedWords {
    fn new(batch: &[&str], distractors: &[&str]) -> Self {
        Self {
            batch: batch.iter().map(|w| w.to_string()).collect(),
            distractors: distractors.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl WordSource for ScriptedWords {
    fn sample_batch(&mut self, count: usize, _rng: &mut dyn RngCore) -> Vec<String> {
        self.batch.iter().take(count).cloned().collect()
    }

    fn distractors(&mut self, word: &str, count: usize, _rng: &mut dyn RngCore) -> Vec<String> {
        self.distractors
            .iter()
            .filter(|d| *d != word)
            .take(count)
            .cloned()
            .collect()
    }
}

/// Records prompts without completing them; the test completes them.
#[derive(Default)]
struct HeldPrompts {
    spoken: Arc<Mutex<Vec<(String, Done)>>>,
}

impl Announcer for HeldPrompts {
    fn speak(&mut self, word: &str, done: Done) {
        self.spoken.lock().unwrap().push((word.to_string(), done));
    }
}

#[derive(Default)]
struct ListenerProbe {
    starts: AtomicUsize,
    stops: AtomicUsize,
    sink: Mutex<Option<LetterSink>>,
}

struct FakeListener(Arc<ListenerProbe>);

impl LetterListener for FakeListener {
    fn start(&mut self, on_letter: LetterSink) -> bool {
        self.0.starts.fetch_add(1, Ordering::SeqCst);
        *self.0.sink.lock().unwrap() = Some(on_letter);
        true
    }

    fn stop(&mut self) {
        self.0.stops.fetch_add(1, Ordering::SeqCst);
        self.0.sink.lock().unwrap().take();
    }
}

impl ListenerProbe {
    fn say(&self, letter: char) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink(letter);
        }
    }
}

struct Harness {
    controller: SessionController,
    signals: Arc<Mutex<Vec<Signal>>>,
}

impl Harness {
    fn new(
        settings: SessionSettings,
        announcer: Box<dyn Announcer>,
        listener: Box<dyn LetterListener>,
        words: ScriptedWords,
    ) -> Self {
        let signals: Arc<Mutex<Vec<Signal>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&signals);
        let collaborators = Collaborators {
            announcer,
            listener,
            words: Box::new(words),
            notifier: Arc::new(move |signal: Signal| sink.lock().unwrap().push(signal)),
        };
        let controller =
            SessionController::with_rng(settings, collaborators, SmallRng::seed_from_u64(7));
        Self {
            controller,
            signals,
        }
    }

    fn quick(settings: SessionSettings, words: ScriptedWords) -> Self {
        Self::new(settings, Box::new(Mute), Box::new(NoRecognizer), words)
    }

    /// Deliver queued collaborator signals, one at a time.
    fn pump(&mut self) {
        let pending: Vec<Signal> = self.signals.lock().unwrap().drain(..).collect();
        for signal in pending {
            self.controller.handle_signal(signal);
        }
    }

    /// Finish the prompt and run the countdown to the answering stage.
    fn open_word(&mut self) {
        self.pump();
        while matches!(self.controller.stage(), Stage::Countdown(_)) {
            self.controller.countdown_elapsed();
        }
    }

    fn type_word(&mut self, word: &str) {
        for ch in word.chars().filter(|c| c.is_alphabetic()) {
            assert!(
                self.controller.enter_letter(LetterSource::Key, ch).is_some(),
                "letter {ch:?} of {word:?} was rejected"
            );
        }
    }
}

fn settings(batch_size: usize) -> SessionSettings {
    SessionSettings {
        batch_size,
        ..SessionSettings::default()
    }
}

const TEN: [&str; 10] = [
    "cat", "dog", "sun", "hat", "bed", "cup", "pig", "red", "box", "fish",
];

#[test]
fn scenario_a_visible_letters_grow_across_the_batch() {
    let mut h = Harness::quick(settings(10), ScriptedWords::new(&TEN, &[]));
    h.controller.start(DrillMode::Spelling);

    let mut first_and_last = Vec::new();
    for (i, word) in TEN.iter().enumerate() {
        h.open_word();
        assert_eq!(h.controller.stage(), Stage::Accepting);

        let attempt = h.controller.attempt().unwrap();
        let first = word.chars().next().unwrap();
        assert!(attempt.visible.contains(&first));
        if i == 0 || i == 9 {
            first_and_last.push(attempt.visible.len());
        }

        h.type_word(word);
        assert_eq!(h.controller.stage(), Stage::Sealed);
        assert!(h.controller.advance());
    }

    assert_eq!(first_and_last, vec![3, ALPHABET.len()]);
    assert_eq!(h.controller.stage(), Stage::Finished);
    assert_eq!(h.controller.report().unwrap().correct, 10);
}

#[test]
fn scenario_b_wrong_last_letter_fails_the_word() {
    let mut h = Harness::quick(settings(10), ScriptedWords::new(&["cat"], &[]));
    h.controller.start(DrillMode::Spelling);
    h.open_word();

    let c = h.controller.enter_letter(LetterSource::Key, 'c').unwrap();
    let a = h.controller.enter_letter(LetterSource::Key, 'a').unwrap();
    let x = h.controller.enter_letter(LetterSource::Key, 'x').unwrap();
    assert!(c.correct && a.correct && !x.correct);

    let outcome = &h.controller.session().unwrap().results()[0];
    assert_eq!(outcome.word, "cat");
    assert!(!outcome.correct);
    assert_eq!(outcome.user_answer, "cax");
    assert_eq!(outcome.mode, DrillMode::Spelling);

    let cues = h.controller.drain_cues();
    assert!(cues.contains(&Cue::LetterWrong));
    assert_eq!(cues.last(), Some(&Cue::WordIncorrect));
}

#[test]
fn scenario_c_multiple_choice_perfect_batch_gets_top_tier() {
    let mut h = Harness::quick(
        settings(10),
        ScriptedWords::new(&TEN, &["kat", "catt", "dogg", "sunn"]),
    );
    h.controller.start(DrillMode::MultipleChoice);

    for (i, word) in TEN.iter().enumerate() {
        h.open_word();
        assert_eq!(h.controller.stage(), Stage::AwaitingChoice);
        assert_eq!(h.controller.choices().len(), 3);
        assert!(h.controller.choices().iter().any(|c| c == word));
        assert_eq!(h.controller.enter_letter(LetterSource::Key, 'c'), None);

        assert_eq!(h.controller.choose(word), Some(true));
        if i == 0 {
            let outcome = &h.controller.session().unwrap().results()[0];
            assert_eq!(outcome.word, "cat");
            assert!(outcome.correct);
            assert_eq!(outcome.user_answer, "cat");
        }
        assert!(h.controller.advance());
    }

    let report = h.controller.report().unwrap();
    assert_eq!(report.correct, 10);
    assert_eq!(report.stars, MAX_STARS);
    assert!(report.celebrate);
    assert!(h.controller.drain_cues().contains(&Cue::Celebration));
}

#[test]
fn scenario_d_unavailable_speech_falls_back_to_keyboard() {
    let mut h = Harness::quick(settings(1), ScriptedWords::new(&["cat"], &[]));
    h.controller.start(DrillMode::Spelling);

    assert_eq!(h.controller.toggle_input_mode(), InputMode::Speech);
    h.open_word();

    assert_eq!(h.controller.stage(), Stage::Accepting);
    assert_eq!(h.controller.input_mode(), InputMode::Keyboard);
    h.type_word("cat");
    assert!(h.controller.session().unwrap().results()[0].correct);
}

#[test]
fn capitalised_source_words_are_spelled_in_lowercase() {
    let mut h = Harness::quick(settings(2), ScriptedWords::new(&["Cat", "dog"], &[]));
    h.controller.start(DrillMode::Spelling);
    h.open_word();

    let visible = h.controller.attempt().unwrap().visible.clone();
    assert!(visible.contains(&'c'));
    assert!(!visible.contains(&'C'));

    h.type_word("Cat");
    let outcome = &h.controller.session().unwrap().results()[0];
    assert_eq!(outcome.word, "Cat");
    assert!(outcome.correct);
    assert_eq!(outcome.user_answer, "cat");
}

#[test]
fn prompt_must_finish_before_countdown() {
    let held = HeldPrompts::default();
    let spoken = Arc::clone(&held.spoken);
    let mut h = Harness::new(
        settings(2),
        Box::new(held),
        Box::new(NoRecognizer),
        ScriptedWords::new(&["cat", "dog"], &[]),
    );
    h.controller.start(DrillMode::Spelling);
    h.pump();
    h.controller.countdown_elapsed();
    assert_eq!(h.controller.stage(), Stage::Prompting);

    let (word, done) = spoken.lock().unwrap().pop().unwrap();
    assert_eq!(word, "cat");
    done();
    assert_eq!(h.controller.stage(), Stage::Prompting);
    h.pump();
    assert_eq!(h.controller.stage(), Stage::Countdown(5));
}

#[test]
fn spoken_letters_ignore_visibility_and_mode_switch_keeps_letters() {
    let probe = Arc::new(ListenerProbe::default());
    let mut h = Harness::new(
        settings(10),
        Box::new(Mute),
        Box::new(FakeListener(Arc::clone(&probe))),
        ScriptedWords::new(&TEN, &[]),
    );
    h.controller.start(DrillMode::Spelling);
    h.open_word();

    h.controller.enter_letter(LetterSource::Key, 'c');
    h.controller.toggle_input_mode();
    assert!(h.controller.is_listening());
    assert_eq!(h.controller.attempt().unwrap().entered, vec!['c']);

    let visible = h.controller.attempt().unwrap().visible.clone();
    let hidden = ALPHABET.iter().copied().find(|l| !visible.contains(l)).unwrap();
    probe.say(hidden);
    h.pump();
    assert_eq!(h.controller.attempt().unwrap().entered, vec!['c', hidden]);

    let stops = probe.stops.load(Ordering::SeqCst);
    h.controller.toggle_input_mode();
    assert!(!h.controller.is_listening());
    assert!(probe.stops.load(Ordering::SeqCst) > stops);
    assert_eq!(h.controller.attempt().unwrap().entered, vec!['c', hidden]);
}

#[test]
fn letter_board_takes_taps_only_in_keyboard_mode() {
    let probe = Arc::new(ListenerProbe::default());
    let mut h = Harness::new(
        settings(2),
        Box::new(Mute),
        Box::new(FakeListener(Arc::clone(&probe))),
        ScriptedWords::new(&["ox", "ax"], &[]),
    );
    h.controller.start(DrillMode::Spelling);
    assert!(!h.controller.accepts_taps());
    h.open_word();
    assert!(h.controller.accepts_taps());

    h.controller.toggle_input_mode();
    assert_eq!(h.controller.input_mode(), InputMode::Speech);
    assert!(!h.controller.accepts_taps());
    assert_eq!(h.controller.enter_letter(LetterSource::Tap, 'o'), None);

    h.controller.toggle_input_mode();
    assert!(h.controller.accepts_taps());
    assert!(h.controller.enter_letter(LetterSource::Tap, 'o').is_some());
}

#[test]
fn sealing_stops_listening_and_late_letters_are_dropped() {
    let probe = Arc::new(ListenerProbe::default());
    let mut h = Harness::new(
        settings(2),
        Box::new(Mute),
        Box::new(FakeListener(Arc::clone(&probe))),
        ScriptedWords::new(&["ox", "ax"], &[]),
    );
    h.controller.start(DrillMode::Spelling);
    h.controller.toggle_input_mode();
    h.open_word();
    assert_eq!(probe.starts.load(Ordering::SeqCst), 1);

    let sink = probe.sink.lock().unwrap().take().unwrap();
    sink('o');
    sink('x');
    sink('z');
    h.pump();

    assert_eq!(h.controller.stage(), Stage::Sealed);
    assert!(!h.controller.is_listening());
    assert_eq!(h.controller.session().unwrap().results()[0].user_answer, "ox");

    // Mode persists into the next word.
    assert!(h.controller.advance());
    h.open_word();
    assert_eq!(h.controller.input_mode(), InputMode::Speech);
    assert_eq!(probe.starts.load(Ordering::SeqCst), 2);
}

#[test]
fn out_of_contract_calls_are_no_ops() {
    let mut h = Harness::quick(settings(1), ScriptedWords::new(&["cat"], &["kat"]));
    assert_eq!(h.controller.undo(), None);
    assert_eq!(h.controller.choose("cat"), None);
    assert!(!h.controller.advance());

    h.controller.start(DrillMode::MultipleChoice);
    h.open_word();
    assert_eq!(h.controller.choose_index(5), None);
    assert_eq!(h.controller.choose("kat"), Some(false));
    assert_eq!(h.controller.choose("cat"), None);

    let outcome = &h.controller.session().unwrap().results()[0];
    assert_eq!(outcome.user_answer, "kat");
    assert_eq!(outcome.mode, DrillMode::MultipleChoice);
}

#[test]
fn phrase_completes_after_eight_letters() {
    let mut h = Harness::quick(settings(1), ScriptedWords::new(&["take care"], &[]));
    h.controller.start(DrillMode::Spelling);
    h.open_word();
    h.type_word("take care");

    assert_eq!(h.controller.stage(), Stage::Sealed);
    let outcome = &h.controller.session().unwrap().results()[0];
    assert!(outcome.correct);
    assert_eq!(outcome.user_answer, "takecare");
}

#[test]
fn restart_builds_a_fresh_session() {
    let mut h = Harness::quick(settings(2), ScriptedWords::new(&["cat", "dog"], &[]));
    h.controller.start(DrillMode::Spelling);
    h.open_word();
    h.type_word("cat");

    h.controller.start(DrillMode::Spelling);
    let session = h.controller.session().unwrap();
    assert_eq!(session.index(), 0);
    assert!(session.results().is_empty());
    assert!(h.controller.report().is_none());
}

#[test]
fn swapped_word_source_feeds_the_next_session() {
    let mut h = Harness::quick(settings(2), ScriptedWords::new(&["cat", "dog"], &[]));
    h.controller.start(DrillMode::Spelling);
    h.open_word();

    h.controller
        .set_word_source(Box::new(ScriptedWords::new(&["sun", "hat"], &[])));
    assert_eq!(h.controller.current_word(), Some("cat"));

    h.controller.start(DrillMode::Spelling);
    assert_eq!(h.controller.session().unwrap().words(), &["sun", "hat"]);
}
