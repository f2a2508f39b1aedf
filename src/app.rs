use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{info, warn};
use ratatui::layout::Rect;

use spellbee::config::{BATCH_SIZE_RANGE, CHOICE_COUNT_RANGE, Config, MAX_COUNTDOWN_SECS};
use spellbee::generator::dictionary::WordBank;
use spellbee::session::{
    Collaborators, Cue, DrillMode, LetterSource, SessionController, SessionReport, Stage,
};
use spellbee::speech::command::{CommandAnnouncer, CommandListener};
use spellbee::speech::{Announcer, LetterListener, Mute, NoRecognizer, Notifier, Signal};

use crate::event::AppEvent;
use crate::ui::components::keyboard_diagram;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::components::word_choices;
use crate::ui::layout::PracticeLayout;
use crate::ui::theme::Theme;

const COUNTDOWN_UNIT: Duration = Duration::from_secs(1);
const FLASH_DURATION: Duration = Duration::from_millis(700);
pub const SETTINGS_FIELDS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Practice,
    Results,
    Settings,
}

/// Overrides from the command line that are not stored in the config.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    pub mute: bool,
    pub report_path: Option<PathBuf>,
}

pub struct App {
    pub screen: AppScreen,
    pub mode: DrillMode,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub controller: SessionController,
    pub should_quit: bool,
    pub settings_selected: usize,
    /// Last terminal size, for mouse hit-testing.
    pub viewport: Rect,
    flash: Option<(Cue, Instant)>,
    countdown_clock: Instant,
    bell_pending: bool,
    report_path: Option<PathBuf>,
}

fn build_collaborators(config: &Config, options: &LaunchOptions, events: Sender<AppEvent>) -> Collaborators {
    let announcer: Box<dyn Announcer> = if options.mute || config.speak_command.is_empty() {
        Box::new(Mute)
    } else {
        Box::new(CommandAnnouncer::new(config.speak_command.clone()))
    };
    let listener: Box<dyn LetterListener> = if config.listen_command.is_empty() {
        Box::new(NoRecognizer)
    } else {
        Box::new(CommandListener::new(config.listen_command.clone()))
    };
    let notifier: Notifier = Arc::new(move |signal: Signal| {
        let _ = events.send(AppEvent::Signal(signal));
    });

    Collaborators {
        announcer,
        listener,
        words: Box::new(WordBank::load(&config.word_list)),
        notifier,
    }
}

fn leak_theme(name: &str) -> &'static Theme {
    let loaded = Theme::load(name).unwrap_or_else(|| {
        warn!("theme {name:?} not found, using default");
        Theme::default()
    });
    Box::leak(Box::new(loaded))
}

impl App {
    pub fn new(config: Config, options: LaunchOptions, events: Sender<AppEvent>) -> Self {
        let theme = leak_theme(&config.theme);
        let menu = Menu::new(theme);
        let collaborators = build_collaborators(&config, &options, events);
        let controller = SessionController::new(config.session_settings(), collaborators);

        Self {
            screen: AppScreen::Menu,
            mode: DrillMode::Spelling,
            menu,
            theme,
            config,
            controller,
            should_quit: false,
            settings_selected: 0,
            viewport: Rect::default(),
            flash: None,
            countdown_clock: Instant::now(),
            bell_pending: false,
            report_path: options.report_path,
        }
    }

    pub fn start_session(&mut self, mode: DrillMode) {
        self.mode = mode;
        self.flash = None;
        self.controller.start(mode);
        self.screen = AppScreen::Practice;
        self.sync();
    }

    pub fn menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Spell => self.start_session(DrillMode::Spelling),
            MenuAction::Choose => self.start_session(DrillMode::MultipleChoice),
            MenuAction::Settings => self.go_to_settings(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    /// Leave the practice screen, tearing the session down.
    pub fn go_to_menu(&mut self) {
        self.controller.abandon();
        self.flash = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn handle_signal(&mut self, signal: Signal) {
        self.controller.handle_signal(signal);
        self.sync();
    }

    pub fn type_letter(&mut self, letter: char) {
        self.controller.enter_letter(LetterSource::Key, letter);
        self.sync();
    }

    pub fn undo(&mut self) {
        self.controller.undo();
    }

    pub fn choose(&mut self, index: usize) {
        self.controller.choose_index(index);
        self.sync();
    }

    pub fn advance(&mut self) {
        self.controller.advance();
        self.sync();
    }

    pub fn toggle_input_mode(&mut self) {
        self.controller.toggle_input_mode();
    }

    pub fn repeat_prompt(&mut self) {
        self.controller.repeat_prompt();
    }

    /// Left click at a screen cell while practising.
    pub fn click(&mut self, column: u16, row: u16) {
        let layout = PracticeLayout::for_viewport(self.viewport);
        match self.controller.stage() {
            Stage::Accepting if self.controller.accepts_taps() => {
                let Some(visible) = self.controller.attempt().map(|a| a.visible.clone()) else {
                    return;
                };
                if let Some(letter) = keyboard_diagram::key_at(layout.board, &visible, column, row) {
                    self.controller.enter_letter(LetterSource::Tap, letter);
                }
            }
            Stage::AwaitingChoice => {
                let count = self.controller.choices().len();
                if let Some(index) = word_choices::choice_at(layout.board, count, column, row) {
                    self.controller.choose_index(index);
                }
            }
            _ => {}
        }
        self.sync();
    }

    /// Called for every loop iteration. Clocks the countdown and expires
    /// feedback flashes.
    pub fn on_tick(&mut self) {
        if matches!(self.controller.stage(), Stage::Countdown(_))
            && self.countdown_clock.elapsed() >= COUNTDOWN_UNIT
        {
            self.countdown_clock = Instant::now();
            self.controller.countdown_elapsed();
            self.sync();
        }
        if self
            .flash
            .is_some_and(|(_, at)| at.elapsed() >= FLASH_DURATION)
        {
            self.flash = None;
        }
    }

    pub fn flash(&self) -> Option<Cue> {
        self.flash.map(|(cue, _)| cue)
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    /// Apply the controller's pending cues and follow it to the results
    /// screen once the session finishes.
    fn sync(&mut self) {
        for cue in self.controller.drain_cues() {
            match cue {
                Cue::CountdownTick(_) => self.countdown_clock = Instant::now(),
                Cue::LetterWrong | Cue::WordIncorrect | Cue::WordCorrect | Cue::Celebration => {
                    self.bell_pending |= self.config.sound;
                }
                Cue::LetterCorrect => {}
            }
            self.flash = Some((cue, Instant::now()));
        }

        if self.screen == AppScreen::Practice && self.controller.stage() == Stage::Finished {
            if let Some(report) = self.controller.report() {
                if let Err(err) = self.write_report(report) {
                    warn!("could not write session report: {err:#}");
                }
            }
            self.screen = AppScreen::Results;
        }
    }

    fn write_report(&self, report: &SessionReport) -> Result<()> {
        let Some(ref path) = self.report_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        info!("session report written to {}", path.display());
        Ok(())
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_step(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_step(false);
    }

    fn settings_step(&mut self, forward: bool) {
        fn step(value: usize, (lo, hi): (usize, usize), forward: bool) -> usize {
            if forward {
                if value >= hi { lo } else { value + 1 }
            } else if value <= lo {
                hi
            } else {
                value - 1
            }
        }

        match self.settings_selected {
            0 => self.config.batch_size = step(self.config.batch_size, BATCH_SIZE_RANGE, forward),
            1 => {
                let secs = step(self.config.countdown_secs as usize, (0, MAX_COUNTDOWN_SECS as usize), forward);
                self.config.countdown_secs = secs as u8;
            }
            2 => self.config.choice_count = step(self.config.choice_count, CHOICE_COUNT_RANGE, forward),
            3 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let idx = themes.iter().position(|t| *t == self.config.theme).unwrap_or(0);
                let next = step(idx, (0, themes.len() - 1), forward);
                self.config.theme = themes[next].clone();
                let theme = leak_theme(&self.config.theme);
                self.theme = theme;
                self.menu.theme = theme;
            }
            4 => {
                let lists = WordBank::available_lists();
                if lists.is_empty() {
                    return;
                }
                let idx = lists.iter().position(|l| *l == self.config.word_list).unwrap_or(0);
                let next = step(idx, (0, lists.len() - 1), forward);
                self.config.word_list = lists[next].clone();
            }
            _ => {}
        }
    }

    /// Persist settings and use them from the next session on.
    pub fn save_settings(&mut self) {
        self.controller.set_settings(self.config.session_settings());
        self.controller
            .set_word_source(Box::new(WordBank::load(&self.config.word_list)));
        if let Err(err) = self.config.save() {
            warn!("could not save config: {err:#}");
        }
    }
}
