#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

mod app;
mod event;
mod ui;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use spellbee::config::Config;
use spellbee::session::{Cue, DrillMode, InputMode, Stage};

use app::{App, AppScreen, LaunchOptions, SETTINGS_FIELDS};
use event::{AppEvent, EventHandler};
use ui::components::keyboard_diagram::KeyboardDiagram;
use ui::components::letter_slots::LetterSlots;
use ui::components::progress_bar::ProgressBar;
use ui::components::results::Results;
use ui::components::word_choices::WordChoices;
use ui::layout::{AppLayout, PracticeLayout};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    /// Spell the word letter by letter
    Spell,
    /// Pick the correct spelling from a list
    Choose,
}

impl From<ModeArg> for DrillMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Spell => DrillMode::Spelling,
            ModeArg::Choose => DrillMode::MultipleChoice,
        }
    }
}

#[derive(Parser)]
#[command(name = "spellbee", version, about = "Terminal spelling tutor with spoken prompts")]
struct Cli {
    #[arg(short, long, value_enum, help = "Start a session right away")]
    mode: Option<ModeArg>,

    #[arg(short, long, help = "Number of words per session")]
    words: Option<usize>,

    #[arg(short, long, help = "Countdown seconds before answering")]
    countdown: Option<u8>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Word list name")]
    word_list: Option<String>,

    #[arg(long, help = "Disable spoken prompts")]
    mute: bool,

    #[arg(long, help = "Speech recognizer command printing one transcript per line")]
    listen_cmd: Option<String>,

    #[arg(long, help = "Write the session report as JSON to this path")]
    report: Option<PathBuf>,

    #[arg(long, help = "Write debug logs to this file")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn apply_cli(config: &mut Config, cli: &Cli) {
    if let Some(words) = cli.words {
        config.batch_size = words;
    }
    if let Some(secs) = cli.countdown {
        config.countdown_secs = secs;
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if let Some(ref list) = cli.word_list {
        config.word_list = list.clone();
    }
    if let Some(ref cmd) = cli.listen_cmd {
        config.listen_command = cmd.split_whitespace().map(str::to_string).collect();
    }
    config.normalize();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.log_file {
        init_logging(path)?;
    }

    let mut config = Config::load().unwrap_or_default();
    apply_cli(&mut config, &cli);
    rust_i18n::set_locale(&config.locale);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let options = LaunchOptions {
        mute: cli.mute,
        report_path: cli.report.clone(),
    };
    let mut app = App::new(config, options, events.sender());
    let size = terminal.size()?;
    app.viewport = Rect::new(0, 0, size.width, size.height);

    if let Some(mode) = cli.mode {
        app.start_session(mode.into());
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;
        if app.take_bell() {
            let out = terminal.backend_mut();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
            AppEvent::Signal(signal) => app.handle_signal(signal),
            AppEvent::Tick => {}
            AppEvent::Resize(w, h) => app.viewport = Rect::new(0, 0, w, h),
        }
        app.on_tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen == AppScreen::Practice && mouse.kind == MouseEventKind::Down(MouseButton::Left) {
        app.click(mouse.column, mouse.row);
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            app.menu_action(action);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.menu_action(action);
            }
        }
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Backspace => app.undo(),
        KeyCode::Tab => app.toggle_input_mode(),
        KeyCode::Enter => app.advance(),
        KeyCode::Char(' ') => app.repeat_prompt(),
        KeyCode::Char(ch) if app.mode == DrillMode::MultipleChoice => {
            if let Some(digit) = ch.to_digit(10).filter(|d| *d >= 1) {
                app.choose(digit as usize - 1);
            }
        }
        KeyCode::Char(ch) if ch.is_alphabetic() => app.type_letter(ch),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => app.go_to_menu(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_settings();
            app.screen = AppScreen::Menu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " spellbee ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.text_pending()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = ui::layout::pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let info = format!(
        " | {} {} | {}",
        app.config.batch_size,
        t!("menu.words_per_session"),
        app.config.word_list
    );
    render_header(frame, app, layout.header, &info);

    let menu_area = ui::layout::centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    let hints = [t!("menu.hints")];
    let hints: Vec<&str> = hints.iter().map(|h| &**h).collect();
    render_footer(frame, app, layout.footer, &hints);
}

fn flash_text(cue: Cue) -> Option<String> {
    let text = match cue {
        Cue::CountdownTick(_) => return None,
        Cue::LetterCorrect => t!("cue.letter_correct"),
        Cue::LetterWrong => t!("cue.letter_wrong"),
        Cue::WordCorrect => t!("cue.word_correct"),
        Cue::WordIncorrect => t!("cue.word_incorrect"),
        Cue::Celebration => t!("cue.celebration"),
    };
    Some(text.to_string())
}

fn status_text(app: &App) -> String {
    let controller = &app.controller;
    match controller.stage() {
        Stage::Idle | Stage::Finished => String::new(),
        Stage::Prompting => t!("practice.listen").to_string(),
        Stage::Countdown(n) => t!("practice.get_ready", seconds = n).to_string(),
        Stage::Accepting => t!("practice.spell_it").to_string(),
        Stage::AwaitingChoice => t!("practice.pick_it").to_string(),
        Stage::Sealed => {
            let last = controller.session().is_some_and(|s| s.is_last_word());
            if last {
                t!("practice.see_results").to_string()
            } else {
                t!("practice.next_word").to_string()
            }
        }
    }
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let controller = &app.controller;
    let app_layout = AppLayout::new(frame.area());
    let layout = PracticeLayout::new(app_layout.main);

    let mode_name = match app.mode {
        DrillMode::Spelling => t!("menu.spell"),
        DrillMode::MultipleChoice => t!("menu.choose"),
    };
    let (position, total) = controller.progress();
    let input = match controller.input_mode() {
        InputMode::Keyboard => t!("practice.input_keyboard"),
        InputMode::Speech if controller.is_listening() => t!("practice.input_listening"),
        InputMode::Speech => t!("practice.input_voice"),
    };
    let info = format!(
        " | {mode_name} | {} | {input}",
        t!("practice.word_of", current = position, total = total)
    );
    render_header(frame, app, app_layout.header, &info);

    let mut status = vec![Span::styled(
        status_text(app),
        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
    )];
    if let Some(cue) = app.flash() {
        if let Some(text) = flash_text(cue) {
            let color = match cue {
                Cue::LetterWrong | Cue::WordIncorrect => colors.error(),
                Cue::Celebration => colors.star(),
                _ => colors.success(),
            };
            status.push(Span::styled(format!("   {text}"), Style::default().fg(color)));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(status))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(colors.border()))),
        layout.status,
    );

    let sealed = controller.stage() == Stage::Sealed;
    match app.mode {
        DrillMode::Spelling => {
            if let Some(attempt) = controller.attempt() {
                frame.render_widget(LetterSlots::new(attempt, sealed, app.theme), layout.slots);
                let enabled = controller.accepts_taps();
                frame.render_widget(
                    KeyboardDiagram::new(&attempt.visible, enabled, app.theme),
                    layout.board,
                );
            }
        }
        DrillMode::MultipleChoice => {
            let done = controller.session().map_or(0, |s| s.results().len());
            let bar_area = Rect { height: 3, ..layout.slots };
            frame.render_widget(
                ProgressBar::new(&t!("practice.progress"), done, total, app.theme),
                bar_area,
            );
            frame.render_widget(
                WordChoices {
                    choices: controller.choices(),
                    chosen: controller.chosen(),
                    target: controller.current_word(),
                    theme: app.theme,
                },
                layout.board,
            );
        }
    }

    let hints = [
        t!("practice.hint_undo"),
        t!("practice.hint_voice"),
        t!("practice.hint_again"),
        t!("practice.hint_next"),
        t!("practice.hint_menu"),
    ];
    let hints: Vec<&str> = hints.iter().map(|h| &**h).collect();
    render_footer(frame, app, app_layout.footer, &hints);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    if let Some(report) = app.controller.report() {
        let centered = ui::layout::centered_rect(60, 80, frame.area());
        frame.render_widget(Results::new(report, app.theme), centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let centered = ui::layout::centered_rect(60, 80, frame.area());

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: [(String, String); SETTINGS_FIELDS] = [
        (t!("settings.batch_size").to_string(), app.config.batch_size.to_string()),
        (t!("settings.countdown").to_string(), app.config.countdown_secs.to_string()),
        (t!("settings.choice_count").to_string(), app.config.choice_count.to_string()),
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (t!("settings.word_list").to_string(), app.config.word_list.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.help")),
        Style::default().fg(colors.text_pending()),
    )))
    .render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        let value_style = Style::default().fg(if is_selected {
            colors.star()
        } else {
            colors.text_pending()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.footer")),
        Style::default().fg(colors.accent()),
    )))
    .render(layout[3], frame.buffer_mut());
}
