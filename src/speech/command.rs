use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::speech::letters;
use crate::speech::{Announcer, Done, LetterListener, LetterSink};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no command configured")]
    EmptyCommand,
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{0}` did not expose its standard output")]
    NoStdout(String),
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

fn spawn(argv: &[String], extra: Option<&str>, stdout: Stdio) -> Result<Child, SpeechError> {
    let (program, args) = argv.split_first().ok_or(SpeechError::EmptyCommand)?;
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(Stdio::null());
    if let Some(extra) = extra {
        cmd.arg(extra);
    }
    cmd.spawn().map_err(|source| SpeechError::Spawn {
        program: program.clone(),
        source,
    })
}

fn kill(child: &Arc<Mutex<Child>>) {
    if let Ok(mut child) = child.lock() {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Speaks prompts by running an external TTS program with the word appended
/// to its arguments, e.g. `espeak-ng` or `say`.
pub struct CommandAnnouncer {
    argv: Vec<String>,
    current: Option<Arc<Mutex<Child>>>,
}

impl CommandAnnouncer {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            current: None,
        }
    }
}

impl Announcer for CommandAnnouncer {
    fn speak(&mut self, word: &str, done: Done) {
        if let Some(previous) = self.current.take() {
            kill(&previous);
        }

        let child = match spawn(&self.argv, Some(word), Stdio::null()) {
            Ok(child) => Arc::new(Mutex::new(child)),
            Err(err) => {
                warn!("prompt for {word:?} skipped: {err}");
                done();
                return;
            }
        };
        self.current = Some(Arc::clone(&child));

        thread::spawn(move || {
            loop {
                let finished = match child.lock() {
                    Ok(mut child) => !matches!(child.try_wait(), Ok(None)),
                    Err(_) => true,
                };
                if finished {
                    break;
                }
                thread::sleep(POLL_INTERVAL);
            }
            done();
        });
    }
}

impl Drop for CommandAnnouncer {
    fn drop(&mut self) {
        if let Some(child) = self.current.take() {
            kill(&child);
        }
    }
}

/// Runs an external recognizer that prints one transcript per line on
/// standard output (alternatives separated by `|`).
pub struct CommandListener {
    argv: Vec<String>,
    current: Option<Arc<Mutex<Child>>>,
}

impl CommandListener {
    pub fn new(argv: Vec<String>) -> Self {
        Self {
            argv,
            current: None,
        }
    }

    fn try_start(&mut self, on_letter: LetterSink) -> Result<(), SpeechError> {
        let mut child = spawn(&self.argv, None, Stdio::piped())?;
        let program = self.argv.first().cloned().unwrap_or_default();
        let stdout = child.stdout.take().ok_or(SpeechError::NoStdout(program))?;
        self.current = Some(Arc::new(Mutex::new(child)));

        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                match letters::resolve_alternatives(&line) {
                    Some(letter) => on_letter(letter),
                    None => debug!("unrecognized transcript {line:?}"),
                }
            }
        });
        Ok(())
    }
}

impl LetterListener for CommandListener {
    fn start(&mut self, on_letter: LetterSink) -> bool {
        self.stop();
        match self.try_start(on_letter) {
            Ok(()) => true,
            Err(err) => {
                warn!("speech input unavailable: {err}");
                false
            }
        }
    }

    fn stop(&mut self) {
        if let Some(child) = self.current.take() {
            kill(&child);
        }
    }
}

impl Drop for CommandListener {
    fn drop(&mut self) {
        self.stop();
    }
}
