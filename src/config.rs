use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::SessionSettings;

pub const BATCH_SIZE_RANGE: (usize, usize) = (2, 50);
pub const CHOICE_COUNT_RANGE: (usize, usize) = (2, 6);
pub const MAX_COUNTDOWN_SECS: u8 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u8,
    #[serde(default = "default_choice_count")]
    pub choice_count: usize,
    #[serde(default = "default_word_list")]
    pub word_list: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Text-to-speech program and arguments; the word is appended.
    #[serde(default = "default_speak_command")]
    pub speak_command: Vec<String>,
    /// Recognizer printing one transcript per line on stdout.
    #[serde(default)]
    pub listen_command: Vec<String>,
    #[serde(default = "default_sound")]
    pub sound: bool,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_batch_size() -> usize {
    10
}
fn default_countdown_secs() -> u8 {
    5
}
fn default_choice_count() -> usize {
    3
}
fn default_word_list() -> String {
    crate::generator::dictionary::DEFAULT_WORD_LIST.to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_speak_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["say".to_string()]
    } else {
        vec!["espeak-ng".to_string()]
    }
}
fn default_sound() -> bool {
    true
}
fn default_locale() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            countdown_secs: default_countdown_secs(),
            choice_count: default_choice_count(),
            word_list: default_word_list(),
            theme: default_theme(),
            speak_command: default_speak_command(),
            listen_command: Vec::new(),
            sound: default_sound(),
            locale: default_locale(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spellbee")
            .join("config.toml")
    }

    /// Pull hand-edited values back into range.
    pub fn normalize(&mut self) {
        self.batch_size = self.batch_size.clamp(BATCH_SIZE_RANGE.0, BATCH_SIZE_RANGE.1);
        self.choice_count = self.choice_count.clamp(CHOICE_COUNT_RANGE.0, CHOICE_COUNT_RANGE.1);
        self.countdown_secs = self.countdown_secs.min(MAX_COUNTDOWN_SECS);
        if self.word_list.trim().is_empty() {
            self.word_list = default_word_list();
        }
        if self.locale.trim().is_empty() {
            self.locale = default_locale();
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            batch_size: self.batch_size,
            countdown_ticks: self.countdown_secs,
            choice_count: self.choice_count,
        }
    }
}
