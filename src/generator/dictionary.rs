use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use log::warn;
use rand::RngCore;
use rand::seq::SliceRandom;
use rust_embed::Embed;

use crate::generator::WordSource;
use crate::generator::distractors;

#[derive(Embed)]
#[folder = "assets/words/"]
struct WordAssets;

pub const DEFAULT_WORD_LIST: &str = "default";

/// A practice corpus: lowercase words and short phrases.
#[derive(Clone, Debug)]
pub struct WordBank {
    words: Vec<String>,
}

/// Lowercase, collapse runs of whitespace, and reject anything that is not
/// plain letters separated by single spaces.
fn normalize(raw: &str) -> Option<String> {
    let word = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let valid = !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase() || c == ' ');
    valid.then_some(word)
}

impl WordBank {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .filter(|w| seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    /// Load a corpus by name: the user's words directory first, then the
    /// bundled lists. Falls back to the default list.
    pub fn load(name: &str) -> Self {
        if let Some(bank) = Self::load_user(name).or_else(|| Self::load_bundled(name)) {
            return bank;
        }
        if name != DEFAULT_WORD_LIST {
            warn!("word list {name:?} not found, using {DEFAULT_WORD_LIST:?}");
        }
        Self::load_bundled(DEFAULT_WORD_LIST).unwrap_or_else(|| Self::from_words(Vec::<String>::new()))
    }

    fn load_user(name: &str) -> Option<Self> {
        let path = Self::user_dir()?.join(format!("{name}.json"));
        let content = fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    fn load_bundled(name: &str) -> Option<Self> {
        let file = WordAssets::get(&format!("{name}.json"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        Self::parse(content)
    }

    fn parse(content: &str) -> Option<Self> {
        let words: Vec<String> = serde_json::from_str(content).ok()?;
        let bank = Self::from_words(words);
        (!bank.is_empty()).then_some(bank)
    }

    /// Names of the bundled lists and any in the user's words directory,
    /// sorted and deduplicated.
    pub fn available_lists() -> Vec<String> {
        let mut names: Vec<String> = WordAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect();
        if let Some(dir) = Self::user_dir() {
            if let Ok(entries) = fs::read_dir(dir) {
                names.extend(entries.filter_map(|entry| {
                    let name = entry.ok()?.file_name().into_string().ok()?;
                    name.strip_suffix(".json").map(|n| n.to_string())
                }));
            }
        }
        names.sort();
        names.dedup();
        names
    }

    fn user_dir() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("spellbee").join("words"))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordBank {
    fn sample_batch(&mut self, count: usize, rng: &mut dyn RngCore) -> Vec<String> {
        let mut shuffled = self.words.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        shuffled
    }

    fn distractors(&mut self, word: &str, count: usize, rng: &mut dyn RngCore) -> Vec<String> {
        distractors::plausible_distractors(word, count, &self.words, rng)
    }
}
