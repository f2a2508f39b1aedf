use std::collections::HashSet;

use rand::RngCore;
use rand::seq::SliceRandom;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Letter groups that early spellers commonly confuse, applied both ways.
const CONFUSIONS: &[(&str, &str)] = &[
    ("ck", "k"),
    ("ph", "f"),
    ("ee", "ea"),
    ("ai", "ay"),
    ("ou", "ow"),
    ("oo", "u"),
    ("igh", "ite"),
    ("tch", "ch"),
    ("wh", "w"),
    ("kn", "n"),
    ("c", "k"),
    ("s", "z"),
];

fn vowel_swap(v: char) -> char {
    match v {
        'a' => 'e',
        'e' => 'i',
        'i' => 'e',
        'o' => 'u',
        _ => 'o',
    }
}

/// Deterministic list of misspellings of `word`. May contain duplicates.
pub fn misspellings(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();

    for i in 0..chars.len().saturating_sub(1) {
        let (a, b) = (chars[i], chars[i + 1]);
        if a != b && a.is_alphabetic() && b.is_alphabetic() {
            let mut swapped = chars.clone();
            swapped.swap(i, i + 1);
            out.push(swapped.into_iter().collect());
        }
        if a == b && a.is_alphabetic() {
            let mut single = chars.clone();
            single.remove(i);
            out.push(single.into_iter().collect());
        }
    }

    for (i, &c) in chars.iter().enumerate() {
        if VOWELS.contains(&c) {
            let mut changed = chars.clone();
            changed[i] = vowel_swap(c);
            out.push(changed.into_iter().collect());
        } else if c.is_alphabetic()
            && chars.get(i + 1) != Some(&c)
            && (i == 0 || chars[i - 1] != c)
        {
            let mut doubled = chars.clone();
            doubled.insert(i, c);
            out.push(doubled.into_iter().collect());
        }
    }

    for &(from, to) in CONFUSIONS {
        for (a, b) in [(from, to), (to, from)] {
            if let Some(pos) = word.find(a) {
                let mut changed = String::with_capacity(word.len() + 2);
                changed.push_str(&word[..pos]);
                changed.push_str(b);
                changed.push_str(&word[pos + a.len()..]);
                out.push(changed);
            }
        }
    }

    if word.len() > 3 && word.ends_with('e') {
        out.push(word[..word.len() - 1].to_string());
    }
    if word.len() > 2 && word.ends_with('y') {
        out.push(format!("{}ie", &word[..word.len() - 1]));
    }

    out
}

/// `count` distinct wrong answers for `word`: misspellings first, then
/// corpus words of similar length, then any corpus words.
pub fn plausible_distractors(
    word: &str,
    count: usize,
    corpus: &[String],
    rng: &mut dyn RngCore,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(word.to_string());
    let mut picked = Vec::with_capacity(count);

    let mut candidates = misspellings(word);
    candidates.shuffle(rng);

    let length = word.chars().count();
    let mut similar: Vec<String> = corpus
        .iter()
        .filter(|w| w.chars().count().abs_diff(length) <= 2)
        .cloned()
        .collect();
    similar.shuffle(rng);

    let mut rest: Vec<String> = corpus.to_vec();
    rest.shuffle(rng);

    for candidate in candidates.into_iter().chain(similar).chain(rest) {
        if picked.len() == count {
            break;
        }
        if !candidate.trim().is_empty() && seen.insert(candidate.clone()) {
            picked.push(candidate);
        }
    }
    picked
}
