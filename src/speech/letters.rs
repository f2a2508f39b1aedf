use icu_normalizer::DecomposingNormalizerBorrowed;

/// Spoken forms that map to a single letter. Order matters for prefix
/// matching: the first multi-character entry that prefixes a transcript wins.
const SPOKEN_LETTERS: &[(&str, char)] = &[
    ("a", 'a'), ("b", 'b'), ("c", 'c'), ("d", 'd'), ("e", 'e'),
    ("f", 'f'), ("g", 'g'), ("h", 'h'), ("i", 'i'), ("j", 'j'),
    ("k", 'k'), ("l", 'l'), ("m", 'm'), ("n", 'n'), ("o", 'o'),
    ("p", 'p'), ("q", 'q'), ("r", 'r'), ("s", 's'), ("t", 't'),
    ("u", 'u'), ("v", 'v'), ("w", 'w'), ("x", 'x'), ("y", 'y'),
    ("z", 'z'),
    // letter names
    ("ay", 'a'), ("eh", 'a'),
    ("bee", 'b'), ("be", 'b'),
    ("see", 'c'), ("sea", 'c'), ("cee", 'c'),
    ("dee", 'd'),
    ("ee", 'e'),
    ("ef", 'f'), ("eff", 'f'),
    ("gee", 'g'), ("ji", 'g'), ("jee", 'g'),
    ("aitch", 'h'), ("ach", 'h'), ("age", 'h'), ("each", 'h'),
    ("eye", 'i'),
    ("jay", 'j'), ("je", 'j'),
    ("kay", 'k'), ("ok", 'k'), ("okay", 'k'), ("kaye", 'k'), ("que", 'k'),
    ("el", 'l'), ("elle", 'l'), ("ale", 'l'),
    ("em", 'm'),
    ("en", 'n'),
    ("oh", 'o'), ("owe", 'o'),
    ("pee", 'p'),
    ("cue", 'q'), ("queue", 'q'), ("qu", 'q'), ("kew", 'q'),
    ("are", 'r'), ("ar", 'r'),
    ("es", 's'), ("ess", 's'),
    ("tee", 't'), ("tea", 't'), ("ti", 't'),
    ("you", 'u'), ("yu", 'u'), ("ew", 'u'),
    ("vee", 'v'), ("ve", 'v'),
    ("double you", 'w'), ("double u", 'w'), ("doubleyou", 'w'), ("dub", 'w'),
    ("ex", 'x'), ("eggs", 'x'),
    ("why", 'y'), ("wie", 'y'), ("wye", 'y'),
    ("zee", 'z'), ("zed", 'z'), ("ze", 'z'), ("set", 'z'),
    // NATO alphabet
    ("alpha", 'a'), ("bravo", 'b'), ("charlie", 'c'), ("delta", 'd'),
    ("echo", 'e'), ("foxtrot", 'f'), ("golf", 'g'), ("hotel", 'h'),
    ("india", 'i'), ("juliet", 'j'), ("kilo", 'k'), ("lima", 'l'),
    ("mike", 'm'), ("november", 'n'), ("oscar", 'o'), ("papa", 'p'),
    ("quebec", 'q'), ("romeo", 'r'), ("sierra", 's'), ("tango", 't'),
    ("uniform", 'u'), ("victor", 'v'), ("whiskey", 'w'), ("xray", 'x'),
    ("yankee", 'y'), ("zulu", 'z'),
    // frequent mishearings
    ("hey", 'a'), ("aye", 'i'), ("bi", 'b'), ("si", 'c'),
    ("he", 'e'), ("she", 'c'), ("pea", 'p'), ("key", 'k'),
];

/// Fold a raw transcript to lowercase ASCII letters and whitespace.
fn clean(transcript: &str) -> String {
    let decomposed = DecomposingNormalizerBorrowed::new_nfkd().normalize(transcript);
    decomposed
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Map a spoken transcript to the letter it most likely names.
pub fn resolve_letter(transcript: &str) -> Option<char> {
    let cleaned = clean(transcript);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(&(_, letter)) = SPOKEN_LETTERS.iter().find(|(spoken, _)| *spoken == cleaned) {
        return Some(letter);
    }

    let mut chars = cleaned.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return Some(only);
    }

    SPOKEN_LETTERS
        .iter()
        .find(|(spoken, _)| spoken.len() > 1 && cleaned.starts_with(spoken))
        .map(|&(_, letter)| letter)
}

/// Resolve the first of several `|`-separated recognizer alternatives that
/// names a letter.
pub fn resolve_alternatives(line: &str) -> Option<char> {
    line.split('|').find_map(resolve_letter)
}
