//! Canonical key names.
//!
//! Every key handed to the formatter reads `<Note> <Mode>`, where the note is
//! one of the twelve sharp-spelled pitch classes and the mode is `Major` or
//! `Minor`. Provider data arrives as a pitch-class index plus a mode flag;
//! prose mentions ("in the key of Bb min") go through [`parse_key_name`].

use regex::Regex;
use std::sync::OnceLock;

/// Pitch classes indexed the way the metadata provider numbers them
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

static KEY_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static KEY_MENTION_REGEX: OnceLock<Regex> = OnceLock::new();
static CAPO_MENTION_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_key_name_regex() -> &'static Regex {
    KEY_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Ga-g])([#bB]?)\s*((?i:major|minor|maj|min)|m)?$").unwrap()
    })
}

fn get_key_mention_regex() -> &'static Regex {
    KEY_MENTION_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:key of |in the key |key: ?)([A-G][#b]?(?:\s?(?:major|minor|maj|min))?)")
            .unwrap()
    })
}

fn get_capo_mention_regex() -> &'static Regex {
    CAPO_MENTION_REGEX.get_or_init(|| Regex::new(r"(?i)(?:capo|key)\s*:?\s*([A-G][#b]?)").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Provider mode flag: 1 is major, anything else minor
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            Mode::Major
        } else {
            Mode::Minor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
        }
    }
}

/// Canonical name for a provider pitch-class index. `None` outside 0..=11.
pub fn from_pitch_class(index: i64, mode: Mode) -> Option<String> {
    let note = usize::try_from(index).ok().and_then(|i| NOTE_NAMES.get(i))?;
    Some(format!("{} {}", note, mode.as_str()))
}

/// Normalize a written key such as `Bb`, `f# minor`, `E maj` or `Am`.
///
/// The flat sign may be written `b` or `B` (prose is often all caps).
/// Flats and the enharmonic naturals (`E#`, `B#`, `Cb`, `Fb`) are respelled
/// with the sharp name of the same pitch class. A missing mode means major.
pub fn parse_key_name(text: &str) -> Option<String> {
    let caps = get_key_name_regex().captures(text.trim())?;

    let letter = caps[1].to_ascii_uppercase();
    let natural = NOTE_NAMES.iter().position(|n| *n == letter)? as i64;
    let offset = match &caps[2] {
        "#" => 1,
        "b" | "B" => -1,
        _ => 0,
    };

    // A bare trailing "m" is the minor shorthand; spelled-out words are
    // matched case-insensitively.
    let mode = match caps.get(3).map(|m| m.as_str()) {
        None => Mode::Major,
        Some("m") => Mode::Minor,
        Some(word) if word.eq_ignore_ascii_case("maj") || word.eq_ignore_ascii_case("major") => {
            Mode::Major
        }
        Some(word) if word.eq_ignore_ascii_case("min") || word.eq_ignore_ascii_case("minor") => {
            Mode::Minor
        }
        Some(_) => return None,
    };

    from_pitch_class((natural + offset).rem_euclid(12), mode)
}

/// Find the first key mentioned in a block of prose, e.g. a chord chart page.
pub fn extract_from_text(text: &str) -> Option<String> {
    [get_key_mention_regex(), get_capo_mention_regex()]
        .into_iter()
        .find_map(|pattern| {
            let caps = pattern.captures(text)?;
            parse_key_name(&caps[1])
        })
}
