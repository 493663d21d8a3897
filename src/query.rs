use regex::Regex;
use std::sync::OnceLock;

/// Lazy-initialized question patterns, tried in order
static FULL_QUESTION_REGEX: OnceLock<Regex> = OnceLock::new();
static BARE_KEY_OF_REGEX: OnceLock<Regex> = OnceLock::new();
static TRAILING_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static SONG_ONLY_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_full_question_regex() -> &'static Regex {
    FULL_QUESTION_REGEX
        .get_or_init(|| Regex::new(r"(?i)(?:what'?s the )?key of (.+?) by (.+?)(?:\?|$)").unwrap())
}

// Anything this matches, the full-question pattern matched first.
fn get_bare_key_of_regex() -> &'static Regex {
    BARE_KEY_OF_REGEX.get_or_init(|| Regex::new(r"(?i)key of (.+?) by (.+?)(?:\?|$)").unwrap())
}

fn get_trailing_key_regex() -> &'static Regex {
    TRAILING_KEY_REGEX.get_or_init(|| Regex::new(r"(?i)(.+?) by (.+?) key").unwrap())
}

fn get_song_only_regex() -> &'static Regex {
    SONG_ONLY_REGEX.get_or_init(|| Regex::new(r"(?i)(?:what'?s the )?key of (.+?)(?:\?|$)").unwrap())
}

/// Song and optional artist pulled out of a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub song: String,
    pub artist: Option<String>,
}

/// Extract a song title and optional artist from a free-text question.
///
/// Rules are tried in priority order and the first one that matches decides
/// the result. Captures are non-greedy, so with several " by " separators
/// the artist starts after the first one ("key of Stand by Me by Ben E. King"
/// yields song "Stand"). That ambiguity is accepted.
pub fn parse(text: &str) -> Option<ParsedQuery> {
    let with_artist = [
        get_full_question_regex(),
        get_bare_key_of_regex(),
        get_trailing_key_regex(),
    ];

    for pattern in with_artist {
        if let Some(caps) = pattern.captures(text) {
            return build(&caps[1], Some(&caps[2]));
        }
    }

    get_song_only_regex()
        .captures(text)
        .and_then(|caps| build(&caps[1], None))
}

fn build(song: &str, artist: Option<&str>) -> Option<ParsedQuery> {
    let song = song.trim();
    if song.is_empty() {
        tracing::debug!("Question matched but the song title is blank");
        return None;
    }

    let artist = artist
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Some(ParsedQuery {
        song: song.to_string(),
        artist,
    })
}
