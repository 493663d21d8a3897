use crate::resolver::ResolutionOutcome;

pub const FORMAT_HELP: &str =
    "I couldn't understand that format. Try: 'What's the key of [Song] by [Artist]?'";

/// Render a resolution outcome as the sentence shown to the user
pub fn format(outcome: &ResolutionOutcome) -> String {
    match outcome {
        ResolutionOutcome::ParseFailure => FORMAT_HELP.to_string(),
        ResolutionOutcome::Found {
            resolution,
            song,
            artist,
        } => {
            // Echo the artist the user asked about; otherwise show the one we found
            let shown_artist = artist.as_deref().unwrap_or(&resolution.artist);
            format!(
                "\"{}\" by {} is in the key of {} (source: {})",
                song, shown_artist, resolution.key, resolution.source_label
            )
        }
        ResolutionOutcome::NotFound {
            song,
            artist: Some(artist),
        } => format!(
            "Sorry, I couldn't find \"{}\" by {} in either the external catalog or my local database.",
            song, artist
        ),
        ResolutionOutcome::NotFound { song, artist: None } => format!(
            "Sorry, I couldn't find \"{}\". Try including the artist name for better results.",
            song
        ),
    }
}
