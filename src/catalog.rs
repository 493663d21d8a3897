use crate::resolver::KeyResolution;

pub const LOCAL_SOURCE_LABEL: &str = "local database";

/// One curated title with its key and performing artist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: &'static str,
    pub key: &'static str,
    pub artist: &'static str,
}

const fn entry(title: &'static str, key: &'static str, artist: &'static str) -> CatalogEntry {
    CatalogEntry { title, key, artist }
}

/// Definition order decides ties, so keep new entries at the end.
const ENTRIES: &[CatalogEntry] = &[
    entry("how great is our god", "G Major", "Chris Tomlin"),
    entry("amazing grace", "G Major", "Traditional"),
    entry("oceans", "D Major", "Hillsong United"),
    entry("way maker", "E Major", "Sinach"),
    entry("goodness of god", "C Major", "Bethel Music"),
    entry("reckless love", "C Major", "Cory Asbury"),
    entry("cornerstone", "C Major", "Hillsong Live"),
    entry("blessed be your name", "B Major", "Matt Redman"),
    entry("great are you lord", "G Major", "All Sons & Daughters"),
    entry("10000 reasons", "G Major", "Matt Redman"),
    entry("what a beautiful name", "D Major", "Hillsong Worship"),
    entry("build my life", "G Major", "Pat Barrett"),
    entry("king of my heart", "C Major", "Bethel Music"),
    entry("lion and the lamb", "A Major", "Bethel Music"),
    // Popular songs
    entry("let it be", "C Major", "The Beatles"),
    entry("yesterday", "F Major", "The Beatles"),
    entry("hey jude", "F Major", "The Beatles"),
    entry("imagine", "C Major", "John Lennon"),
    entry("hallelujah", "C Major", "Leonard Cohen"),
    entry("wonderwall", "G Major", "Oasis"),
    entry("sweet child o mine", "D Major", "Guns N' Roses"),
    entry("hotel california", "B Minor", "Eagles"),
    entry("stairway to heaven", "A Minor", "Led Zeppelin"),
    entry("bohemian rhapsody", "Bb Major", "Queen"),
    entry("shape of you", "C# Minor", "Ed Sheeran"),
    entry("perfect", "Ab Major", "Ed Sheeran"),
    entry("someone like you", "A Major", "Adele"),
    entry("rolling in the deep", "C Minor", "Adele"),
];

/// Static song table consulted when the metadata provider has no answer
#[derive(Debug, Clone, Copy)]
pub struct FallbackCatalog {
    entries: &'static [CatalogEntry],
}

impl FallbackCatalog {
    pub fn new() -> Self {
        Self { entries: ENTRIES }
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Find the first entry whose title overlaps `song`, and whose artist
    /// overlaps `artist` when one is given.
    ///
    /// "Overlaps" is case-insensitive substring containment in either
    /// direction, so "Reasons" finds "10000 reasons". Loose on purpose.
    pub fn lookup(&self, song: &str, artist: Option<&str>) -> Option<KeyResolution> {
        let song = song.trim().to_lowercase();
        if song.is_empty() {
            return None;
        }
        let artist = artist.map(|a| a.trim().to_lowercase()).filter(|a| !a.is_empty());

        let found = self.entries.iter().find(|entry| {
            if !overlaps(&song, &entry.title.to_lowercase()) {
                return false;
            }
            match &artist {
                Some(artist) => overlaps(artist, &entry.artist.to_lowercase()),
                None => true,
            }
        })?;

        tracing::debug!(
            "Catalog match for '{}': {} ({})",
            song,
            found.title,
            found.artist
        );

        Some(KeyResolution {
            key: found.key.to_string(),
            artist: found.artist.to_string(),
            source_label: LOCAL_SOURCE_LABEL.to_string(),
            matched_title: Some(found.title.to_string()),
        })
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
