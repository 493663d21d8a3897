use crate::api::MetadataClient;
use crate::catalog::FallbackCatalog;
use crate::error::QueryError;
use crate::query;
use crate::response;

/// A key found for a song, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResolution {
    /// Canonical "<Note> <Mode>" (catalog entries keep their own spelling)
    pub key: String,
    pub artist: String,
    pub source_label: String,
    /// Title as the source knows it, which may differ from the question
    pub matched_title: Option<String>,
}

/// Result of resolving one question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    ParseFailure,
    Found {
        resolution: KeyResolution,
        song: String,
        artist: Option<String>,
    },
    NotFound {
        song: String,
        artist: Option<String>,
    },
}

/// Parses a question, asks the metadata provider, then the local catalog.
///
/// The provider always wins when it has an answer; the catalog is only
/// consulted when the provider returns nothing.
pub struct SongKeyResolver {
    client: MetadataClient,
    catalog: FallbackCatalog,
}

impl SongKeyResolver {
    pub fn new(client: MetadataClient, catalog: FallbackCatalog) -> Self {
        Self { client, catalog }
    }

    pub fn client(&self) -> &MetadataClient {
        &self.client
    }

    pub async fn resolve(&self, raw_query: &str) -> ResolutionOutcome {
        let Some(parsed) = query::parse(raw_query) else {
            tracing::info!("Could not parse question: {:?}", raw_query);
            return ResolutionOutcome::ParseFailure;
        };

        let song = parsed.song;
        let artist = parsed.artist;

        let mut result = self.client.lookup(&song, artist.as_deref()).await;
        if result.is_none() {
            tracing::debug!("Falling back to local catalog for '{}'", song);
            result = self.catalog.lookup(&song, artist.as_deref());
        }

        match result {
            Some(resolution) => {
                tracing::info!(
                    "Resolved '{}' to {} via {}",
                    song,
                    resolution.key,
                    resolution.source_label
                );
                ResolutionOutcome::Found {
                    resolution,
                    song,
                    artist,
                }
            }
            None => {
                tracing::info!("No key found for '{}' ({:?})", song, artist);
                ResolutionOutcome::NotFound { song, artist }
            }
        }
    }

    /// Boundary entry point shared by the CLI and HTTP adapters.
    ///
    /// A missing or blank query is an input error; everything the resolver
    /// decides (including "couldn't parse" and "not found") is a sentence.
    pub async fn answer(&self, raw_query: Option<&str>) -> Result<String, QueryError> {
        let raw_query = raw_query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(QueryError::EmptyQuery)?;

        let outcome = self.resolve(raw_query).await;
        Ok(response::format(&outcome))
    }
}
