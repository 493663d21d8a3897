pub mod types;

use crate::config::{Credentials, ProviderConfig};
use crate::error::ProviderError;
use crate::key::{self, Mode};
use crate::resolver::KeyResolution;
use anyhow::{Context, Result};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::StatusCode;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use types::{AudioFeatures, SearchResponse, TokenResponse, TrackItem};

pub const EXTERNAL_SOURCE_LABEL: &str = "external catalog";

/// Tokens are treated as expired this long before the provider says so
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Bearer token issued by the provider
#[derive(Debug, Clone)]
pub struct AccessCredential {
    pub token: String,
    pub expires_at: Instant,
}

impl AccessCredential {
    /// Credential issued just now, valid for `expires_in` minus the safety margin
    pub fn issued_now(token: String, expires_in: Duration) -> Self {
        Self {
            token,
            expires_at: Instant::now() + expires_in.saturating_sub(EXPIRY_MARGIN),
        }
    }

    pub fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Best-effort client for the external music metadata provider.
///
/// Lookups never fail: every provider problem is logged and reported as
/// "no answer". The access credential is cached here and refreshed under
/// the lock, so concurrent lookups wait for one refresh instead of racing.
pub struct MetadataClient {
    client: reqwest::Client,
    config: ProviderConfig,
    credential: Mutex<Option<AccessCredential>>,
    rate_limiter: DirectRateLimiter,
}

impl MetadataClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let per_second = NonZeroU32::new(config.requests_per_second)
            .context("Provider rate limit must be at least one request per second")?;

        if config.is_configured() {
            tracing::info!("Metadata provider configured at {}", config.api_url);
        } else {
            tracing::info!("Metadata provider credentials not set, using local catalog only");
        }

        Ok(Self {
            client,
            config,
            credential: Mutex::new(None),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Look up the key of `song` (optionally by `artist`) with the provider.
    /// Returns None when the provider is unconfigured, unreachable, or has no key.
    pub async fn lookup(&self, song: &str, artist: Option<&str>) -> Option<KeyResolution> {
        match self.try_lookup(song, artist).await {
            Ok(resolution) => Some(resolution),
            Err(ProviderError::Unconfigured) => None,
            Err(e @ (ProviderError::NoResults | ProviderError::KeyUnknown)) => {
                tracing::debug!("Provider has no answer for '{}': {}", song, e);
                None
            }
            Err(e) => {
                tracing::warn!("Provider lookup failed for '{}': {}", song, e);
                None
            }
        }
    }

    async fn try_lookup(
        &self,
        song: &str,
        artist: Option<&str>,
    ) -> Result<KeyResolution, ProviderError> {
        let token = self.access_token().await?;

        let result = self.lookup_with_token(&token, song, artist).await;
        if let Err(ProviderError::Status {
            status: StatusCode::UNAUTHORIZED,
            ..
        }) = &result
        {
            self.forget_token(&token).await;
        }
        result
    }

    async fn lookup_with_token(
        &self,
        token: &str,
        song: &str,
        artist: Option<&str>,
    ) -> Result<KeyResolution, ProviderError> {
        let track = self.search_track(token, song, artist).await?;
        let artist = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .ok_or(ProviderError::MissingField("artists"))?;

        let features = self.audio_features(token, &track.id).await?;

        let index = match features.key {
            Some(index) if index != -1 => index,
            _ => return Err(ProviderError::KeyUnknown),
        };
        let mode = Mode::from_flag(features.mode.unwrap_or(0));
        let key = key::from_pitch_class(index, mode).ok_or(ProviderError::KeyUnknown)?;

        tracing::debug!("Provider matched '{}' by {} in {}", track.name, artist, key);

        Ok(KeyResolution {
            key,
            artist,
            source_label: EXTERNAL_SOURCE_LABEL.to_string(),
            matched_title: Some(track.name),
        })
    }

    /// Drop the cached token if it is still the one the provider rejected
    async fn forget_token(&self, rejected: &str) {
        let mut cached = self.credential.lock().await;
        if cached.as_ref().is_some_and(|c| c.token == rejected) {
            tracing::info!("Provider rejected the cached access token, discarding it");
            *cached = None;
        }
    }

    /// Return the cached token, fetching a new one when missing or stale
    async fn access_token(&self) -> Result<String, ProviderError> {
        let credentials = self
            .config
            .credentials
            .as_ref()
            .ok_or(ProviderError::Unconfigured)?;

        let mut cached = self.credential.lock().await;
        if let Some(credential) = cached.as_ref().filter(|c| c.is_fresh()) {
            return Ok(credential.token.clone());
        }

        let fresh = self.request_credential(credentials).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn request_credential(
        &self,
        credentials: &Credentials,
    ) -> Result<AccessCredential, ProviderError> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("Requesting access token from {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                stage: "token",
                status,
            });
        }

        let body = response.json::<TokenResponse>().await?;
        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::MissingField("access_token"))?;

        tracing::info!("Obtained provider access token (expires in {}s)", body.expires_in);
        Ok(AccessCredential::issued_now(
            token,
            Duration::from_secs(body.expires_in),
        ))
    }

    async fn search_track(
        &self,
        token: &str,
        song: &str,
        artist: Option<&str>,
    ) -> Result<TrackItem, ProviderError> {
        let query = match artist {
            Some(artist) => format!("{} {}", song, artist),
            None => song.to_string(),
        };
        let url = format!(
            "{}/search?q={}&type=track&limit=1",
            self.api_base(),
            urlencoding::encode(&query)
        );

        self.rate_limiter.until_ready().await;
        tracing::debug!("Searching provider: {}", url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::OK => {
                let page = response.json::<SearchResponse>().await?;
                page.tracks
                    .and_then(|tracks| tracks.items.into_iter().next())
                    .ok_or(ProviderError::NoResults)
            }
            status => Err(ProviderError::Status {
                stage: "search",
                status,
            }),
        }
    }

    async fn audio_features(
        &self,
        token: &str,
        track_id: &str,
    ) -> Result<AudioFeatures, ProviderError> {
        let url = format!(
            "{}/audio-features/{}",
            self.api_base(),
            urlencoding::encode(track_id)
        );

        self.rate_limiter.until_ready().await;
        tracing::debug!("Fetching audio features: {}", url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<AudioFeatures>().await?),
            status => Err(ProviderError::Status {
                stage: "audio features",
                status,
            }),
        }
    }

    fn api_base(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }
}
