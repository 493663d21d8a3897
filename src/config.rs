use std::time::Duration;

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

/// Client-credential pair for the metadata provider
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Build credentials from optional raw values.
    ///
    /// Returns `None` (unconfigured) when either value is missing, blank,
    /// or still a template placeholder.
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        let client_id = client_id.filter(|v| is_real_value(v))?;
        let client_secret = client_secret.filter(|v| is_real_value(v))?;

        Some(Self {
            client_id: client_id.trim().to_string(),
            client_secret: client_secret.trim().to_string(),
        })
    }
}

// Secrets must never reach the logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn is_real_value(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }

    let placeholder = value.to_ascii_uppercase().starts_with("YOUR_")
        || (value.starts_with('<') && value.ends_with('>'))
        || value.eq_ignore_ascii_case("changeme");
    !placeholder
}

/// Everything `MetadataClient` needs to talk to the provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub credentials: Option<Credentials>,
    pub token_url: String,
    pub api_url: String,
    pub timeout: Duration,
    pub requests_per_second: u32,
}

impl ProviderConfig {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            requests_per_second: DEFAULT_REQUESTS_PER_SECOND,
        }
    }

    /// A configuration that never contacts the provider
    pub fn unconfigured() -> Self {
        Self::new(None)
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::unconfigured()
    }
}
