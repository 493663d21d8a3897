use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Audio attributes; `key` is a pitch-class index, -1 when undetected
#[derive(Debug, Deserialize)]
pub struct AudioFeatures {
    pub key: Option<i64>,
    pub mode: Option<i64>,
}
