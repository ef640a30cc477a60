use crate::discogs::models::DiscogsRelease;
use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "discotag/0.1 +https://github.com/hideselfview/discotag";

#[derive(Error, Debug)]
pub enum DiscogsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("API rate limit exceeded")]
    RateLimit,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Release not found")]
    NotFound,
    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscogsError {
    /// "Not found" is reported separately from transient failures.
    /// Neither is retried by this crate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiscogsError::NotFound)
    }
}

/// Anything that can hand over a fully populated release record
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn fetch_release(&self, release_id: u64) -> Result<DiscogsRelease, DiscogsError>;
}

#[derive(Clone)]
pub struct DiscogsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DiscogsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.discogs.com".to_string(),
        }
    }

    /// Get the full release record for a release id
    pub async fn get_release(&self, id: u64) -> Result<DiscogsRelease, DiscogsError> {
        let url = format!("{}/releases/{}", self.base_url, id);

        let mut params = HashMap::new();
        params.insert("token", self.api_key.as_str());

        info!("Fetching Discogs release {}", id);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let release: DiscogsRelease = response.json().await?;
            debug!(
                "Release {} has {} tracklist entries",
                release.id,
                release.tracklist.len()
            );
            Ok(release)
        } else if status == StatusCode::NOT_FOUND {
            warn!("Release not found: {}", id);
            Err(DiscogsError::NotFound)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("✗ Discogs rate limit exceeded");
            Err(DiscogsError::RateLimit)
        } else if status == StatusCode::UNAUTHORIZED {
            warn!("✗ Discogs invalid API key");
            Err(DiscogsError::InvalidApiKey)
        } else {
            warn!("✗ Discogs API error: {}", status);
            match response.error_for_status() {
                Err(e) => Err(DiscogsError::Request(e)),
                Ok(_) => Err(DiscogsError::UnexpectedStatus(status)),
            }
        }
    }
}

#[async_trait]
impl ReleaseSource for DiscogsClient {
    async fn fetch_release(&self, release_id: u64) -> Result<DiscogsRelease, DiscogsError> {
        self.get_release(release_id).await
    }
}

/// Reads saved `GET /releases/{id}` responses from a directory of `<id>.json` files
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load a single release response file
    pub async fn load(path: &Path) -> Result<DiscogsRelease, DiscogsError> {
        let json = match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DiscogsError::NotFound)
            }
            Err(e) => return Err(DiscogsError::Io(e)),
        };

        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl ReleaseSource for JsonFileSource {
    async fn fetch_release(&self, release_id: u64) -> Result<DiscogsRelease, DiscogsError> {
        let path = self.dir.join(format!("{}.json", release_id));
        debug!("Loading saved release from {}", path.display());
        Self::load(&path).await
    }
}
