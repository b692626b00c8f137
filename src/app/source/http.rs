use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::AlbumSource;
use super::error::{FetchError, Result};
use crate::app::config::SourceConfig;
use crate::app::library::{Album, AlbumId};

const ALBUM_LIST_PATH: &str = "app/albums/albums.json";

/// Album source backed by static JSON files served over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAlbumSource {
    http: Client,
    base_url: Url,
}

impl HttpAlbumSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base_url = Self::parse_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("platter/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Parse the base URL and make sure it ends in a slash so relative
    /// endpoint paths are appended rather than replacing the last segment.
    fn parse_base_url(raw: &str) -> Result<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FetchError::InvalidUrl("base URL cannot be empty".into()));
        }
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(FetchError::InvalidUrl(format!(
                "{} must start with http:// or https://",
                raw
            )));
        }

        let mut url =
            Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a reference from the JSON data (`/app/x.mp3`, `covers/1.jpg`,
    /// or an absolute URL) against the base URL.
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        self.base_url
            .join(reference)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", reference, e)))
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response> {
        log::debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resolve(path)?;
        let body = self.get(&url).await?.bytes().await?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Raw bytes of a referenced resource, used for cover art.
    pub async fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>> {
        let url = self.resolve(reference)?;
        let body = self.get(&url).await?.bytes().await?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

impl AlbumSource for HttpAlbumSource {
    async fn fetch_albums(&self) -> Result<Vec<Album>> {
        let albums: Vec<Album> = self.get_json(ALBUM_LIST_PATH).await?;
        log::info!("Fetched album list: {} albums", albums.len());
        Ok(albums.into_iter().map(Album::sanitized).collect())
    }

    async fn fetch_album(&self, id: &AlbumId) -> Result<Album> {
        let album: Album = self.get_json(&format!("app/albums/{}.json", id)).await?;
        log::info!(
            "Fetched album {}: {} songs",
            album.id,
            album.songs.len()
        );
        Ok(album.sanitized())
    }
}
