use crate::adapters::http::{decode_json, nullable};
use crate::domain::model::{CatalogAlbum, StreamingUrl};
use crate::utils::error::Result;
use chrono::{DateTime, Datelike, Utc};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com";
pub const DEFAULT_YEAR_TOLERANCE: i32 = 3;
pub const LINK_TYPE_WEB_STREAMING: &str = "web_streaming";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "nullable")]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    artist_id: u64,
    #[serde(default)]
    collection_id: u64,
    #[serde(default, deserialize_with = "nullable")]
    artist_name: String,
    #[serde(default, deserialize_with = "nullable")]
    collection_name: String,
    #[serde(default, deserialize_with = "nullable")]
    artwork_url100: String,
    #[serde(default, deserialize_with = "nullable")]
    release_date: Option<DateTime<Utc>>,
}

/// 候選年份是否落在 `target ± range`（含邊界），用來排除同名的其他專輯
pub fn release_year_within_range(candidate: i32, target: i32, range: i32) -> bool {
    candidate >= target - range && candidate <= target + range
}

/// 發行日期最新的一筆；同日期保留先出現的
pub fn latest_of(albums: Vec<CatalogAlbum>) -> Option<CatalogAlbum> {
    albums.into_iter().fold(None, |latest, album| match latest {
        Some(current) if album.release_date <= current.release_date => Some(current),
        _ => Some(album),
    })
}

pub fn streaming_url(country: &str, collection_id: u64) -> StreamingUrl {
    StreamingUrl {
        url: format!(
            "https://music.apple.com/{}/album/{}?l=en",
            country.to_lowercase(),
            collection_id
        ),
        link_type: LINK_TYPE_WEB_STREAMING.to_string(),
    }
}

pub struct ItunesClient {
    client: Client,
    base_url: String,
    year_tolerance: i32,
}

impl ItunesClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            year_tolerance: DEFAULT_YEAR_TOLERANCE,
        }
    }

    pub fn with_year_tolerance(mut self, year_tolerance: i32) -> Self {
        self.year_tolerance = year_tolerance;
        self
    }

    pub async fn search_album(
        &self,
        country: &str,
        term: &str,
        release_year: i32,
        release_year_filter: bool,
    ) -> Result<Vec<CatalogAlbum>> {
        let endpoint = format!("{}/search", self.base_url);
        tracing::debug!("Searching catalog: term='{}', country={}", term, country);

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("term", term),
                ("country", country),
                ("entity", "album"),
                ("media", "apple_music"),
            ])
            .send()
            .await?;

        let search: SearchResponse = decode_json(response).await?;

        let mut albums = Vec::new();
        for result in search.results {
            let Some(release_date) = result.release_date else {
                tracing::warn!(
                    "Skipping catalog result without release date: {} ({})",
                    result.collection_name,
                    result.collection_id
                );
                continue;
            };
            let year = release_date.year();
            if release_year_filter
                && !release_year_within_range(year, release_year, self.year_tolerance)
            {
                tracing::info!(
                    "Release year not within filter range: {} ({}), expected {}",
                    result.collection_name,
                    year,
                    release_year
                );
                continue;
            }

            albums.push(CatalogAlbum {
                artist: result.artist_name,
                artist_external_id: result.artist_id.to_string(),
                album: result.collection_name,
                album_external_id: result.collection_id.to_string(),
                artwork_url: result.artwork_url100,
                release_date,
                urls: vec![streaming_url(country, result.collection_id)],
            });
        }

        Ok(albums)
    }

    /// 不做年份過濾，回傳該搜尋字詞下最新的一張；搜尋不到時回傳 `None`
    pub async fn latest_album(
        &self,
        country: &str,
        term: &str,
        release_year: i32,
    ) -> Result<Option<CatalogAlbum>> {
        let albums = self.search_album(country, term, release_year, false).await?;
        Ok(latest_of(albums))
    }

    /// 先以「artist title」搜尋並過濾年份，沒有結果時退回該 artist 最新的專輯
    pub async fn match_album(
        &self,
        country: &str,
        artist: &str,
        title: &str,
        release_year: i32,
    ) -> Result<Vec<CatalogAlbum>> {
        let term = format!("{} {}", artist, title);
        let albums = self.search_album(country, &term, release_year, true).await?;
        if !albums.is_empty() {
            return Ok(albums);
        }

        tracing::debug!("No album hit for '{}', falling back to latest by {}", term, artist);
        Ok(self
            .latest_album(country, artist, release_year)
            .await?
            .into_iter()
            .collect())
    }
}
