use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// tracker 排行榜上的一筆發行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub torrent_id: u64,
    pub group_id: u64,
    pub artist: String,
    pub title: String,
    pub group_category: i64,
    pub group_year: i32,
    pub year: i32,
    pub release_type: String,
    pub remaster_title: String,
    pub format: String,
    pub encoding: String,
    pub media: String,
    pub tags: Vec<String>,
    pub artwork_url: String,
}

/// 在音樂目錄中找到的專輯
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub artist: String,
    pub artist_external_id: String,
    pub album: String,
    pub album_external_id: String,
    pub artwork_url: String,
    pub release_date: DateTime<Utc>,
    pub urls: Vec<StreamingUrl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingUrl {
    pub url: String,
    pub link_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratedResult {
    pub entry: ChartEntry,
    pub albums: Vec<CatalogAlbum>,
}

impl DecoratedResult {
    pub fn streaming_urls(&self) -> impl Iterator<Item = &StreamingUrl> {
        self.albums.iter().flat_map(|album| album.urls.iter())
    }
}

/// email 模板的單筆變數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariables {
    pub artist: String,
    pub album: String,
    pub release_year: i32,
    pub tags: Vec<String>,
    pub artwork_url: String,
    pub source_url: String,
    pub streaming_urls: Vec<StreamingUrl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub selected: usize,
    pub decorated: usize,
    pub delivered: usize,
}
