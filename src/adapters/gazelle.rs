use crate::adapters::http::{decode_json, nullable};
use crate::domain::model::ChartEntry;
use crate::utils::error::{DigestError, Result};
use crate::utils::html::decode_entities;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;

pub const TOP_N: usize = 10;
pub const FETCH_LIMIT: usize = 100;

/// 專輯、合輯、精選等；單曲、remix、bootleg 不收
pub const ALLOWED_RELEASE_TYPES: [&str; 7] = ["1", "3", "5", "6", "11", "18", "19"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// 不認得的值一律退回 `day`，不報錯
    pub fn normalize(value: &str) -> Self {
        match value {
            "week" => Period::Week,
            "month" => Period::Month,
            "year" => Period::Year,
            _ => Period::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    response: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(default, deserialize_with = "nullable")]
    caption: String,
    #[serde(default, deserialize_with = "nullable")]
    results: Vec<RawChartEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawChartEntry {
    #[serde(deserialize_with = "nullable")]
    pub torrent_id: u64,
    #[serde(deserialize_with = "nullable")]
    pub group_id: u64,
    #[serde(deserialize_with = "nullable")]
    pub artist: String,
    #[serde(deserialize_with = "nullable")]
    pub group_name: String,
    #[serde(deserialize_with = "nullable")]
    pub group_category: i64,
    #[serde(deserialize_with = "nullable")]
    pub group_year: i32,
    #[serde(deserialize_with = "nullable")]
    pub year: i32,
    #[serde(deserialize_with = "nullable")]
    pub release_type: String,
    #[serde(deserialize_with = "nullable")]
    pub remaster_title: String,
    #[serde(deserialize_with = "nullable")]
    pub format: String,
    #[serde(deserialize_with = "nullable")]
    pub encoding: String,
    #[serde(deserialize_with = "nullable")]
    pub media: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub wiki_image: String,
}

impl From<RawChartEntry> for ChartEntry {
    fn from(raw: RawChartEntry) -> Self {
        // tracker 依 API 路由不同，artist / groupName 可能是 HTML escape 過的
        ChartEntry {
            torrent_id: raw.torrent_id,
            group_id: raw.group_id,
            artist: decode_entities(&raw.artist),
            title: decode_entities(&raw.group_name),
            group_category: raw.group_category,
            group_year: raw.group_year,
            year: raw.year,
            release_type: raw.release_type,
            remaster_title: raw.remaster_title,
            format: raw.format,
            encoding: raw.encoding,
            media: raw.media,
            tags: raw.tags,
            artwork_url: raw.wiki_image,
        }
    }
}

pub fn is_allowed_release_type(release_type: &str) -> bool {
    ALLOWED_RELEASE_TYPES.contains(&release_type)
}

/// 依來源順序（熱門度）去重並過濾類別，湊滿 10 筆立即返回
pub fn select_unique_top10(entries: Vec<ChartEntry>) -> Result<Vec<ChartEntry>> {
    let mut seen_groups = HashSet::new();
    let mut selected = Vec::with_capacity(TOP_N);

    for entry in entries {
        if !is_allowed_release_type(&entry.release_type) {
            tracing::debug!(
                "Skipping {} - {} (release type {})",
                entry.artist,
                entry.title,
                entry.release_type
            );
            continue;
        }
        if !seen_groups.insert(entry.group_id) {
            continue;
        }

        selected.push(entry);
        if selected.len() == TOP_N {
            return Ok(selected);
        }
    }

    Err(DigestError::InsufficientResults {
        found: selected.len(),
        required: TOP_N,
    })
}

pub struct GazelleClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GazelleClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_top10(&self, period: &str) -> Result<Vec<ChartEntry>> {
        let details = Period::normalize(period);
        if details.as_str() != period {
            tracing::warn!("Unknown chart period '{}', falling back to '{}'", period, details.as_str());
        }

        let endpoint = format!("{}/ajax.php", self.base_url);
        let limit = FETCH_LIMIT.to_string();
        tracing::debug!("Requesting {} chart from: {}", details.as_str(), endpoint);

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("action", "top10"),
                ("details", details.as_str()),
                ("limit", limit.as_str()),
            ])
            .header("Authorization", &self.token)
            .send()
            .await?;

        let envelope: RawResponse = decode_json(response).await?;

        if envelope.status != "success" {
            return Err(DigestError::protocol(format!(
                "unexpected status message. got {}, expected success{}",
                envelope.status,
                envelope
                    .error
                    .map(|e| format!(" ({})", e))
                    .unwrap_or_default()
            )));
        }

        let group_count = envelope.response.len();
        let mut groups = envelope.response.into_iter();
        match (groups.next(), groups.next()) {
            (Some(group), None) => {
                tracing::debug!("Chart group '{}' returned {} entries", group.caption, group.results.len());
                Ok(group.results.into_iter().map(ChartEntry::from).collect())
            }
            _ => Err(DigestError::protocol(format!(
                "unexpected result count. got {}, expected 1",
                group_count
            ))),
        }
    }

    /// 同一張專輯的不同編碼會各自佔一個名次，因此需要去重
    pub async fn get_unique_top10(&self, period: &str) -> Result<Vec<ChartEntry>> {
        let entries = self.get_top10(period).await?;
        tracing::info!("📊 Chart returned {} raw entries", entries.len());
        select_unique_top10(entries)
    }

    pub fn source_url(&self, entry: &ChartEntry) -> String {
        format!(
            "{}/torrents.php?id={}&torrentid={}",
            self.base_url, entry.group_id, entry.torrent_id
        )
    }
}
