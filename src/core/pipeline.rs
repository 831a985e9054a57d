use crate::adapters::{GazelleClient, ItunesClient};
use crate::core::{ChartEntry, ConfigProvider, DecoratedResult, Notifier, Pipeline};
use crate::domain::model::TemplateVariables;
use crate::utils::error::Result;
use chrono::{NaiveDate, Utc};

/// 郵件主旨與標題，例如 `Redacted Weekly: Top 10 on 2 January 2026`
pub fn digest_headings(digest_name: &str, date: NaiveDate) -> (String, String) {
    let day = date.format("%-d %B %Y");
    (
        format!("{}: Top 10 on {}", digest_name, day),
        format!("{}, {}", digest_name, day),
    )
}

pub struct DigestPipeline<N: Notifier, C: ConfigProvider> {
    chart: GazelleClient,
    catalog: ItunesClient,
    notifier: N,
    config: C,
}

impl<N: Notifier, C: ConfigProvider> DigestPipeline<N, C> {
    pub fn new(chart: GazelleClient, catalog: ItunesClient, notifier: N, config: C) -> Self {
        Self {
            chart,
            catalog,
            notifier,
            config,
        }
    }

    pub fn template_variables(&self, results: &[DecoratedResult]) -> Vec<TemplateVariables> {
        results
            .iter()
            .map(|result| TemplateVariables {
                artist: result.entry.artist.clone(),
                album: result.entry.title.clone(),
                release_year: result.entry.group_year,
                tags: result.entry.tags.clone(),
                artwork_url: result.entry.artwork_url.clone(),
                source_url: self.chart.source_url(&result.entry),
                streaming_urls: result.streaming_urls().cloned().collect(),
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl<N: Notifier, C: ConfigProvider> Pipeline for DigestPipeline<N, C> {
    async fn extract(&self) -> Result<Vec<ChartEntry>> {
        tracing::info!(
            "🚀 Fetching {} chart from: {}",
            self.config.period(),
            self.chart.base_url()
        );
        let entries = self.chart.get_unique_top10(self.config.period()).await?;
        tracing::info!("📊 Selected {} unique chart entries", entries.len());
        Ok(entries)
    }

    async fn transform(&self, entries: Vec<ChartEntry>) -> Result<Vec<DecoratedResult>> {
        let country = self.config.country();
        let mut results = Vec::with_capacity(entries.len());

        // 逐筆查詢；單筆失敗只略過該筆，不影響其他九筆
        for entry in entries {
            let albums = match self
                .catalog
                .match_album(country, &entry.artist, &entry.title, entry.year)
                .await
            {
                Ok(albums) => albums,
                Err(e) => {
                    tracing::error!(
                        "❌ Catalog lookup failed for {} - {}: {}",
                        entry.artist,
                        entry.title,
                        e
                    );
                    continue;
                }
            };

            if albums.is_empty() {
                tracing::warn!("No catalog match for {} - {}", entry.artist, entry.title);
            }
            tracing::info!(
                "✅ Album prepared for sending: {} - {} ({} streaming urls)",
                entry.artist,
                entry.title,
                albums.len()
            );
            results.push(DecoratedResult { entry, albums });
        }

        Ok(results)
    }

    async fn load(&self, results: Vec<DecoratedResult>) -> Result<usize> {
        let albums = self.template_variables(&results);
        if albums.is_empty() {
            tracing::warn!("Every catalog lookup failed, sending an empty digest");
        }

        let (subject, title) = digest_headings(self.config.digest_name(), Utc::now().date_naive());
        tracing::info!("📧 Sending new email with {} items: {}", albums.len(), subject);

        self.notifier.send(&subject, &title, &albums).await?;
        Ok(albums.len())
    }
}
