use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use std::future::Future;

pub struct DigestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DigestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 抓排行榜 → 查目錄 → 寄信；前兩步任何錯誤都不會寄出信件
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting weekly digest run...");

        let entries = self.pipeline.extract().await?;
        let selected = entries.len();

        tracing::info!("Matching {} entries against the catalog...", selected);
        let results = self.pipeline.transform(entries).await?;
        let decorated = results.len();
        if decorated < selected {
            tracing::warn!("{} entries dropped after failed lookups", selected - decorated);
        }

        let delivered = self.pipeline.load(results).await?;

        Ok(RunSummary {
            selected,
            decorated,
            delivered,
        })
    }

    /// `shutdown` 先完成時放棄整個執行並回傳 `None`；進行中的請求隨之取消，信件不會寄出
    pub async fn run_until<F>(&self, shutdown: F) -> Result<Option<RunSummary>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run() => result.map(Some),
            _ = shutdown => {
                tracing::warn!("Shutdown requested, aborting the run");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChartEntry, DecoratedResult};
    use crate::utils::error::DigestError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubPipeline {
        chart_size: Option<usize>,
        fail_every: usize,
        transform_delay: Duration,
        transforms: AtomicUsize,
        loads: AtomicUsize,
    }

    impl StubPipeline {
        fn new(chart_size: Option<usize>, fail_every: usize) -> Self {
            Self {
                chart_size,
                fail_every,
                transform_delay: Duration::ZERO,
                transforms: AtomicUsize::new(0),
                loads: AtomicUsize::new(0),
            }
        }
    }

    fn entry(group_id: u64) -> ChartEntry {
        ChartEntry {
            torrent_id: group_id,
            group_id,
            artist: "A".to_string(),
            title: "B".to_string(),
            group_category: 1,
            group_year: 2020,
            year: 2020,
            release_type: "1".to_string(),
            remaster_title: String::new(),
            format: String::new(),
            encoding: String::new(),
            media: String::new(),
            tags: vec![],
            artwork_url: String::new(),
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<ChartEntry>> {
            match self.chart_size {
                Some(n) => Ok((1..=n as u64).map(entry).collect()),
                None => Err(DigestError::InsufficientResults {
                    found: 4,
                    required: 10,
                }),
            }
        }

        async fn transform(&self, entries: Vec<ChartEntry>) -> Result<Vec<DecoratedResult>> {
            self.transforms.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.transform_delay).await;
            Ok(entries
                .into_iter()
                .filter(|e| self.fail_every == 0 || e.group_id % self.fail_every as u64 != 0)
                .map(|entry| DecoratedResult {
                    entry,
                    albums: vec![],
                })
                .collect())
        }

        async fn load(&self, results: Vec<DecoratedResult>) -> Result<usize> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(results.len())
        }
    }

    #[tokio::test]
    async fn test_run_reports_summary() {
        let engine = DigestEngine::new(StubPipeline::new(Some(10), 5));

        let summary = engine.run().await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                selected: 10,
                decorated: 8,
                delivered: 8,
            }
        );
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_aborts_before_load_on_chart_error() {
        let engine = DigestEngine::new(StubPipeline::new(None, 0));

        assert!(matches!(
            engine.run().await,
            Err(DigestError::InsufficientResults { .. })
        ));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_until_shutdown_during_transform_skips_load() {
        let mut pipeline = StubPipeline::new(Some(10), 0);
        pipeline.transform_delay = Duration::from_secs(30);
        let engine = DigestEngine::new(pipeline);

        let outcome = engine
            .run_until(tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(engine.pipeline.transforms.load(Ordering::SeqCst), 1);
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_until_without_shutdown_completes() {
        let engine = DigestEngine::new(StubPipeline::new(Some(10), 0));

        let outcome = engine.run_until(std::future::pending()).await.unwrap();

        assert_eq!(outcome.map(|s| s.delivered), Some(10));
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }
}
