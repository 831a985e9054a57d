use crate::domain::model::{ChartEntry, DecoratedResult, TemplateVariables};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Notifier: Send + Sync {
    fn send(
        &self,
        subject: &str,
        title: &str,
        albums: &[TemplateVariables],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn period(&self) -> &str;
    fn country(&self) -> &str;
    fn digest_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ChartEntry>>;
    async fn transform(&self, entries: Vec<ChartEntry>) -> Result<Vec<DecoratedResult>>;
    async fn load(&self, results: Vec<DecoratedResult>) -> Result<usize>;
}
