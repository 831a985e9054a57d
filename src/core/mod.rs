pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{CatalogAlbum, ChartEntry, DecoratedResult, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Notifier, Pipeline};
pub use crate::utils::error::Result;
