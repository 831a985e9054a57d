pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{GazelleClient, ItunesClient, PostmarkClient};
pub use self::core::{etl::DigestEngine, pipeline::DigestPipeline};
pub use utils::error::{DigestError, Result};
