use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tracker-weekly")]
#[command(version, about = "Email a digest of the tracker's weekly top 10 with streaming links")]
pub struct CliConfig {
    #[arg(long, short, default_value = "tracker-weekly.toml")]
    pub config: String,

    #[arg(long, help = "Chart period (day, week, month, year); overrides tracker.period")]
    pub period: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}
