use clap::Parser;
use tracker_weekly::adapters::http::build_client;
use tracker_weekly::utils::error::ErrorSeverity;
use tracker_weekly::utils::{logger, validation::Validate};
use tracker_weekly::{
    CliConfig, DigestEngine, DigestError, DigestPipeline, GazelleClient, ItunesClient,
    PostmarkClient, TomlConfig,
};

fn build_engine(
    config: TomlConfig,
) -> tracker_weekly::Result<DigestEngine<DigestPipeline<PostmarkClient, TomlConfig>>> {
    // 三個 adapter 共用同一個 HTTP client
    let client = build_client(config.user_agent(), config.http.timeout_seconds)?;

    let chart = GazelleClient::new(
        client.clone(),
        config.tracker.base_url.clone(),
        config.tracker.api_token.clone(),
    );
    let catalog = ItunesClient::new(client.clone(), config.catalog_base_url())
        .with_year_tolerance(config.year_tolerance());
    let notifier = PostmarkClient::new(
        client,
        config.email_base_url(),
        config.email.api_token.clone(),
        config.email.from.clone(),
        config.email.to.clone(),
        config.email.template_id,
    )?;

    Ok(DigestEngine::new(DigestPipeline::new(
        chart, catalog, notifier, config,
    )))
}

fn exit_with(e: &DigestError) -> ! {
    tracing::error!(
        "❌ Weekly digest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tracker-weekly");
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Some(period) = cli.period {
        config.tracker.period = Some(period);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let engine = match build_engine(config) {
        Ok(engine) => engine,
        Err(e) => exit_with(&e),
    };

    // Ctrl-C 直接丟棄整個執行中的 future：進行中的請求會被取消，也不會寄出部分結果
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match engine.run_until(shutdown).await {
        Ok(Some(summary)) => {
            tracing::info!(
                "✅ Digest sent: {} selected, {} decorated, {} delivered",
                summary.selected,
                summary.decorated,
                summary.delivered
            );
            println!("✅ Digest sent with {} albums", summary.delivered);
        }
        Ok(None) => {
            eprintln!("⚠️ Interrupted, no digest was sent");
            std::process::exit(130);
        }
        Err(e) => exit_with(&e),
    }
}
