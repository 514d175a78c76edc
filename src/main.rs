use anyhow::Context;
use clap::Parser;
use fx_infra::config::loader::AppConfig;
use fx_infra::observability::metrics::register_metrics;
use fx_infra::observability::tracing::init_tracing;
use fx_infra::pipeline::scheduler::Scheduler;
use fx_infra::pipeline::Pipeline;
use fx_infra::{BASE_CURRENCY, QUOTE_CURRENCY};

#[derive(Parser, Debug)]
#[command(name = "fx-infra")]
#[command(about = "USD/PEN quote aggregator with a CSV history log", long_about = None)]
struct Cli {
    /// Run the pipeline once and exit instead of starting the scheduler
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Append a history row even when no tracked rate changed
    #[arg(long, default_value_t = false, requires = "once")]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = std::env::var("FXINFRA_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    init_tracing(config.log_json);
    register_metrics()?;

    let mut pipeline = Pipeline::from_config(&config)?;

    tracing::info!(
        "Monitoring {}/{} across {} sources, history at {:?}",
        BASE_CURRENCY,
        QUOTE_CURRENCY,
        config.sources.len(),
        pipeline.history().path()
    );

    if cli.once {
        let report = pipeline.run(cli.force).await;
        report.into_result().context("persisting snapshot")?;
        return Ok(());
    }

    let scheduler = Scheduler::from_config(pipeline, &config.schedule);
    let (_, runs) = scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    tracing::info!("Stopped after {} scheduled runs", runs);
    Ok(())
}
