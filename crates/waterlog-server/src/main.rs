use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;
use waterlog_ai::GeminiProvider;
use waterlog_server::app;
use waterlog_server::config::ServerConfig;
use waterlog_server::report::scheduler::WeeklyReportScheduler;
use waterlog_server::state::AppState;
use waterlog_storage::WaterStore;

#[tokio::main]
async fn main() -> Result<()> {
    waterlog_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("waterlog=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/server.toml");

    let config = match ServerConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                path = %config_path,
                error = %e,
                "Config not loaded, falling back to defaults"
            );
            ServerConfig::default()
        }
    };
    let tz_offset = config.tz_offset()?;

    tracing::info!(
        http_port = config.http_port,
        db = %config.db_url,
        utc_offset = %config.utc_offset,
        locale = %config.locale,
        "waterlog-server starting"
    );

    let store = Arc::new(WaterStore::new(&config.db_url).await?);

    let generator = Arc::new(GeminiProvider::new(
        config.ai.api_key.clone(),
        Some(config.ai.model.clone()),
        config.ai.base_url.clone(),
        Some(config.ai.timeout_secs),
        config.ai.max_output_tokens,
    )?);

    let (events, _event_rx) = waterlog_server::events::channel();

    let state = AppState {
        store: store.clone(),
        generator,
        events,
        config: Arc::new(config.clone()),
        tz_offset,
        start_time: Utc::now(),
    };

    // Weekly report scheduler
    let scheduler_handle = if config.weekly_report.enabled {
        let scheduler = Arc::new(WeeklyReportScheduler::new(
            store.clone(),
            state.synthesizer(),
            config.account_id.clone(),
            tz_offset,
            Duration::from_secs(config.weekly_report.tick_interval_secs),
        ));
        Some(tokio::spawn(async move {
            scheduler.start().await;
        }))
    } else {
        tracing::info!("Weekly report scheduler disabled");
        None
    };

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    tracing::info!(http = %http_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    if let Some(h) = scheduler_handle {
        h.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}
