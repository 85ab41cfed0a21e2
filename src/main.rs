use anyhow::Result;
use docker_stats_agent::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Config errors are reported before the subscriber exists, via anyhow's exit path.
    let app_config = config::AppConfig::load()?;
    logging::init(&app_config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_format = %app_config.logging.format,
        log_level = %app_config.logging.level,
        stats_interval = %app_config.collection.stats_interval,
        max_concurrent_fetches = ?app_config.collection.max_concurrent_fetches,
        "starting up..."
    );

    let schedule = app_config.schedule()?;
    let client: Arc<dyn runtime_client::RuntimeClient> =
        match runtime_client::DockerClient::connect() {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "cannot connect to docker");
                return Err(e.into());
            }
        };

    let collector = collector::Collector::new(
        client.clone(),
        app_config.collection.max_concurrent_fetches,
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = scheduler::spawn(collector, schedule, shutdown_rx);

    let app = routes::app(client);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "shutting down");
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutting down");
            let _ = shutdown_tx.send(());
            let _ = scheduler_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
