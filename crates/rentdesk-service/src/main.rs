//! rentdesk HTTP service binary.

use rentdesk_lib::DataSources;
use rentdesk_service::{router, ServiceConfig};
use rentdesk_service_shared::{init_logging, init_metrics, AppState, LoggingConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut logging = LoggingConfig::from_env();
    if logging.service.is_none() {
        logging = logging.with_service(env!("CARGO_PKG_NAME"));
    }
    init_logging(&logging)?;

    let config = ServiceConfig::from_env();
    if config.metrics.enabled {
        if let Err(err) = init_metrics(&config.metrics) {
            warn!(error = %err, "metrics disabled");
        }
    }

    let sources = DataSources::resolve(None);
    let state = AppState::load(&sources);

    let datastore = state.datastore();
    info!(
        stores = datastore.stores().len(),
        orders = datastore.orders().len(),
        fixtures = datastore.report().used_fixtures(),
        "application state loaded"
    );

    let app = router(state, &config);

    let addr = config.socket_addr();
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
