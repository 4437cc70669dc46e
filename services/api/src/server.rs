use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_catalog_routes;
use crate::seed::seed_catalog;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use communes::catalog::{Catalog, InMemoryCatalog};
use communes::config::AppConfig;
use communes::error::AppError;
use communes::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryCatalog::new());
    let catalog = Arc::new(Catalog::new(store.clone(), store));
    if args.seed {
        seed_catalog(&catalog)?;
        info!("demo dataset loaded");
    }

    let app = with_catalog_routes(catalog)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "city catalog service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
