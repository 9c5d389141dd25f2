use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAccidentRepository, InMemoryResponderDirectory, StaticGeocoder,
};
use crate::routes::with_dispatch_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use siren::config::AppConfig;
use siren::dispatch::AccidentDispatchService;
use siren::error::AppError;
use siren::telemetry;
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

    let repository = Arc::new(InMemoryAccidentRepository::default());
    let directory = Arc::new(InMemoryResponderDirectory::seeded());
    let geocoder = Arc::new(StaticGeocoder::metro());
    let dispatch_service = Arc::new(AccidentDispatchService::with_config(
        geocoder,
        directory,
        repository,
        config.dispatch,
    ));

    let app = with_dispatch_routes(dispatch_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "accident dispatch service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
