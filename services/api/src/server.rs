use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_review_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use onboard_review::config::AppConfig;
use onboard_review::error::AppError;
use onboard_review::review::DirectoryArchive;
use onboard_review::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(archive_dir) = args.archive_dir.take() {
        config.review.archive_dir = archive_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let archive = Arc::new(DirectoryArchive::new(config.review.archive_dir.clone()));
    match archive.entries() {
        Ok(entries) if entries.is_empty() => {
            warn!(archive = %archive.root().display(), "client archive is empty")
        }
        Ok(entries) => info!(
            archive = %archive.root().display(),
            clients = entries.len(),
            "client archive loaded"
        ),
        Err(err) => warn!(error = %err, "client archive unavailable"),
    }

    let app = with_review_routes(archive)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "client onboarding review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
