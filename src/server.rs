use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{METRICS_URL, REPORTS_URL};
use crate::context::AppContext;
use crate::utils::prometheus_format::{PrometheusFormat, EXPOSITION_CONTENT_TYPE};

/// Create the HTTP server router
pub fn create_router(app_context: Arc<AppContext>) -> Router {
    let app_context_clone1 = app_context.clone();
    let app_context_clone2 = app_context.clone();

    Router::new()
        .route("/", get(index_page))
        .route(
            METRICS_URL,
            get(move || async move { metrics_handler(app_context_clone1.clone()).await }),
        )
        .route(
            REPORTS_URL,
            get(move || async move { reports_handler(app_context_clone2.clone()).await }),
        )
}

/// Index page handler
async fn index_page() -> impl IntoResponse {
    info!("Index page request received");
    let html = r#"<html>
    <head><title>zVM Exporter</title></head>
    <body>
    <h1>Available HTTP endpoints:</h1>
    <ul>
    <li><b><a href='/metrics'>/metrics</a></b>: z/VM metrics in Prometheus format</li>
    <li><b><a href='/reports'>/reports</a></b>: Parsed z/VM reports as JSON</li>
    </ul>
    </body>
    </html>"#;
    Html(html).into_response()
}

/// Metrics endpoint handler
///
/// Every request queries xCAT. Domains whose query failed are simply missing from the output.
async fn metrics_handler(ctx: Arc<AppContext>) -> impl IntoResponse {
    info!("Metrics request received");

    let families = ctx.metrics_collector().collect().await;
    let output = families.to_prometheus_format();

    if output.is_empty() {
        warn!(
            zhcpnode = ctx.metrics_collector().zhcpnode(),
            "No metrics collected, all xCAT queries failed or returned no data"
        );
    }

    debug!(output_size = output.len(), "Returning metrics");
    (
        StatusCode::OK,
        [("Content-Type", EXPOSITION_CONTENT_TYPE)],
        output,
    )
        .into_response()
}

/// Parsed reports handler
async fn reports_handler(ctx: Arc<AppContext>) -> impl IntoResponse {
    info!("Reports request received");

    let reports = ctx.metrics_collector().collect_reports().await;
    let json_output = serde_json::to_string(&reports).unwrap_or_else(|e| {
        warn!("Failed to serialize reports: {}", e);
        "{}".to_string()
    });

    (
        StatusCode::OK,
        [("Content-Type", "application/json; charset=utf-8")],
        json_output,
    )
        .into_response()
}

/// Start the HTTP server
pub async fn start_server(listen_address: &str, app_context: AppContext) -> anyhow::Result<()> {
    info!(
        xcat_server = %app_context.server(),
        zhcpnode = app_context.metrics_collector().zhcpnode(),
        "Serving metrics for zHCP node"
    );
    let app_context = Arc::new(app_context);
    let router = create_router(app_context);

    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    info!("Server listening on {}", listen_address);

    axum::serve(listener, router).await?;

    Ok(())
}
