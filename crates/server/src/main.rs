//! Backdesk server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use backdesk_api::{AppState, router as api_router};
use backdesk_common::Config;
use backdesk_core::{ReportService, StatsService, TicketService};
use backdesk_db::repositories::{ReportRepository, TicketRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backdesk=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting backdesk server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = backdesk_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    backdesk_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let ticket_repo = TicketRepository::new(Arc::clone(&db));

    // Initialize services
    let overdue_hours = config.workflow.overdue_hours;
    let report_service = ReportService::new(report_repo.clone());
    let ticket_service = TicketService::new(ticket_repo.clone());
    let stats_service = StatsService::new(ticket_repo, report_repo, overdue_hours);

    // Create app state
    let state = AppState {
        report_service,
        ticket_service,
        stats_service,
        overdue_hours,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
