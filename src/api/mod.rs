//! REST API over a finished run.
//!
//! - `GET /state`: configuration, KPI report, completion and latest step
//! - `GET /series`: per-step rows with optional inclusive range filtering
//! - `POST /simulate`: runs a fresh simulation for the posted vehicle inputs

mod handlers;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::sim::controller::RuleBasedController;
use crate::sim::kpi::KpiReport;
use crate::sim::result::ResultSet;
use crate::sim::signals::SignalGenerator;

/// Immutable application state shared across all request handlers.
///
/// Built once after the startup run and wrapped in `Arc`. `POST /simulate`
/// clones the signal source and controller into its own engine, so no
/// request ever mutates shared data.
pub struct AppState {
    /// Result of the startup run.
    pub result: ResultSet,
    /// KPIs of the startup run.
    pub kpi: KpiReport,
    /// Signal curves used for on-demand runs.
    pub signals: SignalGenerator,
    /// Rule set used for on-demand runs.
    pub controller: RuleBasedController,
}

impl AppState {
    pub fn new(result: ResultSet, signals: SignalGenerator, controller: RuleBasedController) -> Self {
        let kpi = KpiReport::from_result(&result);
        Self {
            result,
            kpi,
            signals,
            controller,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/series", get(handlers::get_series))
        .route("/simulate", post(handlers::post_simulate))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
