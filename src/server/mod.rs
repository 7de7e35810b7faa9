//! Collection service: accepts finished surveys and exports them as CSV.

pub mod intake;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::store::{Database, LibSqlBackend};

pub use intake::{CSV_COLUMNS, Intake};
pub use routes::{SurveyRouteState, survey_routes};

/// Open the response database and build the router for `config`.
pub async fn build_app(config: &ServerConfig) -> Result<axum::Router> {
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);
    let intake = Arc::new(Intake::new(db, config.resubmit_after_days));
    Ok(survey_routes(SurveyRouteState { intake }))
}

/// Serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let app = build_app(config).await?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        port = config.port,
        db = %config.db_path.display(),
        resubmit_after_days = ?config.resubmit_after_days,
        "Survey collection server started"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
