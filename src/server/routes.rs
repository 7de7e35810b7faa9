//! HTTP surface of the collection service.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::submit::SubmitReply;
use crate::survey::Submission;

use super::intake::Intake;

const SERVICE_NAME: &str = "wellbeing-survey";
const SAVED_MESSAGE: &str = "Your responses were saved successfully";
const NO_DATA_MESSAGE: &str = "CSV file not found. No data has been collected yet.";

/// Shared state for the survey routes.
#[derive(Clone)]
pub struct SurveyRouteState {
    pub intake: Arc<Intake>,
}

/// Build the survey REST routes. Browsers on other origins may post to them.
pub fn survey_routes(state: SurveyRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/submit", post(submit))
        .route("/download-csv", get(download_csv))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": SERVICE_NAME}))
}

// ── Submit ──────────────────────────────────────────────────────────

/// POST /submit
async fn submit(
    State(state): State<SurveyRouteState>,
    body: Result<Json<Submission>, JsonRejection>,
) -> Response {
    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed submission body");
            let reason = rejection.body_text();
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitReply::refused(reason.clone(), Some(reason))),
            )
                .into_response();
        }
    };

    match state.intake.accept(submission).await {
        Ok(stored) => Json(SubmitReply::accepted(stored.user_id, SAVED_MESSAGE)).into_response(),
        Err(e) if e.is_rejection() => {
            let reason = e.to_string();
            (
                StatusCode::BAD_REQUEST,
                Json(SubmitReply::refused(reason.clone(), Some(reason))),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to store submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitReply::refused(e.to_string(), None)),
            )
                .into_response()
        }
    }
}

// ── Export ──────────────────────────────────────────────────────────

/// GET /download-csv
async fn download_csv(State(state): State<SurveyRouteState>) -> Response {
    match state.intake.export_csv().await {
        Ok(Some(csv)) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"survey_data.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, NO_DATA_MESSAGE).into_response(),
        Err(e) => {
            error!(error = %e, "CSV export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
