use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{EnvReport, Settings};
use crate::llm::TextGenerator;
use crate::service::{self, PitchResponse};

pub struct AppState {
    pub settings: Settings,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/health", get(health))
        .route("/api/env", get(env_check))
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<PitchResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => Some(request),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable generate request");
            None
        }
    };
    handle_generate(&state, request).await.map(Json)
}

/// `None` stands for a body that could not be read at all.
pub async fn handle_generate(
    state: &AppState,
    request: Option<GenerateRequest>,
) -> Result<PitchResponse, ApiError> {
    let Some(request) = request else {
        return Ok(PitchResponse::emergency("", Instant::now()));
    };

    let company = request.company_name.unwrap_or_default();
    let company = company.trim();
    if company.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Company name is required".into(),
            }),
        ));
    }

    Ok(service::generate_pitch(state.generator.as_deref(), company).await)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn env_check(State(state): State<Arc<AppState>>) -> Json<EnvReport> {
    Json(state.settings.report())
}

// ── Tests ──
