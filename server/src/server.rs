use crate::config::ServerConfig;
use crate::handle::SimulationHandle;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{ApiError, ControlResponse, PopulationSnapshot, ReconfigureRequest, SimulationStats};
use sim::SimError;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub simulation: SimulationHandle,
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState {
        simulation: SimulationHandle::new(config.simulation.clone())?,
    };

    tokio::spawn(drive(state.simulation.clone(), config.tick_interval));

    let app = router(state);

    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/snapshot", get(handle_snapshot))
        .route("/api/stats", get(handle_stats))
        .route("/api/pause", post(handle_pause))
        .route("/api/resume", post(handle_resume))
        .route("/api/reconfigure", post(handle_reconfigure))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Step the simulation once per interval, one step at a time
async fn drive(simulation: SimulationHandle, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        simulation.tick().await;
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Latest published population snapshot
async fn handle_snapshot(State(state): State<AppState>) -> Json<PopulationSnapshot> {
    let snapshot = state.simulation.snapshot().await;
    Json(snapshot.as_ref().clone())
}

async fn handle_stats(State(state): State<AppState>) -> Json<SimulationStats> {
    Json(state.simulation.stats().await)
}

async fn handle_pause(State(state): State<AppState>) -> Json<ControlResponse> {
    let response = state.simulation.pause().await;
    tracing::info!("Simulation paused at tick {}", response.tick);
    Json(response)
}

async fn handle_resume(State(state): State<AppState>) -> Json<ControlResponse> {
    let response = state.simulation.resume().await;
    tracing::info!("Simulation resumed at tick {}", response.tick);
    Json(response)
}

#[axum::debug_handler]
async fn handle_reconfigure(
    State(state): State<AppState>,
    Json(request): Json<ReconfigureRequest>,
) -> Result<Json<ControlResponse>, RejectedConfig> {
    let response = state.simulation.reconfigure(request).await?;
    tracing::info!("Simulation restarted as run {}", response.run_id);
    Ok(Json(response))
}

/// A reconfigure request the simulation refused
pub struct RejectedConfig(SimError);

impl From<SimError> for RejectedConfig {
    fn from(err: SimError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RejectedConfig {
    fn into_response(self) -> Response {
        tracing::warn!("Rejected reconfigure: {}", self.0);
        (StatusCode::BAD_REQUEST, Json(ApiError::new(self.0.to_string()))).into_response()
    }
}
