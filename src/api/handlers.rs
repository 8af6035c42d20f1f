//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::{
    requests::{PreviewRequest, StartRequest},
    responses::{HealthResponse, PreviewResponse, StatusResponse},
};
use crate::{
    error::AppError,
    nudge::compute_triggers,
    presentation::ProgressView,
    services::ThemePreference,
    state::AppState,
};

/// Handle POST /timer/start - Validate input and begin a countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(request) = request?;
    let (total_seconds, nudge) = request.validate()?;
    info!("Start endpoint called - {}s, {:?}", total_seconds, nudge);

    let snapshot = state.start(total_seconds, nudge)?;
    Ok(Json(snapshot.into()))
}

/// Handle POST /timer/pause - Pause or resume the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(state.toggle_pause()?.into()))
}

/// Handle POST /timer/reset - Stop and clear the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(state.reset()?.into()))
}

/// Handle GET /timer/status - Return the current countdown
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(state.snapshot()?.into()))
}

/// Handle POST /nudges/preview - Lay out markers without starting anything
pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let Json(request) = request?;
    let (total_seconds, nudge) = request.resolve(state.preview_minutes)?;
    let triggers = compute_triggers(total_seconds, nudge);

    Ok(Json(PreviewResponse {
        total_seconds,
        nudge,
        progress: ProgressView::preview(&triggers, total_seconds),
        triggers: triggers.offsets().to_vec(),
    }))
}

/// Handle GET /events - Stream timer events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream opened");

    let events = stream::unfold(state.subscribe(), |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                    Ok(sse) => return Some((Ok::<_, Infallible>(sse), rx)),
                    Err(e) => warn!("Failed to encode {} event: {}", event.name(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /theme - Return the dark-mode preference
pub async fn theme_handler(State(state): State<Arc<AppState>>) -> Result<Json<ThemePreference>, AppError> {
    Ok(Json(state.theme.current()?))
}

/// Handle POST /theme/toggle - Flip and persist the dark-mode preference
pub async fn theme_toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThemePreference>, AppError> {
    Ok(Json(state.theme.toggle()?))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
