use crate::AppState;
use crate::api::error::AppError;
use crate::models::{Event, EventPatch, NewEvent};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::json_body;

#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Events ordered by start", body = Vec<Event>),
        (status = 500, description = "Store failure")
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let items = state.event_service.list_events().await?;
    Ok(Json(items.into_iter().map(Event::from).collect()))
}

#[utoipa::path(
    post,
    path = "/events",
    request_body = NewEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Malformed body or missing title"),
        (status = 500, description = "Store failure")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let req = json_body(payload)?;
    let event = state.event_service.create_event(req).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    request_body = EventPatch,
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventPatch>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let patch = json_body(payload)?;
    let event = state.event_service.update_event(&id, patch).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted", body = String),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Store failure")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    state.event_service.delete_event(&id).await?;
    Ok("Event deleted successfully")
}
