//! JSON API for events.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use eventboard_auth::CurrentUser;
use eventboard_core::events::{
    validate_event, CountryGroup, Event, EventDraft, FormMode,
};
use eventboard_core::storage::RepositoryError;

use super::error::{AppError, ValidationRejection};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub country: Option<String>,
}

/// List events (GET /api/events), optionally for one exact country.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = match query.country.as_deref().filter(|c| !c.is_empty()) {
        Some(country) => state.service.list_by_country(country).await?,
        None => state.service.list_all().await?,
    };

    Ok(Json(events))
}

/// List events dated today or later (GET /api/events/upcoming).
pub async fn list_upcoming_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.service.list_upcoming().await?))
}

/// Upcoming events grouped by country, as on the landing page (GET /api/events/groups).
pub async fn list_event_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryGroup>>, AppError> {
    state.events.refresh_upcoming().await?;
    Ok(Json(state.events.groups()))
}

/// Get a single event (GET /api/events/{id}).
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| RepositoryError::event_not_found(id.to_string()))?;

    Ok(Json(event))
}

fn validated(draft: &EventDraft, mode: FormMode) -> Result<(), AppError> {
    let errors = validate_event(draft, mode, Local::now().date_naive());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationRejection(errors).into())
    }
}

/// Create an event (POST /api/events).
pub async fn create_event(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<impl IntoResponse, AppError> {
    validated(&draft, FormMode::Create)?;

    let event = state.events.create(&draft.into_input()).await?;
    tracing::debug!(event_id = %event.id, user = %user.email, "Event created via API");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event (PUT /api/events/{id}).
pub async fn update_event(
    CurrentUser(_): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>, AppError> {
    validated(&draft, FormMode::Edit)?;

    Ok(Json(state.events.update(id, &draft.into_input()).await?))
}

/// Delete an event (DELETE /api/events/{id}).
pub async fn delete_event(
    CurrentUser(_): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
