//! Data-access façade over an [`EventRepository`].
//!
//! Each operation is exactly one repository round trip with no retry.
//! Create and update check that every business field is present (and that
//! the date parses) before the store is contacted. Store failures are
//! normalized into [`EventServiceError`] with a message naming the operation.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use eventboard_core::events::{parse_iso_date, Event, EventField, EventFields, EventInput};
use eventboard_core::storage::{EventQuery, EventRepository, RepositoryError};

/// The façade operations, used to label failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOperation {
    FetchAll,
    FetchUpcoming,
    FetchByCountry(String),
    FetchOne,
    Create,
    Update,
    Delete,
}

impl EventOperation {
    fn gerund(&self) -> &'static str {
        match self {
            EventOperation::FetchAll => "fetching events",
            EventOperation::FetchUpcoming => "fetching upcoming events",
            EventOperation::FetchByCountry(_) => "fetching events by country",
            EventOperation::FetchOne => "fetching event",
            EventOperation::Create => "creating event",
            EventOperation::Update => "updating event",
            EventOperation::Delete => "deleting event",
        }
    }
}

impl std::fmt::Display for EventOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOperation::FetchAll => f.write_str("fetch events"),
            EventOperation::FetchUpcoming => f.write_str("fetch upcoming events"),
            EventOperation::FetchByCountry(country) => {
                write!(f, "fetch events for country {country}")
            }
            EventOperation::FetchOne => f.write_str("fetch event"),
            EventOperation::Create => f.write_str("create event"),
            EventOperation::Update => f.write_str("update event"),
            EventOperation::Delete => f.write_str("delete event"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventServiceError {
    #[error("Event {0} is required")]
    MissingField(EventField),

    #[error("Event date is invalid: {0}")]
    InvalidDate(String),

    #[error("Failed to {operation}: {}", .source.detail())]
    Failed {
        operation: EventOperation,
        source: RepositoryError,
    },

    #[error("An unexpected error occurred while {}", .0.gerund())]
    Unexpected(EventOperation),
}

impl EventServiceError {
    fn from_repository(operation: EventOperation, source: RepositoryError) -> Self {
        if source.detail().is_empty() {
            EventServiceError::Unexpected(operation)
        } else {
            EventServiceError::Failed { operation, source }
        }
    }

    /// The store error behind this failure, if any.
    pub fn repository_error(&self) -> Option<&RepositoryError> {
        match self {
            EventServiceError::Failed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EventServiceError>;

/// Checks that every business field is non-empty after trimming and that the
/// date parses, producing the typed fields handed to the store.
pub fn require_fields(input: &EventInput) -> Result<EventFields> {
    let input = input.trimmed();

    let required = [
        (EventField::Title, &input.title),
        (EventField::Description, &input.description),
        (EventField::Date, &input.date),
        (EventField::Country, &input.country),
        (EventField::City, &input.city),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(EventServiceError::MissingField(*field));
    }

    let date = parse_iso_date(&input.date)
        .map_err(|_| EventServiceError::InvalidDate(input.date.clone()))?;

    Ok(EventFields {
        title: input.title,
        description: input.description,
        date,
        country: input.country,
        city: input.city,
    })
}

/// Stateless façade; clones share the same repository.
#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    async fn list(&self, query: EventQuery, operation: EventOperation) -> Result<Vec<Event>> {
        self.repo.list_events(query).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to {}", operation);
            EventServiceError::from_repository(operation, e)
        })
    }

    /// All events, by date ascending.
    pub async fn list_all(&self) -> Result<Vec<Event>> {
        self.list(EventQuery::all(), EventOperation::FetchAll).await
    }

    /// Events dated today or later on the local clock, by date ascending.
    pub async fn list_upcoming(&self) -> Result<Vec<Event>> {
        self.list_upcoming_from(Local::now().date_naive()).await
    }

    /// Events dated `today` or later, by date ascending.
    pub async fn list_upcoming_from(&self, today: NaiveDate) -> Result<Vec<Event>> {
        self.list(EventQuery::upcoming(today), EventOperation::FetchUpcoming)
            .await
    }

    /// Events whose country matches exactly, by date ascending.
    pub async fn list_by_country(&self, country: &str) -> Result<Vec<Event>> {
        self.list(
            EventQuery::by_country(country),
            EventOperation::FetchByCountry(country.to_string()),
        )
        .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        self.repo
            .get_event(id)
            .await
            .map_err(|e| EventServiceError::from_repository(EventOperation::FetchOne, e))
    }

    /// Inserts a new event and returns the stored row.
    pub async fn create(&self, input: &EventInput) -> Result<Event> {
        let fields = require_fields(input)?;

        let event = self.repo.insert_event(&fields).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create event");
            EventServiceError::from_repository(EventOperation::Create, e)
        })?;

        tracing::info!(event_id = %event.id, title = %event.title, "Created event");
        Ok(event)
    }

    /// Replaces the fields of the event `id` and returns the updated row.
    pub async fn update(&self, id: Uuid, input: &EventInput) -> Result<Event> {
        let fields = require_fields(input)?;

        let event = self.repo.update_event(id, &fields).await.map_err(|e| {
            tracing::error!(event_id = %id, error = %e, "Failed to update event");
            EventServiceError::from_repository(EventOperation::Update, e)
        })?;

        tracing::info!(event_id = %event.id, "Updated event");
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.repo.delete_event(id).await.map_err(|e| {
            tracing::error!(event_id = %id, error = %e, "Failed to delete event");
            EventServiceError::from_repository(EventOperation::Delete, e)
        })?;

        tracing::info!(event_id = %id, "Deleted event");
        Ok(())
    }
}
