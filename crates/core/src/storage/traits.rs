use async_trait::async_trait;
use uuid::Uuid;

use crate::events::{Event, EventFields};

use super::{EventQuery, Result};

/// Data store operations on events.
///
/// Every listing is ordered by date ascending.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Lists events matching the query.
    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>>;

    /// Gets an event by its ID.
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// Inserts a new event; the store assigns the id and timestamps.
    async fn insert_event(&self, fields: &EventFields) -> Result<Event>;

    /// Replaces the fields of an existing event.
    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event>;

    /// Deletes an event by its ID.
    async fn delete_event(&self, id: Uuid) -> Result<()>;
}
