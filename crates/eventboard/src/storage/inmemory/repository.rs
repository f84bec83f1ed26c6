//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use eventboard_core::events::{Event, EventFields};
use eventboard_core::storage::{EventQuery, EventRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `events`, keeping their ids.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let events = events.into_iter().map(|event| (event.id, event)).collect();
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut matching: Vec<Event> = events
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(matching)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn insert_event(&self, fields: &EventFields) -> Result<Event> {
        let event = Event::new(fields.clone());
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event> {
        let mut events = self.events.write().await;
        let event = events
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::event_not_found(id))?;
        event.apply(fields.clone());
        Ok(event.clone())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let mut events = self.events.write().await;
        if events.remove(&id).is_none() {
            return Err(RepositoryError::event_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn fields(title: &str, date: &str, country: &str) -> EventFields {
        EventFields {
            title: title.to_string(),
            description: "2pm-4pm".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            country: country.to_string(),
            city: "Lisbon".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_get_returns_it() {
        let repo = InMemoryRepository::new();

        let event = repo
            .insert_event(&fields("Meetup", "2024-03-01", "Portugal"))
            .await
            .unwrap();

        let fetched = repo.get_event(event.id).await.unwrap();
        assert_eq!(fetched, Some(event));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_date_and_filtered() {
        let repo = InMemoryRepository::new();
        repo.insert_event(&fields("Late", "2024-05-01", "Portugal"))
            .await
            .unwrap();
        repo.insert_event(&fields("Early", "2024-01-15", "Spain"))
            .await
            .unwrap();
        repo.insert_event(&fields("Middle", "2024-03-01", "Portugal"))
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .list_events(EventQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Middle", "Late"]);

        let portugal = repo
            .list_events(EventQuery::by_country("Portugal"))
            .await
            .unwrap();
        assert_eq!(portugal.len(), 2);

        let upcoming = repo
            .list_events(EventQuery::upcoming(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].title, "Middle");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryRepository::new();
        let event = repo
            .insert_event(&fields("Meetup", "2024-03-01", "Portugal"))
            .await
            .unwrap();

        let updated = repo
            .update_event(event.id, &fields("Renamed", "2024-04-01", "Spain"))
            .await
            .unwrap();

        assert_eq!(updated.id, event.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, event.created_at);
        assert!(updated.updated_at >= event.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let repo = InMemoryRepository::new();
        let id = Uuid::new_v4();

        let result = repo
            .update_event(id, &fields("Meetup", "2024-03-01", "Portugal"))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));

        let result = repo.delete_event(id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_with_events_keeps_ids() {
        let event = Event::new(fields("Seeded", "2024-03-01", "Portugal"));
        let repo = InMemoryRepository::with_events([event.clone()]);

        assert_eq!(repo.get_event(event.id).await.unwrap(), Some(event));
    }
}
