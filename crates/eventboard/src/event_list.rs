//! Process-wide list of events shown by the pages.
//!
//! The list is only replaced wholesale: refreshes swap in the fetched
//! events, create appends, update maps and delete filters, each producing a
//! new `Arc<[Event]>`. Readers take cheap snapshots. Every write records its
//! failure as the single last-error message.

use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use eventboard_core::events::{
    group_by_country, sort_events, CountryGroup, Event, EventInput, SortState,
};

use crate::service::{EventService, EventServiceError, Result};

#[derive(Debug, Clone)]
struct ListState {
    events: Arc<[Event]>,
    loading: bool,
    last_error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            events: Arc::from(Vec::new()),
            loading: false,
            last_error: None,
        }
    }
}

/// Point-in-time view of the list.
#[derive(Debug, Clone)]
pub struct EventListSnapshot {
    pub events: Arc<[Event]>,
    pub loading: bool,
    pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct EventList {
    service: EventService,
    state: Arc<RwLock<ListState>>,
}

impl EventList {
    pub fn new(service: EventService) -> Self {
        Self {
            service,
            state: Arc::new(RwLock::new(ListState::default())),
        }
    }

    fn update_state(&self, f: impl FnOnce(&mut ListState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Marks an operation as started: loading set, last error cleared.
    fn begin(&self) {
        self.update_state(|state| {
            state.loading = true;
            state.last_error = None;
        });
    }

    /// Records a failed operation.
    fn fail(&self, err: &EventServiceError) {
        let message = err.to_string();
        self.update_state(|state| {
            state.loading = false;
            state.last_error = Some(message);
        });
    }

    /// Applies `f` to the current events and clears loading.
    fn replace(&self, f: impl FnOnce(&[Event]) -> Vec<Event>) -> Arc<[Event]> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next: Arc<[Event]> = Arc::from(f(&state.events));
        state.events = next;
        state.loading = false;
        state.events.clone()
    }

    pub fn snapshot(&self) -> EventListSnapshot {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        EventListSnapshot {
            events: state.events.clone(),
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    /// Country groups derived from the current events.
    pub fn groups(&self) -> Vec<CountryGroup> {
        group_by_country(&self.snapshot().events)
    }

    /// The current events in table order.
    pub fn sorted(&self, sort: SortState) -> Vec<Event> {
        sort_events(&self.snapshot().events, sort)
    }

    /// Replaces the list with every stored event.
    pub async fn refresh_all(&self) -> Result<Arc<[Event]>> {
        self.begin();
        match self.service.list_all().await {
            Ok(events) => Ok(self.replace(|_| events)),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Replaces the list with the events dated today or later.
    pub async fn refresh_upcoming(&self) -> Result<Arc<[Event]>> {
        self.begin();
        match self.service.list_upcoming().await {
            Ok(events) => Ok(self.replace(|_| events)),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Creates an event and appends the stored row.
    pub async fn create(&self, input: &EventInput) -> Result<Event> {
        self.begin();
        match self.service.create(input).await {
            Ok(event) => {
                let created = event.clone();
                self.replace(move |events| {
                    let mut next = events.to_vec();
                    next.push(created);
                    next
                });
                Ok(event)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Updates an event and swaps the stored row in place.
    pub async fn update(&self, id: Uuid, input: &EventInput) -> Result<Event> {
        self.begin();
        match self.service.update(id, input).await {
            Ok(event) => {
                let updated = event.clone();
                self.replace(move |events| {
                    events
                        .iter()
                        .map(|e| if e.id == id { updated.clone() } else { e.clone() })
                        .collect()
                });
                Ok(event)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Deletes an event and filters it out of the list.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.begin();
        match self.service.delete(id).await {
            Ok(()) => {
                self.replace(|events| events.iter().filter(|e| e.id != id).cloned().collect());
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};

    use super::*;
    use crate::storage::InMemoryRepository;

    fn list() -> EventList {
        EventList::new(EventService::new(Arc::new(InMemoryRepository::new())))
    }

    fn input(title: &str, country: &str, city: &str) -> EventInput {
        let date = Local::now().date_naive() + Duration::days(7);
        EventInput {
            title: title.to_string(),
            description: "2pm-4pm".to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            country: country.to_string(),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_appends_exactly_one_event() {
        let list = list();
        list.create(&input("First", "Chile", "Santiago"))
            .await
            .unwrap();

        let event = list
            .create(&input("Second", "Chile", "Valparaíso"))
            .await
            .unwrap();

        let snapshot = list.snapshot();
        assert_eq!(snapshot.events.len(), 2);
        assert_eq!(snapshot.events[1], event);
        assert!(!snapshot.loading);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_rejected_create_leaves_list_and_records_error() {
        let list = list();
        list.create(&input("First", "Chile", "Santiago"))
            .await
            .unwrap();

        let err = list
            .create(&input("No city", "Chile", ""))
            .await
            .unwrap_err();

        let snapshot = list.snapshot();
        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(snapshot.last_error, Some(err.to_string()));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_update_maps_matching_row() {
        let list = list();
        let first = list
            .create(&input("First", "Chile", "Santiago"))
            .await
            .unwrap();
        list.create(&input("Second", "Peru", "Lima")).await.unwrap();

        list.update(first.id, &input("Renamed", "Chile", "Santiago"))
            .await
            .unwrap();

        let titles: Vec<String> = list
            .snapshot()
            .events
            .iter()
            .map(|e| e.title.clone())
            .collect();
        assert_eq!(titles, vec!["Renamed", "Second"]);
    }

    #[tokio::test]
    async fn test_delete_twice_leaves_list_intact() {
        let list = list();
        let first = list
            .create(&input("First", "Chile", "Santiago"))
            .await
            .unwrap();
        list.create(&input("Second", "Peru", "Lima")).await.unwrap();

        list.delete(first.id).await.unwrap();
        let after_first = list.snapshot().events;

        let _ = list.delete(first.id).await;
        let after_second = list.snapshot().events;

        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_refresh_replaces_list_and_groups() {
        let service = EventService::new(Arc::new(InMemoryRepository::new()));
        service
            .create(&input("A1", "Argentina", "Córdoba"))
            .await
            .unwrap();
        service
            .create(&input("A2", "Argentina", "Rosario"))
            .await
            .unwrap();
        service
            .create(&input("B1", "Bolivia", "La Paz"))
            .await
            .unwrap();
        let list = EventList::new(service);
        assert!(list.snapshot().events.is_empty());

        let events = list.refresh_upcoming().await.unwrap();

        assert_eq!(events.len(), 3);
        let groups = list.groups();
        assert_eq!(groups[0].country, "Argentina");
        assert_eq!(groups[0].city_count, 2);
        assert_eq!(groups[1].country, "Bolivia");
    }

    #[tokio::test]
    async fn test_refresh_all_twice_is_stable() {
        let list = list();
        list.create(&input("First", "Chile", "Santiago"))
            .await
            .unwrap();

        let first = list.refresh_all().await.unwrap();
        let second = list.refresh_all().await.unwrap();

        assert_eq!(first, second);
    }
}
