//! SQLite repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use eventboard_core::events::{Event, EventFields};
use eventboard_core::storage::{EventQuery, EventRepository, RepositoryError, Result};

use super::conversions::{format_date, format_datetime, row_to_event};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based event repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository over an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(&schema::select_event_by_id())
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_event) {
                    Ok(event) => Ok(Some(event)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &id.to_string()))
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>> {
        let on_or_after = query.on_or_after.as_ref().map(format_date);
        let country = query.country;

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&schema::select_events()).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![on_or_after, country], row_to_event)
                    .map_err(wrap_err)?;

                let mut events = Vec::new();
                for row_result in rows {
                    events.push(row_result.map_err(wrap_err)?);
                }
                Ok(events)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, ""))
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        self.fetch(id).await
    }

    async fn insert_event(&self, fields: &EventFields) -> Result<Event> {
        let event = Event::new(fields.clone());
        let id = event.id.to_string();
        let params = (
            id.clone(),
            event.title.clone(),
            event.description.clone(),
            format_date(&event.date),
            event.country.clone(),
            event.city.clone(),
            format_datetime(&event.created_at),
            format_datetime(&event.updated_at),
        );

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_EVENT, params).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &id))?;

        Ok(event)
    }

    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event> {
        let id_str = id.to_string();
        let params = (
            id_str.clone(),
            fields.title.clone(),
            fields.description.clone(),
            format_date(&fields.date),
            fields.country.clone(),
            fields.city.clone(),
            format_datetime(&Utc::now()),
        );

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&schema::update_event()).map_err(wrap_err)?;
                stmt.query_row(params, row_to_event).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &id_str))
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let event_id = id_str.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, &event_id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn fields(title: &str, date: &str, country: &str) -> EventFields {
        EventFields {
            title: title.to_string(),
            description: "6pm-9pm".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            country: country.to_string(),
            city: "Montevideo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let event = repo
            .insert_event(&fields("Rust Meetup", "2024-03-01", "Uruguay 🇺🇾"))
            .await
            .unwrap();

        let fetched = repo.get_event(event.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Rust Meetup");
        assert_eq!(fetched.country, "Uruguay 🇺🇾");
        assert_eq!(fetched.date, event.date);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        assert!(repo.get_event(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_date_and_country() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.insert_event(&fields("Late", "2024-05-01", "Chile"))
            .await
            .unwrap();
        repo.insert_event(&fields("Early", "2024-01-15", "Uruguay"))
            .await
            .unwrap();
        repo.insert_event(&fields("Middle", "2024-03-01", "Chile"))
            .await
            .unwrap();

        let all = repo.list_events(EventQuery::all()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Middle", "Late"]);

        let chile = repo
            .list_events(EventQuery::by_country("Chile"))
            .await
            .unwrap();
        assert_eq!(chile.len(), 2);

        let upcoming = repo
            .list_events(EventQuery::upcoming(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ))
            .await
            .unwrap();
        let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Middle", "Late"]);
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let event = repo
            .insert_event(&fields("Meetup", "2024-03-01", "Chile"))
            .await
            .unwrap();

        let updated = repo
            .update_event(event.id, &fields("Renamed", "2024-04-01", "Peru"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, event.created_at);
        assert_eq!(repo.get_event(event.id).await.unwrap(), Some(updated));

        repo.delete_event(event.id).await.unwrap();
        assert!(repo.get_event(event.id).await.unwrap().is_none());

        let again = repo.delete_event(event.id).await;
        assert_eq!(again, Err(RepositoryError::event_not_found(event.id)));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();

        let result = repo
            .update_event(id, &fields("Meetup", "2024-03-01", "Chile"))
            .await;

        assert_eq!(result, Err(RepositoryError::event_not_found(id)));
    }
}
