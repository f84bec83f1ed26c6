//! Hosted storage backend speaking the PostgREST protocol.
//!
//! Every operation is a single request against `<url>/rest/v1/events`,
//! authenticated with the project's API key. The store assigns ids and
//! timestamps; mutations ask for the affected rows back with
//! `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use eventboard_core::events::{Event, EventFields};
use eventboard_core::storage::{EventQuery, EventRepository, RepositoryError, Result};

const EVENTS_PATH: &str = "rest/v1/events";

/// Client for a PostgREST-compatible `events` table.
#[derive(Debug, Clone)]
pub struct PostgrestRepository {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

/// Body of an insert or update: the business fields only.
#[derive(Debug, Serialize)]
struct EventRow<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    country: &'a str,
    city: &'a str,
}

impl<'a> From<&'a EventFields> for EventRow<'a> {
    fn from(fields: &'a EventFields) -> Self {
        Self {
            title: &fields.title,
            description: &fields.description,
            date: fields.date.format("%Y-%m-%d").to_string(),
            country: &fields.country,
            city: &fields.city,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
}

/// Query-string filters for a listing, in PostgREST operator syntax.
fn list_params(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    if let Some(date) = query.on_or_after {
        params.push(("date", format!("gte.{}", date.format("%Y-%m-%d"))));
    }
    if let Some(country) = &query.country {
        params.push(("country", format!("eq.{country}")));
    }
    params.push(("order", "date.asc".to_string()));
    params
}

fn id_filter(id: Uuid) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

fn transport_error(err: reqwest::Error) -> RepositoryError {
    if err.is_connect() || err.is_timeout() {
        RepositoryError::ConnectionFailed(err.to_string())
    } else {
        RepositoryError::QueryFailed(err.to_string())
    }
}

/// Maps a failed response status and message to a RepositoryError.
fn status_error(status: StatusCode, message: String) -> RepositoryError {
    if status == StatusCode::CONFLICT {
        RepositoryError::AlreadyExists {
            entity_type: "Event",
            id: message,
        }
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        RepositoryError::ConnectionFailed(message)
    } else if status.is_client_error() {
        RepositoryError::InvalidData(message)
    } else {
        RepositoryError::QueryFailed(message)
    }
}

impl PostgrestRepository {
    /// Creates a client for the project at `base_url`.
    pub fn new(base_url: &Url, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = base_url
            .join(EVENTS_PATH)
            .map_err(|e| RepositoryError::ConnectionFailed(format!("invalid store URL: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.endpoint.clone())
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    fn returning(&self, method: Method) -> RequestBuilder {
        self.request(method)
            .header("Prefer", "return=representation")
    }

    /// Sends a request and decodes the returned rows.
    async fn rows(&self, request: RequestBuilder) -> Result<Vec<Event>> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Vec<Event>>()
                .await
                .map_err(|e| RepositoryError::Serialization(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.details))
            .unwrap_or(text);
        Err(status_error(status, message))
    }
}

#[async_trait]
impl EventRepository for PostgrestRepository {
    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>> {
        self.rows(self.request(Method::GET).query(&list_params(&query)))
            .await
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let rows = self
            .rows(
                self.request(Method::GET)
                    .query(&[("select", "*")])
                    .query(&id_filter(id)),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_event(&self, fields: &EventFields) -> Result<Event> {
        let rows = self
            .rows(
                self.returning(Method::POST)
                    .json(&[EventRow::from(fields)]),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::InvalidData("No data returned".to_string()))
    }

    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event> {
        let rows = self
            .rows(
                self.returning(Method::PATCH)
                    .query(&id_filter(id))
                    .json(&EventRow::from(fields)),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::event_not_found(id))
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let rows = self
            .rows(self.returning(Method::DELETE).query(&id_filter(id)))
            .await?;
        if rows.is_empty() {
            return Err(RepositoryError::event_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let repo =
            PostgrestRepository::new(&"https://project.example.co".parse().unwrap(), "anon")
                .unwrap();
        assert_eq!(
            repo.endpoint.as_str(),
            "https://project.example.co/rest/v1/events"
        );
    }

    #[test]
    fn test_list_params_use_operator_syntax() {
        let query = EventQuery {
            on_or_after: NaiveDate::from_ymd_opt(2024, 3, 1),
            country: Some("France 🇫🇷".to_string()),
        };

        let params = list_params(&query);

        assert!(params.contains(&("date", "gte.2024-03-01".to_string())));
        assert!(params.contains(&("country", "eq.France 🇫🇷".to_string())));
        assert_eq!(params.last(), Some(&("order", "date.asc".to_string())));
    }

    #[test]
    fn test_unfiltered_listing_only_orders() {
        let params = list_params(&EventQuery::all());
        assert_eq!(
            params,
            vec![
                ("select", "*".to_string()),
                ("order", "date.asc".to_string())
            ]
        );
    }

    #[test]
    fn test_row_body_has_iso_date() {
        let fields = EventFields {
            title: "Meetup".to_string(),
            description: "2pm-4pm".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            country: "France".to_string(),
            city: "Paris".to_string(),
        };

        let json = serde_json::to_value(EventRow::from(&fields)).unwrap();

        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_status_errors() {
        assert!(matches!(
            status_error(StatusCode::CONFLICT, "dup".to_string()),
            RepositoryError::AlreadyExists { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad".to_string()),
            RepositoryError::InvalidData(_)
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "down".to_string()),
            RepositoryError::QueryFailed(_)
        ));
    }
}
