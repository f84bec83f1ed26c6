use chrono::NaiveDate;

use crate::events::Event;

/// Filters for [`EventRepository::list_events`](super::EventRepository::list_events).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Only events on or after this date.
    pub on_or_after: Option<NaiveDate>,
    /// Only events whose country matches exactly.
    pub country: Option<String>,
}

impl EventQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn upcoming(today: NaiveDate) -> Self {
        Self {
            on_or_after: Some(today),
            country: None,
        }
    }

    pub fn by_country(country: impl Into<String>) -> Self {
        Self {
            on_or_after: None,
            country: Some(country.into()),
        }
    }

    /// Whether an event passes this query's filters.
    pub fn matches(&self, event: &Event) -> bool {
        self.on_or_after.is_none_or(|from| event.date >= from)
            && self
                .country
                .as_deref()
                .is_none_or(|country| event.country == country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventFields;

    fn event(date: &str, country: &str) -> Event {
        Event::new(EventFields {
            title: "Meetup".to_string(),
            description: "2pm-4pm".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            country: country.to_string(),
            city: "Somewhere".to_string(),
        })
    }

    #[test]
    fn test_all_matches_everything() {
        assert!(EventQuery::all().matches(&event("1999-01-01", "Chile")));
    }

    #[test]
    fn test_upcoming_includes_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = EventQuery::upcoming(today);
        assert!(query.matches(&event("2024-03-01", "Chile")));
        assert!(query.matches(&event("2024-03-02", "Chile")));
        assert!(!query.matches(&event("2024-02-29", "Chile")));
    }

    #[test]
    fn test_by_country_is_exact() {
        let query = EventQuery::by_country("Chile");
        assert!(query.matches(&event("2024-03-01", "Chile")));
        assert!(!query.matches(&event("2024-03-01", "chile")));
        assert!(!query.matches(&event("2024-03-01", "Chile 🇨🇱")));
    }
}
