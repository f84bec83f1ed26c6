use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored event as returned by the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Display time range, usually in the `2pm-4pm` form.
    pub description: String,
    pub date: NaiveDate,
    /// Country name, optionally followed by a flag glyph pair.
    pub country: String,
    /// City or street address.
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with a fresh id and timestamps.
    pub fn new(fields: EventFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            date: fields.date,
            country: fields.country,
            city: fields.city,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Replaces the business fields, bumping `updated_at`.
    pub fn apply(&mut self, fields: EventFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.date = fields.date;
        self.country = fields.country;
        self.city = fields.city;
        self.updated_at = Utc::now();
    }

    /// The business fields of this event.
    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            country: self.country.clone(),
            city: self.city.clone(),
        }
    }
}

/// Raw construction payload for creating or updating an event.
///
/// All fields are strings exactly as submitted; nothing is trimmed or parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub date: String,
    pub country: String,
    pub city: String,
}

impl EventInput {
    /// Returns a copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            date: self.date.trim().to_string(),
            country: self.country.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }
}

/// Trimmed, typed event fields handed to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub country: String,
    pub city: String,
}

/// Events sharing a country, with the number of distinct cities among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryGroup {
    pub country: String,
    pub events: Vec<Event>,
    pub city_count: usize,
}

/// Names of the user-editable event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventField {
    Title,
    Description,
    Date,
    Country,
    City,
}

impl EventField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventField::Title => "title",
            EventField::Description => "description",
            EventField::Date => "date",
            EventField::Country => "country",
            EventField::City => "city",
        }
    }
}

impl std::fmt::Display for EventField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> EventFields {
        EventFields {
            title: "Rust Meetup".to_string(),
            description: "6pm-9pm".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            country: "Uruguay 🇺🇾".to_string(),
            city: "Montevideo".to_string(),
        }
    }

    #[test]
    fn test_event_new_assigns_id_and_timestamps() {
        let event = Event::new(sample_fields());
        assert_eq!(event.title, "Rust Meetup");
        assert_eq!(event.created_at, event.updated_at);
        assert_eq!(event.fields(), sample_fields());
    }

    #[test]
    fn test_event_apply_replaces_fields() {
        let mut event = Event::new(sample_fields());
        let id = event.id;
        let mut fields = sample_fields();
        fields.title = "Rust Night".to_string();

        event.apply(fields);

        assert_eq!(event.id, id);
        assert_eq!(event.title, "Rust Night");
        assert!(event.updated_at >= event.created_at);
    }

    #[test]
    fn test_event_input_trimmed() {
        let input = EventInput {
            title: "  Title ".to_string(),
            description: "\t2pm-4pm\n".to_string(),
            date: " 2024-03-01".to_string(),
            country: "France ".to_string(),
            city: " Paris".to_string(),
        };

        let trimmed = input.trimmed();
        assert_eq!(trimmed.title, "Title");
        assert_eq!(trimmed.description, "2pm-4pm");
        assert_eq!(trimmed.date, "2024-03-01");
        assert_eq!(trimmed.country, "France");
        assert_eq!(trimmed.city, "Paris");
    }

    #[test]
    fn test_event_serializes_iso_date() {
        let event = Event::new(sample_fields());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-03-01");
    }

    #[test]
    fn test_event_field_display() {
        assert_eq!(EventField::City.to_string(), "city");
        assert_eq!(
            serde_json::to_string(&EventField::Description).unwrap(),
            "\"description\""
        );
    }
}
