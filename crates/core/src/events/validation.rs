use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::formatting::{
    format_time_range, parse_iso_date, parse_time_range, to_iso_date,
    trailing_regional_indicators,
};
use super::{Event, EventField, EventInput};
use crate::serde::deserialize_optional_string;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_COUNTRY_LENGTH: usize = 100;
pub const MAX_CITY_LENGTH: usize = 100;

/// Whether a form is creating a new event or editing an existing one.
///
/// Past dates are only rejected when creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Form payload for an event: the raw input plus optional clock inputs.
///
/// When both `time_from` and `time_to` are given they replace `description`
/// with the packed `2pm-4pm` label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub time_from: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub time_to: Option<String>,
}

impl EventDraft {
    /// Prefills a draft from a stored event, decomposing its time range when possible.
    pub fn from_event(event: &Event) -> Self {
        let (time_from, time_to) = match parse_time_range(&event.description) {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: to_iso_date(event.date),
            country: event.country.clone(),
            city: event.city.clone(),
            time_from,
            time_to,
        }
    }

    /// The description that will be stored: the composed time range when both
    /// clock values are present and valid, the trimmed free text otherwise.
    pub fn effective_description(&self) -> String {
        match (self.time_from(), self.time_to()) {
            (Some(from), Some(to)) => {
                format_time_range(from, to).unwrap_or_else(|_| self.description.trim().to_string())
            }
            _ => self.description.trim().to_string(),
        }
    }

    /// Converts the draft into a trimmed [`EventInput`].
    pub fn into_input(self) -> EventInput {
        let description = self.effective_description();
        EventInput {
            title: self.title,
            description,
            date: self.date,
            country: self.country,
            city: self.city,
        }
        .trimmed()
    }

    fn time_from(&self) -> Option<&str> {
        self.time_from.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn time_to(&self) -> Option<&str> {
        self.time_to.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn has_clock_inputs(&self) -> bool {
        self.time_from().is_some() || self.time_to().is_some()
    }
}

impl From<EventInput> for EventDraft {
    fn from(input: EventInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            date: input.date,
            country: input.country,
            city: input.city,
            time_from: None,
            time_to: None,
        }
    }
}

/// Field-level validation messages. A missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<EventField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: EventField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: EventField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validates an event form.
///
/// `today` is the caller's current local date; it is only consulted in
/// [`FormMode::Create`].
pub fn validate_event(draft: &EventDraft, mode: FormMode, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.insert(EventField::Title, "Title is required");
    } else if char_len(title) > MAX_TITLE_LENGTH {
        errors.insert(EventField::Title, "Title must be 200 characters or less");
    }

    if draft.has_clock_inputs() {
        match (draft.time_from(), draft.time_to()) {
            (Some(from), Some(to)) => match format_time_range(from, to) {
                Err(_) => errors.insert(EventField::Description, "Please enter a valid time"),
                // Free text that differs from the clock inputs is a conflicting edit.
                Ok(range) => {
                    let description = draft.description.trim();
                    if !description.is_empty() && description != range {
                        errors.insert(
                            EventField::Description,
                            "Time details do not match the start and end time; \
                             clear the times to keep the text",
                        );
                    }
                }
            },
            _ => errors.insert(
                EventField::Description,
                "Both start and end time are required",
            ),
        }
    } else {
        let description = draft.description.trim();
        if description.is_empty() {
            errors.insert(EventField::Description, "Time is required");
        } else if char_len(description) > MAX_DESCRIPTION_LENGTH {
            errors.insert(
                EventField::Description,
                "Time must be 2000 characters or less",
            );
        }
    }

    let date = draft.date.trim();
    if date.is_empty() {
        errors.insert(EventField::Date, "Date is required");
    } else {
        match parse_iso_date(date) {
            Err(_) => errors.insert(EventField::Date, "Please enter a valid date"),
            Ok(date) if mode == FormMode::Create && date < today => {
                errors.insert(EventField::Date, "Date cannot be in the past")
            }
            Ok(_) => {}
        }
    }

    let country = draft.country.trim();
    if country.is_empty() {
        errors.insert(EventField::Country, "Country is required");
    } else if char_len(country) > MAX_COUNTRY_LENGTH {
        errors.insert(
            EventField::Country,
            "Country must be 100 characters or less",
        );
    } else {
        let indicators = trailing_regional_indicators(country);
        if indicators != 0 && indicators != 2 {
            errors.insert(
                EventField::Country,
                "Country flag must be a pair of regional indicator symbols",
            );
        }
    }

    let city = draft.city.trim();
    if city.is_empty() {
        errors.insert(EventField::City, "Address is required");
    } else if char_len(city) > MAX_CITY_LENGTH {
        errors.insert(EventField::City, "Address must be 100 characters or less");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn valid_draft() -> EventDraft {
        EventDraft {
            title: "Rust Meetup".to_string(),
            description: "6pm-9pm".to_string(),
            date: "2024-03-10".to_string(),
            country: "France 🇫🇷".to_string(),
            city: "Paris".to_string(),
            time_from: None,
            time_to: None,
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(validate_event(&valid_draft(), FormMode::Create, today()).is_empty());
    }

    #[test]
    fn empty_fields_are_required() {
        let draft = EventDraft {
            title: "   ".to_string(),
            description: String::new(),
            date: String::new(),
            country: "\t".to_string(),
            city: String::new(),
            time_from: None,
            time_to: None,
        };

        let errors = validate_event(&draft, FormMode::Create, today());

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(EventField::Title), Some("Title is required"));
        assert_eq!(errors.get(EventField::Description), Some("Time is required"));
        assert_eq!(errors.get(EventField::Date), Some("Date is required"));
        assert_eq!(errors.get(EventField::Country), Some("Country is required"));
        assert_eq!(errors.get(EventField::City), Some("Address is required"));
    }

    #[test]
    fn title_length_boundary() {
        let mut draft = valid_draft();
        draft.title = "a".repeat(200);
        assert!(validate_event(&draft, FormMode::Create, today()).is_empty());

        draft.title = "a".repeat(201);
        let errors = validate_event(&draft, FormMode::Create, today());
        assert_eq!(
            errors.get(EventField::Title),
            Some("Title must be 200 characters or less")
        );
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let mut draft = valid_draft();
        draft.title = "é".repeat(200);
        draft.city = "ü".repeat(100);
        assert!(validate_event(&draft, FormMode::Create, today()).is_empty());
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let mut draft = valid_draft();
        draft.description = "x".repeat(2001);
        draft.country = "x".repeat(101);
        draft.city = "x".repeat(101);

        let errors = validate_event(&draft, FormMode::Edit, today());
        assert_eq!(
            errors.get(EventField::Description),
            Some("Time must be 2000 characters or less")
        );
        assert_eq!(
            errors.get(EventField::Country),
            Some("Country must be 100 characters or less")
        );
        assert_eq!(
            errors.get(EventField::City),
            Some("Address must be 100 characters or less")
        );
    }

    #[test]
    fn past_date_rejected_only_when_creating() {
        let mut draft = valid_draft();
        draft.date = "2024-02-29".to_string();

        let errors = validate_event(&draft, FormMode::Create, today());
        assert_eq!(
            errors.get(EventField::Date),
            Some("Date cannot be in the past")
        );

        assert!(validate_event(&draft, FormMode::Edit, today()).is_empty());
    }

    #[test]
    fn today_is_not_in_the_past() {
        let mut draft = valid_draft();
        draft.date = "2024-03-01".to_string();
        assert!(validate_event(&draft, FormMode::Create, today()).is_empty());
    }

    #[test]
    fn invalid_date_is_rejected() {
        let mut draft = valid_draft();
        draft.date = "2024-02-30".to_string();

        let errors = validate_event(&draft, FormMode::Edit, today());
        assert_eq!(
            errors.get(EventField::Date),
            Some("Please enter a valid date")
        );
    }

    #[test]
    fn clock_inputs_require_both_ends() {
        let mut draft = valid_draft();
        draft.description = String::new();
        draft.time_from = Some("14:00".to_string());

        let errors = validate_event(&draft, FormMode::Create, today());
        assert_eq!(
            errors.get(EventField::Description),
            Some("Both start and end time are required")
        );

        draft.time_to = Some("25:00".to_string());
        let errors = validate_event(&draft, FormMode::Create, today());
        assert_eq!(
            errors.get(EventField::Description),
            Some("Please enter a valid time")
        );

        draft.time_to = Some("16:00".to_string());
        assert!(validate_event(&draft, FormMode::Create, today()).is_empty());
    }

    #[test]
    fn edited_text_conflicting_with_clock_inputs_is_rejected() {
        let event = Event::new(super::super::EventFields {
            title: "Meetup".to_string(),
            description: "2pm-4pm".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            country: "France".to_string(),
            city: "Paris".to_string(),
        });
        let mut draft = EventDraft::from_event(&event);
        assert!(validate_event(&draft, FormMode::Edit, today()).is_empty());

        draft.description = "6pm-11pm, doors open at 5:30".to_string();
        let errors = validate_event(&draft, FormMode::Edit, today());
        assert!(errors
            .get(EventField::Description)
            .is_some_and(|message| message.starts_with("Time details do not match")));

        draft.time_from = None;
        draft.time_to = None;
        assert!(validate_event(&draft, FormMode::Edit, today()).is_empty());
        assert_eq!(draft.into_input().description, "6pm-11pm, doors open at 5:30");
    }

    #[test]
    fn broken_flag_is_rejected() {
        let mut draft = valid_draft();
        draft.country = "France 🇫".to_string();

        let errors = validate_event(&draft, FormMode::Create, today());
        assert_eq!(
            errors.get(EventField::Country),
            Some("Country flag must be a pair of regional indicator symbols")
        );
    }

    #[test]
    fn into_input_trims_and_composes_time_range() {
        let draft = EventDraft {
            title: "  Meetup ".to_string(),
            description: "ignored".to_string(),
            date: " 2024-03-10 ".to_string(),
            country: "France ".to_string(),
            city: " Paris".to_string(),
            time_from: Some("14:00".to_string()),
            time_to: Some("16:30".to_string()),
        };

        let input = draft.into_input();
        assert_eq!(input.title, "Meetup");
        assert_eq!(input.description, "2pm-4:30pm");
        assert_eq!(input.date, "2024-03-10");
        assert_eq!(input.country, "France");
        assert_eq!(input.city, "Paris");
    }

    #[test]
    fn from_event_decomposes_time_range() {
        let event = Event::new(super::super::EventFields {
            title: "Meetup".to_string(),
            description: "2pm-4pm".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            country: "France".to_string(),
            city: "Paris".to_string(),
        });

        let draft = EventDraft::from_event(&event);
        assert_eq!(draft.date, "2024-03-10");
        assert_eq!(draft.time_from.as_deref(), Some("14:00"));
        assert_eq!(draft.time_to.as_deref(), Some("16:00"));
        assert_eq!(draft.into_input().description, "2pm-4pm");
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let mut draft = valid_draft();
        draft.city = String::new();

        let errors = validate_event(&draft, FormMode::Create, today());
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "city": "Address is required" }));
    }
}
