use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{CountryGroup, Event};

/// Column an event table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Country,
    City,
    Title,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Date,
        SortField::Country,
        SortField::City,
        SortField::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Country => "country",
            SortField::City => "city",
            SortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Active sort of the admin table. Opens on date, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Selecting the active field reverses the direction; any other field
    /// starts ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Asc)
        }
    }
}

/// Case-insensitive comparison with lowercase ordered before uppercase on ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare_by(field: SortField, a: &Event, b: &Event) -> Ordering {
    match field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Country => a.country.to_lowercase().cmp(&b.country.to_lowercase()),
        SortField::City => a.city.to_lowercase().cmp(&b.city.to_lowercase()),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

/// Returns the events ordered by `state`. Equal keys keep their input order.
pub fn sort_events(events: &[Event], state: SortState) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by(state.field, a, b);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Groups events by exact country, busiest countries (most distinct cities) first.
///
/// Events keep their input order inside each group; countries with the same
/// number of cities are ordered alphabetically.
pub fn group_by_country(events: &[Event]) -> Vec<CountryGroup> {
    let mut groups: Vec<CountryGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for event in events {
        let position = *positions.entry(event.country.as_str()).or_insert_with(|| {
            groups.push(CountryGroup {
                country: event.country.clone(),
                events: Vec::new(),
                city_count: 0,
            });
            groups.len() - 1
        });
        groups[position].events.push(event.clone());
    }

    for group in &mut groups {
        group.city_count = group
            .events
            .iter()
            .map(|event| event.city.as_str())
            .collect::<HashSet<_>>()
            .len();
    }

    groups.sort_by(|a, b| {
        b.city_count
            .cmp(&a.city_count)
            .then_with(|| locale_compare(&a.country, &b.country))
    });

    groups
}
