mod error;
pub mod formatting;
mod sorting;
mod types;
mod validation;

pub use error::FormatError;
pub use formatting::{
    format_date, format_event_date, format_time_range, parse_iso_date, parse_time_range,
    split_country_flag, to_12_hour, to_24_hour, to_iso_date, DateStyle,
};
pub use sorting::{
    group_by_country, locale_compare, sort_events, SortDirection, SortField, SortState,
};
pub use types::{CountryGroup, Event, EventField, EventFields, EventInput};
pub use validation::{
    validate_event, EventDraft, FormMode, ValidationErrors, MAX_CITY_LENGTH, MAX_COUNTRY_LENGTH,
    MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
