//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create the events table and its indexes.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    date TEXT NOT NULL,
    country TEXT NOT NULL,
    city TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);
CREATE INDEX IF NOT EXISTS idx_events_country ON events(country);
"#;

const EVENT_COLUMNS: &str = "id, title, description, date, country, city, created_at, updated_at";

/// Select events, optionally filtered by a minimum date (?1) and an exact country (?2).
///
/// ISO dates compare correctly as text.
pub fn select_events() -> String {
    format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR country = ?2) \
         ORDER BY date ASC, created_at ASC"
    )
}

/// Select a single event by id.
pub fn select_event_by_id() -> String {
    format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1")
}

/// Insert a new event.
pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, title, description, date, country, city, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// Replace the business fields of an event and return the stored row.
pub fn update_event() -> String {
    format!(
        "UPDATE events \
         SET title = ?2, description = ?3, date = ?4, country = ?5, city = ?6, updated_at = ?7 \
         WHERE id = ?1 \
         RETURNING {EVENT_COLUMNS}"
    )
}

/// Delete an event by id.
pub const DELETE_EVENT: &str = "DELETE FROM events WHERE id = ?1";
