use chrono::{Duration, NaiveDate};
use eventboard_core::events::{to_iso_date, EventInput};

use crate::service::{EventService, Result};

/// Generates demo events spread over the weeks after `today`.
pub fn generate_mock_events(today: NaiveDate) -> Vec<EventInput> {
    let event = |title: &str, time: &str, days: i64, country: &str, city: &str| EventInput {
        title: title.to_string(),
        description: time.to_string(),
        date: to_iso_date(today + Duration::days(days)),
        country: country.to_string(),
        city: city.to_string(),
    };

    vec![
        event("Rust Meetup", "6pm-9pm", 3, "Uruguay 🇺🇾", "Montevideo"),
        event("Tech Talks Night", "7pm-10pm", 10, "Uruguay 🇺🇾", "Punta del Este"),
        event("Open Source Sprint", "10am-4pm", 17, "Uruguay 🇺🇾", "Colonia del Sacramento"),
        event("Systems Programming Workshop", "2pm-5pm", 5, "Argentina 🇦🇷", "Buenos Aires"),
        event("Cloud Native Day", "9am-6pm", 21, "Argentina 🇦🇷", "Córdoba"),
        event("WebAssembly Summit", "9am-5pm", 14, "Spain 🇪🇸", "Madrid"),
        event("Developer Breakfast", "8am-10am", 1, "Chile 🇨🇱", "Santiago"),
    ]
}

/// Inserts the demo events unless the store already holds some.
///
/// Returns how many events were inserted.
pub async fn seed_demo_data(service: &EventService, today: NaiveDate) -> Result<usize> {
    if !service.list_all().await?.is_empty() {
        tracing::info!("Store already has events, skipping demo data");
        return Ok(0);
    }

    let events = generate_mock_events(today);
    for input in &events {
        service.create(input).await?;
    }

    tracing::info!(count = events.len(), "Seeded demo events");
    Ok(events.len())
}
