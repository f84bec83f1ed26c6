//! Public landing page.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use eventboard_core::events::{format_date, group_by_country, CountryGroup, DateStyle, Event};

use super::flash::{take_flash, FlashMessage};
use crate::state::AppState;

/// Template wrapper that converts Askama templates into HTML responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Failed to render template");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template: {err}"),
                )
                    .into_response()
            }
        }
    }
}

/// One event card on the landing page.
pub struct EventCard {
    pub title: String,
    pub time: String,
    pub date: String,
    pub address: String,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            time: event.description.clone(),
            date: format_date(event.date, DateStyle::WithYear),
            address: event.city.clone(),
        }
    }
}

/// One country heading with its cards.
pub struct CountrySection {
    pub country: String,
    pub city_label: String,
    pub cards: Vec<EventCard>,
}

impl From<&CountryGroup> for CountrySection {
    fn from(group: &CountryGroup) -> Self {
        let city_label = match group.city_count {
            1 => "1 city".to_string(),
            n => format!("{n} cities"),
        };
        Self {
            country: group.country.clone(),
            city_label,
            cards: group.events.iter().map(EventCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    flash: Option<FlashMessage>,
    sections: Vec<CountrySection>,
    error: Option<String>,
}

/// Handler for the landing page (GET /).
///
/// Refreshes the shared list with upcoming events and renders them grouped
/// by country. A failed refresh renders the error with a retry link.
pub async fn landing(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);

    let template = match state.events.refresh_upcoming().await {
        Ok(events) => LandingTemplate {
            flash,
            sections: group_by_country(&events)
                .iter()
                .map(CountrySection::from)
                .collect(),
            error: None,
        },
        Err(err) => LandingTemplate {
            flash,
            sections: Vec::new(),
            error: Some(err.to_string()),
        },
    };

    (jar, HtmlTemplate(template))
}
