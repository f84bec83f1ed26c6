//! Admin panel: sortable event table and the create/edit forms.

use askama::Template;
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use eventboard_auth::OptionalUser;
use eventboard_core::auth::User;
use eventboard_core::events::{
    format_date, split_country_flag, validate_event, DateStyle, Event, EventDraft,
    EventField, FormMode, SortDirection, SortField, SortState, ValidationErrors,
};

use super::error::status_for_service_error;
use super::flash::{redirect_with_flash, take_flash, FlashMessage};
use super::login::ADMIN_HOME;
use super::pages::HtmlTemplate;
use crate::state::AppState;

/// Extractor for admin pages. Anonymous requests are sent to the login page.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match user {
            Some(user) => Ok(RequireAdmin(user)),
            None => {
                // Only pages can be returned to; form posts land on the panel.
                let return_to = if parts.method == Method::GET {
                    parts
                        .uri
                        .path_and_query()
                        .map(|pq| pq.as_str())
                        .unwrap_or(ADMIN_HOME)
                } else {
                    ADMIN_HOME
                };
                let location = format!("/login?return_to={}", urlencoding::encode(return_to));
                Err(Redirect::to(&location).into_response())
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl AdminQuery {
    /// Unknown values fall back to the default sort.
    fn sort_state(&self) -> SortState {
        let default = SortState::default();
        let field = self
            .sort
            .as_deref()
            .and_then(|s| SortField::ALL.into_iter().find(|f| f.as_str() == s))
            .unwrap_or(default.field);
        let direction = match self.dir.as_deref() {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            _ => default.direction,
        };
        SortState::new(field, direction)
    }
}

/// A clickable column header.
pub struct SortHeader {
    pub label: &'static str,
    pub href: String,
    pub indicator: &'static str,
}

fn column_label(field: SortField) -> &'static str {
    match field {
        SortField::Title => "Title",
        SortField::Country => "Country",
        SortField::City => "Address",
        SortField::Date => "Date",
    }
}

fn sort_headers(current: SortState) -> Vec<SortHeader> {
    [
        SortField::Title,
        SortField::Country,
        SortField::City,
        SortField::Date,
    ]
    .into_iter()
    .map(|field| {
        let next = current.toggle(field);
        let indicator = match (current.field == field, current.direction) {
            (false, _) => "",
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
        };
        SortHeader {
            label: column_label(field),
            href: format!(
                "/admin?sort={}&dir={}",
                next.field.as_str(),
                next.direction.as_str()
            ),
            indicator,
        }
    })
    .collect()
}

pub struct AdminRow {
    pub id: Uuid,
    pub title: String,
    pub country: String,
    pub flag: String,
    pub city: String,
    pub date: String,
}

impl From<&Event> for AdminRow {
    fn from(event: &Event) -> Self {
        let (country, flag) = split_country_flag(&event.country);
        Self {
            id: event.id,
            title: event.title.clone(),
            country: country.to_string(),
            flag: flag.unwrap_or_default().to_string(),
            city: event.city.clone(),
            date: format_date(event.date, DateStyle::WithYear),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
struct AdminTemplate {
    flash: Option<FlashMessage>,
    user_email: String,
    headers: Vec<SortHeader>,
    rows: Vec<AdminRow>,
    error: Option<String>,
}

/// Handler for GET /admin
pub async fn admin_page(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    jar: CookieJar,
) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    let sort = query.sort_state();

    let (rows, error) = match state.events.refresh_all().await {
        Ok(_) => (
            state.events.sorted(sort).iter().map(AdminRow::from).collect(),
            None,
        ),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };

    let template = AdminTemplate {
        flash,
        user_email: user.email,
        headers: sort_headers(sort),
        rows,
        error,
    };

    (jar, HtmlTemplate(template))
}

/// Inline messages for the event form, one per input.
#[derive(Debug, Default)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let get = |field| errors.get(field).map(str::to_string);
        Self {
            title: get(EventField::Title),
            description: get(EventField::Description),
            date: get(EventField::Date),
            country: get(EventField::Country),
            city: get(EventField::City),
        }
    }
}

#[derive(Template)]
#[template(path = "event_form.html")]
struct EventFormTemplate {
    flash: Option<FlashMessage>,
    heading: &'static str,
    action: String,
    submit_label: &'static str,
    draft: EventDraft,
    time_from: String,
    time_to: String,
    errors: FieldErrors,
    general_error: Option<String>,
}

impl EventFormTemplate {
    fn new(mode: FormMode, action: String, draft: EventDraft) -> Self {
        let (heading, submit_label) = match mode {
            FormMode::Create => ("Create New Event", "Create Event"),
            FormMode::Edit => ("Edit Event", "Update Event"),
        };
        Self {
            flash: None,
            heading,
            action,
            submit_label,
            time_from: draft.time_from.clone().unwrap_or_default(),
            time_to: draft.time_to.clone().unwrap_or_default(),
            draft,
            errors: FieldErrors::default(),
            general_error: None,
        }
    }

    fn with_errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = FieldErrors::from(errors);
        self
    }

    fn with_general_error(mut self, message: String) -> Self {
        self.general_error = Some(message);
        self
    }
}

fn edit_action(id: Uuid) -> String {
    format!("/admin/events/{id}")
}

/// Handler for GET /admin/events/new
pub async fn new_event_form(RequireAdmin(_): RequireAdmin) -> impl IntoResponse {
    HtmlTemplate(EventFormTemplate::new(
        FormMode::Create,
        "/admin/events".to_string(),
        EventDraft::default(),
    ))
}

/// Handler for POST /admin/events
pub async fn create_event(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Form(draft): Form<EventDraft>,
) -> Response {
    let form = EventFormTemplate::new(
        FormMode::Create,
        "/admin/events".to_string(),
        draft.clone(),
    );

    let errors = validate_event(&draft, FormMode::Create, Local::now().date_naive());
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            HtmlTemplate(form.with_errors(&errors)),
        )
            .into_response();
    }

    match state.events.create(&draft.into_input()).await {
        Ok(_) => redirect_with_flash(
            ADMIN_HOME,
            FlashMessage::success("Event created successfully!"),
        ),
        Err(err) => (
            status_for_service_error(&err),
            HtmlTemplate(form.with_general_error(err.to_string())),
        )
            .into_response(),
    }
}

/// Handler for GET /admin/events/{id}/edit
pub async fn edit_event_form(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.service.get(id).await {
        Ok(Some(event)) => HtmlTemplate(EventFormTemplate::new(
            FormMode::Edit,
            edit_action(id),
            EventDraft::from_event(&event),
        ))
        .into_response(),
        Ok(None) => redirect_with_flash(ADMIN_HOME, FlashMessage::error("Event not found")),
        Err(err) => redirect_with_flash(ADMIN_HOME, FlashMessage::error(err.to_string())),
    }
}

/// Handler for POST /admin/events/{id}
pub async fn update_event(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(draft): Form<EventDraft>,
) -> Response {
    let form = EventFormTemplate::new(FormMode::Edit, edit_action(id), draft.clone());

    let errors = validate_event(&draft, FormMode::Edit, Local::now().date_naive());
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            HtmlTemplate(form.with_errors(&errors)),
        )
            .into_response();
    }

    match state.events.update(id, &draft.into_input()).await {
        Ok(_) => redirect_with_flash(
            ADMIN_HOME,
            FlashMessage::success("Event updated successfully!"),
        ),
        Err(err) => (
            status_for_service_error(&err),
            HtmlTemplate(form.with_general_error(err.to_string())),
        )
            .into_response(),
    }
}

/// Handler for POST /admin/events/{id}/delete
pub async fn delete_event(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.events.delete(id).await {
        Ok(()) => redirect_with_flash(
            ADMIN_HOME,
            FlashMessage::success("Event deleted successfully!"),
        ),
        Err(err) => redirect_with_flash(ADMIN_HOME, FlashMessage::error(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(sort: Option<&str>, dir: Option<&str>) -> AdminQuery {
        AdminQuery {
            sort: sort.map(str::to_string),
            dir: dir.map(str::to_string),
        }
    }

    #[test]
    fn test_sort_state_defaults_to_newest_first() {
        assert_eq!(query(None, None).sort_state(), SortState::default());
        assert_eq!(
            query(Some("bogus"), Some("sideways")).sort_state(),
            SortState::default()
        );
    }

    #[test]
    fn test_sort_state_parses_query() {
        assert_eq!(
            query(Some("city"), Some("asc")).sort_state(),
            SortState::new(SortField::City, SortDirection::Asc)
        );
    }

    #[test]
    fn test_headers_toggle_active_column() {
        let headers = sort_headers(SortState::default());

        let date = headers.iter().find(|h| h.label == "Date").unwrap();
        assert_eq!(date.indicator, "▼");
        assert_eq!(date.href, "/admin?sort=date&dir=asc");

        let title = headers.iter().find(|h| h.label == "Title").unwrap();
        assert_eq!(title.indicator, "");
        assert_eq!(title.href, "/admin?sort=title&dir=asc");
    }

    #[test]
    fn test_field_errors_follow_validation() {
        let draft = EventDraft {
            title: "Meetup".to_string(),
            ..EventDraft::default()
        };
        let errors = validate_event(&draft, FormMode::Edit, Local::now().date_naive());
        let fields = FieldErrors::from(&errors);

        assert!(fields.title.is_none());
        assert_eq!(fields.city.as_deref(), Some("Address is required"));
        assert_eq!(fields.date.as_deref(), Some("Date is required"));
    }
}
