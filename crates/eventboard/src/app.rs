use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use eventboard_auth::auth_routes;

use crate::{
    handlers::{
        admin::{
            admin_page, create_event as admin_create_event, delete_event as admin_delete_event,
            edit_event_form, new_event_form, update_event as admin_update_event,
        },
        api::{
            create_event, delete_event, get_event, list_event_groups, list_events,
            list_upcoming_events, update_event,
        },
        health::{healthz, livez},
        login::{login_page, login_submit, logout},
        pages::landing,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/upcoming", get(list_upcoming_events))
        .route("/events/groups", get(list_event_groups))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .layer(cors);

    let admin_routes = Router::new()
        .route("/admin", get(admin_page))
        .route("/admin/events", post(admin_create_event))
        .route("/admin/events/new", get(new_event_form))
        .route("/admin/events/{id}", post(admin_update_event))
        .route("/admin/events/{id}/edit", get(edit_event_form))
        .route("/admin/events/{id}/delete", post(admin_delete_event));

    let timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(landing))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .merge(admin_routes)
        .nest("/api", api_routes)
        .with_state(state.clone())
        .merge(auth_routes().with_state(state.auth))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
}
