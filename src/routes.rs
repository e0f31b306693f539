// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, practices, quiz, reports},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, staff_middleware},
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Workers reach the questionnaire and quiz routes without a token.
/// * Statistics and reports need a manager or administrator token.
/// * User management, database summary and reset need an administrator token.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new().route("/login", post(auth::login));

    let practice_routes = Router::new()
        .route("/questionnaire", get(practices::get_questionnaire))
        .route("/responses", post(practices::submit_response))
        .merge(
            Router::new()
                .route("/stats", get(practices::get_stats))
                .layer(middleware::from_fn(staff_middleware))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::list_questions))
        .route("/sessions", post(quiz::start_session))
        .route("/sessions/answer", post(quiz::submit_answer))
        .merge(
            Router::new()
                .route("/stats", get(quiz::get_stats))
                .layer(middleware::from_fn(staff_middleware))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let report_routes = Router::new()
        .route("/hpo", get(reports::hpo_report))
        .route("/leadership", get(reports::leadership_report))
        .layer(middleware::from_fn(staff_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/database", get(admin::database_summary))
        .route("/reset", post(admin::reset_responses))
        // Auth runs first (outermost), then the admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/practices", practice_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/admin", admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_origins)),
        )
        .with_state(state)
}
