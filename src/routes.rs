// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    error::AppError,
    handlers::{auth, chat, health, heritage, pdf, quiz, spatial, statistics},
    openapi,
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, heritage, spatial, statistics, pdf, quiz, ai-dialog).
/// * Applies global middleware (Trace, CORS).
/// * Unknown routes get the JSON 404 envelope.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/auto-login", post(auth::auto_login))
        .route("/verify-token", post(auth::verify_token))
        // Protected: requires a Bearer token
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let heritage_routes = Router::new()
        .route("/", get(heritage::list_heritage))
        .route("/search", post(heritage::search_heritage))
        .route("/{id}", get(heritage::get_heritage));

    let spatial_routes = Router::new()
        .route("/point-query", post(spatial::point_query))
        .route("/buffer-query", post(spatial::buffer_query))
        .route("/within-region", post(spatial::within_region));

    let statistics_routes = Router::new()
        .route("/", get(statistics::overview))
        .route("/by-category", get(statistics::by_category))
        .route("/by-region", get(statistics::by_region))
        .route("/by-province", get(statistics::by_province));

    let pdf_routes = Router::new()
        .route("/files", get(pdf::list_files))
        .route("/download/{id}", get(pdf::download))
        .route("/info/{id}", get(pdf::info))
        .route("/search", get(pdf::search))
        .route("/hot", get(pdf::hot))
        .route("/health", get(pdf::health));

    let api_routes = Router::new()
        .route("/submit-quiz", post(quiz::submit_quiz))
        .route("/leaderboard", get(quiz::get_leaderboard))
        .route("/quiz-best-scores/{user_id}", get(quiz::get_best_scores))
        .route("/quiz-questions", get(quiz::get_quiz_questions))
        .route("/ai-dialog", post(chat::ai_dialog))
        .route("/openapi.json", get(openapi::openapi_json))
        .nest("/auth", auth_routes)
        .nest("/heritage", heritage_routes)
        .nest("/spatial", spatial_routes)
        .nest("/statistics", statistics_routes)
        .nest("/pdf", pdf_routes);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(not_found)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
