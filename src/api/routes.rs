//! API Routes
//!
//! Configures the Axum router with every page and service endpoint.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_lineup_handler, dashboard_handler, health_handler, lineup_handler, live_status_handler,
    players_handler, save_lineup_handler, start_live_handler, stats_handler, stop_live_handler,
    teams_handler, update_slot_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/dashboard` - Dashboard sections
/// - `GET /api/teams` - Enriched teams (`conference`, `division`, `search`, `sort`)
/// - `GET /api/players` - Players with fantasy points (`position`, `team`, `search`, `sort`)
/// - `GET|DELETE /api/lineup` - Current lineup / clear it
/// - `PUT /api/lineup/:slot` - Fill or empty one slot
/// - `POST /api/lineup/save` - Persist a complete lineup
/// - `GET|POST|DELETE /api/live/:game_id` - Live tracking status / start / stop
/// - `GET /stats` - Cache and rate limiter statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, for the external rendering code
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/players", get(players_handler))
        .route("/api/lineup", get(lineup_handler).delete(clear_lineup_handler))
        .route("/api/lineup/save", post(save_lineup_handler))
        .route("/api/lineup/:slot", put(update_slot_handler))
        .route(
            "/api/live/:game_id",
            get(live_status_handler)
                .post(start_live_handler)
                .delete(stop_live_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::service;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let (service, _, _) = service();
        create_router(AppState::new(service))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_save_incomplete_lineup_is_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/lineup/save")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/set").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
