use axum::{middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::handlers;
use crate::middleware::identity_middleware;
use crate::state::AppState;

/// Assemble the full router over injected collaborators. Tests call this
/// with fakes; main wires the real HTTP clients.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn api_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::drops;

    Router::new()
        // Daily drop management
        .route(
            "/api/drops",
            post(drops::drop_publish)
                .put(drops::drop_update)
                .delete(drops::drop_delete),
        )
        .route("/api/drops/today", get(drops::drop_today))
        .route("/api/drops/list", get(drops::drop_list))
        // Paywall gate
        .route("/api/access/check", get(handlers::access::check_access))
        .route_layer(middleware::from_fn(identity_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Daily Drop API",
            "version": version,
            "description": "Multi-tenant daily content drop API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "today": "GET /api/drops/today (member)",
                "publish": "POST /api/drops (admin)",
                "list": "GET /api/drops/list (admin)",
                "update": "PUT /api/drops (admin)",
                "delete": "DELETE /api/drops (admin)",
                "access": "GET /api/access/check (authenticated)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "drop store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
