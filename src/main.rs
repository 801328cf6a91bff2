use std::sync::Arc;

use dailydrop_api::access::HttpAccessResolver;
use dailydrop_api::app::app;
use dailydrop_api::state::AppState;
use dailydrop_api::store::HttpDropStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up STORE_ENDPOINT, ACCESS_ENDPOINT, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = dailydrop_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Daily Drop API in {:?} mode", config.environment);

    let access = HttpAccessResolver::from_config(&config.access)
        .unwrap_or_else(|e| panic!("access service configuration: {}", e));
    let store = HttpDropStore::from_config(&config.store)
        .unwrap_or_else(|e| panic!("drop store configuration: {}", e));

    let state = AppState::new(Arc::new(access), Arc::new(store));
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("DAILYDROP_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Daily Drop API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
