use crossing_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, PRACTITIONER_PIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossing_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    let state = AppState::new(config);

    // Schema bootstrap failure is not fatal; the server comes up degraded and
    // store-backed endpoints fail per-request.
    if let Err(e) = crossing_api::database::ensure_schema(&state.pool).await {
        tracing::error!("failed to ensure database schema: {}", e);
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Crossing API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
