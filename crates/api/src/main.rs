use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use wardflow_api::app::{build_app, services::AppServices};
use wardflow_api::config::AppConfig;

#[tokio::main]
async fn main() {
    wardflow_observability::init();

    let cfg = AppConfig::from_env();

    let services = match cfg.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
                .expect("failed to connect to database");
            wardflow_infra::run_migrations(&pool)
                .await
                .expect("failed to run migrations");
            AppServices::postgres(pool, &cfg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(&cfg)
        }
    };

    let app = build_app(Arc::new(services));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
